//! Client notes.
//!
//! Free-form advisory notes an account holder keeps against a client, with a
//! category, an optional author tag, and a pinned flag for the ones that
//! should surface first.

pub mod commands;
pub mod domain;
pub mod http;
pub mod models;
pub mod queries;
