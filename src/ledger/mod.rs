//! The transaction ledger.
//!
//! Every fund transaction a client makes, regardless of type, lives here.
//! The STP engine reads and writes these rows through its own module; this
//! one provides the general data-access contracts and CRUD surface.

pub mod commands;
pub mod domain;
pub mod http;
pub mod models;
pub mod queries;
pub mod services;
