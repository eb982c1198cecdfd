//! The client/user directory.
//!
//! Users are account holders; each client belongs to exactly one user. That
//! chain is the authorization boundary every query and command scopes
//! through.

pub mod http;
pub mod models;
pub mod queries;
