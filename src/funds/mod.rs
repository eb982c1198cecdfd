//! The fund balance store.
//!
//! One row per (fund, client) pair holding the client's running balance in
//! that fund. Rows are created lazily on first credit and mutated only by
//! the STP engine's atomic transfer command.

pub mod models;
pub mod queries;
