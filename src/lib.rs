pub mod cli;
pub mod database;
pub mod directory;
pub mod funds;
pub mod http_err;
pub mod ledger;
pub mod notes;
pub mod server;
pub mod session;
pub mod stp;
