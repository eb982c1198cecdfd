//! The Systematic Transfer Plan (STP) engine.
//!
//! An STP is a recurring transfer of a fixed amount from one fund to another
//! for a client. This module owns the validation and execution of those
//! transfers, and the read-side summary/trend aggregation used by dashboards.

pub mod commands;
pub mod domain;
pub mod http;
pub mod models;
pub mod queries;
pub mod services;
