//! `signal_catalog` - a signal (issue) tracker with operational reports.
//!
//! Signals live in a single relational table (`SQLite` by default,
//! PostgreSQL behind the `postgres` feature). Reports are pure functions over
//! loaded rows and an explicit "today".

pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod logging;
pub mod model;
pub mod report;
pub mod storage;
pub mod util;

pub use error::{ErrorCode, Result, SignalError, StructuredError};
