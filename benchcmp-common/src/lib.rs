//! Shared error type and logging setup for the benchcmp workspace.

pub mod error;
pub mod logging;

pub use error::{ReportError, Result};
