//! benchcmp - compare two sets of benchmark samples
//!
//! This is the main crate that ties the report engine to the command line
//! and re-exports the pieces a caller needs to drive it programmatically.

pub use benchcmp_common as common;
pub use benchcmp_report as report;

/// Re-export common types and utilities
pub mod prelude {
    pub use crate::common::logging::Verbosity;
    pub use crate::common::{ReportError, Result};
    pub use crate::report::*;
}
