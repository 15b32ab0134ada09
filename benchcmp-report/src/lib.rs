//! Benchmark comparison engine.
//!
//! Compares two sample tables (base and test) produced by repeated benchmark
//! runs. Rows are grouped by a composite configuration key; for every group
//! and KPI the engine reports both averages, both %SDs, the %DIFF, the t-test
//! significance and a conclusion such as "Major Regression".
//!
//! ```no_run
//! use benchcmp_report::{config::{Preset, ReporterConfig}, run};
//! use std::path::Path;
//!
//! let config = ReporterConfig::preset(Preset::Storage);
//! let summary = run(
//!     Path::new("base.csv"),
//!     Path::new("test.csv"),
//!     Path::new("report.csv"),
//!     &config,
//! )?;
//! println!("{}", summary);
//! # Ok::<(), benchcmp_common::ReportError>(())
//! ```

pub mod classify;
pub mod config;
pub mod report;
pub mod samples;
pub mod stats;
pub mod writer;

use std::path::Path;

use benchcmp_common::Result;
use tracing::info;

pub use classify::{classify, Conclusion};
pub use config::{
    load_config, ConfigFormat, ConfigSource, KeyField, KpiDefinition, Preset, ReporterConfig,
    SignificanceMode, Thresholds,
};
pub use report::{
    complete_report, create_report_skeleton, format_report, FormattedReport, KpiCells,
    ReportRow, ReportSummary, ReportTable,
};
pub use samples::{load_samples, SampleRecord, SampleTable, Value};
pub use writer::write_report;

/// Check both tables against the configuration, then build and complete
/// the report.
pub fn generate_report(
    base: &SampleTable,
    test: &SampleTable,
    config: &ReporterConfig,
) -> Result<ReportTable> {
    base.check_schema(config)?;
    test.check_schema(config)?;

    let skeleton = create_report_skeleton(test, config);
    Ok(complete_report(skeleton, base, test, config))
}

/// Load, compare, format and write in one go.
pub fn run(
    base_source: &Path,
    test_source: &Path,
    destination: &Path,
    config: &ReporterConfig,
) -> Result<ReportSummary> {
    let (base, test) = load_samples(base_source, test_source)?;
    let table = generate_report(&base, &test, config)?;
    let formatted = format_report(&table);
    write_report(&formatted, destination)?;

    let summary = table.summary();
    info!(
        "Report complete: {} groups, {} improvements, {} regressions",
        summary.groups,
        summary.improvements(),
        summary.regressions()
    );
    Ok(summary)
}
