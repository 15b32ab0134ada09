//! CSV output of the formatted report.

use std::io::Write;
use std::path::Path;

use benchcmp_common::{ReportError, Result};
use tempfile::NamedTempFile;
use tracing::info;

use crate::report::FormattedReport;

impl FormattedReport {
    /// Serialize as CSV: one header row, then one row per group.
    pub fn to_writer<W: Write>(&self, writer: W) -> csv::Result<()> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        csv_writer.write_record(&self.header)?;
        for row in &self.rows {
            csv_writer.write_record(row)?;
        }
        csv_writer.flush()?;
        Ok(())
    }

    pub fn to_csv_string(&self) -> csv::Result<String> {
        let mut buffer = Vec::new();
        self.to_writer(&mut buffer)?;
        Ok(String::from_utf8_lossy(&buffer).into_owned())
    }
}

/// Write the report to `destination`.
///
/// The CSV goes to a temporary file next to the destination which is then
/// renamed over it, so a failed write leaves no partial report behind.
pub fn write_report(report: &FormattedReport, destination: &Path) -> Result<()> {
    info!("Dumping report into csv file \"{}\"", destination.display());

    let dir = match destination.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut file = NamedTempFile::new_in(dir).map_err(|e| ReportError::write(destination, e))?;
    report
        .to_writer(file.as_file_mut())
        .map_err(|e| ReportError::write(destination, std::io::Error::other(e)))?;
    file.as_file()
        .sync_all()
        .map_err(|e| ReportError::write(destination, e))?;
    file.persist(destination)
        .map_err(|e| ReportError::write(destination, e.error))?;

    info!("Wrote {} report rows", report.rows.len());
    Ok(())
}
