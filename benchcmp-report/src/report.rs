//! Report generation: one row per configuration group, seven derived
//! columns per KPI.
//!
//! The stages are plain functions that take a table and return a new one:
//! [`create_report_skeleton`] → [`complete_report`] → [`format_report`].

use std::collections::BTreeMap;
use std::fmt;

use tracing::{debug, info, warn};

use crate::classify::{classify, Conclusion};
use crate::config::{KeyField, KpiDefinition, ReporterConfig, SignificanceMode};
use crate::samples::{SampleRecord, SampleTable, Value};
use crate::stats;

/// Marker written for undefined cells.
pub const NOT_AVAILABLE: &str = "N/A";

/// Derived statistics of one KPI within one configuration group.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KpiCells {
    pub base_avg: f64,
    pub base_pct_sd: f64,
    pub test_avg: f64,
    pub test_pct_sd: f64,
    pub pct_diff: f64,
    pub significance: f64,
    /// `None` until the row has been completed.
    pub conclusion: Option<Conclusion>,
}

impl Default for KpiCells {
    fn default() -> Self {
        Self {
            base_avg: 0.0,
            base_pct_sd: 0.0,
            test_avg: 0.0,
            test_pct_sd: 0.0,
            pct_diff: 0.0,
            significance: 0.0,
            conclusion: None,
        }
    }
}

impl KpiCells {
    /// Compute the cells from the group's base and test records.
    pub fn compute(
        kpi: &KpiDefinition,
        base: &[&SampleRecord],
        test: &[&SampleRecord],
        round_field: Option<&str>,
    ) -> Self {
        let base_values: Vec<f64> = base.iter().map(|r| r.metric(&kpi.source_label)).collect();
        let test_values: Vec<f64> = test.iter().map(|r| r.metric(&kpi.source_label)).collect();

        let base_avg = stats::mean(&base_values);
        let test_avg = stats::mean(&test_values);
        let base_pct_sd = stats::pct_std_dev(&base_values);
        let test_pct_sd = stats::pct_std_dev(&test_values);
        let pct_diff = stats::pct_diff(base_avg, test_avg);

        let significance = match kpi.mode {
            SignificanceMode::Unpaired => stats::unpaired_significance(&base_values, &test_values),
            SignificanceMode::Paired => match pair_samples(kpi, base, test, round_field) {
                Some(pairs) => stats::paired_significance(&pairs),
                None => f64::NAN,
            },
        };

        let conclusion = classify(
            base_pct_sd,
            test_pct_sd,
            pct_diff,
            significance,
            kpi.higher_is_better,
            &kpi.thresholds,
        );

        Self {
            base_avg,
            base_pct_sd,
            test_avg,
            test_pct_sd,
            pct_diff,
            significance,
            conclusion: Some(conclusion),
        }
    }

    fn numbers(&self) -> [f64; 6] {
        [
            self.base_avg,
            self.base_pct_sd,
            self.test_avg,
            self.test_pct_sd,
            self.pct_diff,
            self.significance,
        ]
    }
}

/// Match base and test samples for a paired test.
///
/// With a round field, samples pair up by round number (rounds present on
/// both sides; a round repeated within one side makes pairing ambiguous).
/// Without one, samples pair by position and the counts must agree.
fn pair_samples(
    kpi: &KpiDefinition,
    base: &[&SampleRecord],
    test: &[&SampleRecord],
    round_field: Option<&str>,
) -> Option<Vec<(f64, f64)>> {
    let Some(round_field) = round_field else {
        if base.len() != test.len() {
            return None;
        }
        return Some(
            base.iter()
                .zip(test)
                .map(|(b, t)| (b.metric(&kpi.source_label), t.metric(&kpi.source_label)))
                .collect(),
        );
    };

    let by_round = |records: &[&SampleRecord]| -> Option<BTreeMap<Value, f64>> {
        let mut rounds = BTreeMap::new();
        for record in records {
            let round = record.get(round_field).cloned().unwrap_or(Value::Missing);
            if rounds.insert(round, record.metric(&kpi.source_label)).is_some() {
                return None;
            }
        }
        Some(rounds)
    };

    let base_rounds = by_round(base)?;
    let test_rounds = by_round(test)?;
    Some(
        base_rounds
            .iter()
            .filter_map(|(round, b)| test_rounds.get(round).map(|t| (*b, *t)))
            .collect(),
    )
}

/// One configuration group of the report.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportRow {
    /// Key values in declared key order.
    pub keys: Vec<Value>,
    /// One entry per KPI in configured order.
    pub kpis: Vec<KpiCells>,
}

/// The report before formatting.
#[derive(Debug, Clone)]
pub struct ReportTable {
    keys: Vec<KeyField>,
    kpis: Vec<KpiDefinition>,
    rows: Vec<ReportRow>,
}

impl ReportTable {
    pub fn rows(&self) -> &[ReportRow] {
        &self.rows
    }

    pub fn kpis(&self) -> &[KpiDefinition] {
        &self.kpis
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Column names without units: key labels then seven columns per KPI.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys.iter().map(|k| k.target_label.clone()).collect();
        for kpi in &self.kpis {
            names.extend(kpi.column_names());
        }
        names
    }

    /// Index of a KPI by its output label.
    pub fn kpi_index(&self, label: &str) -> Option<usize> {
        self.kpis.iter().position(|k| k.target_label == label)
    }

    /// Find the row for a composite key.
    pub fn row(&self, keys: &[Value]) -> Option<&ReportRow> {
        self.rows.iter().find(|r| r.keys == keys)
    }

    /// Tally of conclusions per KPI.
    pub fn summary(&self) -> ReportSummary {
        let kpis = self
            .kpis
            .iter()
            .enumerate()
            .map(|(i, kpi)| {
                let mut counts = BTreeMap::new();
                for row in &self.rows {
                    if let Some(conclusion) = row.kpis[i].conclusion {
                        *counts.entry(conclusion).or_insert(0) += 1;
                    }
                }
                (kpi.target_label.clone(), counts)
            })
            .collect();
        ReportSummary {
            groups: self.rows.len(),
            kpis,
        }
    }
}

/// Build the empty report: one row per distinct key combination of the
/// test table, sorted by the key fields in declared order.
pub fn create_report_skeleton(test: &SampleTable, config: &ReporterConfig) -> ReportTable {
    let mut keys = test.distinct_keys(&config.key_sources());
    keys.sort();

    let rows = keys
        .into_iter()
        .map(|keys| ReportRow {
            keys,
            kpis: vec![KpiCells::default(); config.kpis().len()],
        })
        .collect::<Vec<_>>();

    info!(
        "Report has {} configuration groups and {} KPIs",
        rows.len(),
        config.kpis().len()
    );

    ReportTable {
        keys: config.keys().to_vec(),
        kpis: config.kpis().to_vec(),
        rows,
    }
}

/// Fill every row from the base and test records sharing its key.
pub fn complete_report(
    table: ReportTable,
    base: &SampleTable,
    test: &SampleTable,
    config: &ReporterConfig,
) -> ReportTable {
    let sources = config.key_sources();
    let base_groups = base.group_by(&sources);
    let test_groups = test.group_by(&sources);

    let rows = table
        .rows
        .into_iter()
        .map(|row| {
            // a missing key value never matches a sample, not even another missing one
            let (base_records, test_records) = if row.keys.iter().any(Value::is_missing) {
                (&[][..], &[][..])
            } else {
                (
                    base_groups.get(&row.keys).map_or(&[][..], Vec::as_slice),
                    test_groups.get(&row.keys).map_or(&[][..], Vec::as_slice),
                )
            };
            let group = describe_key(&row.keys);

            debug!(
                "Group [{}]: {} base samples, {} test samples",
                group,
                base_records.len(),
                test_records.len()
            );

            let kpis = config
                .kpis()
                .iter()
                .map(|kpi| {
                    let cells =
                        KpiCells::compute(kpi, base_records, test_records, config.round_field());
                    if cells.conclusion == Some(Conclusion::DataInvalid) {
                        warn!("{} statistics undefined for group [{}]", kpi.target_label, group);
                    }
                    cells
                })
                .collect();

            ReportRow {
                keys: row.keys,
                kpis,
            }
        })
        .collect();

    ReportTable {
        keys: table.keys,
        kpis: table.kpis,
        rows,
    }
}

fn describe_key(keys: &[Value]) -> String {
    keys.iter()
        .map(|k| if k.is_missing() { NOT_AVAILABLE.to_string() } else { k.to_string() })
        .collect::<Vec<_>>()
        .join(", ")
}

/// The report as text cells, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedReport {
    pub header: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl FormattedReport {
    /// Cell by row index and header name.
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let index = self.header.iter().position(|h| h == column)?;
        self.rows.get(row).map(|r| r[index].as_str())
    }
}

/// Round numbers to four decimals, mark undefined cells `N/A` and apply
/// column units.
pub fn format_report(table: &ReportTable) -> FormattedReport {
    let mut header: Vec<String> = table.keys.iter().map(KeyField::header).collect();
    for kpi in &table.kpis {
        header.extend(kpi.headers());
    }

    let rows = table
        .rows
        .iter()
        .map(|row| {
            let mut cells: Vec<String> = row.keys.iter().map(format_key).collect();
            for kpi in &row.kpis {
                cells.extend(kpi.numbers().into_iter().map(format_number));
                cells.push(
                    kpi.conclusion
                        .map_or(NOT_AVAILABLE, Conclusion::as_str)
                        .to_string(),
                );
            }
            cells
        })
        .collect();

    FormattedReport { header, rows }
}

/// Key cells keep their original text unless it carries more than four
/// decimals, in which case the value is rounded like any other number.
fn format_key(key: &Value) -> String {
    match key {
        Value::Missing => NOT_AVAILABLE.to_string(),
        Value::Number { value, raw } if decimals(raw) > 4 => format_number(*value),
        other => other.to_string(),
    }
}

fn decimals(raw: &str) -> usize {
    raw.split_once('.')
        .map_or(0, |(_, fraction)| fraction.chars().take_while(char::is_ascii_digit).count())
}

/// Four decimals, half to even; whole numbers keep a trailing `.0`.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return NOT_AVAILABLE.to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let mut rounded = (value * 10_000.0).round_ties_even() / 10_000.0;
    if rounded == 0.0 {
        rounded = 0.0;
    }
    let mut text = rounded.to_string();
    if !text.contains('.') {
        text.push_str(".0");
    }
    text
}

/// Conclusion counts per KPI.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportSummary {
    pub groups: usize,
    pub kpis: Vec<(String, BTreeMap<Conclusion, usize>)>,
}

impl ReportSummary {
    pub fn count(&self, kpi: &str, conclusion: Conclusion) -> usize {
        self.kpis
            .iter()
            .find(|(label, _)| label == kpi)
            .and_then(|(_, counts)| counts.get(&conclusion).copied())
            .unwrap_or(0)
    }

    /// Number of regression verdicts across all KPIs.
    pub fn regressions(&self) -> usize {
        self.total(Conclusion::is_regression)
    }

    pub fn improvements(&self) -> usize {
        self.total(Conclusion::is_improvement)
    }

    fn total(&self, pick: fn(Conclusion) -> bool) -> usize {
        self.kpis
            .iter()
            .flat_map(|(_, counts)| counts.iter())
            .filter(|(c, _)| pick(**c))
            .map(|(_, n)| n)
            .sum()
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} configuration groups", self.groups)?;
        write!(f, "{:<12}", "KPI")?;
        for conclusion in Conclusion::ALL {
            write!(f, " {:>19}", conclusion.as_str())?;
        }
        writeln!(f)?;
        for (label, counts) in &self.kpis {
            write!(f, "{:<12}", label)?;
            for conclusion in Conclusion::ALL {
                write!(f, " {:>19}", counts.get(&conclusion).copied().unwrap_or(0))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
