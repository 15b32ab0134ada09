//! Sample tables: one row per benchmark run, loaded from CSV.

use benchcmp_common::{ReportError, Result};
use indexmap::IndexMap;
use std::cmp::Ordering;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info};

use crate::config::ReporterConfig;

/// Cell contents treated as "no value", in addition to the empty cell.
const NA_TOKENS: &[&str] = &[
    "#N/A", "#NA", "-NaN", "-nan", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// A scalar cell value.
///
/// Numbers compare by value, so `4` and `4.0` are the same key. The original
/// text is kept for output.
#[derive(Debug, Clone)]
pub enum Value {
    Number { value: f64, raw: String },
    Text(String),
    Missing,
}

impl Value {
    /// Parse a CSV cell.
    pub fn parse(cell: &str) -> Self {
        let cell = cell.trim();
        if cell.is_empty() || NA_TOKENS.contains(&cell) {
            return Value::Missing;
        }
        match cell.parse::<f64>() {
            Ok(value) if value.is_nan() => Value::Missing,
            Ok(value) => Value::Number {
                value: normalize_zero(value),
                raw: cell.to_string(),
            },
            Err(_) => Value::Text(cell.to_string()),
        }
    }

    pub fn number(value: f64) -> Self {
        if value.is_nan() {
            return Value::Missing;
        }
        Value::Number {
            value: normalize_zero(value),
            raw: value.to_string(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Value::Text(text.into())
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Number { value, .. } => Some(*value),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    fn rank(&self) -> u8 {
        match self {
            Value::Number { .. } => 0,
            Value::Text(_) => 1,
            Value::Missing => 2,
        }
    }
}

fn normalize_zero(value: f64) -> f64 {
    if value == 0.0 {
        0.0
    } else {
        value
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Numbers before text before missing values.
impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Number { value: a, .. }, Value::Number { value: b, .. }) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            _ => self.rank().cmp(&other.rank()),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number { raw, .. } => write!(f, "{}", raw),
            Value::Text(text) => write!(f, "{}", text),
            Value::Missing => Ok(()),
        }
    }
}

impl From<&str> for Value {
    fn from(cell: &str) -> Self {
        Value::parse(cell)
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::number(value)
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Number {
            value: value as f64,
            raw: value.to_string(),
        }
    }
}

/// One benchmark run: named fields in column order.
#[derive(Debug, Clone, Default)]
pub struct SampleRecord {
    fields: IndexMap<String, Value>,
}

impl SampleRecord {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Numeric value of a metric field; NaN when absent or missing.
    pub fn metric(&self, field: &str) -> f64 {
        self.get(field).and_then(Value::as_f64).unwrap_or(f64::NAN)
    }

    /// The composite key for the given fields, absent fields as missing.
    pub fn key(&self, fields: &[&str]) -> Vec<Value> {
        fields
            .iter()
            .map(|field| self.get(field).cloned().unwrap_or(Value::Missing))
            .collect()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }
}

/// An ordered collection of records sharing one schema.
#[derive(Debug, Clone)]
pub struct SampleTable {
    name: String,
    columns: Vec<String>,
    records: Vec<SampleRecord>,
}

impl SampleTable {
    /// Build a table from records. Columns are taken from the first record.
    pub fn new(name: impl Into<String>, records: Vec<SampleRecord>) -> Self {
        let columns = records
            .first()
            .map(|r| r.fields().map(|(name, _)| name.to_string()).collect())
            .unwrap_or_default();
        Self {
            name: name.into(),
            columns,
            records,
        }
    }

    /// Read a CSV table with a header row.
    pub fn from_reader<R: Read>(name: impl Into<String>, reader: R) -> Result<Self> {
        let name = name.into();
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);

        let columns: Vec<String> = csv_reader
            .headers()
            .map_err(|e| ReportError::data_source(&name, e))?
            .iter()
            .map(str::to_string)
            .collect();

        let mut seen = BTreeSet::new();
        for column in &columns {
            if !seen.insert(column.as_str()) {
                return Err(ReportError::data_source(
                    &name,
                    format!("duplicate column \"{}\"", column),
                ));
            }
        }

        let mut records = Vec::new();
        for row in csv_reader.records() {
            let row = row.map_err(|e| ReportError::data_source(&name, e))?;
            let fields = columns
                .iter()
                .zip(row.iter())
                .map(|(column, cell)| (column.clone(), Value::parse(cell)))
                .collect();
            records.push(SampleRecord { fields });
        }

        if records.is_empty() {
            return Err(ReportError::data_source(&name, "contains no samples"));
        }

        debug!("Parsed {} samples with {} columns from {}", records.len(), columns.len(), name);

        Ok(Self {
            name,
            columns,
            records,
        })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let name = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|e| ReportError::data_source(&name, e))?;
        Self::from_reader(name, file)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    pub fn records(&self) -> &[SampleRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Distinct key combinations in first-seen order.
    pub fn distinct_keys(&self, fields: &[&str]) -> Vec<Vec<Value>> {
        let mut seen = BTreeSet::new();
        let mut keys = Vec::new();
        for record in &self.records {
            let key = record.key(fields);
            if seen.insert(key.clone()) {
                keys.push(key);
            }
        }
        keys
    }

    /// Records grouped by their composite key, preserving table order within a group.
    pub fn group_by(&self, fields: &[&str]) -> BTreeMap<Vec<Value>, Vec<&SampleRecord>> {
        let mut groups: BTreeMap<Vec<Value>, Vec<&SampleRecord>> = BTreeMap::new();
        for record in &self.records {
            groups.entry(record.key(fields)).or_default().push(record);
        }
        groups
    }

    /// Check that every column the configuration reads exists and that
    /// metric columns hold numbers.
    pub fn check_schema(&self, config: &ReporterConfig) -> Result<()> {
        if self.is_empty() {
            return Err(ReportError::data_source(&self.name, "contains no samples"));
        }

        for key in config.keys() {
            self.require_column(&key.source_label, "key")?;
        }

        if config.needs_round_field() {
            if let Some(round_field) = config.round_field() {
                self.require_column(round_field, "round")?;
            }
        }

        for kpi in config.kpis() {
            self.require_column(&kpi.source_label, "metric")?;
            let bad = self
                .records
                .iter()
                .position(|r| matches!(r.get(&kpi.source_label), Some(Value::Text(_))));
            if let Some(row) = bad {
                return Err(ReportError::data_source(
                    &self.name,
                    format!(
                        "metric column \"{}\" holds non-numeric value on data row {}",
                        kpi.source_label,
                        row + 1
                    ),
                ));
            }
        }

        Ok(())
    }

    fn require_column(&self, column: &str, role: &str) -> Result<()> {
        if self.has_column(column) {
            Ok(())
        } else {
            Err(ReportError::data_source(
                &self.name,
                format!("missing {} column \"{}\"", role, column),
            ))
        }
    }
}

/// Load the base and test sample tables. Both must parse and be non-empty.
pub fn load_samples(base_source: &Path, test_source: &Path) -> Result<(SampleTable, SampleTable)> {
    info!("Reading base samples from csv file \"{}\"", base_source.display());
    let base = SampleTable::from_path(base_source)?;

    info!("Reading test samples from csv file \"{}\"", test_source.display());
    let test = SampleTable::from_path(test_source)?;

    info!("Loaded {} base samples and {} test samples", base.len(), test.len());
    Ok((base, test))
}
