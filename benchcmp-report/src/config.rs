//! Report configuration: which columns identify a configuration group and
//! which KPIs are compared.
//!
//! Configuration is resolved once into a [`ReporterConfig`] and passed into
//! the engine by reference. Files use a loose schema ([`ConfigFile`]) where a
//! key may be a bare column name and KPI fields may fall back to
//! `kpi_defaults`; resolution fills in everything and validates the result.

use benchcmp_common::{ReportError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::info;

/// Top-level section wrapping the whole configuration in older files.
const LEGACY_SECTION: &str = "FlentBenchmarkReporter";

/// Suffixes of the seven derived columns, in output order.
pub const KPI_COLUMN_SUFFIXES: [&str; 7] = [
    "BASE-AVG",
    "BASE-%SD",
    "TEST-AVG",
    "TEST-%SD",
    "%DIFF",
    "SIGN",
    "CONCLUSION",
];

/// Decision thresholds for one KPI.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Thresholds {
    /// Largest acceptable %SD on either side.
    pub max_pct_dev: f64,
    /// |%DIFF| at or above which a change is "Major".
    pub regression_threshold: f64,
    /// Minimum significance (1 - p) for a change to count.
    pub confidence_threshold: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            max_pct_dev: 10.0,
            regression_threshold: 5.0,
            confidence_threshold: 0.95,
        }
    }
}

/// How base and test samples are compared by the t-test.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SignificanceMode {
    /// Independent samples, pooled variance.
    #[default]
    Unpaired,
    /// Samples matched by round (or by position when no round field is set).
    Paired,
}

/// A column that identifies a configuration group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyField {
    pub source_label: String,
    pub target_label: String,
    pub target_unit: Option<String>,
}

impl KeyField {
    pub fn new(source_label: impl Into<String>) -> Self {
        let source_label = source_label.into();
        Self {
            target_label: source_label.clone(),
            source_label,
            target_unit: None,
        }
    }

    pub fn renamed(source_label: impl Into<String>, target_label: impl Into<String>) -> Self {
        Self {
            source_label: source_label.into(),
            target_label: target_label.into(),
            target_unit: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.target_unit = Some(unit.into());
        self
    }

    /// Output header, with the unit appended when one is configured.
    pub fn header(&self) -> String {
        with_unit(&self.target_label, self.target_unit.as_deref())
    }
}

/// A performance indicator compared between base and test.
#[derive(Debug, Clone, PartialEq)]
pub struct KpiDefinition {
    pub target_label: String,
    pub source_label: String,
    pub target_unit: Option<String>,
    pub higher_is_better: bool,
    pub thresholds: Thresholds,
    pub mode: SignificanceMode,
}

impl KpiDefinition {
    pub fn new(
        target_label: impl Into<String>,
        source_label: impl Into<String>,
        higher_is_better: bool,
    ) -> Self {
        Self {
            target_label: target_label.into(),
            source_label: source_label.into(),
            target_unit: None,
            higher_is_better,
            thresholds: Thresholds::default(),
            mode: SignificanceMode::Unpaired,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.target_unit = Some(unit.into());
        self
    }

    pub fn with_thresholds(mut self, thresholds: Thresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    pub fn paired(mut self) -> Self {
        self.mode = SignificanceMode::Paired;
        self
    }

    /// Names of the seven derived columns, e.g. `BW-BASE-AVG`.
    pub fn column_names(&self) -> [String; 7] {
        KPI_COLUMN_SUFFIXES.map(|suffix| format!("{}-{}", self.target_label, suffix))
    }

    /// Output headers: the averages carry the unit when one is configured.
    pub fn headers(&self) -> [String; 7] {
        let unit = self.target_unit.as_deref();
        let mut names = self.column_names();
        names[0] = with_unit(&names[0], unit);
        names[2] = with_unit(&names[2], unit);
        names
    }
}

fn with_unit(label: &str, unit: Option<&str>) -> String {
    match unit {
        Some(unit) => format!("{}({})", label, unit),
        None => label.to_string(),
    }
}

/// Built-in configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// fio sample tables: bandwidth, IOPS, latency and utilisation.
    Storage,
    /// `Storage` plus 90th percentile completion latency.
    StorageClat,
}

impl Preset {
    pub fn name(self) -> &'static str {
        match self {
            Preset::Storage => "storage",
            Preset::StorageClat => "storage-clat",
        }
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for Preset {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "storage" => Ok(Preset::Storage),
            "storage-clat" => Ok(Preset::StorageClat),
            other => Err(ReportError::config(format!("unknown preset \"{}\"", other))),
        }
    }
}

/// Serialization format of a configuration file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    /// Pick the format from the file extension; YAML unless `.json`/`.toml`.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => ConfigFormat::Json,
            Some(ext) if ext.eq_ignore_ascii_case("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Yaml,
        }
    }
}

/// Where the configuration comes from.
#[derive(Debug, Clone)]
pub enum ConfigSource {
    File(PathBuf),
    Preset(Preset),
}

/// Resolved, validated report configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ReporterConfig {
    keys: Vec<KeyField>,
    kpis: Vec<KpiDefinition>,
    round_field: Option<String>,
}

impl ReporterConfig {
    pub fn new(keys: Vec<KeyField>, kpis: Vec<KpiDefinition>) -> Result<Self> {
        let config = Self {
            keys,
            kpis,
            round_field: None,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn with_round_field(mut self, round_field: impl Into<String>) -> Self {
        self.round_field = Some(round_field.into());
        self
    }

    pub fn preset(preset: Preset) -> Self {
        let keys = ["Backend", "Driver", "Format", "RW", "BS", "IODepth", "Numjobs"]
            .into_iter()
            .map(KeyField::new)
            .collect();

        let mut kpis = vec![
            KpiDefinition::new("BW", "BW(MiB/s)", true),
            KpiDefinition::new("IOPS", "IOPS", true),
            KpiDefinition::new("LAT", "LAT(ms)", false),
            KpiDefinition::new("Util", "Util(%)", true),
        ];
        if preset == Preset::StorageClat {
            kpis.push(KpiDefinition::new("CLAT90", "CLAT90(ms)", false));
        }

        Self {
            keys,
            kpis,
            round_field: None,
        }
    }

    pub fn keys(&self) -> &[KeyField] {
        &self.keys
    }

    pub fn kpis(&self) -> &[KpiDefinition] {
        &self.kpis
    }

    pub fn round_field(&self) -> Option<&str> {
        self.round_field.as_deref()
    }

    /// Whether any KPI pairs samples by round.
    pub fn needs_round_field(&self) -> bool {
        self.kpis.iter().any(|k| k.mode == SignificanceMode::Paired)
    }

    /// Source column names of the key fields, in declared order.
    pub fn key_sources(&self) -> Vec<&str> {
        self.keys.iter().map(|k| k.source_label.as_str()).collect()
    }

    /// Report column names before units are applied.
    pub fn column_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.keys.iter().map(|k| k.target_label.clone()).collect();
        for kpi in &self.kpis {
            names.extend(kpi.column_names());
        }
        names
    }

    /// Structural checks only; column existence is checked against the data.
    pub fn validate(&self) -> Result<()> {
        if self.keys.is_empty() {
            return Err(ReportError::config("at least one key field is required"));
        }
        if self.kpis.is_empty() {
            return Err(ReportError::config("at least one KPI is required"));
        }

        for key in &self.keys {
            if key.source_label.is_empty() || key.target_label.is_empty() {
                return Err(ReportError::config("key labels must not be empty"));
            }
        }

        for kpi in &self.kpis {
            if kpi.source_label.is_empty() || kpi.target_label.is_empty() {
                return Err(ReportError::config("KPI labels must not be empty"));
            }
            let t = &kpi.thresholds;
            for (name, value) in [
                ("max_percent_dev", t.max_pct_dev),
                ("regression_threshold", t.regression_threshold),
                ("confidence_threshold", t.confidence_threshold),
            ] {
                if !value.is_finite() || value < 0.0 {
                    return Err(ReportError::config(format!(
                        "KPI \"{}\": {} must be a non-negative number, got {}",
                        kpi.target_label, name, value
                    )));
                }
            }
            if t.confidence_threshold > 1.0 {
                return Err(ReportError::config(format!(
                    "KPI \"{}\": confidence_threshold must be within [0, 1], got {}",
                    kpi.target_label, t.confidence_threshold
                )));
            }
        }

        let mut seen = BTreeSet::new();
        for name in self.column_names() {
            if !seen.insert(name.clone()) {
                return Err(ReportError::config(format!("duplicate report column \"{}\"", name)));
            }
        }

        if matches!(self.round_field.as_deref(), Some("")) {
            return Err(ReportError::config("round_field must not be empty"));
        }

        Ok(())
    }

    /// Parse and resolve configuration text.
    ///
    /// Files may nest the whole configuration under a `FlentBenchmarkReporter`
    /// section, as the reporter's older YAML files do.
    pub fn parse(content: &str, format: ConfigFormat) -> Result<Self> {
        let file: ConfigFile = match format {
            ConfigFormat::Yaml => {
                let mut doc: serde_yaml::Value =
                    serde_yaml::from_str(content).map_err(config_error)?;
                if let Some(section) = doc.get(LEGACY_SECTION).cloned() {
                    doc = section;
                }
                serde_yaml::from_value(doc).map_err(config_error)?
            }
            ConfigFormat::Json => {
                let mut doc: serde_json::Value =
                    serde_json::from_str(content).map_err(config_error)?;
                if let Some(section) = doc.get(LEGACY_SECTION).cloned() {
                    doc = section;
                }
                serde_json::from_value(doc).map_err(config_error)?
            }
            ConfigFormat::Toml => {
                let mut doc: toml::Value = toml::from_str(content).map_err(config_error)?;
                if let Some(section) = doc.get(LEGACY_SECTION).cloned() {
                    doc = section;
                }
                doc.try_into::<ConfigFile>().map_err(config_error)?
            }
        };
        file.resolve()
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ReportError::config(format!("cannot read {}: {}", path.display(), e)))?;
        Self::parse(&content, ConfigFormat::from_path(path)).map_err(|e| match e {
            ReportError::Config(reason) => {
                ReportError::Config(format!("{}: {}", path.display(), reason))
            }
            other => other,
        })
    }

    /// The fully explicit file form of this configuration.
    pub fn to_file_format(&self) -> ConfigFile {
        let keys = self
            .keys
            .iter()
            .map(|key| {
                if key.source_label == key.target_label && key.target_unit.is_none() {
                    KeySpec::Name(key.source_label.clone())
                } else {
                    KeySpec::Detailed {
                        source_label: key.source_label.clone(),
                        target_label: Some(key.target_label.clone()),
                        target_unit: key.target_unit.clone(),
                    }
                }
            })
            .collect();

        let kpis = self
            .kpis
            .iter()
            .map(|kpi| KpiSpec {
                source_label: kpi.source_label.clone(),
                target_label: kpi.target_label.clone(),
                target_unit: kpi.target_unit.clone(),
                higher_is_better: Some(kpi.higher_is_better),
                max_percent_dev: Some(kpi.thresholds.max_pct_dev),
                regression_threshold: Some(kpi.thresholds.regression_threshold),
                confidence_threshold: Some(kpi.thresholds.confidence_threshold),
                paired: Some(kpi.mode == SignificanceMode::Paired),
            })
            .collect();

        ConfigFile {
            keys,
            round_field: self.round_field.clone(),
            kpi_defaults: None,
            kpis,
        }
    }

    /// Render the configuration in the file schema.
    pub fn render(&self, format: ConfigFormat) -> Result<String> {
        let file = self.to_file_format();
        match format {
            ConfigFormat::Yaml => serde_yaml::to_string(&file).map_err(config_error),
            ConfigFormat::Json => serde_json::to_string_pretty(&file).map_err(config_error),
            ConfigFormat::Toml => toml::to_string_pretty(&file).map_err(config_error),
        }
    }
}

fn config_error(e: impl fmt::Display) -> ReportError {
    ReportError::config(e.to_string())
}

/// Load configuration from a file or a preset.
pub fn load_config(source: ConfigSource) -> Result<ReporterConfig> {
    match source {
        ConfigSource::File(path) => {
            info!("Loading report configuration from {}", path.display());
            ReporterConfig::from_file(&path)
        }
        ConfigSource::Preset(preset) => {
            info!("Using built-in \"{}\" report configuration", preset);
            Ok(ReporterConfig::preset(preset))
        }
    }
}

/// On-disk configuration schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigFile {
    pub keys: Vec<KeySpec>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub round_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kpi_defaults: Option<KpiDefaults>,
    pub kpis: Vec<KpiSpec>,
}

/// A key given either as a bare column name or with rename/unit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum KeySpec {
    Name(String),
    Detailed {
        source_label: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_label: Option<String>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        target_unit: Option<String>,
    },
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KpiDefaults {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub higher_is_better: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_percent_dev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regression_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct KpiSpec {
    pub source_label: String,
    pub target_label: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub higher_is_better: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_percent_dev: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub regression_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence_threshold: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub paired: Option<bool>,
}

impl ConfigFile {
    /// Apply defaults and validate.
    pub fn resolve(self) -> Result<ReporterConfig> {
        let keys = self
            .keys
            .into_iter()
            .map(|spec| match spec {
                KeySpec::Name(name) => KeyField::new(name),
                KeySpec::Detailed {
                    source_label,
                    target_label,
                    target_unit,
                } => KeyField {
                    target_label: target_label.unwrap_or_else(|| source_label.clone()),
                    source_label,
                    target_unit,
                },
            })
            .collect();

        let defaults = self.kpi_defaults.unwrap_or_default();
        let builtin = Thresholds::default();
        let kpis = self
            .kpis
            .into_iter()
            .map(|spec| KpiDefinition {
                higher_is_better: spec
                    .higher_is_better
                    .or(defaults.higher_is_better)
                    .unwrap_or(true),
                thresholds: Thresholds {
                    max_pct_dev: spec
                        .max_percent_dev
                        .or(defaults.max_percent_dev)
                        .unwrap_or(builtin.max_pct_dev),
                    regression_threshold: spec
                        .regression_threshold
                        .or(defaults.regression_threshold)
                        .unwrap_or(builtin.regression_threshold),
                    confidence_threshold: spec
                        .confidence_threshold
                        .or(defaults.confidence_threshold)
                        .unwrap_or(builtin.confidence_threshold),
                },
                mode: if spec.paired.or(defaults.paired).unwrap_or(false) {
                    SignificanceMode::Paired
                } else {
                    SignificanceMode::Unpaired
                },
                target_label: spec.target_label,
                source_label: spec.source_label,
                target_unit: spec.target_unit,
            })
            .collect();

        let config = ReporterConfig {
            keys,
            kpis,
            round_field: self.round_field,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const NETWORK_YAML: &str = r#"
keys:
  - Type
  - source_label: Size
    target_label: MSize
    target_unit: bytes
  - Instance
round_field: Round
kpi_defaults:
  higher_is_better: true
  max_percent_dev: 8
  regression_threshold: 5
  confidence_threshold: 0.95
kpis:
  - source_label: Throughput
    target_label: Throughput
    target_unit: Mbps
  - source_label: Latency
    target_label: LAT
    higher_is_better: false
    max_percent_dev: 12
    paired: true
"#;

    #[test]
    fn test_parse_yaml_with_defaults_and_renames() {
        let config = ReporterConfig::parse(NETWORK_YAML, ConfigFormat::Yaml).unwrap();

        assert_eq!(config.key_sources(), vec!["Type", "Size", "Instance"]);
        assert_eq!(config.keys()[1].header(), "MSize(bytes)");
        assert_eq!(config.round_field(), Some("Round"));

        let throughput = &config.kpis()[0];
        assert!(throughput.higher_is_better);
        assert_eq!(throughput.thresholds.max_pct_dev, 8.0);
        assert_eq!(throughput.mode, SignificanceMode::Unpaired);
        assert_eq!(throughput.headers()[0], "Throughput-BASE-AVG(Mbps)");
        assert_eq!(throughput.headers()[1], "Throughput-BASE-%SD");

        let latency = &config.kpis()[1];
        assert!(!latency.higher_is_better);
        assert_eq!(latency.thresholds.max_pct_dev, 12.0);
        assert_eq!(latency.thresholds.confidence_threshold, 0.95);
        assert_eq!(latency.mode, SignificanceMode::Paired);
        assert!(config.needs_round_field());
    }

    #[test]
    fn test_builtin_defaults_apply_without_kpi_defaults() {
        let yaml = "keys: [Driver]\nkpis:\n  - {source_label: IOPS, target_label: IOPS}\n";
        let config = ReporterConfig::parse(yaml, ConfigFormat::Yaml).unwrap();
        let kpi = &config.kpis()[0];
        assert!(kpi.higher_is_better);
        assert_eq!(kpi.thresholds, Thresholds::default());
    }

    #[test]
    fn test_column_names_follow_naming_scheme() {
        let kpi = KpiDefinition::new("BW", "BW(MiB/s)", true);
        assert_eq!(
            kpi.column_names(),
            [
                "BW-BASE-AVG",
                "BW-BASE-%SD",
                "BW-TEST-AVG",
                "BW-TEST-%SD",
                "BW-%DIFF",
                "BW-SIGN",
                "BW-CONCLUSION"
            ]
            .map(String::from)
        );
    }

    #[test]
    fn test_storage_preset() {
        let config = ReporterConfig::preset(Preset::Storage);
        config.validate().unwrap();
        assert_eq!(config.keys().len(), 7);
        let labels: Vec<&str> = config.kpis().iter().map(|k| k.target_label.as_str()).collect();
        assert_eq!(labels, vec!["BW", "IOPS", "LAT", "Util"]);
        assert!(!config.kpis()[2].higher_is_better);

        let clat = ReporterConfig::preset(Preset::StorageClat);
        assert_eq!(clat.kpis().last().unwrap().source_label, "CLAT90(ms)");
        assert_eq!("storage-clat".parse::<Preset>().unwrap(), Preset::StorageClat);
        assert!("disk".parse::<Preset>().is_err());
    }

    #[test]
    fn test_validation_rejects_structural_problems() {
        assert!(ReporterConfig::new(vec![], vec![KpiDefinition::new("BW", "BW", true)]).is_err());
        assert!(ReporterConfig::new(vec![KeyField::new("RW")], vec![]).is_err());

        let duplicate = ReporterConfig::new(
            vec![KeyField::new("RW")],
            vec![
                KpiDefinition::new("BW", "BW(MiB/s)", true),
                KpiDefinition::new("BW", "BW(KiB/s)", true),
            ],
        );
        assert!(duplicate.unwrap_err().to_string().contains("duplicate report column"));

        let bad_confidence = KpiDefinition::new("BW", "BW", true).with_thresholds(Thresholds {
            confidence_threshold: 1.5,
            ..Thresholds::default()
        });
        assert!(ReporterConfig::new(vec![KeyField::new("RW")], vec![bad_confidence]).is_err());

        let negative = KpiDefinition::new("BW", "BW", true).with_thresholds(Thresholds {
            max_pct_dev: -1.0,
            ..Thresholds::default()
        });
        assert!(ReporterConfig::new(vec![KeyField::new("RW")], vec![negative]).is_err());
    }

    #[test]
    fn test_unknown_kpi_field_is_rejected() {
        let yaml = "keys: [RW]\n\
                    kpis:\n  - {source_label: BW, target_label: BW, higher_is_beter: false}\n";
        let err = ReporterConfig::parse(yaml, ConfigFormat::Yaml).unwrap_err();
        assert!(matches!(err, ReportError::Config(_)));
    }

    #[test]
    fn test_render_round_trips_through_every_format() {
        let config = ReporterConfig::parse(NETWORK_YAML, ConfigFormat::Yaml).unwrap();
        for format in [ConfigFormat::Yaml, ConfigFormat::Json] {
            let text = config.render(format).unwrap();
            let reparsed = ReporterConfig::parse(&text, format).unwrap();
            assert_eq!(reparsed, config, "format {:?}", format);
        }

        let storage = ReporterConfig::preset(Preset::StorageClat);
        let text = storage.render(ConfigFormat::Toml).unwrap();
        assert!(text.contains("[[kpis]]"));
        assert_eq!(ReporterConfig::parse(&text, ConfigFormat::Toml).unwrap(), storage);
    }

    #[test]
    fn test_wrapped_section_is_accepted() {
        let wrapped = format!(
            "FlentBenchmarkReporter:\n{}",
            NETWORK_YAML
                .lines()
                .map(|line| format!("  {}\n", line))
                .collect::<String>()
        );
        let config = ReporterConfig::parse(&wrapped, ConfigFormat::Yaml).unwrap();
        assert_eq!(config, ReporterConfig::parse(NETWORK_YAML, ConfigFormat::Yaml).unwrap());

        let json = r#"{"FlentBenchmarkReporter": {"keys": ["RW"],
            "kpis": [{"source_label": "BW", "target_label": "BW"}]}}"#;
        let config = ReporterConfig::parse(json, ConfigFormat::Json).unwrap();
        assert_eq!(config.key_sources(), vec!["RW"]);
    }

    #[test]
    fn test_format_from_extension() {
        assert_eq!(ConfigFormat::from_path(Path::new("a.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a.JSON")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("a.yml")), ConfigFormat::Yaml);
        assert_eq!(ConfigFormat::from_path(Path::new("config")), ConfigFormat::Yaml);
    }

    #[test]
    fn test_load_config_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.yaml");
        std::fs::write(&path, NETWORK_YAML).unwrap();

        let config = load_config(ConfigSource::File(path)).unwrap();
        assert_eq!(config.kpis().len(), 2);

        let missing = load_config(ConfigSource::File(dir.path().join("absent.yaml")));
        assert!(matches!(missing, Err(ReportError::Config(_))));
    }
}
