//! benchcmp command line
//!
//! Compares a base and a test set of benchmark samples and writes the
//! per-configuration comparison report as CSV.

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::info;

use benchcmp::common::logging::{self, Verbosity};
use benchcmp::common::ReportError;
use benchcmp::report::{self, load_config, ConfigFormat, ConfigSource, Preset, ReporterConfig};

#[derive(Parser)]
#[command(name = "benchcmp")]
#[command(about = "Compare base and test benchmark samples")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Quiet mode (warnings and errors only, no summary)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a comparison report
    Generate {
        /// CSV file with the base samples
        #[arg(long, value_name = "FILE")]
        base_csv: Option<PathBuf>,

        /// CSV file with the test samples
        #[arg(long, value_name = "FILE")]
        test_csv: Option<PathBuf>,

        /// Destination of the report
        #[arg(long, value_name = "FILE")]
        report_csv: Option<PathBuf>,

        #[command(flatten)]
        config: ConfigArgs,
    },
    /// Inspect report configurations
    Config {
        #[command(subcommand)]
        action: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Print the resolved configuration
    Show {
        #[command(flatten)]
        config: ConfigArgs,

        /// Output format
        #[arg(long, value_enum, default_value = "yaml")]
        format: FormatArg,
    },
    /// Check a configuration file
    Validate {
        /// Configuration file (YAML, JSON or TOML)
        file: PathBuf,
    },
}

#[derive(clap::Args)]
struct ConfigArgs {
    /// Report configuration file (YAML, JSON or TOML)
    #[arg(long, value_name = "FILE", env = "BENCHCMP_CONFIG")]
    config: Option<PathBuf>,

    /// Built-in configuration, used when no file is given
    #[arg(long, value_enum)]
    preset: Option<PresetArg>,
}

impl ConfigArgs {
    /// An explicit preset beats a config file, which beats the default preset.
    fn source(&self) -> ConfigSource {
        match (&self.preset, &self.config) {
            (Some(preset), _) => ConfigSource::Preset((*preset).into()),
            (None, Some(path)) => ConfigSource::File(path.clone()),
            (None, None) => ConfigSource::Preset(Preset::Storage),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum PresetArg {
    Storage,
    StorageClat,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Storage => Preset::Storage,
            PresetArg::StorageClat => Preset::StorageClat,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum FormatArg {
    Yaml,
    Json,
    Toml,
}

impl From<FormatArg> for ConfigFormat {
    fn from(arg: FormatArg) -> Self {
        match arg {
            FormatArg::Yaml => ConfigFormat::Yaml,
            FormatArg::Json => ConfigFormat::Json,
            FormatArg::Toml => ConfigFormat::Toml,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    logging::init(Verbosity::from_flags(cli.verbose, cli.quiet));

    let result = match cli.command {
        Commands::Generate {
            base_csv,
            test_csv,
            report_csv,
            config,
        } => generate(base_csv, test_csv, report_csv, &config, cli.quiet),
        Commands::Config { action } => handle_config(action),
    };

    if let Err(e) = result {
        eprintln!("Error: {:#}", e);
        process::exit(1);
    }
}

fn required(value: Option<PathBuf>, name: &str) -> Result<PathBuf, ReportError> {
    value.ok_or_else(|| ReportError::MissingParameter(name.to_string()))
}

fn generate(
    base_csv: Option<PathBuf>,
    test_csv: Option<PathBuf>,
    report_csv: Option<PathBuf>,
    config: &ConfigArgs,
    quiet: bool,
) -> Result<()> {
    let base_csv = required(base_csv, "--base-csv")?;
    let test_csv = required(test_csv, "--test-csv")?;
    let report_csv = required(report_csv, "--report-csv")?;

    let config = load_config(config.source())?;
    let summary = report::run(&base_csv, &test_csv, &report_csv, &config)?;

    if !quiet {
        print!("{}", summary);
    }
    Ok(())
}

fn handle_config(action: ConfigCommands) -> Result<()> {
    match action {
        ConfigCommands::Show { config, format } => {
            let resolved = load_config(config.source())?;
            print!("{}", resolved.render(format.into())?);
        }
        ConfigCommands::Validate { file } => {
            let config = validate(&file)?;
            info!("{} is valid", file.display());
            println!(
                "Configuration OK: {} key fields, {} KPIs",
                config.keys().len(),
                config.kpis().len()
            );
        }
    }
    Ok(())
}

fn validate(file: &Path) -> Result<ReporterConfig> {
    ReporterConfig::from_file(file)
        .with_context(|| format!("{} is not a valid report configuration", file.display()))
}
