use analytics::{AnalyticsError, MetricDeriver, Session};
use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use configuration::{OutputFormat, Settings};
use core_types::{FilterSet, YearRange};
use loader::RawTable;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod render;

/// The main entry point for the skill half-life dashboard.
fn main() -> ExitCode {
    // Parse command-line arguments
    let cli = Cli::parse();

    let settings = match configuration::load_config(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Error loading configuration: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_tracing(&settings.logging.filter) {
        eprintln!("Error initialising logging: {}", e);
        return ExitCode::FAILURE;
    }

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Validate(args) => handle_validate(args, &settings),
        Commands::Report(args) => handle_report(args, &settings),
        Commands::Options(args) => handle_options(args, &settings),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed.");
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Logs to stderr so JSON written to stdout stays machine-readable.
/// `RUST_LOG` takes precedence over the configured filter.
fn init_tracing(default_filter: &str) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_filter))
        .context("Invalid logging filter")?;
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Analyses how fast professional skills lose their value as AI adoption grows.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to a TOML configuration file (defaults to an optional `config.toml`).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check the dataset and list dropped rows and warnings.
    Validate(DataArgs),
    /// Print the KPIs and every chart view, optionally filtered.
    Report(ReportArgs),
    /// List the values available for filtering.
    Options(DataArgs),
}

#[derive(Args)]
struct DataArgs {
    /// The CSV dataset to analyse. Overrides `data.path` from configuration.
    #[arg(long)]
    data: Option<PathBuf>,
}

#[derive(Args)]
struct ReportArgs {
    #[command(flatten)]
    data: DataArgs,

    /// Only include this skill category.
    #[arg(long)]
    category: Option<String>,

    /// Only include this sector (or industry).
    #[arg(long)]
    sector: Option<String>,

    /// Only include this region (or country).
    #[arg(long)]
    region: Option<String>,

    /// First year to include.
    #[arg(long)]
    year_from: Option<i32>,

    /// Last year to include.
    #[arg(long)]
    year_to: Option<i32>,

    /// Output format. Overrides `output.format` from configuration.
    #[arg(long, value_enum)]
    format: Option<OutputFormat>,
}

impl ReportArgs {
    fn filters(&self) -> Result<FilterSet> {
        let mut filters = FilterSet::new();
        filters.category = self.category.clone();
        filters.sector = self.sector.clone();
        filters.region = self.region.clone();
        if self.year_from.is_some() || self.year_to.is_some() {
            let range = YearRange::new(
                self.year_from.unwrap_or(i32::MIN),
                self.year_to.unwrap_or(i32::MAX),
            )?;
            filters = filters.with_years(range);
        }
        Ok(filters)
    }
}

// ==============================================================================
// Command Logic
// ==============================================================================

fn open_session(args: &DataArgs, settings: &Settings) -> Result<(PathBuf, Session)> {
    let path = args.data.clone().unwrap_or_else(|| settings.data.path.clone());
    let raw = loader::load_path(&path)
        .with_context(|| format!("Could not read dataset {}", path.display()))?;
    let session = analyse(&path, &raw, settings)?;
    Ok((path, session))
}

/// Validates a loaded table. When no row survives, the rejected rows are
/// printed to stderr before the error is returned.
fn analyse(path: &Path, raw: &RawTable, settings: &Settings) -> Result<Session> {
    let deriver = MetricDeriver::with_domain_threshold(settings.analysis.domain_threshold_years);
    let session = Session::load(raw, deriver)
        .map_err(|e| {
            if let AnalyticsError::Data { issues, .. } = &e {
                eprintln!("{}", render::issues(issues));
            }
            e
        })
        .with_context(|| format!("Dataset {} cannot be analysed", path.display()))?;
    Ok(session)
}

fn handle_validate(args: DataArgs, settings: &Settings) -> Result<()> {
    let (path, session) = open_session(&args, settings)?;
    println!("Dataset: {}", path.display());
    println!("{}", render::validation(session.report()));
    Ok(())
}

fn handle_report(args: ReportArgs, settings: &Settings) -> Result<()> {
    let filters = args.filters()?;
    let (path, session) = open_session(&args.data, settings)?;
    let aggregates = session.aggregates(&filters);

    match args.format.unwrap_or(settings.output.format) {
        OutputFormat::Table => {
            let threshold = session.deriver().domain_threshold_years();
            println!("{}", render::aggregates(&aggregates, &filters, threshold));
        }
        OutputFormat::Json => {
            let envelope = render::ReportEnvelope::new(&path, session.report(), &aggregates);
            println!("{}", serde_json::to_string_pretty(&envelope)?);
        }
    }
    Ok(())
}

fn handle_options(args: DataArgs, settings: &Settings) -> Result<()> {
    let (_, session) = open_session(&args, settings)?;
    println!("{}", render::options(&session.options()));
    Ok(())
}
