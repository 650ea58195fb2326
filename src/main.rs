use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use raiox::assembler::{AssemblerOptions, DashboardAssembler};
use raiox::backend::raw::RawDividendRow;
use raiox::backend::{BackendSource, MemoryBackend, SupabaseClient};
use raiox::clock::{Clock, SystemClock};
use raiox::config::{default_config_path, Config};
use raiox::defaults::DefaultDataSet;
use raiox::dividends::{dedupe, DividendStats};
use raiox::export::{JsonExporter, ViewExporter};
use raiox::insights::RuleBasedInsights;
use raiox::models::{ClientId, DataSource};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "raiox")]
#[command(about = "Investment dashboard data pipeline")]
struct Cli {
    /// Path to config file (default: ./raiox.toml or the user config dir)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long)]
    log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Assemble a client's dashboard and print it as JSON
    Dashboard {
        /// Client account id
        #[arg(long)]
        client: ClientId,

        /// Skip the hosted backend and show synthetic data only
        #[arg(long)]
        offline: bool,

        /// Write the export to this file instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Aggregate dividend rows from a JSON file
    Dividends {
        /// JSON array of raw dividend rows
        #[arg(long)]
        file: PathBuf,

        /// Year for the annual total (default: current year)
        #[arg(long)]
        year: Option<i32>,

        /// Months averaged by the monthly average
        #[arg(long)]
        months: Option<usize>,
    },

    /// Show current configuration
    Config,
}

fn init_logging(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_level(true),
            )
            .init();
    }
}

fn backend_for(config: &Config, offline: bool) -> Result<Arc<dyn BackendSource>> {
    if offline {
        return Ok(Arc::new(MemoryBackend::new()));
    }
    match SupabaseClient::from_config(&config.backend)? {
        Some(client) => Ok(Arc::new(client)),
        None => {
            tracing::warn!("No backend url configured; showing synthetic data");
            Ok(Arc::new(MemoryBackend::new()))
        }
    }
}

async fn run_dashboard(
    config: &Config,
    client: ClientId,
    offline: bool,
    output: Option<&Path>,
) -> Result<()> {
    let clock = Arc::new(SystemClock);
    let defaults = Arc::new(DefaultDataSet::demo(clock.today()));
    let assembler = DashboardAssembler::new(backend_for(config, offline)?, defaults)
        .with_clock(clock)
        .with_insights(Arc::new(
            RuleBasedInsights::default().with_display(config.display.clone()),
        ))
        .with_options(AssemblerOptions::from(config));

    let assembled = assembler.assemble(client).await;
    let exporter = JsonExporter;
    let bytes = exporter.export(client, &assembled.view)?;
    match output {
        Some(path) => {
            std::fs::write(path, &bytes)
                .with_context(|| format!("Failed to write export to {}", path.display()))?;
            eprintln!("Wrote {} ({:?})", path.display(), assembled.state);
        }
        None => print!("{}", String::from_utf8_lossy(&bytes)),
    }
    Ok(())
}

fn run_dividends(
    config: &Config,
    file: &Path,
    year: Option<i32>,
    months: Option<usize>,
) -> Result<()> {
    let content = std::fs::read_to_string(file)
        .with_context(|| format!("Failed to read dividends file: {}", file.display()))?;
    let rows: Vec<RawDividendRow> = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse dividends file: {}", file.display()))?;

    let records: Vec<_> = rows
        .into_iter()
        .filter_map(|row| match row.into_record(DataSource::Supabase) {
            Ok(record) => Some(record),
            Err(reason) => {
                tracing::warn!(%reason, "Skipping invalid dividend row");
                None
            }
        })
        .collect();
    let records = dedupe(&records);
    let stats = DividendStats::compute(
        &records,
        year.unwrap_or_else(|| SystemClock.current_year()),
        months.unwrap_or(config.dividends.months_to_consider),
    );
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_json);

    let config_path = cli.config.unwrap_or_else(default_config_path);
    let config = Config::load_or_default(&config_path)?;
    tracing::debug!(path = %config_path.display(), "Loaded configuration");

    match cli.command {
        Command::Dashboard {
            client,
            offline,
            output,
        } => run_dashboard(&config, client, offline, output.as_deref()).await?,
        Command::Dividends { file, year, months } => {
            run_dividends(&config, &file, year, months)?
        }
        Command::Config => {
            println!("Config file: {}", config_path.display());
            println!("{}", toml::to_string_pretty(&config)?);
        }
    }

    Ok(())
}
