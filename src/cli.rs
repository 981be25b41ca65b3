//! CLI definition and dispatch.

use chrono::{DateTime, NaiveDate, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::Level;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::provider::ProviderAdapter;
use crate::adapters::sqlite_store::SqliteStore;
use crate::domain::error::IngestError;
use crate::domain::pipeline::{RunSummary, TickerOutcome, run_pipeline};
use crate::domain::run_config::{RunConfig, store_path};
use crate::domain::ticker::Ticker;
use crate::ports::provider_port::ProviderPort;
use crate::ports::store_port::StorePort;

#[derive(Parser, Debug)]
#[command(
    name = "stonkline",
    about = "Fetch OHLCV bars, derive indicator lines and store them in SQLite"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Fetch bars and rebuild the indicator store
    Fetch {
        #[arg(short, long)]
        config: PathBuf,
        /// Log at debug level regardless of `[default] debug`
        #[arg(long)]
        debug: bool,
        /// Tickers to ingest instead of `[interface] tickers`
        tickers: Vec<String>,
    },
    /// Check a configuration file and print the resolved run settings
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
    /// Print one ticker's stored rows
    Show {
        #[arg(short, long)]
        config: PathBuf,
        ticker: String,
    },
    /// List the tables in the store
    Tables {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    match cli.command {
        Command::Fetch {
            config,
            debug,
            tickers,
        } => run_fetch(&config, debug, &tickers),
        Command::Validate { config } => run_validate(&config),
        Command::Show { config, ticker } => run_show(&config, &ticker),
        Command::Tables { config } => run_tables(&config),
    }
}

pub fn init_tracing(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::INFO };
    // a second init (tests, repeated runs in one process) keeps the first subscriber
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = IngestError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

fn fail(err: IngestError) -> ExitCode {
    eprintln!("error: {err}");
    (&err).into()
}

fn run_fetch(config_path: &PathBuf, debug: bool, tickers: &[String]) -> ExitCode {
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    // unknown providers and every other config error stop here, before the store exists
    let config = match RunConfig::from_config(&adapter, tickers) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    init_tracing(debug || config.debug);

    let provider = match ProviderAdapter::from_config(&config) {
        Ok(p) => p,
        Err(e) => return fail(e),
    };
    let store = SqliteStore::new(&config.store_path);

    run_fetch_pipeline(&provider, &store, &config, Utc::now().date_naive())
}

/// Run the pipeline and report the summary; exits non-zero when the store
/// could not be built or no ticker was written.
pub fn run_fetch_pipeline(
    provider: &dyn ProviderPort,
    store: &dyn StorePort,
    config: &RunConfig,
    today: NaiveDate,
) -> ExitCode {
    let summary = match run_pipeline(provider, store, config, today) {
        Ok(s) => s,
        Err(e) => return fail(e),
    };

    print_summary(&summary);

    if summary.all_failed() {
        eprintln!("error: no ticker was written");
        return ExitCode::from(5);
    }
    ExitCode::SUCCESS
}

fn print_summary(summary: &RunSummary) {
    eprintln!("\n=== Run Summary ===");
    for report in &summary.reports {
        match &report.outcome {
            TickerOutcome::Written { rows } => {
                eprintln!("  {}: {} rows", report.ticker, rows);
            }
            TickerOutcome::Failed { stage, reason } => {
                eprintln!("  {}: failed at {} ({})", report.ticker, stage, reason);
            }
        }
    }
    eprintln!(
        "Written: {}  Failed: {}  Rows: {}",
        summary.written(),
        summary.failed(),
        summary.total_rows()
    );
}

fn run_validate(config_path: &PathBuf) -> ExitCode {
    eprintln!("Validating config: {}", config_path.display());
    let adapter = match load_config(config_path) {
        Ok(a) => a,
        Err(code) => return code,
    };

    let config = match RunConfig::from_config(&adapter, &[]) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };

    let tickers: Vec<&str> = config.tickers.iter().map(Ticker::as_str).collect();
    let scaled: Vec<&str> = config
        .normalization
        .lines
        .iter()
        .map(|k| k.name())
        .collect();

    println!("provider:      {}", config.provider);
    println!(
        "url:           {}",
        config.base_url.as_deref().unwrap_or("(default)")
    );
    println!(
        "api key:       {}",
        if config.api_key.is_some() {
            "set"
        } else {
            "(from environment)"
        }
    );
    println!("frequency:     {}", config.frequency);
    println!("lookback:      {} days", config.lookback_days);
    println!("data lines:    {}", config.spec);
    println!("scaler:        {}", config.normalization.config.scaler);
    println!("normalization: {}", config.normalization.config.strategy);
    println!("scaled lines:  {}", scaled.join(", "));
    println!("tickers:       {}", tickers.join(", "));
    println!("store:         {}", config.store_path.display());

    eprintln!("\nConfiguration is valid.");
    ExitCode::SUCCESS
}

fn open_store(config_path: &PathBuf) -> Result<SqliteStore, ExitCode> {
    let adapter = load_config(config_path)?;
    store_path(&adapter).map(SqliteStore::new).map_err(fail)
}

fn run_show(config_path: &PathBuf, raw_ticker: &str) -> ExitCode {
    let ticker = match Ticker::parse(raw_ticker) {
        Ok(t) => t,
        Err(e) => {
            eprintln!("error: {e}");
            return ExitCode::from(2);
        }
    };
    let store = match open_store(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    let columns = match store.table_columns(&ticker) {
        Ok(c) => c,
        Err(e) => return fail(e),
    };
    let rows = match store.read_rows(&ticker) {
        Ok(r) => r,
        Err(e) => return fail(e),
    };

    println!("{}", columns.join("\t"));
    for row in &rows {
        let date = DateTime::from_timestamp(row.date, 0)
            .map(|dt| dt.date_naive().to_string())
            .unwrap_or_else(|| row.date.to_string());
        let values: Vec<String> = row.values.iter().map(i64::to_string).collect();
        println!("{}\t{}", date, values.join("\t"));
    }
    eprintln!("{}: {} rows", ticker, rows.len());
    ExitCode::SUCCESS
}

fn run_tables(config_path: &PathBuf) -> ExitCode {
    let store = match open_store(config_path) {
        Ok(s) => s,
        Err(code) => return code,
    };

    match store.list_tables() {
        Ok(tables) => {
            for name in &tables {
                println!("{name}");
            }
            eprintln!("{} tables in {}", tables.len(), store.path().display());
            ExitCode::SUCCESS
        }
        Err(e) => fail(e),
    }
}
