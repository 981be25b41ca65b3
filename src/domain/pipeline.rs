//! Pipeline orchestrator.
//!
//! `create schema -> for each ticker { fetch -> derive -> persist }`. Tickers
//! run strictly in list order. A ticker that fails is recorded and skipped;
//! only a schema failure stops the run.

use crate::domain::derivation::derive;
use crate::domain::error::IngestError;
use crate::domain::run_config::RunConfig;
use crate::domain::ticker::Ticker;
use crate::ports::provider_port::ProviderPort;
use crate::ports::store_port::StorePort;
use chrono::NaiveDate;
use std::fmt;
use tracing::{info, info_span, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickerStage {
    Fetch,
    Derive,
    Persist,
}

impl fmt::Display for TickerStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TickerStage::Fetch => write!(f, "fetch"),
            TickerStage::Derive => write!(f, "derive"),
            TickerStage::Persist => write!(f, "persist"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum TickerOutcome {
    Written { rows: usize },
    Failed { stage: TickerStage, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct TickerReport {
    pub ticker: Ticker,
    pub outcome: TickerOutcome,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub reports: Vec<TickerReport>,
}

impl RunSummary {
    pub fn written(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| matches!(r.outcome, TickerOutcome::Written { .. }))
            .count()
    }

    pub fn failed(&self) -> usize {
        self.reports.len() - self.written()
    }

    pub fn total_rows(&self) -> usize {
        self.reports
            .iter()
            .map(|r| match r.outcome {
                TickerOutcome::Written { rows } => rows,
                TickerOutcome::Failed { .. } => 0,
            })
            .sum()
    }

    pub fn all_failed(&self) -> bool {
        !self.reports.is_empty() && self.written() == 0
    }
}

/// Run one ingestion over every ticker in `config`.
///
/// The provider has already been resolved by the caller, so an unknown
/// provider never reaches this point and no store is touched for it.
pub fn run_pipeline(
    provider: &dyn ProviderPort,
    store: &dyn StorePort,
    config: &RunConfig,
    today: NaiveDate,
) -> Result<RunSummary, IngestError> {
    let (start_date, end_date) = config.date_range(today)?;
    store.create_schema(&config.tickers, &config.spec)?;

    info!(
        provider = provider.name(),
        tickers = config.tickers.len(),
        %start_date,
        %end_date,
        frequency = %config.frequency,
        "starting run"
    );

    let mut summary = RunSummary::default();
    for ticker in &config.tickers {
        let _span = info_span!("ticker", %ticker).entered();
        let outcome = process_ticker(provider, store, config, ticker, start_date, end_date);
        match &outcome {
            TickerOutcome::Written { rows } => info!(rows, "written"),
            TickerOutcome::Failed { stage, reason } => {
                warn!(%stage, %reason, "skipping ticker")
            }
        }
        summary.reports.push(TickerReport {
            ticker: ticker.clone(),
            outcome,
        });
    }

    info!(
        written = summary.written(),
        failed = summary.failed(),
        rows = summary.total_rows(),
        "run finished"
    );
    Ok(summary)
}

fn process_ticker(
    provider: &dyn ProviderPort,
    store: &dyn StorePort,
    config: &RunConfig,
    ticker: &Ticker,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> TickerOutcome {
    let failed = |stage, reason: String| TickerOutcome::Failed { stage, reason };

    let bars = match provider.fetch_bars(ticker.as_str(), start_date, end_date, config.frequency) {
        Ok(bars) if bars.is_empty() => {
            return failed(TickerStage::Fetch, "no bars in range".to_string());
        }
        Ok(bars) => bars,
        Err(e) => return failed(TickerStage::Fetch, e.to_string()),
    };
    info!(bars = bars.len(), "fetched");

    let table = derive(&bars, &config.spec, &config.normalization);
    if let Some(col) = table.columns.iter().find(|c| c.len() != table.len()) {
        return failed(
            TickerStage::Derive,
            format!("{} has {} values for {} bars", col.kind, col.len(), table.len()),
        );
    }
    info!(columns = table.columns.len(), "derived");

    match store.write_rows(ticker, &table.rows()) {
        Ok(rows) => TickerOutcome::Written { rows },
        Err(e) => failed(TickerStage::Persist, e.to_string()),
    }
}
