//! Yahoo Finance provider over the v8 chart API.
//!
//! No API key. Yahoo is unofficial and changes shape without notice, so any
//! deviation from the expected response is reported as a fetch failure.

use crate::adapters::http::{build_client, finish_bars, get_text};
use crate::domain::error::IngestError;
use crate::domain::ohlcv::{Frequency, RawBar};
use crate::ports::provider_port::ProviderPort;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

pub const DEFAULT_URL: &str = "https://query2.finance.yahoo.com/v8/finance/chart";

#[derive(Debug, Deserialize)]
struct ChartResponse {
    chart: ChartResult,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    result: Option<Vec<ChartData>>,
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    code: String,
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartData {
    timestamp: Option<Vec<i64>>,
    indicators: Indicators,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    quote: Vec<QuoteData>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct QuoteData {
    open: Vec<Option<f64>>,
    high: Vec<Option<f64>>,
    low: Vec<Option<f64>>,
    close: Vec<Option<f64>>,
    volume: Vec<Option<i64>>,
}

pub struct YahooAdapter {
    client: Client,
    base_url: String,
}

impl YahooAdapter {
    pub fn new(base_url: Option<String>) -> Result<Self, IngestError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_URL.to_string()),
        })
    }

    pub fn interval(frequency: Frequency) -> &'static str {
        match frequency {
            Frequency::Daily => "1d",
            Frequency::Weekly => "1wk",
        }
    }

    pub fn parse_payload(ticker: &str, body: &str) -> Result<Vec<RawBar>, IngestError> {
        let resp: ChartResponse = serde_json::from_str(body)
            .map_err(|e| IngestError::fetch(ticker, format!("malformed payload: {e}")))?;

        let data = match (resp.chart.result, resp.chart.error) {
            (_, Some(err)) => {
                return Err(IngestError::fetch(
                    ticker,
                    format!("{}: {}", err.code, err.description),
                ));
            }
            (Some(results), None) => results
                .into_iter()
                .next()
                .ok_or_else(|| IngestError::fetch(ticker, "result array is empty"))?,
            (None, None) => {
                return Err(IngestError::fetch(ticker, "empty result with no error"));
            }
        };

        let timestamps = data.timestamp.unwrap_or_default();
        let quote = data
            .indicators
            .quote
            .into_iter()
            .next()
            .ok_or_else(|| IngestError::fetch(ticker, "no quote data"))?;

        let mut bars = Vec::with_capacity(timestamps.len());
        for (i, &ts) in timestamps.iter().enumerate() {
            let date = chrono::DateTime::from_timestamp(ts, 0)
                .map(|dt| dt.naive_utc().date())
                .ok_or_else(|| IngestError::fetch(ticker, format!("invalid timestamp {ts}")))?;

            let field = |v: &Vec<Option<f64>>| v.get(i).copied().flatten();
            // holidays and halted sessions come back as nulls
            let (Some(open), Some(high), Some(low), Some(close)) = (
                field(&quote.open),
                field(&quote.high),
                field(&quote.low),
                field(&quote.close),
            ) else {
                continue;
            };

            bars.push(RawBar {
                date,
                open,
                high,
                low,
                close,
                volume: quote.volume.get(i).copied().flatten().unwrap_or(0),
            });
        }

        finish_bars(ticker, bars)
    }
}

impl ProviderPort for YahooAdapter {
    fn name(&self) -> &str {
        "yfinance"
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<RawBar>, IngestError> {
        let to_ts = |d: NaiveDate, h: u32, m: u32, s: u32| {
            d.and_hms_opt(h, m, s)
                .map(|dt| dt.and_utc().timestamp())
                .unwrap_or_default()
        };
        let url = format!("{}/{}", self.base_url.trim_end_matches('/'), ticker);
        let query = [
            ("period1", to_ts(start_date, 0, 0, 0).to_string()),
            ("period2", to_ts(end_date, 23, 59, 59).to_string()),
            ("interval", Self::interval(frequency).to_string()),
            ("includeAdjustedClose", "true".to_string()),
        ];
        let body = get_text(&self.client, ticker, &url, &query)?;
        Self::parse_payload(ticker, &body)
    }
}
