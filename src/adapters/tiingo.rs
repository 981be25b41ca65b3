//! Tiingo end-of-day provider.
//!
//! `GET {base}/{ticker}/prices?startDate&endDate&resampleFreq` returns a JSON
//! array of bars; the split/dividend adjusted fields are used.

use crate::adapters::http::{build_client, finish_bars, get_text};
use crate::domain::error::IngestError;
use crate::domain::ohlcv::{Frequency, RawBar};
use crate::ports::provider_port::ProviderPort;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;

pub const DEFAULT_URL: &str = "https://api.tiingo.com/tiingo/daily";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TiingoBar {
    date: String,
    adj_open: f64,
    adj_high: f64,
    adj_low: f64,
    adj_close: f64,
    adj_volume: f64,
}

pub struct TiingoAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl TiingoAdapter {
    pub fn new(base_url: Option<String>, api_key: String) -> Result<Self, IngestError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            api_key,
        })
    }

    pub fn resample_freq(frequency: Frequency) -> &'static str {
        match frequency {
            Frequency::Daily => "daily",
            Frequency::Weekly => "weekly",
        }
    }

    pub fn parse_payload(ticker: &str, body: &str) -> Result<Vec<RawBar>, IngestError> {
        let rows: Vec<TiingoBar> = serde_json::from_str(body)
            .map_err(|e| IngestError::fetch(ticker, format!("malformed payload: {e}")))?;

        let bars = rows
            .into_iter()
            .map(|row| {
                // "2024-01-02T00:00:00.000Z"
                let day = row.date.get(..10).unwrap_or(&row.date);
                let date = NaiveDate::parse_from_str(day, "%Y-%m-%d").map_err(|e| {
                    IngestError::fetch(ticker, format!("invalid date {:?}: {e}", row.date))
                })?;
                Ok(RawBar {
                    date,
                    open: row.adj_open,
                    high: row.adj_high,
                    low: row.adj_low,
                    close: row.adj_close,
                    volume: row.adj_volume.round() as i64,
                })
            })
            .collect::<Result<Vec<_>, IngestError>>()?;

        finish_bars(ticker, bars)
    }
}

impl ProviderPort for TiingoAdapter {
    fn name(&self) -> &str {
        "tiingo"
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<RawBar>, IngestError> {
        let url = format!(
            "{}/{}/prices",
            self.base_url.trim_end_matches('/'),
            ticker.to_lowercase()
        );
        let query = [
            ("startDate", start_date.format("%Y-%m-%d").to_string()),
            ("endDate", end_date.format("%Y-%m-%d").to_string()),
            ("resampleFreq", Self::resample_freq(frequency).to_string()),
            ("format", "json".to_string()),
            ("token", self.api_key.clone()),
        ];
        let body = get_text(&self.client, ticker, &url, &query)?;
        Self::parse_payload(ticker, &body)
    }
}
