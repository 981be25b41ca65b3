//! Alpha Vantage provider.
//!
//! `TIME_SERIES_DAILY` / `TIME_SERIES_WEEKLY` return a JSON object keyed by
//! date with numbered string fields (`"1. open"` ... `"5. volume"`). The
//! compact output covers the latest 100 periods regardless of the requested
//! range, so bars are filtered to `[start, end]` here. Throttling and bad
//! keys come back as 200 responses carrying `Note`, `Information` or
//! `Error Message`.

use crate::adapters::http::{build_client, finish_bars, get_text, parse_price};
use crate::domain::error::IngestError;
use crate::domain::ohlcv::{Frequency, RawBar};
use crate::ports::provider_port::ProviderPort;
use chrono::NaiveDate;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::BTreeMap;

pub const DEFAULT_URL: &str = "https://www.alphavantage.co/query";

#[derive(Debug, Deserialize)]
struct AlphaVantageBar {
    #[serde(rename = "1. open")]
    open: String,
    #[serde(rename = "2. high")]
    high: String,
    #[serde(rename = "3. low")]
    low: String,
    #[serde(rename = "4. close")]
    close: String,
    #[serde(rename = "5. volume")]
    volume: String,
}

pub struct AlphaVantageAdapter {
    client: Client,
    base_url: String,
    api_key: String,
}

impl AlphaVantageAdapter {
    pub fn new(base_url: Option<String>, api_key: String) -> Result<Self, IngestError> {
        Ok(Self {
            client: build_client()?,
            base_url: base_url.unwrap_or_else(|| DEFAULT_URL.to_string()),
            api_key,
        })
    }

    pub fn function(frequency: Frequency) -> &'static str {
        match frequency {
            Frequency::Daily => "TIME_SERIES_DAILY",
            Frequency::Weekly => "TIME_SERIES_WEEKLY",
        }
    }

    fn series_key(frequency: Frequency) -> &'static str {
        match frequency {
            Frequency::Daily => "Time Series (Daily)",
            Frequency::Weekly => "Weekly Time Series",
        }
    }

    pub fn parse_payload(
        ticker: &str,
        body: &str,
        frequency: Frequency,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<Vec<RawBar>, IngestError> {
        let mut payload: serde_json::Map<String, serde_json::Value> = serde_json::from_str(body)
            .map_err(|e| IngestError::fetch(ticker, format!("malformed payload: {e}")))?;

        for key in ["Error Message", "Note", "Information"] {
            if let Some(msg) = payload.get(key) {
                return Err(IngestError::fetch(ticker, format!("provider said: {msg}")));
            }
        }

        let series = payload
            .remove(Self::series_key(frequency))
            .ok_or_else(|| {
                IngestError::fetch(
                    ticker,
                    format!("payload has no {:?}", Self::series_key(frequency)),
                )
            })?;
        let series: BTreeMap<String, AlphaVantageBar> = serde_json::from_value(series)
            .map_err(|e| IngestError::fetch(ticker, format!("malformed series: {e}")))?;

        let mut bars = Vec::with_capacity(series.len());
        for (day, raw) in series {
            let date = NaiveDate::parse_from_str(day.get(..10).unwrap_or(&day), "%Y-%m-%d")
                .map_err(|e| IngestError::fetch(ticker, format!("invalid date {day:?}: {e}")))?;
            if date < start_date || date > end_date {
                continue;
            }
            let volume = raw.volume.trim().parse::<i64>().map_err(|e| {
                IngestError::fetch(ticker, format!("invalid volume {:?}: {e}", raw.volume))
            })?;
            bars.push(RawBar {
                date,
                open: parse_price(ticker, "open", &raw.open)?,
                high: parse_price(ticker, "high", &raw.high)?,
                low: parse_price(ticker, "low", &raw.low)?,
                close: parse_price(ticker, "close", &raw.close)?,
                volume,
            });
        }

        finish_bars(ticker, bars)
    }
}

impl ProviderPort for AlphaVantageAdapter {
    fn name(&self) -> &str {
        "alphavantage"
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<RawBar>, IngestError> {
        let query = [
            ("function", Self::function(frequency).to_string()),
            ("symbol", ticker.to_string()),
            ("outputsize", "compact".to_string()),
            ("datatype", "json".to_string()),
            ("apikey", self.api_key.clone()),
        ];
        let body = get_text(&self.client, ticker, &self.base_url, &query)?;
        Self::parse_payload(ticker, &body, frequency, start_date, end_date)
    }
}
