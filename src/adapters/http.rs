//! Blocking HTTP plumbing shared by the provider adapters.

use crate::domain::error::IngestError;
use crate::domain::ohlcv::{RawBar, sanitize_bars};
use reqwest::blocking::Client;
use std::time::Duration;
use tracing::debug;

const USER_AGENT: &str = "Mozilla/5.0 (X11; Linux x86_64; rv:136.0) Gecko/20100101 Firefox/136.0";

pub fn build_client() -> Result<Client, IngestError> {
    Client::builder()
        .timeout(Duration::from_secs(30))
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| IngestError::Transport {
            reason: e.to_string(),
        })
}

/// GET `url` with `query` and return the body of a 2xx response.
pub fn get_text(
    client: &Client,
    ticker: &str,
    url: &str,
    query: &[(&str, String)],
) -> Result<String, IngestError> {
    debug!(%url, %ticker, "GET");
    let resp = client
        .get(url)
        .query(query)
        .send()
        .map_err(|e| IngestError::fetch(ticker, format!("request failed: {e}")))?;

    let status = resp.status();
    if !status.is_success() {
        return Err(IngestError::fetch(ticker, format!("HTTP {status}")));
    }

    let body = resp
        .text()
        .map_err(|e| IngestError::fetch(ticker, format!("unreadable body: {e}")))?;
    if body.trim().is_empty() {
        return Err(IngestError::fetch(ticker, "empty response body"));
    }
    Ok(body)
}

/// Sort, deduplicate and drop malformed bars; an empty result is a fetch failure.
pub fn finish_bars(ticker: &str, bars: Vec<RawBar>) -> Result<Vec<RawBar>, IngestError> {
    let (bars, dropped) = sanitize_bars(bars);
    if dropped > 0 {
        debug!(%ticker, dropped, "dropped duplicate or malformed bars");
    }
    if bars.is_empty() {
        return Err(IngestError::fetch(ticker, "no bars in range"));
    }
    Ok(bars)
}

pub fn parse_price(ticker: &str, field: &str, raw: &str) -> Result<f64, IngestError> {
    raw.trim()
        .parse::<f64>()
        .map_err(|e| IngestError::fetch(ticker, format!("invalid {field} {raw:?}: {e}")))
}
