//! Provider selection from the run configuration.

use crate::adapters::alphavantage::AlphaVantageAdapter;
use crate::adapters::tiingo::TiingoAdapter;
use crate::adapters::yahoo::YahooAdapter;
use crate::domain::error::IngestError;
use crate::domain::ohlcv::{Frequency, RawBar};
use crate::domain::run_config::{DataProvider, RunConfig};
use crate::ports::provider_port::ProviderPort;
use chrono::NaiveDate;

pub enum ProviderAdapter {
    AlphaVantage(AlphaVantageAdapter),
    Tiingo(TiingoAdapter),
    Yahoo(YahooAdapter),
}

impl ProviderAdapter {
    pub fn from_config(config: &RunConfig) -> Result<Self, IngestError> {
        let base_url = config.base_url.clone();
        match config.provider {
            DataProvider::AlphaVantage => Ok(ProviderAdapter::AlphaVantage(
                AlphaVantageAdapter::new(base_url, resolve_api_key(config)?)?,
            )),
            DataProvider::Tiingo => Ok(ProviderAdapter::Tiingo(TiingoAdapter::new(
                base_url,
                resolve_api_key(config)?,
            )?)),
            DataProvider::YahooFinance => Ok(ProviderAdapter::Yahoo(YahooAdapter::new(base_url)?)),
        }
    }

    fn inner(&self) -> &dyn ProviderPort {
        match self {
            ProviderAdapter::AlphaVantage(a) => a,
            ProviderAdapter::Tiingo(a) => a,
            ProviderAdapter::Yahoo(a) => a,
        }
    }
}

impl ProviderPort for ProviderAdapter {
    fn name(&self) -> &str {
        self.inner().name()
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<RawBar>, IngestError> {
        self.inner()
            .fetch_bars(ticker, start_date, end_date, frequency)
    }
}

/// Name of the environment variable consulted when `api_key_<provider>` is unset.
pub fn api_token_var(provider: DataProvider) -> String {
    format!("API_TOKEN_{}", provider.key().to_uppercase())
}

/// `api_key_<provider>` from config, else `API_TOKEN_<PROVIDER>` from the environment.
pub fn resolve_api_key(config: &RunConfig) -> Result<String, IngestError> {
    if let Some(key) = config.api_key.as_ref().filter(|k| !k.trim().is_empty()) {
        return Ok(key.clone());
    }
    std::env::var(api_token_var(config.provider))
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or_else(|| IngestError::ConfigMissing {
            section: "data_service".to_string(),
            key: format!("api_key_{}", config.provider.key()),
        })
}
