//! Run configuration.
//!
//! Everything a run needs is read and validated here, before any network or
//! store I/O, and then stays fixed for the whole run.

use crate::domain::derivation::NormalizationPlan;
use crate::domain::error::IngestError;
use crate::domain::indicator::{IndicatorKind, IndicatorSpec};
use crate::domain::normalizer::{NormalizationConfig, NormalizationStrategy};
use crate::domain::ohlcv::Frequency;
use crate::domain::scaler::ScalerKind;
use crate::domain::ticker::{Ticker, parse_ticker_tokens, parse_tickers};
use crate::ports::config_port::ConfigPort;
use chrono::{Duration, NaiveDate};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_WORK_DIR: &str = "./work_dir";
pub const DEFAULT_DATABASE: &str = "indicators.db";
pub const DEFAULT_LOOKBACK_DAYS: i64 = 365;
pub const DEFAULT_WINDOW_SIZE: i64 = 20;
pub const DEFAULT_SCALED_LINES: &str = "cwap, volume, mass";
pub const MAX_LOOKBACK_DAYS: i64 = 36_500;

/// The upstream market-data source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataProvider {
    AlphaVantage,
    Tiingo,
    YahooFinance,
}

impl DataProvider {
    pub fn from_name(name: &str) -> Result<Self, IngestError> {
        match name.trim().to_lowercase().as_str() {
            "alphavantage" => Ok(DataProvider::AlphaVantage),
            "tiingo" => Ok(DataProvider::Tiingo),
            "yfinance" | "yahoo" => Ok(DataProvider::YahooFinance),
            _ => Err(IngestError::UnknownProvider {
                name: name.trim().to_string(),
            }),
        }
    }

    /// Key used for `url_<key>`, `api_key_<key>` and `API_TOKEN_<KEY>`.
    pub fn key(self) -> &'static str {
        match self {
            DataProvider::AlphaVantage => "alphavantage",
            DataProvider::Tiingo => "tiingo",
            DataProvider::YahooFinance => "yfinance",
        }
    }
}

impl fmt::Display for DataProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    pub provider: DataProvider,
    pub base_url: Option<String>,
    pub api_key: Option<String>,
    pub frequency: Frequency,
    pub lookback_days: i64,
    pub spec: IndicatorSpec,
    pub normalization: NormalizationPlan,
    pub tickers: Vec<Ticker>,
    pub store_path: PathBuf,
    pub debug: bool,
}

impl RunConfig {
    /// Build from config; `ticker_override` (CLI arguments) replaces
    /// `[interface] tickers` when non-empty.
    pub fn from_config(
        config: &dyn ConfigPort,
        ticker_override: &[String],
    ) -> Result<Self, IngestError> {
        let provider_name = require(config, "data_service", "data_provider")?;
        let provider = DataProvider::from_name(&provider_name)?;

        let frequency = config
            .get_string("data_service", "data_frequency")
            .unwrap_or_else(|| "daily".to_string())
            .parse::<Frequency>()
            .map_err(|e| IngestError::invalid("data_service", "data_frequency", e))?;

        let lookback_days =
            optional_int(config, "data_service", "data_lookback", DEFAULT_LOOKBACK_DAYS)?;
        if !(1..=MAX_LOOKBACK_DAYS).contains(&lookback_days) {
            return Err(IngestError::invalid(
                "data_service",
                "data_lookback",
                format!("data_lookback must be between 1 and {MAX_LOOKBACK_DAYS} days"),
            ));
        }

        let spec = IndicatorSpec::parse(&require(config, "interface", "data_line")?)
            .map_err(|e| IngestError::invalid("interface", "data_line", e.to_string()))?;

        let normalization = build_normalization(config)?;
        let tickers = resolve_tickers(config, ticker_override)?;

        let store_path = store_path(config)?;

        Ok(RunConfig {
            provider,
            base_url: config.get_string("data_service", &format!("url_{}", provider.key())),
            api_key: config.get_string("data_service", &format!("api_key_{}", provider.key())),
            frequency,
            lookback_days,
            spec,
            normalization,
            tickers,
            store_path,
            debug: optional_bool(config, "default", "debug", false)?,
        })
    }

    /// `[today - lookback, today]`.
    pub fn date_range(&self, today: NaiveDate) -> Result<(NaiveDate, NaiveDate), IngestError> {
        Duration::try_days(self.lookback_days)
            .and_then(|span| today.checked_sub_signed(span))
            .map(|start| (start, today))
            .ok_or_else(|| {
                IngestError::invalid(
                    "data_service",
                    "data_lookback",
                    format!("{} days before {today} is out of range", self.lookback_days),
                )
            })
    }
}

/// `<work_dir>/data/<database>`; `database` must be a bare file name.
pub fn store_path(config: &dyn ConfigPort) -> Result<PathBuf, IngestError> {
    let work_dir = config
        .get_string("default", "work_dir")
        .unwrap_or_else(|| DEFAULT_WORK_DIR.to_string());
    let database = config
        .get_string("interface", "database")
        .unwrap_or_else(|| DEFAULT_DATABASE.to_string());
    if database.contains(['/', '\\']) {
        return Err(IngestError::invalid(
            "interface",
            "database",
            "database must be a file name, not a path",
        ));
    }
    Ok(PathBuf::from(work_dir).join("data").join(database))
}

fn require(config: &dyn ConfigPort, section: &str, key: &str) -> Result<String, IngestError> {
    config
        .get_string(section, key)
        .ok_or_else(|| IngestError::ConfigMissing {
            section: section.to_string(),
            key: key.to_string(),
        })
}

fn optional_int(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: i64,
) -> Result<i64, IngestError> {
    match config.get_string(section, key) {
        None => Ok(default),
        Some(raw) => raw.parse::<i64>().map_err(|e| {
            IngestError::invalid(section, key, format!("{raw:?} is not an integer: {e}"))
        }),
    }
}

fn optional_bool(
    config: &dyn ConfigPort,
    section: &str,
    key: &str,
    default: bool,
) -> Result<bool, IngestError> {
    let Some(raw) = config.get_string(section, key) else {
        return Ok(default);
    };
    match raw.to_lowercase().as_str() {
        "true" | "yes" | "on" | "1" => Ok(true),
        "false" | "no" | "off" | "0" => Ok(false),
        _ => Err(IngestError::invalid(
            section,
            key,
            format!("{raw:?} is not a boolean"),
        )),
    }
}

fn build_normalization(config: &dyn ConfigPort) -> Result<NormalizationPlan, IngestError> {
    let scaler = config
        .get_string("data_service", "sklearn_scaler")
        .unwrap_or_else(|| "MinMaxScaler".to_string())
        .parse::<ScalerKind>()
        .map_err(|e| IngestError::invalid("data_service", "sklearn_scaler", e.to_string()))?;

    let window_size = optional_int(config, "data_service", "window_size", DEFAULT_WINDOW_SIZE)?;
    if window_size <= 0 {
        return Err(IngestError::invalid(
            "data_service",
            "window_size",
            "window_size must be a positive integer",
        ));
    }

    let mode = config
        .get_string("data_service", "normalization")
        .unwrap_or_else(|| "windowed".to_string());
    let strategy = match mode.to_lowercase().as_str() {
        "off" | "none" => NormalizationStrategy::Off,
        "global" => NormalizationStrategy::Global,
        "windowed" | "local" => NormalizationStrategy::Windowed {
            window_size: window_size as usize,
        },
        other => {
            return Err(IngestError::invalid(
                "data_service",
                "normalization",
                format!("unknown normalization {other:?} (expected off, global or windowed)"),
            ));
        }
    };

    let lines_str = config
        .get_string("data_service", "scaled_lines")
        .unwrap_or_else(|| DEFAULT_SCALED_LINES.to_string());
    let lines = lines_str
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|t| !t.is_empty())
        .map(IndicatorKind::from_str)
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| IngestError::invalid("data_service", "scaled_lines", e.to_string()))?;

    Ok(NormalizationPlan {
        config: NormalizationConfig { scaler, strategy },
        lines,
    })
}

fn resolve_tickers(
    config: &dyn ConfigPort,
    ticker_override: &[String],
) -> Result<Vec<Ticker>, IngestError> {
    let tickers = if ticker_override.is_empty() {
        let list = require(config, "interface", "tickers")?;
        parse_tickers(&list)
    } else {
        parse_ticker_tokens(ticker_override.iter().map(String::as_str))
    }
    .map_err(|e| IngestError::invalid("interface", "tickers", e.to_string()))?;

    if tickers.is_empty() {
        return Err(IngestError::ConfigMissing {
            section: "interface".to_string(),
            key: "tickers".to_string(),
        });
    }
    Ok(tickers)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::file_config_adapter::FileConfigAdapter;

    const VALID_INI: &str = r#"
[default]
work_dir = /tmp/stonk
debug = true

[interface]
database = lines.db
data_line = clop, clv, cwap, hilo, volume, mass
tickers = aapl, msft

[data_service]
data_provider = tiingo
data_frequency = weekly
data_lookback = 30
sklearn_scaler = RobustScaler
normalization = windowed
window_size = 10
scaled_lines = volume, mass
url_tiingo = http://localhost:9/tiingo
api_key_tiingo = secret
"#;

    fn load(ini: &str) -> Result<RunConfig, IngestError> {
        let adapter = FileConfigAdapter::from_string(ini).unwrap();
        RunConfig::from_config(&adapter, &[])
    }

    #[test]
    fn full_config_resolves() {
        let cfg = load(VALID_INI).unwrap();
        assert_eq!(cfg.provider, DataProvider::Tiingo);
        assert_eq!(cfg.frequency, Frequency::Weekly);
        assert_eq!(cfg.lookback_days, 30);
        assert_eq!(cfg.spec.len(), 6);
        assert_eq!(cfg.normalization.config.scaler, ScalerKind::Robust);
        assert_eq!(
            cfg.normalization.config.strategy,
            NormalizationStrategy::Windowed { window_size: 10 }
        );
        assert_eq!(
            cfg.normalization.lines,
            vec![IndicatorKind::Volume, IndicatorKind::Mass]
        );
        assert_eq!(cfg.tickers[0].as_str(), "AAPL");
        assert_eq!(cfg.store_path, PathBuf::from("/tmp/stonk/data/lines.db"));
        assert_eq!(cfg.base_url.as_deref(), Some("http://localhost:9/tiingo"));
        assert_eq!(cfg.api_key.as_deref(), Some("secret"));
        assert!(cfg.debug);
    }

    #[test]
    fn unknown_provider_is_its_own_error() {
        let ini = VALID_INI.replace("data_provider = tiingo", "data_provider = bogus");
        match load(&ini) {
            Err(IngestError::UnknownProvider { name }) => assert_eq!(name, "bogus"),
            other => panic!("expected UnknownProvider, got {other:?}"),
        }
    }

    #[test]
    fn unknown_indicator_is_rejected() {
        let ini = VALID_INI.replace("clop, clv, cwap", "clop, rsi, cwap");
        assert!(matches!(
            load(&ini),
            Err(IngestError::ConfigInvalid { key, .. }) if key == "data_line"
        ));
    }

    #[test]
    fn non_positive_window_is_rejected() {
        let ini = VALID_INI.replace("window_size = 10", "window_size = 0");
        assert!(matches!(
            load(&ini),
            Err(IngestError::ConfigInvalid { key, .. }) if key == "window_size"
        ));
    }

    #[test]
    fn defaults_apply() {
        let ini = r#"
[interface]
data_line = clop
tickers = spy

[data_service]
data_provider = yfinance
"#;
        let cfg = load(ini).unwrap();
        assert_eq!(cfg.frequency, Frequency::Daily);
        assert_eq!(cfg.lookback_days, DEFAULT_LOOKBACK_DAYS);
        assert_eq!(cfg.normalization.config.scaler, ScalerKind::MinMax);
        assert_eq!(
            cfg.normalization.config.strategy,
            NormalizationStrategy::Windowed { window_size: 20 }
        );
        assert_eq!(cfg.normalization.lines.len(), 3);
        assert_eq!(
            cfg.store_path,
            PathBuf::from(DEFAULT_WORK_DIR).join("data").join(DEFAULT_DATABASE)
        );
        assert!(!cfg.debug);
    }

    #[test]
    fn cli_tickers_override_config() {
        let adapter = FileConfigAdapter::from_string(VALID_INI).unwrap();
        let cfg = RunConfig::from_config(&adapter, &["qqq".to_string()]).unwrap();
        assert_eq!(cfg.tickers.len(), 1);
        assert_eq!(cfg.tickers[0].as_str(), "QQQ");
    }

    #[test]
    fn missing_tickers_is_reported() {
        let ini = VALID_INI.replace("tickers = aapl, msft", "");
        assert!(matches!(
            load(&ini),
            Err(IngestError::ConfigMissing { key, .. }) if key == "tickers"
        ));
    }

    #[test]
    fn invalid_ticker_is_rejected() {
        let ini = VALID_INI.replace("tickers = aapl, msft", "tickers = aapl, x;drop");
        assert!(matches!(
            load(&ini),
            Err(IngestError::ConfigInvalid { key, .. }) if key == "tickers"
        ));
    }

    #[test]
    fn database_must_be_a_file_name() {
        let ini = VALID_INI.replace("database = lines.db", "database = ../lines.db");
        assert!(matches!(
            load(&ini),
            Err(IngestError::ConfigInvalid { key, .. }) if key == "database"
        ));
    }

    #[test]
    fn date_range_counts_back_from_today() {
        let cfg = load(VALID_INI).unwrap();
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        let (start, end) = cfg.date_range(today).unwrap();
        assert_eq!(start, NaiveDate::from_ymd_opt(2024, 3, 1).unwrap());
        assert_eq!(end, today);
    }

    #[test]
    fn oversized_lookback_is_rejected_at_load() {
        let ini = VALID_INI.replace("data_lookback = 30", "data_lookback = 200000000");
        assert!(matches!(
            load(&ini),
            Err(IngestError::ConfigInvalid { key, .. }) if key == "data_lookback"
        ));
    }

    #[test]
    fn date_range_before_calendar_start_is_an_error() {
        let mut cfg = load(VALID_INI).unwrap();
        cfg.lookback_days = i64::MAX / 86_400;
        let today = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
        assert!(matches!(
            cfg.date_range(today),
            Err(IngestError::ConfigInvalid { .. })
        ));
    }

    #[test]
    fn non_numeric_integers_are_rejected() {
        let ini = VALID_INI.replace("window_size = 10", "window_size = 5O");
        assert!(matches!(
            load(&ini),
            Err(IngestError::ConfigInvalid { key, .. }) if key == "window_size"
        ));

        let ini = VALID_INI.replace("data_lookback = 30", "data_lookback = thirty");
        assert!(matches!(
            load(&ini),
            Err(IngestError::ConfigInvalid { key, .. }) if key == "data_lookback"
        ));
    }

    #[test]
    fn unrecognised_debug_flag_is_rejected() {
        let ini = VALID_INI.replace("debug = true", "debug = maybe");
        assert!(matches!(
            load(&ini),
            Err(IngestError::ConfigInvalid { key, .. }) if key == "debug"
        ));
        let ini = VALID_INI.replace("debug = true", "debug = off");
        assert!(!load(&ini).unwrap().debug);
    }
}
