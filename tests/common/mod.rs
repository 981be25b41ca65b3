#![allow(dead_code)]

use chrono::NaiveDate;
use stonkline::adapters::file_config_adapter::FileConfigAdapter;
use stonkline::domain::error::IngestError;
pub use stonkline::domain::ohlcv::{Frequency, RawBar};
use stonkline::domain::run_config::RunConfig;
use stonkline::ports::provider_port::ProviderPort;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::path::Path;

pub struct MockProvider {
    pub data: HashMap<String, Vec<RawBar>>,
    pub errors: HashMap<String, String>,
    pub calls: RefCell<Vec<String>>,
}

impl MockProvider {
    pub fn new() -> Self {
        Self {
            data: HashMap::new(),
            errors: HashMap::new(),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn with_bars(mut self, ticker: &str, bars: Vec<RawBar>) -> Self {
        self.data.insert(ticker.to_string(), bars);
        self
    }

    pub fn with_error(mut self, ticker: &str, reason: &str) -> Self {
        self.errors.insert(ticker.to_string(), reason.to_string());
        self
    }
}

impl ProviderPort for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    fn fetch_bars(
        &self,
        ticker: &str,
        _start_date: NaiveDate,
        _end_date: NaiveDate,
        _frequency: Frequency,
    ) -> Result<Vec<RawBar>, IngestError> {
        self.calls.borrow_mut().push(ticker.to_string());
        if let Some(reason) = self.errors.get(ticker) {
            return Err(IngestError::fetch(ticker, reason.clone()));
        }
        Ok(self.data.get(ticker).cloned().unwrap_or_default())
    }
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn make_bar(date: &str, o: f64, h: f64, l: f64, c: f64, v: i64) -> RawBar {
    RawBar {
        date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
        open: o,
        high: h,
        low: l,
        close: c,
        volume: v,
    }
}

/// `count` consecutive daily bars drifting upward from `start_price`.
pub fn generate_bars(start_date: &str, count: usize, start_price: f64) -> Vec<RawBar> {
    let start = NaiveDate::parse_from_str(start_date, "%Y-%m-%d").unwrap();
    (0..count)
        .map(|i| {
            let p = start_price + i as f64;
            RawBar {
                date: start + chrono::Duration::days(i as i64),
                open: p,
                high: p + 1.0,
                low: p - 1.0,
                close: p + 0.5,
                volume: 1000 + 10 * i as i64,
            }
        })
        .collect()
}

pub fn write_temp_ini(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file.flush().unwrap();
    file
}

/// INI for a run rooted at `work_dir`; `extra` is appended to `[data_service]`.
pub fn ini_for(work_dir: &Path, provider: &str, data_line: &str, tickers: &str, extra: &str) -> String {
    format!(
        "[default]\nwork_dir = {}\n\n[interface]\ndatabase = test.db\ndata_line = {data_line}\ntickers = {tickers}\n\n[data_service]\ndata_provider = {provider}\n{extra}\n",
        work_dir.display()
    )
}

pub fn run_config(work_dir: &Path, data_line: &str, tickers: &str, extra: &str) -> RunConfig {
    let ini = ini_for(work_dir, "yfinance", data_line, tickers, extra);
    let adapter = FileConfigAdapter::from_string(&ini).unwrap();
    RunConfig::from_config(&adapter, &[]).unwrap()
}

pub fn is_success(code: std::process::ExitCode) -> bool {
    format!("{code:?}") == format!("{:?}", std::process::ExitCode::SUCCESS)
}
