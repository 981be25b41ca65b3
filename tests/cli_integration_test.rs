//! CLI integration tests.
//!
//! Tests cover:
//! - Config loading from real INI files on disk
//! - `validate`, `show` and `tables` dispatch
//! - `fetch` aborting on an unknown provider before any store exists
//! - Exit status of the fetch pipeline with a mock provider

mod common;

use common::*;
use std::path::PathBuf;
use stonkline::adapters::sqlite_store::SqliteStore;
use stonkline::cli::{self, Cli, Command};
use stonkline::ports::provider_port::ProviderPort;
use tempfile::TempDir;

fn ini_file(dir: &TempDir, provider: &str, tickers: &str) -> tempfile::NamedTempFile {
    write_temp_ini(&ini_for(dir.path(), provider, "clop, clv, cwap", tickers, ""))
}

mod config_loading {
    use super::*;

    #[test]
    fn load_config_reads_ini_from_disk() {
        let dir = TempDir::new().unwrap();
        let file = ini_file(&dir, "yfinance", "spy");
        assert!(cli::load_config(&PathBuf::from(file.path())).is_ok());
    }

    #[test]
    fn load_config_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/path/config.ini");
        assert!(cli::load_config(&path).is_err());
    }
}

mod commands {
    use super::*;

    #[test]
    fn validate_accepts_good_config() {
        let dir = TempDir::new().unwrap();
        let file = ini_file(&dir, "yfinance", "spy, qqq");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: file.path().to_path_buf(),
            },
        });
        assert!(is_success(code));
    }

    #[test]
    fn validate_rejects_unknown_provider() {
        let dir = TempDir::new().unwrap();
        let file = ini_file(&dir, "bogus", "spy");
        let code = cli::run(Cli {
            command: Command::Validate {
                config: file.path().to_path_buf(),
            },
        });
        assert!(!is_success(code));
    }

    #[test]
    fn fetch_with_unknown_provider_creates_no_store() {
        let dir = TempDir::new().unwrap();
        let file = ini_file(&dir, "bogus", "spy");
        let code = cli::run(Cli {
            command: Command::Fetch {
                config: file.path().to_path_buf(),
                debug: false,
                tickers: vec![],
            },
        });
        assert!(!is_success(code));
        assert!(!dir.path().join("data").join("test.db").exists());
    }

    #[test]
    fn fetch_with_invalid_cli_ticker_creates_no_store() {
        let dir = TempDir::new().unwrap();
        let file = ini_file(&dir, "yfinance", "spy");
        let code = cli::run(Cli {
            command: Command::Fetch {
                config: file.path().to_path_buf(),
                debug: false,
                tickers: vec!["BRK.B".to_string()],
            },
        });
        assert!(!is_success(code));
        assert!(!dir.path().join("data").join("test.db").exists());
    }

    #[test]
    fn show_and_tables_read_a_built_store() {
        let dir = TempDir::new().unwrap();
        let file = ini_file(&dir, "yfinance", "spy");
        let config = run_config(dir.path(), "clop, clv, cwap", "spy", "");
        let provider = MockProvider::new().with_bars("SPY", generate_bars("2024-01-01", 3, 10.0));
        let store = SqliteStore::new(&config.store_path);
        assert!(is_success(cli::run_fetch_pipeline(
            &provider,
            &store,
            &config,
            date(2024, 2, 1)
        )));

        let show = cli::run(Cli {
            command: Command::Show {
                config: file.path().to_path_buf(),
                ticker: "spy".to_string(),
            },
        });
        assert!(is_success(show));

        let tables = cli::run(Cli {
            command: Command::Tables {
                config: file.path().to_path_buf(),
            },
        });
        assert!(is_success(tables));
    }

    #[test]
    fn show_unknown_table_fails() {
        let dir = TempDir::new().unwrap();
        let file = ini_file(&dir, "yfinance", "spy");
        let config = run_config(dir.path(), "clop", "spy", "");
        let store = SqliteStore::new(&config.store_path);
        cli::run_fetch_pipeline(&MockProvider::new(), &store, &config, date(2024, 2, 1));

        let code = cli::run(Cli {
            command: Command::Show {
                config: file.path().to_path_buf(),
                ticker: "QQQ".to_string(),
            },
        });
        assert!(!is_success(code));
    }

    #[test]
    fn tables_without_store_fails() {
        let dir = TempDir::new().unwrap();
        let file = ini_file(&dir, "yfinance", "spy");
        let code = cli::run(Cli {
            command: Command::Tables {
                config: file.path().to_path_buf(),
            },
        });
        assert!(!is_success(code));
    }
}

mod fetch_pipeline {
    use super::*;

    #[test]
    fn partial_success_exits_zero() {
        let dir = TempDir::new().unwrap();
        let config = run_config(dir.path(), "clop", "aapl, msft", "");
        let provider = MockProvider::new()
            .with_bars("AAPL", generate_bars("2024-01-01", 3, 10.0))
            .with_error("MSFT", "timeout");
        let store = SqliteStore::new(&config.store_path);

        let code = cli::run_fetch_pipeline(&provider, &store, &config, date(2024, 2, 1));
        assert!(is_success(code));
    }

    #[test]
    fn every_ticker_failing_exits_non_zero() {
        let dir = TempDir::new().unwrap();
        let config = run_config(dir.path(), "clop", "aapl, msft", "");
        let provider = MockProvider::new()
            .with_error("AAPL", "timeout")
            .with_error("MSFT", "timeout");
        let store = SqliteStore::new(&config.store_path);

        let code = cli::run_fetch_pipeline(&provider, &store, &config, date(2024, 2, 1));
        assert!(!is_success(code));
        // the schema still exists, with empty tables
        assert!(config.store_path.exists());
    }

    #[test]
    fn mock_provider_reports_its_name() {
        assert_eq!(MockProvider::new().name(), "mock");
    }
}
