//! Concrete adapter implementations for ports.

pub mod alphavantage;
pub mod file_config_adapter;
pub mod http;
pub mod provider;
pub mod sqlite_store;
pub mod tiingo;
pub mod yahoo;
