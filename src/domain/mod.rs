//! Core domain types and logic.

pub mod derivation;
pub mod error;
pub mod identifier;
pub mod indicator;
pub mod normalizer;
pub mod ohlcv;
pub mod pipeline;
pub mod run_config;
pub mod scaler;
pub mod ticker;
