//! Rescaling of indicator lines so they compare across tickers and time.
//!
//! Global: one scaler fit over the whole series.
//!
//! Windowed: for window size `w` and length `N`, every index `i` in
//! `w-1..N` is the last point of the trailing window `[i-w+1, i]`; the scaler
//! is fit on that window alone and only the transformed last point is kept,
//! giving `N - w + 1` values that never look ahead. The first `w - 1` slots
//! have no full window and are padded with the mean of the computed values,
//! so the output length is always `N`. The padded prefix is a placeholder,
//! not a local estimate.
//!
//! Every scaled value `v` is stored as `round((v + SCALE_OFFSET) * 100)`,
//! which keeps the column integer and positive for both scalers.

use crate::domain::indicator::round_i64;
use crate::domain::scaler::ScalerKind;
use std::fmt;

pub const SCALE_OFFSET: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationStrategy {
    /// Lines are stored exactly as derived.
    Off,
    Global,
    Windowed { window_size: usize },
}

impl fmt::Display for NormalizationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NormalizationStrategy::Off => write!(f, "off"),
            NormalizationStrategy::Global => write!(f, "global"),
            NormalizationStrategy::Windowed { window_size } => {
                write!(f, "windowed({})", window_size)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizationConfig {
    pub scaler: ScalerKind,
    pub strategy: NormalizationStrategy,
}

impl NormalizationConfig {
    pub fn is_enabled(&self) -> bool {
        self.strategy != NormalizationStrategy::Off
    }
}

fn store_scaled(v: f64) -> i64 {
    round_i64((v + SCALE_OFFSET) * 100.0)
}

pub fn normalize_global(series: &[f64], scaler: ScalerKind) -> Vec<i64> {
    scaler
        .fit_transform(series)
        .into_iter()
        .map(store_scaled)
        .collect()
}

/// Trailing-window normalisation. A series shorter than one window has no
/// full window to fit, so it falls back to a single fit over all of it.
pub fn normalize_windowed(series: &[f64], scaler: ScalerKind, window_size: usize) -> Vec<i64> {
    let n = series.len();
    let w = window_size.max(1);
    if n == 0 {
        return Vec::new();
    }
    if n < w {
        return normalize_global(series, scaler);
    }

    let computed: Vec<i64> = series
        .windows(w)
        .map(|window| {
            let fitted = scaler.fit(window);
            store_scaled(fitted.transform(window[w - 1]))
        })
        .collect();

    let mean = computed.iter().map(|&v| v as f64).sum::<f64>() / computed.len() as f64;
    let pad = round_i64(mean);

    let mut out = Vec::with_capacity(n);
    out.resize(w - 1, pad);
    out.extend(computed);
    out
}

/// Apply the configured strategy to one derived line.
pub fn normalize(values: &[i64], config: &NormalizationConfig) -> Vec<i64> {
    let as_f64 = || values.iter().map(|&v| v as f64).collect::<Vec<f64>>();
    match config.strategy {
        NormalizationStrategy::Off => values.to_vec(),
        NormalizationStrategy::Global => normalize_global(&as_f64(), config.scaler),
        NormalizationStrategy::Windowed { window_size } => {
            normalize_windowed(&as_f64(), config.scaler, window_size)
        }
    }
}
