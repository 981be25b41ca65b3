//! Statistical scalers used by the normalizer.
//!
//! - MinMax maps the fitted data onto [0, 1].
//! - Robust centres on the median and divides by the spread between two
//!   quantiles. The quantile range is (0, 100), so the spread is max - min.
//!
//! A zero spread is replaced by 1 so a flat window never divides by zero.

use std::fmt;
use std::str::FromStr;

pub const ROBUST_QUANTILE_RANGE: (f64, f64) = (0.0, 100.0);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalerKind {
    MinMax,
    Robust,
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
#[error("unknown scaler: {0} (expected MinMaxScaler or RobustScaler)")]
pub struct UnknownScaler(pub String);

impl FromStr for ScalerKind {
    type Err = UnknownScaler;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "minmax" | "minmaxscaler" | "min_max" => Ok(ScalerKind::MinMax),
            "robust" | "robustscaler" => Ok(ScalerKind::Robust),
            _ => Err(UnknownScaler(s.trim().to_string())),
        }
    }
}

impl fmt::Display for ScalerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalerKind::MinMax => write!(f, "MinMaxScaler"),
            ScalerKind::Robust => write!(
                f,
                "RobustScaler(quantile_range=({}, {}))",
                ROBUST_QUANTILE_RANGE.0, ROBUST_QUANTILE_RANGE.1
            ),
        }
    }
}

/// A scaler fitted to one sample: `transform(x) = (x - center) / scale`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FittedScaler {
    pub center: f64,
    pub scale: f64,
}

impl FittedScaler {
    pub fn transform(&self, x: f64) -> f64 {
        (x - self.center) / self.scale
    }
}

impl ScalerKind {
    /// Fit to `data`. An empty sample yields the identity transform.
    pub fn fit(self, data: &[f64]) -> FittedScaler {
        if data.is_empty() {
            return FittedScaler {
                center: 0.0,
                scale: 1.0,
            };
        }

        let (center, spread) = match self {
            ScalerKind::MinMax => {
                let min = data.iter().copied().fold(f64::INFINITY, f64::min);
                let max = data.iter().copied().fold(f64::NEG_INFINITY, f64::max);
                (min, max - min)
            }
            ScalerKind::Robust => {
                let mut sorted = data.to_vec();
                sorted.sort_by(|a, b| a.total_cmp(b));
                let median = quantile(&sorted, 0.5);
                let lo = quantile(&sorted, ROBUST_QUANTILE_RANGE.0 / 100.0);
                let hi = quantile(&sorted, ROBUST_QUANTILE_RANGE.1 / 100.0);
                (median, hi - lo)
            }
        };

        let scale = if spread == 0.0 || !spread.is_finite() {
            1.0
        } else {
            spread
        };
        FittedScaler { center, scale }
    }

    pub fn fit_transform(self, data: &[f64]) -> Vec<f64> {
        let fitted = self.fit(data);
        data.iter().map(|&x| fitted.transform(x)).collect()
    }
}

/// Linear-interpolated quantile of an ascending, non-empty slice; `q` in [0, 1].
fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lower = pos.floor() as usize;
    let upper = pos.ceil() as usize;
    let frac = pos - lower as f64;
    sorted[lower] + (sorted[upper] - sorted[lower]) * frac
}
