//! CLV (Close Location Value): where the close sits inside the day's range.
//!
//! CLV = ((2c - l - h) / (h - l)) * 100, in [-100, 100].
//!
//! A flat bar (h == l) has no range. The day keeps its slot and is written as
//! [`CLV_FLAT_SENTINEL`]; with h == l the close equals both, so 0 ("close at
//! the centre") is also the limiting value of the formula.

use crate::domain::indicator::{IndicatorKind, IndicatorSeries, round_i64};
use crate::domain::ohlcv::RawBar;
use tracing::warn;

pub const CLV_FLAT_SENTINEL: i64 = 0;

/// `None` when the bar has no range.
pub fn clv(bar: &RawBar) -> Option<i64> {
    let range = bar.high - bar.low;
    if range == 0.0 {
        return None;
    }
    Some(round_i64(
        ((2.0 * bar.close - bar.low - bar.high) / range) * 100.0,
    ))
}

pub fn calculate_clv(bars: &[RawBar]) -> IndicatorSeries {
    let values = bars
        .iter()
        .map(|bar| {
            clv(bar).unwrap_or_else(|| {
                warn!(date = %bar.date, "high == low, clv written as {CLV_FLAT_SENTINEL}");
                CLV_FLAT_SENTINEL
            })
        })
        .collect();

    IndicatorSeries {
        kind: IndicatorKind::Clv,
        values,
    }
}
