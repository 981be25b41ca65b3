//! CWAP: close-weighted average price, (h + l + 2c) / 4, in hundredths.
//!
//! The open is deliberately left out; the close counts twice.

use crate::domain::indicator::{IndicatorKind, IndicatorSeries, cents};
use crate::domain::ohlcv::RawBar;

pub fn cwap_price(bar: &RawBar) -> f64 {
    (bar.high + bar.low + 2.0 * bar.close) / 4.0
}

pub fn cwap(bar: &RawBar) -> i64 {
    cents(cwap_price(bar))
}

pub fn calculate_cwap(bars: &[RawBar]) -> IndicatorSeries {
    IndicatorSeries {
        kind: IndicatorKind::Cwap,
        values: bars.iter().map(cwap).collect(),
    }
}
