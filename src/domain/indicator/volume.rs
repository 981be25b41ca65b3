//! Traded share count, unscaled. Normalisation, when configured, is applied
//! afterwards by the derivation engine.

use crate::domain::indicator::{IndicatorKind, IndicatorSeries};
use crate::domain::ohlcv::RawBar;

pub fn calculate_volume(bars: &[RawBar]) -> IndicatorSeries {
    IndicatorSeries {
        kind: IndicatorKind::Volume,
        values: bars.iter().map(|b| b.volume).collect(),
    }
}
