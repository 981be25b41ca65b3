//! MASS: price times shares traded.
//!
//! MASS[i] = CWAP[i] * VOLUME[i], where each factor is whatever the
//! derivation engine produced for that line (raw or scaled).

use crate::domain::indicator::{IndicatorKind, IndicatorSeries};

pub fn calculate_mass(cwap: &[i64], volume: &[i64]) -> IndicatorSeries {
    debug_assert_eq!(cwap.len(), volume.len());
    IndicatorSeries {
        kind: IndicatorKind::Mass,
        values: cwap
            .iter()
            .zip(volume)
            .map(|(&c, &v)| c.saturating_mul(v))
            .collect(),
    }
}
