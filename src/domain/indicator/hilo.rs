//! HILO: the day's range, high minus low, in hundredths.

use crate::domain::indicator::{IndicatorKind, IndicatorSeries, cents};
use crate::domain::ohlcv::RawBar;

pub fn calculate_hilo(bars: &[RawBar]) -> IndicatorSeries {
    IndicatorSeries {
        kind: IndicatorKind::Hilo,
        values: bars.iter().map(|b| cents(b.high - b.low)).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn hilo_is_never_negative_for_sane_bars() {
        let bars: Vec<RawBar> = [(12.0, 9.0), (13.0, 10.0), (10.0, 10.0)]
            .iter()
            .enumerate()
            .map(|(i, &(high, low))| RawBar {
                date: NaiveDate::from_ymd_opt(2024, 1, (i + 1) as u32).unwrap(),
                open: low,
                high,
                low,
                close: high,
                volume: 1,
            })
            .collect();
        assert_eq!(calculate_hilo(&bars).values, vec![300, 300, 0]);
    }
}
