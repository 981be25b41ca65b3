//! CLOP: close minus open, in hundredths.

use crate::domain::indicator::{IndicatorKind, IndicatorSeries, cents};
use crate::domain::ohlcv::RawBar;

pub fn clop(bar: &RawBar) -> i64 {
    cents(bar.close - bar.open)
}

pub fn calculate_clop(bars: &[RawBar]) -> IndicatorSeries {
    IndicatorSeries {
        kind: IndicatorKind::Clop,
        values: bars.iter().map(clop).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn make_bar(day: u32, open: f64, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::from_ymd_opt(2024, 1, day).unwrap(),
            open,
            high: open.max(close),
            low: open.min(close),
            close,
            volume: 1000,
        }
    }

    #[test]
    fn clop_up_and_down_days() {
        let bars = vec![make_bar(1, 10.0, 11.0), make_bar(2, 12.5, 12.0)];
        let series = calculate_clop(&bars);
        assert_eq!(series.values, vec![100, -50]);
        assert_eq!(series.kind, IndicatorKind::Clop);
    }

    #[test]
    fn clop_rounds_sub_cent_moves() {
        // 0.004 * 100 = 0.4 -> 0
        assert_eq!(clop(&make_bar(1, 10.0, 10.004)), 0);
        assert_eq!(clop(&make_bar(1, 10.0, 10.016)), 2);
    }
}
