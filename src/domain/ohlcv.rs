//! OHLCV bar representation.

use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;

/// Bar period requested from a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frequency {
    Daily,
    Weekly,
}

impl FromStr for Frequency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "daily" => Ok(Frequency::Daily),
            "weekly" => Ok(Frequency::Weekly),
            other => Err(format!("unknown frequency {other:?} (expected daily or weekly)")),
        }
    }
}

impl fmt::Display for Frequency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Frequency::Daily => write!(f, "daily"),
            Frequency::Weekly => write!(f, "weekly"),
        }
    }
}

/// One trading period for one ticker, as normalised by a provider adapter.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBar {
    pub date: NaiveDate,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: i64,
}

impl RawBar {
    /// Seconds since the Unix epoch at 00:00 UTC of the bar date.
    pub fn epoch_seconds(&self) -> i64 {
        self.date
            .and_hms_opt(0, 0, 0)
            .map(|dt| dt.and_utc().timestamp())
            .unwrap_or_default()
    }

    /// Finite prices, non-negative volume and high >= low.
    pub fn is_well_formed(&self) -> bool {
        let prices = [self.open, self.high, self.low, self.close];
        prices.iter().all(|p| p.is_finite()) && self.high >= self.low && self.volume >= 0
    }
}

/// Sort ascending by date, keep the last bar seen for a repeated date and
/// drop malformed bars. Returns the cleaned bars and the number dropped.
pub fn sanitize_bars(bars: Vec<RawBar>) -> (Vec<RawBar>, usize) {
    let total = bars.len();
    let mut kept: Vec<RawBar> = bars.into_iter().filter(RawBar::is_well_formed).collect();

    // stable sort keeps provider order among equal dates, so the later one wins below
    kept.sort_by_key(|b| b.date);

    let mut out: Vec<RawBar> = Vec::with_capacity(kept.len());
    for bar in kept {
        match out.last_mut() {
            Some(last) if last.date == bar.date => *last = bar,
            _ => out.push(bar),
        }
    }

    let dropped = total - out.len();
    (out, dropped)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bar(date: &str, open: f64, high: f64, low: f64, close: f64) -> RawBar {
        RawBar {
            date: NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            open,
            high,
            low,
            close,
            volume: 1_000,
        }
    }

    #[test]
    fn frequency_parses() {
        assert_eq!("Weekly".parse::<Frequency>(), Ok(Frequency::Weekly));
        assert!("hourly".parse::<Frequency>().is_err());
    }

    #[test]
    fn epoch_seconds_is_utc_midnight() {
        let b = bar("2024-01-02", 1.0, 1.0, 1.0, 1.0);
        assert_eq!(b.epoch_seconds(), 1_704_153_600);
    }

    #[test]
    fn well_formed_rejects_inverted_range() {
        assert!(bar("2024-01-02", 10.0, 12.0, 9.0, 11.0).is_well_formed());
        assert!(!bar("2024-01-02", 10.0, 9.0, 12.0, 11.0).is_well_formed());
        assert!(!bar("2024-01-02", f64::NAN, 12.0, 9.0, 11.0).is_well_formed());
    }

    #[test]
    fn sanitize_sorts_and_dedupes() {
        let bars = vec![
            bar("2024-01-03", 1.0, 2.0, 1.0, 1.5),
            bar("2024-01-02", 1.0, 2.0, 1.0, 1.5),
            bar("2024-01-03", 5.0, 6.0, 4.0, 5.5),
        ];
        let (clean, dropped) = sanitize_bars(bars);
        assert_eq!(dropped, 1);
        assert_eq!(clean.len(), 2);
        assert!(clean[0].date < clean[1].date);
        // later duplicate wins
        assert_eq!(clean[1].open, 5.0);
    }

    #[test]
    fn sanitize_drops_malformed() {
        let bars = vec![
            bar("2024-01-02", 1.0, 2.0, 1.0, 1.5),
            bar("2024-01-03", 1.0, f64::INFINITY, 1.0, 1.5),
        ];
        let (clean, dropped) = sanitize_bars(bars);
        assert_eq!(clean.len(), 1);
        assert_eq!(dropped, 1);
    }
}
