//! Market-data provider port.

use crate::domain::error::IngestError;
use crate::domain::ohlcv::{Frequency, RawBar};
use chrono::NaiveDate;

pub trait ProviderPort {
    /// Short provider name for logs.
    fn name(&self) -> &str;

    /// Fetch bars for one ticker, sorted ascending and unique by date.
    fn fetch_bars(
        &self,
        ticker: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
        frequency: Frequency,
    ) -> Result<Vec<RawBar>, IngestError>;
}
