//! Indicator store port.

use crate::domain::derivation::TickerRow;
use crate::domain::error::IngestError;
use crate::domain::indicator::IndicatorSpec;
use crate::domain::ticker::Ticker;

pub trait StorePort {
    /// Discard any previous store, then create one table per ticker with a
    /// `date` primary key and one integer column per indicator in `spec` order.
    fn create_schema(&self, tickers: &[Ticker], spec: &IndicatorSpec) -> Result<(), IngestError>;

    /// Insert all rows for one ticker in a single transaction; on any failure
    /// nothing is written.
    fn write_rows(&self, ticker: &Ticker, rows: &[TickerRow]) -> Result<usize, IngestError>;

    /// Every row of one ticker's table, ascending by date.
    fn read_rows(&self, ticker: &Ticker) -> Result<Vec<TickerRow>, IngestError>;

    /// Column names of one ticker's table, `date` first.
    fn table_columns(&self, ticker: &Ticker) -> Result<Vec<String>, IngestError>;

    fn list_tables(&self) -> Result<Vec<String>, IngestError>;
}
