//! Ticker symbols and ticker-list parsing.

use crate::domain::identifier::Identifier;
use std::collections::HashSet;
use std::fmt;

/// An upper-cased symbol that is also a valid table identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Ticker(Identifier);

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TickerError {
    #[error("empty token in ticker list")]
    EmptyToken,

    #[error("duplicate ticker: {0}")]
    Duplicate(String),

    #[error("invalid ticker {0:?}: only letters, digits and '_' are allowed")]
    Invalid(String),
}

impl Ticker {
    pub fn parse(raw: &str) -> Result<Self, TickerError> {
        let symbol = raw.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(TickerError::EmptyToken);
        }
        let ident = Identifier::new(&symbol).map_err(|_| TickerError::Invalid(symbol.clone()))?;
        Ok(Self(ident))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    pub fn table_name(&self) -> &Identifier {
        &self.0
    }
}

impl fmt::Display for Ticker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

/// Parse a comma or whitespace separated ticker list, preserving order.
pub fn parse_tickers(input: &str) -> Result<Vec<Ticker>, TickerError> {
    let tokens: Vec<&str> = if input.contains(',') {
        input.split(',').collect()
    } else {
        input.split_whitespace().collect()
    };
    parse_ticker_tokens(tokens)
}

pub fn parse_ticker_tokens<'a, I>(tokens: I) -> Result<Vec<Ticker>, TickerError>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut tickers = Vec::new();
    let mut seen = HashSet::new();

    for token in tokens {
        let ticker = Ticker::parse(token)?;
        if !seen.insert(ticker.clone()) {
            return Err(TickerError::Duplicate(ticker.as_str().to_string()));
        }
        tickers.push(ticker);
    }

    Ok(tickers)
}
