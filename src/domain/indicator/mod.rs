//! Per-day indicator lines derived from raw bars.
//!
//! This module provides the closed set of indicator kinds and the types that
//! carry them through the pipeline:
//! - `IndicatorKind`: one named line (`clop`, `clv`, `cwap`, `hilo`, `volume`, `mass`)
//! - `IndicatorSpec`: the configured, ordered list of kinds; fixes column order
//! - `IndicatorSeries`: one integer value per bar for one kind

pub mod clop;
pub mod clv;
pub mod cwap;
pub mod hilo;
pub mod mass;
pub mod volume;

use crate::domain::error::IngestError;
use crate::domain::identifier::Identifier;
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IndicatorKind {
    Clop,
    Clv,
    Cwap,
    Hilo,
    Volume,
    Mass,
}

impl IndicatorKind {
    pub const ALL: [IndicatorKind; 6] = [
        IndicatorKind::Clop,
        IndicatorKind::Clv,
        IndicatorKind::Cwap,
        IndicatorKind::Hilo,
        IndicatorKind::Volume,
        IndicatorKind::Mass,
    ];

    pub fn name(self) -> &'static str {
        match self {
            IndicatorKind::Clop => "clop",
            IndicatorKind::Clv => "clv",
            IndicatorKind::Cwap => "cwap",
            IndicatorKind::Hilo => "hilo",
            IndicatorKind::Volume => "volume",
            IndicatorKind::Mass => "mass",
        }
    }

    pub fn column_name(self) -> Result<Identifier, IngestError> {
        Identifier::new(self.name())
    }
}

impl fmt::Display for IndicatorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum IndicatorSpecError {
    #[error("unknown indicator kind: {0}")]
    UnknownKind(String),

    #[error("duplicate indicator kind: {0}")]
    Duplicate(String),

    #[error("indicator list is empty")]
    Empty,
}

impl FromStr for IndicatorKind {
    type Err = IndicatorSpecError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lowered = s.trim().to_lowercase();
        IndicatorKind::ALL
            .into_iter()
            .find(|k| k.name() == lowered)
            .ok_or_else(|| IndicatorSpecError::UnknownKind(s.trim().to_string()))
    }
}

/// Ordered, duplicate-free list of indicator kinds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndicatorSpec(Vec<IndicatorKind>);

impl IndicatorSpec {
    pub fn new(kinds: Vec<IndicatorKind>) -> Result<Self, IndicatorSpecError> {
        if kinds.is_empty() {
            return Err(IndicatorSpecError::Empty);
        }
        let mut seen = HashSet::new();
        for kind in &kinds {
            if !seen.insert(*kind) {
                return Err(IndicatorSpecError::Duplicate(kind.to_string()));
            }
        }
        Ok(Self(kinds))
    }

    /// Parse `clop, clv, volume` (commas or whitespace).
    pub fn parse(input: &str) -> Result<Self, IndicatorSpecError> {
        let kinds = input
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|t| !t.is_empty())
            .map(IndicatorKind::from_str)
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(kinds)
    }

    pub fn kinds(&self) -> &[IndicatorKind] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for IndicatorSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let names: Vec<&str> = self.0.iter().map(|k| k.name()).collect();
        f.write_str(&names.join(", "))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct IndicatorSeries {
    pub kind: IndicatorKind,
    pub values: Vec<i64>,
}

impl IndicatorSeries {
    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Round half to even, the way the stored lines have always been rounded.
pub fn round_i64(x: f64) -> i64 {
    x.round_ties_even() as i64
}

/// Price magnitude in hundredths.
pub fn cents(x: f64) -> i64 {
    round_i64(x * 100.0)
}
