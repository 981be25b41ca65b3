//! Indicator Derivation Engine.
//!
//! Turns one ticker's bars into one integer line per configured indicator
//! kind, in `IndicatorSpec` order, optionally normalised. Every line has
//! exactly one value per bar.

use crate::domain::indicator::clop::calculate_clop;
use crate::domain::indicator::clv::calculate_clv;
use crate::domain::indicator::cwap::calculate_cwap;
use crate::domain::indicator::hilo::calculate_hilo;
use crate::domain::indicator::mass::calculate_mass;
use crate::domain::indicator::volume::calculate_volume;
use crate::domain::indicator::{IndicatorKind, IndicatorSeries, IndicatorSpec};
use crate::domain::normalizer::{NormalizationConfig, normalize};
use crate::domain::ohlcv::RawBar;
use std::collections::HashMap;

/// Which lines get normalised, and how.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizationPlan {
    pub config: NormalizationConfig,
    pub lines: Vec<IndicatorKind>,
}

impl NormalizationPlan {
    pub fn applies_to(&self, kind: IndicatorKind) -> bool {
        self.config.is_enabled() && self.lines.contains(&kind)
    }
}

/// One persisted row: epoch-second date then one value per indicator column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TickerRow {
    pub date: i64,
    pub values: Vec<i64>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct DerivedTable {
    pub dates: Vec<i64>,
    pub columns: Vec<IndicatorSeries>,
}

impl DerivedTable {
    pub fn len(&self) -> usize {
        self.dates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn rows(&self) -> Vec<TickerRow> {
        self.dates
            .iter()
            .enumerate()
            .map(|(i, &date)| TickerRow {
                date,
                values: self.columns.iter().map(|c| c.values[i]).collect(),
            })
            .collect()
    }
}

struct Deriver<'a> {
    bars: &'a [RawBar],
    plan: &'a NormalizationPlan,
    cache: HashMap<IndicatorKind, Vec<i64>>,
}

impl Deriver<'_> {
    fn line(&mut self, kind: IndicatorKind) -> Vec<i64> {
        if let Some(values) = self.cache.get(&kind) {
            return values.clone();
        }

        let raw = match kind {
            IndicatorKind::Clop => calculate_clop(self.bars).values,
            IndicatorKind::Clv => calculate_clv(self.bars).values,
            IndicatorKind::Cwap => calculate_cwap(self.bars).values,
            IndicatorKind::Hilo => calculate_hilo(self.bars).values,
            IndicatorKind::Volume => calculate_volume(self.bars).values,
            IndicatorKind::Mass => {
                let cwap = self.line(IndicatorKind::Cwap);
                let volume = self.line(IndicatorKind::Volume);
                calculate_mass(&cwap, &volume).values
            }
        };

        let values = if self.plan.applies_to(kind) {
            normalize(&raw, &self.plan.config)
        } else {
            raw
        };
        self.cache.insert(kind, values.clone());
        values
    }
}

/// Derive every line named in `spec` from `bars`, which must already be
/// sorted and deduplicated (see [`crate::domain::ohlcv::sanitize_bars`]).
pub fn derive(bars: &[RawBar], spec: &IndicatorSpec, plan: &NormalizationPlan) -> DerivedTable {
    let mut deriver = Deriver {
        bars,
        plan,
        cache: HashMap::new(),
    };

    let columns: Vec<IndicatorSeries> = spec
        .kinds()
        .iter()
        .map(|&kind| IndicatorSeries {
            kind,
            values: deriver.line(kind),
        })
        .collect();

    debug_assert!(columns.iter().all(|c| c.len() == bars.len()));

    DerivedTable {
        dates: bars.iter().map(RawBar::epoch_seconds).collect(),
        columns,
    }
}
