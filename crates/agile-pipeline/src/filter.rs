//! Filter & view engine over the post-inference table.
//!
//! Filters are conjunctive and order-insensitive (set-intersection
//! semantics): a row survives only if its predicted productivity falls in
//! the requested range AND its domain AND its sprint are both in the
//! allowed sets. Empty allowed sets simply produce an empty result.
//!
//! For charting, oversized results are down-sampled deterministically to a
//! fixed row cap. The reported `total_matching` count always reflects the
//! *unsampled* filtered size — the cap exists purely so charts stay
//! readable, not to change what the user is told.

use crate::config::EstimatorConfig;
use crate::error::{EstimatorError, Result};
use crate::schema;
use once_cell::sync::Lazy;
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use regex::Regex;
use std::collections::BTreeSet;
use tracing::debug;

static SPRINT_ORDINAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\d+)").expect("literal regex compiles"));

/// Extract the numeric ordinal embedded in a sprint identifier
/// (e.g. `"Sprint_07"` -> `Some(7)`).
pub fn sprint_ordinal(sprint_id: &str) -> Option<u32> {
    SPRINT_ORDINAL
        .captures(sprint_id)?
        .get(1)?
        .as_str()
        .parse()
        .ok()
}

/// User-selected filters over the predicted table.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterSpec {
    /// Inclusive `[lo, hi]` range over `produtividade_prevista`.
    pub prediction_range: (f64, f64),
    /// Allowed `tipo_dominio` values. An empty set matches nothing.
    pub domains: BTreeSet<String>,
    /// Allowed `sprint_id` values. An empty set matches nothing.
    pub sprints: BTreeSet<String>,
}

impl FilterSpec {
    /// A specification that matches every row of `df`: the full prediction
    /// range, every domain, every sprint. This mirrors the view's default
    /// state before the user narrows anything.
    pub fn matching_all(df: &DataFrame) -> Result<Self> {
        let predictions = require_f64(df, schema::PRODUTIVIDADE_PREVISTA)?;
        let mut lo = f64::INFINITY;
        let mut hi = f64::NEG_INFINITY;
        for value in predictions.f64()?.into_iter().flatten() {
            lo = lo.min(value);
            hi = hi.max(value);
        }
        if lo > hi {
            // Empty table: any range works, the sets are empty anyway.
            (lo, hi) = (0.0, 0.0);
        }

        Ok(Self {
            prediction_range: (lo, hi),
            domains: collect_unique(df, schema::TIPO_DOMINIO)?,
            sprints: collect_unique(df, schema::SPRINT_ID)?,
        })
    }

    /// Replace the prediction range.
    pub fn with_range(mut self, lo: f64, hi: f64) -> Self {
        self.prediction_range = (lo, hi);
        self
    }

    /// Replace the allowed domain set.
    pub fn with_domains(mut self, domains: impl IntoIterator<Item = String>) -> Self {
        self.domains = domains.into_iter().collect();
        self
    }

    /// Replace the allowed sprint set.
    pub fn with_sprints(mut self, sprints: impl IntoIterator<Item = String>) -> Self {
        self.sprints = sprints.into_iter().collect();
        self
    }
}

/// The filtered result handed to chart rendering.
#[derive(Debug, Clone)]
pub struct FilteredView {
    /// Every row satisfying the specification.
    pub rows: DataFrame,
    /// Unsampled filtered row count. This is the number to display — it is
    /// never reduced by chart down-sampling.
    pub total_matching: usize,
    /// At most the configured row cap of rows for charting, sampled
    /// deterministically when `rows` is larger, with a `sprint_num` helper
    /// column appended and rows sorted chronologically by it.
    pub chart_sample: DataFrame,
}

/// Applies [`FilterSpec`]s over predicted tables.
#[derive(Debug, Clone)]
pub struct FilterEngine {
    row_cap: usize,
    sample_seed: u64,
}

impl FilterEngine {
    /// Build an engine from the process configuration.
    pub fn new(config: &EstimatorConfig) -> Self {
        Self {
            row_cap: config.chart_row_cap,
            sample_seed: config.chart_sample_seed,
        }
    }

    /// Apply `spec` to `df` and produce the filtered view.
    ///
    /// # Errors
    ///
    /// [`EstimatorError::MissingColumn`] if `df` lacks the prediction,
    /// domain, or sprint column — filtering only makes sense after
    /// inference has run.
    pub fn apply(&self, df: &DataFrame, spec: &FilterSpec) -> Result<FilteredView> {
        let predictions = require_f64(df, schema::PRODUTIVIDADE_PREVISTA)?;
        let predictions = predictions.f64()?;
        let domains = require_str(df, schema::TIPO_DOMINIO)?;
        let domains = domains.str()?;
        let sprints = require_str(df, schema::SPRINT_ID)?;
        let sprints = sprints.str()?;

        let (lo, hi) = spec.prediction_range;
        let mut keep: Vec<bool> = Vec::with_capacity(df.height());
        for row in 0..df.height() {
            let in_range = predictions
                .get(row)
                .map(|v| v >= lo && v <= hi)
                .unwrap_or(false);
            let in_domains = domains
                .get(row)
                .map(|d| spec.domains.contains(d))
                .unwrap_or(false);
            let in_sprints = sprints
                .get(row)
                .map(|s| spec.sprints.contains(s))
                .unwrap_or(false);
            keep.push(in_range && in_domains && in_sprints);
        }

        let mask = BooleanChunked::from_slice("keep".into(), &keep);
        let rows = df.filter(&mask)?;
        let total_matching = rows.height();
        debug!(
            "Filter matched {} of {} rows",
            total_matching,
            df.height()
        );

        let sample = if total_matching > self.row_cap {
            self.sample_rows(&rows)?
        } else {
            rows.clone()
        };
        let chart_sample = order_for_charts(&sample)?;

        Ok(FilteredView {
            rows,
            total_matching,
            chart_sample,
        })
    }

    /// Take a seeded random sample of exactly `row_cap` rows.
    fn sample_rows(&self, rows: &DataFrame) -> Result<DataFrame> {
        let mut rng = StdRng::seed_from_u64(self.sample_seed);
        let picked = rand::seq::index::sample(&mut rng, rows.height(), self.row_cap);

        let indices: Vec<IdxSize> = picked.iter().map(|i| i as IdxSize).collect();
        let indices = IdxCa::from_vec("idx".into(), indices);
        Ok(rows.take(&indices)?)
    }
}

/// Append the `sprint_num` helper column and sort chronologically by it.
///
/// Identifiers without a numeric ordinal sort last.
fn order_for_charts(df: &DataFrame) -> Result<DataFrame> {
    let sprints = require_str(df, schema::SPRINT_ID)?;
    let sprints = sprints.str()?;

    let ordinals: Vec<u32> = sprints
        .into_iter()
        .map(|id| id.and_then(sprint_ordinal).unwrap_or(u32::MAX))
        .collect();

    let mut out = df.clone();
    out.with_column(UInt32Chunked::from_vec(schema::SPRINT_NUM.into(), ordinals).into_series())?;
    Ok(out.sort([schema::SPRINT_NUM], SortMultipleOptions::default())?)
}

fn require_f64(df: &DataFrame, name: &str) -> Result<Series> {
    let column = df
        .column(name)
        .map_err(|_| EstimatorError::MissingColumn(name.to_string()))?;
    Ok(column.as_materialized_series().cast(&DataType::Float64)?)
}

fn require_str(df: &DataFrame, name: &str) -> Result<Series> {
    let column = df
        .column(name)
        .map_err(|_| EstimatorError::MissingColumn(name.to_string()))?;
    Ok(column.as_materialized_series().clone())
}

fn collect_unique(df: &DataFrame, name: &str) -> Result<BTreeSet<String>> {
    let series = require_str(df, name)?;
    let values = series.str()?;
    Ok(values
        .into_iter()
        .flatten()
        .map(|s| s.to_string())
        .collect())
}
