//! Filter-driven aggregation over the normalized table.
//!
//! Every function here is a pure read over a shared [`Dataset`]: filter rows
//! with a [`FilterRequest`], group by its dimension, sum its measure, then
//! order or rank. An empty selection is a valid, empty result.

use crate::dataset::Dataset;
use crate::error::Result;
use crate::query::{Column, ComparisonWindow, Dimension, FilterRequest, GroupKey, Metric};
use crate::types::TransactionRecord;
use crate::util::round2;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use tracing::debug;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregatePoint {
    pub key: GroupKey,
    pub value: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AggregateResult {
    pub rows: Vec<AggregatePoint>,
    /// Total of the same measure over the prior period, when requested.
    pub prior_value: Option<f64>,
}

impl AggregateResult {
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn total(&self) -> f64 {
        self.rows.iter().map(|p| p.value).sum()
    }

    pub fn value_of(&self, key: &GroupKey) -> Option<f64> {
        self.rows.iter().find(|p| &p.key == key).map(|p| p.value)
    }
}

/// Current and prior-period values of one metric.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Comparison {
    pub current: f64,
    pub prior: f64,
}

pub fn filter<'a>(
    dataset: &'a Dataset,
    request: &'a FilterRequest,
) -> impl Iterator<Item = &'a TransactionRecord> + 'a {
    dataset.records().iter().filter(move |r| request.matches(r))
}

/// Sum the request's measure per value of its dimension, in the dimension's
/// natural order.
pub fn sum_by_dimension(dataset: &Dataset, request: &FilterRequest) -> AggregateResult {
    let rows = grouped(dataset, request, request.dimension)
        .into_iter()
        .map(|(key, value)| AggregatePoint { key, value })
        .collect::<Vec<_>>();
    debug!(
        "sum {} by {} for {}/{:?}: {} groups",
        request.measure,
        request.dimension,
        request.year,
        request.month,
        rows.len()
    );
    AggregateResult {
        rows,
        prior_value: None,
    }
}

/// The `n` groups with the largest sums, ascending by value.
///
/// Groups are sorted ascending with a stable sort and the last `n` are kept,
/// so equal sums stay in natural key order.
pub fn rank(dataset: &Dataset, request: &FilterRequest, n: usize) -> AggregateResult {
    let mut result = sum_by_dimension(dataset, request);
    rank_result(&mut result, n);
    result
}

/// Top products by the request's measure, whatever its dimension says.
pub fn top_products(dataset: &Dataset, request: &FilterRequest, n: usize) -> AggregateResult {
    let request = request.clone().dimension(Dimension::Item);
    rank(dataset, &request, n)
}

fn rank_result(result: &mut AggregateResult, n: usize) {
    result.rows.sort_by(|a, b| a.value.total_cmp(&b.value));
    let skip = result.rows.len().saturating_sub(n);
    result.rows.drain(..skip);
}

/// Dispatch used by widgets: ranked when `top_n` is given, otherwise grouped.
pub fn aggregate(dataset: &Dataset, request: &FilterRequest, top_n: Option<usize>) -> AggregateResult {
    match top_n {
        Some(n) => rank(dataset, request, n),
        None => sum_by_dimension(dataset, request),
    }
}

/// Grouped sums plus the prior period's total of the same measure.
pub fn aggregate_with_prior(
    dataset: &Dataset,
    request: &FilterRequest,
    window: ComparisonWindow,
) -> Result<AggregateResult> {
    let prior = request.prior(window)?;
    let mut result = sum_by_dimension(dataset, request);
    result.prior_value = Some(total(dataset, &prior));
    Ok(result)
}

/// Sum of the measure over the selection; 0 for no rows.
pub fn total(dataset: &Dataset, request: &FilterRequest) -> f64 {
    let measure = request.measure;
    filter(dataset, request).map(|r| measure.value(r)).sum()
}

pub fn distinct_count(dataset: &Dataset, request: &FilterRequest, column: Column) -> usize {
    filter(dataset, request)
        .map(|r| column.value(r))
        .collect::<HashSet<_>>()
        .len()
}

pub fn row_count(dataset: &Dataset, request: &FilterRequest) -> usize {
    filter(dataset, request).count()
}

pub fn scalar(dataset: &Dataset, request: &FilterRequest, metric: Metric) -> f64 {
    match metric {
        Metric::Total(measure) => total(dataset, &request.clone().measure(measure)),
        Metric::Distinct(column) => distinct_count(dataset, request, column) as f64,
        Metric::Rows => row_count(dataset, request) as f64,
    }
}

pub fn compare(
    dataset: &Dataset,
    request: &FilterRequest,
    metric: Metric,
    window: ComparisonWindow,
) -> Result<Comparison> {
    let prior = request.prior(window)?;
    Ok(Comparison {
        current: scalar(dataset, request, metric),
        prior: scalar(dataset, &prior, metric),
    })
}

/// Each group's percentage of the result total, rounded to two decimals.
/// A zero total gives zero shares.
pub fn shares(result: &AggregateResult) -> Vec<(GroupKey, f64)> {
    let total = result.total();
    result
        .rows
        .iter()
        .map(|p| {
            let pct = if total == 0.0 {
                0.0
            } else {
                round2(p.value / total * 100.0)
            };
            (p.key.clone(), pct)
        })
        .collect()
}

fn grouped(dataset: &Dataset, request: &FilterRequest, dimension: Dimension) -> BTreeMap<GroupKey, f64> {
    let mut map: BTreeMap<GroupKey, f64> = BTreeMap::new();
    for r in filter(dataset, request) {
        *map.entry(dimension.key(r)).or_insert(0.0) += request.measure.value(r);
    }
    map
}
