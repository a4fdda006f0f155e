//! Aggregation core of the Iowa liquor sales dashboard.
//!
//! The CSV is loaded and cleaned once into an immutable [`Dataset`]. Widgets
//! describe what they need as a [`FilterRequest`] and get plain numbers or an
//! [`AggregateResult`] back; rendering is left to the caller.

pub mod args;
pub mod dataset;
pub mod delta;
pub mod engine;
mod error;
pub mod loader;
pub mod output;
pub mod query;
pub mod reports;
pub mod types;
pub mod util;

#[cfg(test)]
mod test;

pub use dataset::Dataset;
pub use delta::{format_delta, Delta};
pub use engine::{AggregatePoint, AggregateResult};
pub use error::{DashboardError, Result};
pub use query::{ComparisonWindow, Dimension, FilterRequest, Measure, Metric, PeriodMode};
