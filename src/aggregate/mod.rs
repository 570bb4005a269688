//! Aggregation engine
//!
//! Three aggregation modes feed the report pages:
//!
//! - [`GroupAggregate`] - per-group count/mean, one metric at a time, joined
//!   on the group key with inner semantics
//! - [`describe`] - per-column max/min/mean/median/std over numeric columns
//! - [`histogram_bins`] - equal-width bin counts for histogram charts
//!
//! Every mode accepts a zero-row table and returns a zero-row result with the
//! same output schema it would produce for non-empty input.

mod describe;
mod group;
mod histogram;

pub use describe::describe;
pub use group::{group_aggregate, join_on_key, GroupAggregate, Metric, Reducer};
pub use histogram::histogram_bins;

use crate::{DataFrame, HouselensError, Result};
use polars::prelude::*;

/// Is `dtype` one of the integer or floating point types.
pub fn is_numeric(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

/// Column `name` cast to `Float64`.
pub(crate) fn float_column(df: &DataFrame, name: &str) -> Result<Float64Chunked> {
    let column = df.column(name).map_err(|_| {
        HouselensError::ValidationError(format!("Column '{}' not found", name))
    })?;
    let series = column
        .as_materialized_series()
        .cast(&DataType::Float64)
        .map_err(|e| {
            HouselensError::AggregationError(format!(
                "Column '{}' is not numeric: {}",
                name, e
            ))
        })?;
    series
        .f64()
        .cloned()
        .map_err(|e| HouselensError::InternalError(format!("Column '{}': {}", name, e)))
}
