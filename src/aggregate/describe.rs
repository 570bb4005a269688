//! Descriptive statistics over numeric columns.

use super::is_numeric;
use crate::{naming, DataFrame, HouselensError, Result};
use polars::prelude::*;

/// One row per numeric column of `df`, in column order, with
/// `attributes, max, min, mean, median, std`.
///
/// `std` is the population standard deviation (ddof = 0). Nulls are skipped.
/// Booleans, strings and dates are not numeric and are left out. A zero-row
/// input (or one with no numeric columns) yields a zero-row result.
pub fn describe(df: &DataFrame) -> Result<DataFrame> {
    let numeric: Vec<&Column> = df
        .get_columns()
        .iter()
        .filter(|c| is_numeric(c.dtype()))
        .collect();

    let rows = if df.height() == 0 { 0 } else { numeric.len() };
    let mut attributes: Vec<String> = Vec::with_capacity(rows);
    let mut max: Vec<Option<f64>> = Vec::with_capacity(rows);
    let mut min: Vec<Option<f64>> = Vec::with_capacity(rows);
    let mut mean: Vec<Option<f64>> = Vec::with_capacity(rows);
    let mut median: Vec<Option<f64>> = Vec::with_capacity(rows);
    let mut std: Vec<Option<f64>> = Vec::with_capacity(rows);

    if df.height() > 0 {
        for column in numeric {
            let series = column
                .as_materialized_series()
                .cast(&DataType::Float64)
                .map_err(|e| {
                    HouselensError::AggregationError(format!(
                        "Failed to cast '{}' for statistics: {}",
                        column.name(),
                        e
                    ))
                })?;
            let ca = series.f64().map_err(|e| {
                HouselensError::InternalError(format!("Column '{}': {}", column.name(), e))
            })?;

            attributes.push(column.name().to_string());
            max.push(ca.max());
            min.push(ca.min());
            mean.push(ca.mean());
            median.push(ca.median());
            std.push(ca.std(0));
        }
    }

    let [c_attr, c_max, c_min, c_mean, c_median, c_std] = naming::DESCRIBE_COLUMNS;
    DataFrame::new(vec![
        Column::new(c_attr.into(), attributes),
        Column::new(c_max.into(), max),
        Column::new(c_min.into(), min),
        Column::new(c_mean.into(), mean),
        Column::new(c_median.into(), median),
        Column::new(c_std.into(), std),
    ])
    .map_err(|e| HouselensError::InternalError(format!("Failed to build statistics: {}", e)))
}
