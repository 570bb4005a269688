//! Derived attributes computed once after load.

use crate::{naming, HouselensError, Result};
use polars::prelude::*;

/// Return a copy of `df` with a `price_per_area` column (`price / sqft_lot`).
///
/// Rows whose lot area is null, zero or negative get a null value rather than
/// an infinite one, so downstream means and medians skip them. An existing
/// `price_per_area` column is replaced. The input frame is left untouched.
///
/// # Errors
///
/// Returns `HouselensError::ValidationError` if `price` or `sqft_lot` is missing.
pub fn with_price_per_area(df: &DataFrame) -> Result<DataFrame> {
    for required in [naming::PRICE, naming::SQFT_LOT] {
        if df.column(required).is_err() {
            return Err(HouselensError::ValidationError(format!(
                "Cannot derive {}: column '{}' not found",
                naming::PRICE_PER_AREA,
                required
            )));
        }
    }

    let lot_area = col(naming::SQFT_LOT).cast(DataType::Float64);
    let price = col(naming::PRICE).cast(DataType::Float64);

    let derived = when(lot_area.clone().gt(lit(0.0)))
        .then(price / lot_area)
        .otherwise(lit(NULL).cast(DataType::Float64))
        .alias(naming::PRICE_PER_AREA);

    df.clone()
        .lazy()
        .with_column(derived)
        .collect()
        .map_err(|e| {
            HouselensError::InternalError(format!(
                "Failed to derive {}: {}",
                naming::PRICE_PER_AREA,
                e
            ))
        })
}
