//! Value domains that page filters are chosen from.

use crate::aggregate::float_column;
use crate::reader::sales::date_from_epoch_days;
use crate::{naming, DataFrame, HouselensError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;

/// Price slider domain.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
    pub mean: f64,
}

/// Domains of every filter the four pages accept.
///
/// Ranges are `None` and value lists are empty when the table has no rows
/// (or no non-null values in that column).
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilterOptions {
    /// Column names, in table order.
    pub columns: Vec<String>,
    /// Distinct zip codes, sorted.
    pub zipcodes: Vec<String>,
    /// `(min, max)` year built.
    pub year_built: Option<(i64, i64)>,
    /// `(min, max)` sale date.
    pub date: Option<(NaiveDate, NaiveDate)>,
    pub price: Option<PriceRange>,
    /// Distinct bedroom counts, ascending.
    pub bedrooms: Vec<f64>,
    /// Distinct bathroom counts, ascending.
    pub bathrooms: Vec<f64>,
    /// Distinct floor counts, ascending.
    pub floors: Vec<f64>,
}

impl FilterOptions {
    pub fn from_table(df: &DataFrame) -> Result<Self> {
        let columns = df.get_column_names().iter().map(|s| s.to_string()).collect();

        let year_built = {
            let ca = float_column(df, naming::YR_BUILT)?;
            ca.min()
                .zip(ca.max())
                .map(|(min, max)| (min as i64, max as i64))
        };

        let price = {
            let ca = float_column(df, naming::PRICE)?;
            match (ca.min(), ca.max(), ca.mean()) {
                (Some(min), Some(max), Some(mean)) => Some(PriceRange { min, max, mean }),
                _ => None,
            }
        };

        Ok(Self {
            columns,
            zipcodes: distinct_zipcodes(df)?,
            year_built,
            date: date_range(df)?,
            price,
            bedrooms: distinct_sorted(df, naming::BEDROOMS)?,
            bathrooms: distinct_sorted(df, naming::BATHROOMS)?,
            floors: distinct_sorted(df, naming::FLOORS)?,
        })
    }
}

fn distinct_sorted(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let ca = float_column(df, name)?;
    let mut values: Vec<f64> = ca.into_iter().flatten().filter(|v| !v.is_nan()).collect();
    values.sort_by(f64::total_cmp);
    values.dedup();
    Ok(values)
}

fn distinct_zipcodes(df: &DataFrame) -> Result<Vec<String>> {
    let column = df.column(naming::ZIPCODE).map_err(|e| {
        HouselensError::ValidationError(format!("Column '{}': {}", naming::ZIPCODE, e))
    })?;
    let as_text = column
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(|e| HouselensError::InternalError(format!("Invalid zipcode column: {}", e)))?;
    let ca = as_text
        .str()
        .map_err(|e| HouselensError::InternalError(format!("Invalid zipcode column: {}", e)))?;

    let mut zips: Vec<String> = ca.into_iter().flatten().filter_map(naming::zip_key).collect();
    zips.sort_unstable();
    zips.dedup();
    Ok(zips)
}

fn date_range(df: &DataFrame) -> Result<Option<(NaiveDate, NaiveDate)>> {
    let column = df.column(naming::DATE).map_err(|e| {
        HouselensError::ValidationError(format!("Column '{}': {}", naming::DATE, e))
    })?;
    if column.dtype() != &DataType::Date {
        return Err(HouselensError::ValidationError(format!(
            "Column '{}' must be a date, found {}",
            naming::DATE,
            column.dtype()
        )));
    }
    let days = column
        .as_materialized_series()
        .cast(&DataType::Int32)
        .map_err(|e| HouselensError::InternalError(format!("Invalid date column: {}", e)))?;
    let ca = days
        .i32()
        .map_err(|e| HouselensError::InternalError(format!("Invalid date column: {}", e)))?;

    Ok(ca
        .min()
        .zip(ca.max())
        .map(|(min, max)| (date_from_epoch_days(min), date_from_epoch_days(max))))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reader::sales::epoch_days;

    fn sales() -> DataFrame {
        let days: Vec<i32> = [(2014, 5, 2), (2015, 5, 27), (2014, 12, 9)]
            .iter()
            .map(|&(y, m, d)| epoch_days(NaiveDate::from_ymd_opt(y, m, d).unwrap()))
            .collect();
        let mut df = df! {
            "zipcode" => ["98178", "98125", "98178"],
            "yr_built" => [1955i64, 1900, 2015],
            "price" => [100.0f64, 200.0, 600.0],
            "bedrooms" => [3i64, 2, 3],
            "bathrooms" => [1.0f64, 2.25, 1.0],
            "floors" => [1.5f64, 1.0, 3.0],
        }
        .unwrap();
        df.with_column(Series::new("date".into(), days).cast(&DataType::Date).unwrap())
            .unwrap();
        df
    }

    #[test]
    fn test_from_table_domains() {
        let options = FilterOptions::from_table(&sales()).unwrap();
        assert_eq!(options.zipcodes, vec!["98125", "98178"]);
        assert_eq!(options.year_built, Some((1900, 2015)));
        assert_eq!(
            options.date,
            Some((
                NaiveDate::from_ymd_opt(2014, 5, 2).unwrap(),
                NaiveDate::from_ymd_opt(2015, 5, 27).unwrap()
            ))
        );
        assert_eq!(
            options.price,
            Some(PriceRange {
                min: 100.0,
                max: 600.0,
                mean: 300.0
            })
        );
        assert_eq!(options.bedrooms, vec![2.0, 3.0]);
        assert_eq!(options.bathrooms, vec![1.0, 2.25]);
        assert_eq!(options.floors, vec![1.0, 1.5, 3.0]);
        assert_eq!(options.columns.len(), 7);
    }

    #[test]
    fn test_from_empty_table() {
        let empty = sales().head(Some(0));
        let options = FilterOptions::from_table(&empty).unwrap();
        assert!(options.zipcodes.is_empty());
        assert_eq!(options.year_built, None);
        assert_eq!(options.date, None);
        assert_eq!(options.price, None);
        assert!(options.bedrooms.is_empty());
        assert_eq!(options.columns.len(), 7);
    }
}
