//! Sales table loading and normalization.

use crate::{naming, DataFrame, HouselensError, Result};
use chrono::{NaiveDate, NaiveDateTime};
use polars::prelude::*;
use std::path::Path;

/// Datetime spellings accepted in the `date` column.
const DATETIME_FORMATS: &[&str] = &["%Y%m%dT%H%M%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Date-only spellings accepted in the `date` column.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y%m%d"];

/// Read a headed CSV file into a DataFrame.
pub fn read_csv(path: &Path) -> Result<DataFrame> {
    let reader = CsvReadOptions::default()
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| {
            HouselensError::ReaderError(format!("Failed to open {}: {}", path.display(), e))
        })?;

    let df = reader.finish().map_err(|e| {
        HouselensError::ReaderError(format!("Failed to parse {}: {}", path.display(), e))
    })?;

    tracing::info!(
        rows = df.height(),
        columns = df.width(),
        "Loaded sales table from {}",
        path.display()
    );
    Ok(df)
}

/// Validate required columns and coerce `date` and `zipcode` to their
/// canonical types: a `Date` column and a string join key.
pub fn normalize(df: &DataFrame) -> Result<DataFrame> {
    let missing: Vec<&str> = naming::REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|name| df.column(name).is_err())
        .collect();
    if !missing.is_empty() {
        return Err(HouselensError::ReaderError(format!(
            "Sales table is missing required columns: {}",
            missing.join(", ")
        )));
    }

    let mut out = df.clone();
    let dates = normalize_dates(column_series(df, naming::DATE)?)?;
    out.with_column(dates).map_err(|e| {
        HouselensError::InternalError(format!("Failed to replace date column: {}", e))
    })?;

    let zips = normalize_zipcodes(column_series(df, naming::ZIPCODE)?)?;
    out.with_column(zips).map_err(|e| {
        HouselensError::InternalError(format!("Failed to replace zipcode column: {}", e))
    })?;

    Ok(out)
}

fn column_series<'a>(df: &'a DataFrame, name: &str) -> Result<&'a Series> {
    df.column(name)
        .map(|c| c.as_materialized_series())
        .map_err(|e| HouselensError::ReaderError(format!("Column '{}': {}", name, e)))
}

/// Parse a sale date given as text.
pub fn parse_sale_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    DATETIME_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(raw, fmt).ok())
        .map(|dt| dt.date())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|fmt| NaiveDate::parse_from_str(raw, fmt).ok())
        })
}

/// Days since the Unix epoch, the physical representation of a Polars `Date`.
pub fn epoch_days(date: NaiveDate) -> i32 {
    let unix_epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    (date - unix_epoch).num_days() as i32
}

/// Inverse of [`epoch_days`].
pub fn date_from_epoch_days(days: i32) -> NaiveDate {
    let unix_epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap_or_default();
    unix_epoch + chrono::Duration::days(days as i64)
}

fn normalize_dates(series: &Series) -> Result<Series> {
    match series.dtype() {
        DataType::Date => Ok(series.clone()),
        DataType::Datetime(_, _) => series
            .cast(&DataType::Date)
            .map_err(|e| HouselensError::ReaderError(format!("Failed to cast date: {}", e))),
        DataType::String => {
            let ca = series
                .str()
                .map_err(|e| HouselensError::ReaderError(format!("Invalid date column: {}", e)))?;
            let mut days: Vec<Option<i32>> = Vec::with_capacity(ca.len());
            for (row, value) in ca.into_iter().enumerate() {
                match value {
                    None => days.push(None),
                    Some(raw) => {
                        let date = parse_sale_date(raw).ok_or_else(|| {
                            HouselensError::ReaderError(format!(
                                "Unparseable sale date '{}' at row {}",
                                raw, row
                            ))
                        })?;
                        days.push(Some(epoch_days(date)));
                    }
                }
            }
            Series::new(naming::DATE.into(), days)
                .cast(&DataType::Date)
                .map_err(|e| HouselensError::InternalError(format!("Failed to build dates: {}", e)))
        }
        other => Err(HouselensError::ReaderError(format!(
            "Column '{}' has unsupported type {}",
            naming::DATE,
            other
        ))),
    }
}

fn normalize_zipcodes(series: &Series) -> Result<Series> {
    let as_text = series
        .cast(&DataType::String)
        .map_err(|e| HouselensError::ReaderError(format!("Invalid zipcode column: {}", e)))?;
    let ca = as_text
        .str()
        .map_err(|e| HouselensError::ReaderError(format!("Invalid zipcode column: {}", e)))?;
    let keys: Vec<Option<String>> = ca.into_iter().map(|v| v.and_then(naming::zip_key)).collect();
    Ok(Series::new(naming::ZIPCODE.into(), keys))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw_sales() -> DataFrame {
        df! {
            "id" => [1i64, 2],
            "date" => ["20141013T000000", "2015-02-25"],
            "price" => [221900.0f64, 538000.0],
            "bedrooms" => [3i64, 3],
            "bathrooms" => [1.0f64, 2.25],
            "sqft_living" => [1180i64, 2570],
            "sqft_lot" => [5650i64, 7242],
            "floors" => [1.0f64, 2.0],
            "waterfront" => [0i64, 0],
            "yr_built" => [1955i64, 1951],
            "zipcode" => [98178i64, 98125],
            "lat" => [47.5112f64, 47.721],
            "long" => [-122.257f64, -122.319],
        }
        .unwrap()
    }

    #[test]
    fn test_parse_sale_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2014, 10, 13).unwrap();
        assert_eq!(parse_sale_date("20141013T000000"), Some(expected));
        assert_eq!(parse_sale_date("2014-10-13"), Some(expected));
        assert_eq!(parse_sale_date("2014-10-13 08:30:00"), Some(expected));
        assert_eq!(parse_sale_date("13/10/2014"), None);
    }

    #[test]
    fn test_epoch_days() {
        assert_eq!(epoch_days(NaiveDate::from_ymd_opt(1970, 1, 2).unwrap()), 1);
        assert_eq!(epoch_days(NaiveDate::from_ymd_opt(1969, 12, 31).unwrap()), -1);
        let date = NaiveDate::from_ymd_opt(2014, 10, 13).unwrap();
        assert_eq!(date_from_epoch_days(epoch_days(date)), date);
    }

    #[test]
    fn test_normalize_coerces_date_and_zipcode() {
        let out = normalize(&raw_sales()).unwrap();
        assert_eq!(out.column("date").unwrap().dtype(), &DataType::Date);
        let zips: Vec<Option<&str>> = out
            .column("zipcode")
            .unwrap()
            .str()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(zips, vec![Some("98178"), Some("98125")]);
    }

    #[test]
    fn test_normalize_float_zipcodes() {
        let mut df = raw_sales();
        df.with_column(Series::new("zipcode".into(), &[98178.0f64, 98125.0]))
            .unwrap();
        let out = normalize(&df).unwrap();
        let zips = out.column("zipcode").unwrap().str().unwrap();
        assert_eq!(zips.get(0), Some("98178"));
    }

    #[test]
    fn test_normalize_missing_column() {
        let df = raw_sales().drop("lat").unwrap();
        let err = normalize(&df).unwrap_err();
        assert!(err.to_string().contains("lat"));
    }

    #[test]
    fn test_normalize_bad_date() {
        let mut df = raw_sales();
        df.with_column(Series::new("date".into(), &["20141013T000000", "soon"]))
            .unwrap();
        let err = normalize(&df).unwrap_err();
        assert!(err.to_string().contains("soon"));
    }

    #[test]
    fn test_read_csv() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("sales.csv");
        std::fs::write(
            &path,
            "id,date,price,bedrooms,bathrooms,sqft_living,sqft_lot,floors,waterfront,yr_built,zipcode,lat,long\n\
             7129300520,20141013T000000,221900,3,1,1180,5650,1,0,1955,98178,47.5112,-122.257\n\
             6414100192,20141209T000000,538000,3,2.25,2570,7242,2,0,1951,98125,47.721,-122.319\n",
        )
        .unwrap();

        let df = read_csv(&path).unwrap();
        assert_eq!(df.height(), 2);
        let out = normalize(&df).unwrap();
        assert_eq!(out.column("date").unwrap().dtype(), &DataType::Date);
    }

    #[test]
    fn test_read_csv_missing_file() {
        let err = read_csv(Path::new("/nonexistent/sales.csv")).unwrap_err();
        assert!(matches!(err, HouselensError::ReaderError(_)));
    }
}
