//! Filter resolution
//!
//! Turns explicit filter values into restricted views of the sales table.
//!
//! - [`Selection`] + [`resolve`] handle the column subset and zip-code subset
//!   shared by the overview and region pages.
//! - [`Predicate`] + [`apply`] handle per-page thresholds
//!   (`column < value`, or `column == value` for flags).
//! - [`FilterOptions`] holds the value domains filters are chosen from.
//!
//! No operation here fails on an empty result: a filter that matches nothing
//! returns a zero-row frame with the expected columns.

mod options;
mod predicate;

pub use options::{FilterOptions, PriceRange};
pub use predicate::{apply, Predicate, Threshold};

use crate::{naming, DataFrame, HouselensError, Result};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Column subset and zip-code subset chosen for a page.
///
/// An empty list means "no restriction" for that dimension.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub columns: Vec<String>,
    pub zipcodes: Vec<String>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_zipcodes<I, S>(mut self, zipcodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.zipcodes = zipcodes.into_iter().map(Into::into).collect();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty() && self.zipcodes.is_empty()
    }
}

/// Apply a [`Selection`] to `df`.
///
/// | zip codes | columns | result                                   |
/// |-----------|---------|------------------------------------------|
/// | set       | set     | matching rows, chosen columns            |
/// | set       | empty   | matching rows, all columns               |
/// | empty     | set     | all rows, chosen columns                 |
/// | empty     | empty   | an owned copy of `df`                    |
///
/// Chosen columns come back in the order requested, duplicates removed.
///
/// # Errors
///
/// Returns `HouselensError::ValidationError` for unknown column names, or when
/// zip codes are given but `df` has no `zipcode` column.
pub fn resolve(df: &DataFrame, selection: &Selection) -> Result<DataFrame> {
    let columns = dedup_columns(&selection.columns);
    if let Some(unknown) = columns.iter().find(|c| df.column(c.as_str()).is_err()) {
        return Err(HouselensError::ValidationError(format!(
            "Unknown column '{}'",
            unknown
        )));
    }

    let rows = if selection.zipcodes.is_empty() {
        df.clone()
    } else {
        restrict_zipcodes(df, &selection.zipcodes)?
    };

    let out = if columns.is_empty() {
        rows
    } else {
        rows.select(columns.iter().map(String::as_str))
            .map_err(|e| HouselensError::InternalError(format!("Column selection failed: {}", e)))?
    };

    tracing::debug!(
        rows_in = df.height(),
        rows_out = out.height(),
        columns_out = out.width(),
        "Resolved selection"
    );
    Ok(out)
}

/// Rows whose zip code is in `zipcodes`, compared on the normalized key.
pub fn restrict_zipcodes(df: &DataFrame, zipcodes: &[String]) -> Result<DataFrame> {
    let wanted: HashSet<String> = zipcodes.iter().filter_map(|z| naming::zip_key(z)).collect();

    let column = df.column(naming::ZIPCODE).map_err(|_| {
        HouselensError::ValidationError(format!(
            "Cannot filter by zip code: column '{}' not found",
            naming::ZIPCODE
        ))
    })?;
    let as_text = column
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(|e| HouselensError::InternalError(format!("Invalid zipcode column: {}", e)))?;
    let keys = as_text
        .str()
        .map_err(|e| HouselensError::InternalError(format!("Invalid zipcode column: {}", e)))?;

    let mask: BooleanChunked = keys
        .into_iter()
        .map(|v| Some(v.and_then(naming::zip_key).is_some_and(|k| wanted.contains(&k))))
        .collect();

    df.filter(&mask)
        .map_err(|e| HouselensError::InternalError(format!("Zip code filter failed: {}", e)))
}

fn dedup_columns(columns: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    columns
        .iter()
        .filter(|c| seen.insert(c.as_str()))
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sales() -> DataFrame {
        df! {
            "id" => [1i64, 2, 3],
            "zipcode" => ["A", "A", "B"],
            "price" => [100.0f64, 200.0, 300.0],
        }
        .unwrap()
    }

    fn names(df: &DataFrame) -> Vec<String> {
        df.get_column_names().iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_zipcodes_only_restricts_rows() {
        let out = resolve(&sales(), &Selection::new().with_zipcodes(["A"])).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(names(&out), vec!["id", "zipcode", "price"]);
        let ids: Vec<Option<i64>> = out.column("id").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(ids, vec![Some(1), Some(2)]);
    }

    #[test]
    fn test_columns_only_restricts_columns() {
        let out = resolve(&sales(), &Selection::new().with_columns(["price", "id"])).unwrap();
        assert_eq!(out.height(), 3);
        assert_eq!(names(&out), vec!["price", "id"]);
    }

    #[test]
    fn test_both_restrict_rows_and_columns() {
        let selection = Selection::new()
            .with_columns(["price"])
            .with_zipcodes(["B"]);
        let out = resolve(&sales(), &selection).unwrap();
        assert_eq!(out.shape(), (1, 1));
        assert_eq!(out.column("price").unwrap().f64().unwrap().get(0), Some(300.0));
    }

    #[test]
    fn test_empty_selection_returns_full_copy() {
        let df = sales();
        let out = resolve(&df, &Selection::new()).unwrap();
        assert!(out.equals(&df));
    }

    #[test]
    fn test_no_matching_rows_is_not_an_error() {
        let out = resolve(&sales(), &Selection::new().with_zipcodes(["Z"])).unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(out.width(), 3);
    }

    #[test]
    fn test_rows_never_grow_and_columns_match_request() {
        let df = sales();
        let selections = vec![
            Selection::new(),
            Selection::new().with_zipcodes(["A", "B"]),
            Selection::new().with_zipcodes(["A", "A"]),
            Selection::new().with_columns(["zipcode"]),
            Selection::new().with_columns(["id", "id"]).with_zipcodes(["B", "Q"]),
        ];
        for selection in selections {
            let out = resolve(&df, &selection).unwrap();
            assert!(out.height() <= df.height());
            let expected = if selection.columns.is_empty() {
                names(&df)
            } else {
                dedup_columns(&selection.columns)
            };
            assert_eq!(names(&out), expected);
        }
    }

    #[test]
    fn test_numeric_zipcodes_match_string_selection() {
        let df = df! {
            "zipcode" => [98178i64, 98125, 98178],
            "price" => [1.0f64, 2.0, 3.0],
        }
        .unwrap();
        let out = resolve(&df, &Selection::new().with_zipcodes(["98178"])).unwrap();
        assert_eq!(out.height(), 2);
    }

    #[test]
    fn test_unknown_column_is_validation_error() {
        let err = resolve(&sales(), &Selection::new().with_columns(["nope"])).unwrap_err();
        assert!(matches!(err, HouselensError::ValidationError(_)));
    }
}
