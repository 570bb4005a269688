//! Group-aggregate: per-key summaries joined across metrics.

use crate::{DataFrame, HouselensError, Result};
use polars::prelude::*;
use std::collections::HashSet;

/// Per-group reduction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reducer {
    /// Number of non-null values
    Count,
    /// Arithmetic mean of non-null values, as `Float64`
    Mean,
}

/// One output column of a group-aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct Metric {
    /// Source column
    pub column: String,
    pub reducer: Reducer,
    /// Output column name
    pub label: String,
}

impl Metric {
    pub fn new(column: impl Into<String>, reducer: Reducer, label: impl Into<String>) -> Self {
        Self {
            column: column.into(),
            reducer,
            label: label.into(),
        }
    }

    pub fn count(column: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(column, Reducer::Count, label)
    }

    pub fn mean(column: impl Into<String>, label: impl Into<String>) -> Self {
        Self::new(column, Reducer::Mean, label)
    }

    fn expr(&self) -> Expr {
        match self.reducer {
            Reducer::Count => col(self.column.as_str()).count(),
            Reducer::Mean => col(self.column.as_str()).cast(DataType::Float64).mean(),
        }
        .alias(self.label.as_str())
    }
}

/// Group rows by `key` and reduce each metric separately.
///
/// A metric only sees rows where its own column is non-null, so a group can be
/// present for one metric and absent for another. The per-metric results are
/// joined with inner semantics: the output holds exactly the groups every
/// metric produced. Rows with a null key are ignored. Output is sorted by key.
///
/// # Example
///
/// ```rust,ignore
/// let averages = GroupAggregate::by("zipcode")
///     .key_label("ZIPCODE")
///     .metric(Metric::count("id", "TOTAL HOUSES"))
///     .metric(Metric::mean("price", "PRICE"))
///     .run(&sales)?;
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct GroupAggregate {
    key: String,
    key_label: Option<String>,
    metrics: Vec<Metric>,
}

impl GroupAggregate {
    pub fn by(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            key_label: None,
            metrics: Vec::new(),
        }
    }

    /// Rename the key column in the output.
    pub fn key_label(mut self, label: impl Into<String>) -> Self {
        self.key_label = Some(label.into());
        self
    }

    pub fn metric(mut self, metric: Metric) -> Self {
        self.metrics.push(metric);
        self
    }

    pub fn run(&self, df: &DataFrame) -> Result<DataFrame> {
        self.validate(df)?;

        let key = self.key.as_str();
        let per_metric: Vec<DataFrame> = self
            .metrics
            .iter()
            .map(|metric| {
                df.clone()
                    .lazy()
                    .select([col(key), col(metric.column.as_str())])
                    .filter(
                        col(key)
                            .is_not_null()
                            .and(col(metric.column.as_str()).is_not_null()),
                    )
                    .group_by([col(key)])
                    .agg([metric.expr()])
                    .collect()
                    .map_err(|e| {
                        HouselensError::AggregationError(format!(
                            "Failed to aggregate '{}' by '{}': {}",
                            metric.column, key, e
                        ))
                    })
            })
            .collect::<Result<_>>()?;

        let mut out = join_on_key(key, per_metric)?;
        if let Some(label) = &self.key_label {
            out.rename(key, label.as_str().into()).map_err(|e| {
                HouselensError::InternalError(format!("Failed to relabel '{}': {}", key, e))
            })?;
        }

        tracing::debug!(
            key,
            rows_in = df.height(),
            groups = out.height(),
            metrics = self.metrics.len(),
            "Group aggregate"
        );
        Ok(out)
    }

    fn validate(&self, df: &DataFrame) -> Result<()> {
        if self.metrics.is_empty() {
            return Err(HouselensError::ValidationError(
                "Group aggregate needs at least one metric".to_string(),
            ));
        }

        let columns = std::iter::once(self.key.as_str())
            .chain(self.metrics.iter().map(|m| m.column.as_str()));
        for name in columns {
            if df.column(name).is_err() {
                return Err(HouselensError::ValidationError(format!(
                    "Group aggregate column '{}' not found",
                    name
                )));
            }
        }

        if let Some(metric) = self.metrics.iter().find(|m| m.column == self.key) {
            return Err(HouselensError::ValidationError(format!(
                "Metric '{}' cannot reduce the group key itself",
                metric.label
            )));
        }

        let mut labels = HashSet::new();
        labels.insert(self.key.as_str());
        for metric in &self.metrics {
            if !labels.insert(metric.label.as_str()) {
                return Err(HouselensError::ValidationError(format!(
                    "Duplicate output column '{}'",
                    metric.label
                )));
            }
        }
        if let Some(label) = &self.key_label {
            let clashes = self
                .metrics
                .iter()
                .any(|m| m.label == *label);
            if clashes {
                return Err(HouselensError::ValidationError(format!(
                    "Key label '{}' clashes with a metric label",
                    label
                )));
            }
        }
        Ok(())
    }
}

/// Shorthand for [`GroupAggregate`] without a key label.
pub fn group_aggregate(df: &DataFrame, key: &str, metrics: &[Metric]) -> Result<DataFrame> {
    metrics
        .iter()
        .cloned()
        .fold(GroupAggregate::by(key), GroupAggregate::metric)
        .run(df)
}

/// Inner-join `frames` on `key`, left to right, and sort by `key`.
///
/// Every frame must contain `key`; other column names must be distinct.
pub fn join_on_key(key: &str, frames: Vec<DataFrame>) -> Result<DataFrame> {
    let mut iter = frames.into_iter();
    let first = iter.next().ok_or_else(|| {
        HouselensError::ValidationError("Nothing to join".to_string())
    })?;

    let joined = iter.fold(first.lazy(), |acc, next| {
        acc.join(
            next.lazy(),
            [col(key)],
            [col(key)],
            JoinArgs::new(JoinType::Inner),
        )
    });

    joined
        .sort_by_exprs([col(key)], SortMultipleOptions::default())
        .collect()
        .map_err(|e| HouselensError::AggregationError(format!("Failed to join on '{}': {}", key, e)))
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

    #[test]
    fn test_mean_and_count_by_zip() {
        let out = GroupAggregate::by("zipcode")
            .metric(Metric::count("id", "TOTAL HOUSES"))
            .metric(Metric::mean("price", "PRICE"))
            .run(&sales())
            .unwrap();

        let zips: Vec<Option<&str>> = out.column("zipcode").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(zips, vec![Some("A"), Some("B")]);

        let prices: Vec<Option<f64>> = out.column("PRICE").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(prices, vec![Some(150.0), Some(300.0)]);

        let counts = out
            .column("TOTAL HOUSES")
            .unwrap()
            .as_materialized_series()
            .cast(&DataType::Int64)
            .unwrap();
        let counts: Vec<Option<i64>> = counts.i64().unwrap().into_iter().collect();
        assert_eq!(counts, vec![Some(2), Some(1)]);
    }

    #[test]
    fn test_key_label_renames_key() {
        let out = GroupAggregate::by("zipcode")
            .key_label("ZIP")
            .metric(Metric::mean("price", "PRICE"))
            .run(&sales())
            .unwrap();
        let names: Vec<String> = out.get_column_names().iter().map(|s| s.to_string()).collect();
        assert_eq!(names, vec!["ZIP", "PRICE"]);
    }

    #[test]
    fn test_join_is_inner() {
        // Zip B has no non-null sqft_living, so it drops out of that metric
        let df = df! {
            "zipcode" => ["A", "A", "B", "C"],
            "price" => [Some(1.0f64), Some(3.0), Some(5.0), None],
            "sqft_living" => [Some(10.0f64), Some(20.0), None, Some(7.0)],
        }
        .unwrap();

        let out = group_aggregate(
            &df,
            "zipcode",
            &[
                Metric::mean("price", "PRICE"),
                Metric::mean("sqft_living", "SQFT"),
            ],
        )
        .unwrap();

        let zips: Vec<Option<&str>> = out.column("zipcode").unwrap().str().unwrap().into_iter().collect();
        assert_eq!(zips, vec![Some("A")]);
        assert_eq!(out.column("SQFT").unwrap().f64().unwrap().get(0), Some(15.0));
    }

    #[test]
    fn test_join_on_key_drops_unmatched() {
        let left = df! { "k" => [1i64, 2, 3], "a" => [1.0f64, 2.0, 3.0] }.unwrap();
        let right = df! { "k" => [3i64, 1], "b" => [30.0f64, 10.0] }.unwrap();
        let out = join_on_key("k", vec![left, right]).unwrap();
        let keys: Vec<Option<i64>> = out.column("k").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(keys, vec![Some(1), Some(3)]);
    }

    #[test]
    fn test_zero_rows_gives_empty_result_with_schema() {
        let empty = sales().head(Some(0));
        let out = group_aggregate(
            &empty,
            "zipcode",
            &[Metric::count("id", "N"), Metric::mean("price", "P")],
        )
        .unwrap();
        assert_eq!(out.height(), 0);
        assert_eq!(out.width(), 3);
    }

    #[test]
    fn test_repeatable() {
        let metrics = [Metric::mean("price", "PRICE"), Metric::count("id", "N")];
        let first = group_aggregate(&sales(), "zipcode", &metrics).unwrap();
        let second = group_aggregate(&sales(), "zipcode", &metrics).unwrap();
        assert!(first.equals_missing(&second));
    }

    #[test]
    fn test_validation_errors() {
        assert!(group_aggregate(&sales(), "zipcode", &[]).is_err());
        assert!(group_aggregate(&sales(), "nope", &[Metric::mean("price", "P")]).is_err());
        assert!(group_aggregate(
            &sales(),
            "zipcode",
            &[Metric::mean("price", "P"), Metric::count("id", "P")]
        )
        .is_err());
    }
}
