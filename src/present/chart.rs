//! Line and histogram chart shapes.

use crate::aggregate::{histogram_bins, GroupAggregate, Metric};
use crate::{naming, DataFrame, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Histogram { bins: usize },
}

/// A chart over a prepared frame.
///
/// For [`ChartKind::Line`] `data` holds the `x` and `y` columns. For
/// [`ChartKind::Histogram`] `data` is the binned frame (`bin_start`,
/// `bin_end`, `count`) and `x` names the binned source column.
#[derive(Debug, Clone)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub x: String,
    pub y: String,
    pub data: DataFrame,
}

impl PartialEq for ChartSpec {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.x == other.x
            && self.y == other.y
            && self.data.equals_missing(&other.data)
    }
}

impl ChartSpec {
    /// Line of mean `y` per distinct `x`, sorted by `x`.
    pub fn mean_line(df: &DataFrame, x: &str, y: &str) -> Result<Self> {
        let data = GroupAggregate::by(x).metric(Metric::mean(y, y)).run(df)?;
        Ok(Self {
            kind: ChartKind::Line,
            x: x.to_string(),
            y: y.to_string(),
            data,
        })
    }

    /// Histogram of `column` with `bins` equal-width bins.
    pub fn histogram(df: &DataFrame, column: &str, bins: usize) -> Result<Self> {
        let data = histogram_bins(df, column, bins)?;
        Ok(Self {
            kind: ChartKind::Histogram { bins },
            x: column.to_string(),
            y: naming::BIN_COUNT.to_string(),
            data,
        })
    }

    pub fn is_empty(&self) -> bool {
        self.data.height() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    #[test]
    fn test_mean_line() {
        let df = df! {
            "yr_built" => [1990i64, 1980, 1990],
            "price" => [100.0f64, 50.0, 300.0],
        }
        .unwrap();
        let chart = ChartSpec::mean_line(&df, "yr_built", "price").unwrap();
        assert_eq!(chart.kind, ChartKind::Line);
        let years: Vec<Option<i64>> =
            chart.data.column("yr_built").unwrap().i64().unwrap().into_iter().collect();
        assert_eq!(years, vec![Some(1980), Some(1990)]);
        let prices: Vec<Option<f64>> =
            chart.data.column("price").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(prices, vec![Some(50.0), Some(200.0)]);
    }

    #[test]
    fn test_histogram_chart() {
        let df = df! { "price" => [1.0f64, 2.0, 3.0, 4.0] }.unwrap();
        let chart = ChartSpec::histogram(&df, "price", 50).unwrap();
        assert_eq!(chart.kind, ChartKind::Histogram { bins: 50 });
        assert_eq!(chart.x, "price");
        assert_eq!(chart.y, "count");
        assert_eq!(chart.data.height(), 50);
    }

    #[test]
    fn test_empty_chart() {
        let df = df! { "price" => Vec::<f64>::new() }.unwrap();
        let chart = ChartSpec::histogram(&df, "price", 10).unwrap();
        assert!(chart.is_empty());
    }
}
