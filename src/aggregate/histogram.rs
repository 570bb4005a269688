//! Histogram binning.

use super::float_column;
use crate::{naming, DataFrame, HouselensError, Result};
use polars::prelude::*;

/// Count non-null values of `column` into `bins` equal-width bins spanning
/// `[min, max]`.
///
/// Returns `bin_start, bin_end, count`, one row per bin, ascending. Bins are
/// closed on the left except the last, which also includes `max`. A column
/// with a single distinct value yields one bin `[v - 0.5, v + 0.5]`. No
/// values yields no bins.
pub fn histogram_bins(df: &DataFrame, column: &str, bins: usize) -> Result<DataFrame> {
    if bins == 0 {
        return Err(HouselensError::ValidationError(
            "Histogram needs at least one bin".to_string(),
        ));
    }

    let ca = float_column(df, column)?;
    let values: Vec<f64> = ca.into_iter().flatten().filter(|v| v.is_finite()).collect();

    let (starts, ends, counts) = match bounds(&values) {
        None => (Vec::new(), Vec::new(), Vec::new()),
        Some((lo, hi)) if lo == hi => (vec![lo - 0.5], vec![lo + 0.5], vec![values.len() as u32]),
        Some((lo, hi)) => {
            let width = (hi - lo) / bins as f64;
            let mut counts = vec![0u32; bins];
            for v in &values {
                let idx = (((v - lo) / width).floor() as usize).min(bins - 1);
                counts[idx] += 1;
            }
            let starts: Vec<f64> = (0..bins).map(|i| lo + width * i as f64).collect();
            let ends: Vec<f64> = (0..bins)
                .map(|i| if i + 1 == bins { hi } else { lo + width * (i + 1) as f64 })
                .collect();
            (starts, ends, counts)
        }
    };

    tracing::debug!(column, values = values.len(), bins = counts.len(), "Histogram");

    DataFrame::new(vec![
        Column::new(naming::BIN_START.into(), starts),
        Column::new(naming::BIN_END.into(), ends),
        Column::new(naming::BIN_COUNT.into(), counts),
    ])
    .map_err(|e| HouselensError::InternalError(format!("Failed to build histogram: {}", e)))
}

fn bounds(values: &[f64]) -> Option<(f64, f64)> {
    values.iter().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counts(out: &DataFrame) -> Vec<u32> {
        out.column("count")
            .unwrap()
            .u32()
            .unwrap()
            .into_iter()
            .flatten()
            .collect()
    }

    #[test]
    fn test_equal_width_bins() {
        let df = df! { "x" => [0.0f64, 1.0, 2.0, 3.0, 4.0] }.unwrap();
        let out = histogram_bins(&df, "x", 2).unwrap();
        assert_eq!(out.height(), 2);
        assert_eq!(counts(&out), vec![2, 3]);
        let ends: Vec<Option<f64>> = out.column("bin_end").unwrap().f64().unwrap().into_iter().collect();
        assert_eq!(ends, vec![Some(2.0), Some(4.0)]);
    }

    #[test]
    fn test_max_lands_in_last_bin() {
        let df = df! { "x" => [1i64, 2, 3, 4, 5, 6, 7, 8, 9, 10] }.unwrap();
        let out = histogram_bins(&df, "x", 3).unwrap();
        let total: u32 = counts(&out).iter().sum();
        assert_eq!(total, 10);
        assert_eq!(out.height(), 3);
    }

    #[test]
    fn test_constant_column_single_bin() {
        let df = df! { "waterfront" => [1i64, 1, 1] }.unwrap();
        let out = histogram_bins(&df, "waterfront", 10).unwrap();
        assert_eq!(out.height(), 1);
        assert_eq!(counts(&out), vec![3]);
        assert_eq!(out.column("bin_start").unwrap().f64().unwrap().get(0), Some(0.5));
    }

    #[test]
    fn test_empty_and_null_input() {
        let empty = df! { "x" => Vec::<f64>::new() }.unwrap();
        assert_eq!(histogram_bins(&empty, "x", 5).unwrap().height(), 0);

        let nulls = df! { "x" => [None::<f64>, None] }.unwrap();
        assert_eq!(histogram_bins(&nulls, "x", 5).unwrap().height(), 0);
    }

    #[test]
    fn test_zero_bins_rejected() {
        let df = df! { "x" => [1.0f64] }.unwrap();
        assert!(histogram_bins(&df, "x", 0).is_err());
    }
}
