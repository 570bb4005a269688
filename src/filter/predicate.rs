//! Threshold predicates applied per report page.

use crate::reader::sales::epoch_days;
use crate::{DataFrame, HouselensError, Result};
use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};

/// Right-hand side of a predicate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Threshold {
    Number(f64),
    Date(NaiveDate),
}

impl From<f64> for Threshold {
    fn from(value: f64) -> Self {
        Threshold::Number(value)
    }
}

impl From<i64> for Threshold {
    fn from(value: i64) -> Self {
        Threshold::Number(value as f64)
    }
}

impl From<NaiveDate> for Threshold {
    fn from(value: NaiveDate) -> Self {
        Threshold::Date(value)
    }
}

/// A single-column row filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Predicate {
    /// `column < value`, strict
    LessThan { column: String, value: Threshold },
    /// `column == value`
    Equals { column: String, value: Threshold },
}

impl Predicate {
    pub fn less_than(column: impl Into<String>, value: impl Into<Threshold>) -> Self {
        Predicate::LessThan {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn equals(column: impl Into<String>, value: impl Into<Threshold>) -> Self {
        Predicate::Equals {
            column: column.into(),
            value: value.into(),
        }
    }

    pub fn column(&self) -> &str {
        match self {
            Predicate::LessThan { column, .. } | Predicate::Equals { column, .. } => column,
        }
    }

    fn threshold(&self) -> Threshold {
        match self {
            Predicate::LessThan { value, .. } | Predicate::Equals { value, .. } => *value,
        }
    }

    /// Build the Polars expression, checking the threshold kind against the
    /// column type. Dates are compared on their day number.
    fn to_expr(&self, schema: &Schema) -> Result<Expr> {
        let name = self.column();
        let dtype = schema.get(name).ok_or_else(|| {
            HouselensError::ValidationError(format!("Unknown filter column '{}'", name))
        })?;

        let (lhs, rhs) = match (self.threshold(), dtype) {
            (Threshold::Date(date), DataType::Date) => {
                (col(name).cast(DataType::Int32), lit(epoch_days(date)))
            }
            (Threshold::Date(_), other) => {
                return Err(HouselensError::ValidationError(format!(
                    "Date threshold on non-date column '{}' ({})",
                    name, other
                )))
            }
            (Threshold::Number(_), DataType::Date) => {
                return Err(HouselensError::ValidationError(format!(
                    "Numeric threshold on date column '{}'",
                    name
                )))
            }
            (Threshold::Number(value), _) => (col(name).cast(DataType::Float64), lit(value)),
        };

        Ok(match self {
            Predicate::LessThan { .. } => lhs.lt(rhs),
            Predicate::Equals { .. } => lhs.eq(rhs),
        })
    }
}

/// Keep rows satisfying every predicate. Null cells never match.
pub fn apply(df: &DataFrame, predicates: &[Predicate]) -> Result<DataFrame> {
    if predicates.is_empty() {
        return Ok(df.clone());
    }

    let schema = df.schema();
    let mut combined: Option<Expr> = None;
    for predicate in predicates {
        let expr = predicate.to_expr(&schema)?;
        combined = Some(match combined {
            Some(acc) => acc.and(expr),
            None => expr,
        });
    }

    let mut lazy = df.clone().lazy();
    if let Some(expr) = combined {
        lazy = lazy.filter(expr);
    }
    let out = lazy
        .collect()
        .map_err(|e| HouselensError::InternalError(format!("Predicate filter failed: {}", e)))?;

    tracing::debug!(
        rows_in = df.height(),
        rows_out = out.height(),
        predicates = predicates.len(),
        "Applied predicates"
    );
    Ok(out)
}
