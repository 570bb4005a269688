//! Vega-Lite JSON writer implementation
//!
//! Converts report pages into a JSON document whose map and chart sections
//! carry Vega-Lite v6 specs, ready for vega-embed.
//!
//! # Mapping Strategy
//!
//! - `Presentation::Table` → `{ "kind": "table", "columns", "values" }`
//! - `Presentation::Chart` → `line` or binned `bar` marks over inline data
//! - `MapView::Markers` → `circle` marks on a mercator projection
//! - `MapView::Choropleth` → `geoshape` marks filled per feature
//!
//! # Example
//!
//! ```rust,ignore
//! use houselens::writer::{Writer, VegaLiteWriter};
//!
//! let writer = VegaLiteWriter::new();
//! let json = writer.write(&page)?;
//! ```

mod chart;
mod map;

use crate::pages::Page;
use crate::present::{MapView, Presentation, Section};
use crate::reader::sales::date_from_epoch_days;
use crate::writer::Writer;
use crate::{DataFrame, HouselensError, Result};
use polars::prelude::*;
use serde_json::{json, Map, Value};

/// Vega-Lite writer
///
/// Generates Vega-Lite v6 specifications for page sections.
pub struct VegaLiteWriter {
    /// Vega-Lite schema version
    schema: String,
    /// Pretty-print the output document
    pretty: bool,
}

impl VegaLiteWriter {
    /// Create a new Vega-Lite writer with default settings
    pub fn new() -> Self {
        Self {
            schema: "https://vega.github.io/schema/vega-lite/v6.json".to_string(),
            pretty: true,
        }
    }

    /// Emit compact JSON instead of pretty-printed JSON.
    pub fn compact(mut self) -> Self {
        self.pretty = false;
        self
    }

    /// The JSON value of one page: `{ "page", "title", "sections" }`.
    pub fn page_value(&self, page: &Page) -> Result<Value> {
        let sections = page
            .sections
            .iter()
            .map(|s| self.section_value(s))
            .collect::<Result<Vec<_>>>()?;
        Ok(json!({
            "page": page.kind.slug(),
            "title": page.title,
            "sections": sections,
        }))
    }

    /// The JSON value of one section.
    pub fn section_value(&self, section: &Section) -> Result<Value> {
        let mut value = match &section.body {
            Presentation::Table(df) => {
                let columns: Vec<String> =
                    df.get_column_names().iter().map(|c| c.to_string()).collect();
                json!({
                    "kind": "table",
                    "columns": columns,
                    "values": dataframe_to_values(df)?,
                })
            }
            Presentation::Map(view) => json!({
                "kind": "vega-lite",
                "spec": self.map_spec(view)?,
            }),
            Presentation::Chart(chart) => json!({
                "kind": "vega-lite",
                "spec": chart::chart_spec(&self.schema, chart)?,
            }),
            Presentation::Error(message) => json!({
                "kind": "error",
                "message": message,
            }),
        };
        value["header"] = json!(section.header);
        Ok(value)
    }

    fn map_spec(&self, view: &MapView) -> Result<Value> {
        match view {
            MapView::Markers(markers) => Ok(map::marker_spec(&self.schema, markers)),
            MapView::Choropleth(choropleth) => Ok(map::choropleth_spec(&self.schema, choropleth)),
        }
    }

    fn serialize(&self, value: &Value) -> Result<String> {
        let text = if self.pretty {
            serde_json::to_string_pretty(value)
        } else {
            serde_json::to_string(value)
        };
        text.map_err(|e| HouselensError::WriterError(format!("Failed to serialize JSON: {}", e)))
    }
}

impl Default for VegaLiteWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for VegaLiteWriter {
    type Output = String;

    fn write(&self, page: &Page) -> Result<String> {
        let value = self.page_value(page)?;
        self.serialize(&value)
    }

    fn write_all(&self, pages: &[Page]) -> Result<String> {
        let pages = pages
            .iter()
            .map(|p| self.page_value(p))
            .collect::<Result<Vec<_>>>()?;
        self.serialize(&json!({ "pages": pages }))
    }
}

// =============================================================================
// Data Conversion
// =============================================================================

/// Convert a Polars DataFrame to Vega-Lite data values (array of objects)
pub(crate) fn dataframe_to_values(df: &DataFrame) -> Result<Vec<Value>> {
    let mut values = Vec::with_capacity(df.height());
    let columns = df.get_columns();

    for row_idx in 0..df.height() {
        let mut row_obj = Map::new();
        for column in columns {
            let value = series_value_at(column.as_materialized_series(), row_idx)?;
            row_obj.insert(column.name().to_string(), value);
        }
        values.push(Value::Object(row_obj));
    }

    Ok(values)
}

/// Get a single value from a series at a given index as JSON Value
///
/// Dates become `YYYY-MM-DD` strings. Strings stay strings, so zip code keys
/// are never turned into numbers.
pub(crate) fn series_value_at(series: &Series, idx: usize) -> Result<Value> {
    use DataType::*;

    let cast_error =
        |ty: &str, e: PolarsError| HouselensError::WriterError(format!("Failed to cast to {}: {}", ty, e));

    match series.dtype() {
        Int8 | Int16 | Int32 | Int64 => {
            let cast = series.cast(&Int64).map_err(|e| cast_error("i64", e))?;
            let ca = cast.i64().map_err(|e| cast_error("i64", e))?;
            Ok(ca.get(idx).map(|v| json!(v)).unwrap_or(Value::Null))
        }
        UInt8 | UInt16 | UInt32 | UInt64 => {
            let cast = series.cast(&UInt64).map_err(|e| cast_error("u64", e))?;
            let ca = cast.u64().map_err(|e| cast_error("u64", e))?;
            Ok(ca.get(idx).map(|v| json!(v)).unwrap_or(Value::Null))
        }
        Float32 | Float64 => {
            let cast = series.cast(&Float64).map_err(|e| cast_error("f64", e))?;
            let ca = cast.f64().map_err(|e| cast_error("f64", e))?;
            // NaN and infinities have no JSON form
            Ok(ca
                .get(idx)
                .filter(|v| v.is_finite())
                .map(|v| json!(v))
                .unwrap_or(Value::Null))
        }
        Boolean => {
            let ca = series.bool().map_err(|e| cast_error("bool", e))?;
            Ok(ca.get(idx).map(|v| json!(v)).unwrap_or(Value::Null))
        }
        String => {
            let ca = series.str().map_err(|e| cast_error("string", e))?;
            Ok(ca.get(idx).map(|v| json!(v)).unwrap_or(Value::Null))
        }
        Date => {
            let days = series.cast(&Int32).map_err(|e| cast_error("date", e))?;
            let ca = days.i32().map_err(|e| cast_error("date", e))?;
            Ok(ca
                .get(idx)
                .map(|d| json!(date_from_epoch_days(d).format("%Y-%m-%d").to_string()))
                .unwrap_or(Value::Null))
        }
        _ => {
            // Fallback: convert to string
            let value = series
                .get(idx)
                .map_err(|e| HouselensError::WriterError(format!("Failed to read value: {}", e)))?;
            Ok(match value {
                AnyValue::Null => Value::Null,
                other => json!(other.to_string()),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageKind;
    use crate::present::ChartSpec;
    use chrono::NaiveDate;

    fn page(sections: Vec<Section>) -> Page {
        Page::new(PageKind::Overview, sections)
    }

    #[test]
    fn test_table_section() {
        let df = df! {
            "zipcode" => ["98178", "98125"],
            "price" => [1.5f64, 2.0],
            "count" => [3u32, 4],
        }
        .unwrap();
        let writer = VegaLiteWriter::new();
        let value = writer.section_value(&Section::table("Average Values", df)).unwrap();

        assert_eq!(value["kind"], "table");
        assert_eq!(value["header"], "Average Values");
        assert_eq!(value["columns"], json!(["zipcode", "price", "count"]));
        assert_eq!(value["values"][0]["zipcode"], "98178");
        assert_eq!(value["values"][1]["price"], 2.0);
        assert_eq!(value["values"][1]["count"], 4);
    }

    #[test]
    fn test_data_conversion_all_types() {
        let dates = Series::new(
            "date".into(),
            [crate::reader::sales::epoch_days(
                NaiveDate::from_ymd_opt(2014, 10, 13).unwrap(),
            )],
        )
        .cast(&DataType::Date)
        .unwrap();
        let mut df = df! {
            "i" => [1i32],
            "f" => [f64::NAN],
            "b" => [true],
            "s" => [None::<&str>],
        }
        .unwrap();
        df.with_column(dates).unwrap();

        let values = dataframe_to_values(&df).unwrap();
        assert_eq!(values[0]["i"], 1);
        assert_eq!(values[0]["f"], Value::Null);
        assert_eq!(values[0]["b"], true);
        assert_eq!(values[0]["s"], Value::Null);
        assert_eq!(values[0]["date"], "2014-10-13");
    }

    #[test]
    fn test_write_page_document() {
        let df = df! { "x" => [1.0f64, 2.0, 3.0] }.unwrap();
        let chart = ChartSpec::histogram(&df, "x", 2).unwrap();
        let writer = VegaLiteWriter::new();
        let json_str = writer
            .write(&page(vec![
                Section::chart("Histogram", chart),
                Section::error("Broken", "nope"),
            ]))
            .unwrap();
        let doc: Value = serde_json::from_str(&json_str).unwrap();

        assert_eq!(doc["title"], "Data Overview");
        assert_eq!(doc["page"], "overview");
        assert_eq!(doc["sections"][0]["kind"], "vega-lite");
        assert_eq!(
            doc["sections"][0]["spec"]["$schema"],
            "https://vega.github.io/schema/vega-lite/v6.json"
        );
        assert_eq!(doc["sections"][1]["kind"], "error");
        assert_eq!(doc["sections"][1]["message"], "nope");
    }

    #[test]
    fn test_write_all_and_compact() {
        let pages = vec![page(vec![]), Page::new(PageKind::Physical, vec![])];
        let json_str = VegaLiteWriter::new().compact().write_all(&pages).unwrap();
        assert!(!json_str.contains('\n'));
        let doc: Value = serde_json::from_str(&json_str).unwrap();
        assert_eq!(doc["pages"].as_array().unwrap().len(), 2);
        assert_eq!(doc["pages"][1]["title"], "House Attributes");
    }
}
