//! Line and histogram specs.

use super::dataframe_to_values;
use crate::present::{ChartKind, ChartSpec};
use crate::{naming, HouselensError, Result};
use polars::prelude::DataType;
use serde_json::{json, Value};

pub(super) fn chart_spec(schema: &str, chart: &ChartSpec) -> Result<Value> {
    let mut spec = json!({
        "$schema": schema,
        "width": "container",
        "height": 400,
        "data": { "values": dataframe_to_values(&chart.data)? },
    });

    match chart.kind {
        ChartKind::Line => {
            let x_type = field_type(chart, &chart.x)?;
            spec["mark"] = json!({ "type": "line", "point": true, "tooltip": true });
            spec["encoding"] = json!({
                "x": { "field": chart.x, "type": x_type, "title": chart.x },
                "y": { "field": chart.y, "type": "quantitative", "title": chart.y },
            });
        }
        ChartKind::Histogram { .. } => {
            spec["mark"] = json!({ "type": "bar", "tooltip": true });
            spec["encoding"] = json!({
                "x": {
                    "field": naming::BIN_START,
                    "type": "quantitative",
                    "bin": { "binned": true },
                    "title": chart.x,
                },
                "x2": { "field": naming::BIN_END },
                "y": { "field": naming::BIN_COUNT, "type": "quantitative", "title": "count" },
            });
        }
    }

    Ok(spec)
}

fn field_type(chart: &ChartSpec, field: &str) -> Result<&'static str> {
    let column = chart.data.column(field).map_err(|_| {
        HouselensError::WriterError(format!("Chart column '{}' not found", field))
    })?;
    Ok(match column.dtype() {
        DataType::Date | DataType::Datetime(_, _) => "temporal",
        DataType::String => "nominal",
        _ => "quantitative",
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;

    const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v6.json";

    #[test]
    fn test_line_chart_quantitative_x() {
        let df = df! { "yr_built" => [1950i64, 1960], "price" => [1.0f64, 2.0] }.unwrap();
        let chart = ChartSpec::mean_line(&df, "yr_built", "price").unwrap();
        let spec = chart_spec(SCHEMA, &chart).unwrap();
        assert_eq!(spec["mark"]["type"], "line");
        assert_eq!(spec["encoding"]["x"]["field"], "yr_built");
        assert_eq!(spec["encoding"]["x"]["type"], "quantitative");
        assert_eq!(spec["data"]["values"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_line_chart_temporal_x() {
        let dates = Series::new("date".into(), [16000i32, 16001])
            .cast(&DataType::Date)
            .unwrap();
        let mut df = df! { "price" => [1.0f64, 2.0] }.unwrap();
        df.with_column(dates).unwrap();
        let chart = ChartSpec::mean_line(&df, "date", "price").unwrap();
        let spec = chart_spec(SCHEMA, &chart).unwrap();
        assert_eq!(spec["encoding"]["x"]["type"], "temporal");
    }

    #[test]
    fn test_histogram_bar_edges() {
        let df = df! { "price" => [1.0f64, 2.0, 3.0] }.unwrap();
        let chart = ChartSpec::histogram(&df, "price", 2).unwrap();
        let spec = chart_spec(SCHEMA, &chart).unwrap();
        assert_eq!(spec["mark"]["type"], "bar");
        assert_eq!(spec["encoding"]["x"]["field"], "bin_start");
        assert_eq!(spec["encoding"]["x"]["bin"]["binned"], true);
        assert_eq!(spec["encoding"]["x2"]["field"], "bin_end");
        assert_eq!(spec["encoding"]["y"]["field"], "count");
        assert_eq!(spec["data"]["values"][1]["count"], 2);
    }
}
