/*!
# houselens - Real-Estate Sales Report Pages

Turns a housing sales table and a zip-code boundary file into four report
pages: a data overview, a regional map view, commercial trend charts and
physical-attribute histograms.

## Example

```rust,ignore
use houselens::config::DataConfig;
use houselens::pages::{self, CommercialFilters, PageSettings};
use houselens::reader::Dataset;
use houselens::writer::{VegaLiteWriter, Writer};

let dataset = Dataset::load(&DataConfig::default())?;
let options = dataset.filter_options()?;
let page = pages::commercial(
    &dataset,
    &CommercialFilters::defaults(&options),
    &PageSettings::default(),
)?;
let json = VegaLiteWriter::new().write(&page)?;
```

## Architecture

Every page runs the same pipeline against the immutable [`reader::Dataset`]:
- **Filter** → [`filter`] restricts rows and columns from explicit filter values
- **Aggregate** → [`aggregate`] computes per-group and per-column summaries
- **Present** → [`present`] shapes results into tables, maps and charts
- **Write** → [`writer`] renders pages as Vega-Lite JSON or standalone HTML

## Core Components

- [`reader`] - CSV + GeoJSON loading into a [`reader::Dataset`]
- [`derive`] - the `price_per_area` column
- [`filter`] - selections, threshold predicates and filter domains
- [`aggregate`] - group, descriptive and histogram aggregation
- [`present`] - presentation shapes
- [`pages`] - the four report pages
- [`writer`] - output writers
*/

pub mod aggregate;
pub mod config;
pub mod derive;
pub mod filter;
pub mod naming;
pub mod pages;
pub mod present;
pub mod reader;
pub mod writer;

// Re-export key types for convenience
pub use filter::{FilterOptions, Predicate, Selection, Threshold};
pub use pages::{Page, PageKind};
pub use present::{ChartKind, ChartSpec, MapView, Presentation, Section};
pub use reader::{BoundaryRegion, BoundarySet, Dataset};

// DataFrame abstraction (wraps Polars)
pub use polars::prelude::DataFrame;

/// Main library error type
#[derive(thiserror::Error, Debug)]
pub enum HouselensError {
    #[error("Data source error: {0}")]
    ReaderError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Aggregation error: {0}")]
    AggregationError(String),

    #[error("Output generation error: {0}")]
    WriterError(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type Result<T> = std::result::Result<T, HouselensError>;

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod integration_tests {
    use super::*;
    use crate::pages::{
        CommercialFilters, OverviewFilters, PageSettings, PhysicalFilters, RegionFilters,
    };
    use crate::writer::{VegaLiteWriter, Writer};
    use polars::prelude::*;
    use serde_json::{json, Value};

    fn sample_dataset() -> Dataset {
        let sales = df! {
            "id" => [1i64, 2, 3, 4],
            "date" => ["20140502T000000", "20140601T000000", "20140710T000000", "20150101T000000"],
            "price" => [221900.0f64, 538000.0, 180000.0, 604000.0],
            "bedrooms" => [3i64, 3, 2, 4],
            "bathrooms" => [1.0f64, 2.25, 1.0, 3.0],
            "sqft_living" => [1180i64, 2570, 770, 1960],
            "sqft_lot" => [5650i64, 7242, 10000, 5000],
            "floors" => [1.0f64, 2.0, 1.0, 1.0],
            "waterfront" => [0i64, 0, 1, 0],
            "yr_built" => [1955i64, 1951, 1933, 1965],
            "zipcode" => [98178i64, 98125, 98028, 98178],
            "lat" => [47.5112f64, 47.721, 47.7379, 47.5208],
            "long" => [-122.257f64, -122.319, -122.233, -122.393],
        }
        .unwrap();

        let geojson = json!({
            "type": "FeatureCollection",
            "features": [
                {"type": "Feature", "properties": {"ZIP": 98178},
                 "geometry": {"type": "Polygon", "coordinates": [[[-122.3, 47.5], [-122.2, 47.5], [-122.2, 47.6], [-122.3, 47.5]]]}},
                {"type": "Feature", "properties": {"ZIP": "98125"},
                 "geometry": {"type": "Polygon", "coordinates": [[[-122.4, 47.7], [-122.3, 47.7], [-122.3, 47.8], [-122.4, 47.7]]]}},
                {"type": "Feature", "properties": {"ZIP": 98001},
                 "geometry": {"type": "Polygon", "coordinates": [[[-122.3, 47.3], [-122.2, 47.3], [-122.2, 47.4], [-122.3, 47.3]]]}}
            ]
        });
        let boundaries = BoundarySet::from_geojson(&geojson, naming::BOUNDARY_ZIP_PROPERTY).unwrap();

        Dataset::new(sales, boundaries).unwrap()
    }

    #[test]
    fn test_end_to_end_all_pages_render() {
        let dataset = sample_dataset();
        let options = dataset.filter_options().unwrap();
        let settings = PageSettings::default();

        let pages = vec![
            pages::overview(&dataset, &OverviewFilters::default(), &settings).unwrap(),
            pages::region(&dataset, &RegionFilters::default(), &settings).unwrap(),
            pages::commercial(&dataset, &CommercialFilters::defaults(&options), &settings)
                .unwrap(),
            pages::physical(&dataset, &PhysicalFilters::defaults(&options), &settings).unwrap(),
        ];

        let writer = VegaLiteWriter::new();
        let json_str = writer.write_all(&pages).unwrap();
        let doc: Value = serde_json::from_str(&json_str).unwrap();
        let rendered = doc["pages"].as_array().unwrap();
        assert_eq!(rendered.len(), 4);
        assert_eq!(rendered[0]["title"], "Data Overview");
        assert_eq!(rendered[3]["title"], "House Attributes");
    }

    #[test]
    fn test_end_to_end_choropleth_uses_csv_int_zips_against_mixed_geojson_keys() {
        let dataset = sample_dataset();
        let page = pages::region(&dataset, &RegionFilters::default(), &PageSettings::default())
            .unwrap();

        let choropleth = page
            .sections
            .iter()
            .find_map(|s| match &s.body {
                Presentation::Map(MapView::Choropleth(c)) => Some(c),
                _ => None,
            })
            .unwrap();

        let mut zips: Vec<&str> = choropleth.regions.iter().map(|r| r.zip.as_str()).collect();
        zips.sort_unstable();
        // 98028 has sales but no boundary, 98001 has a boundary but no sales
        assert_eq!(zips, vec!["98125", "98178"]);
    }

    #[test]
    fn test_end_to_end_pages_are_idempotent() {
        let dataset = sample_dataset();
        let settings = PageSettings::default();
        let filters = RegionFilters::default();

        let writer = VegaLiteWriter::new();
        let first = writer
            .write(&pages::region(&dataset, &filters, &settings).unwrap())
            .unwrap();
        let second = writer
            .write(&pages::region(&dataset, &filters, &settings).unwrap())
            .unwrap();
        assert_eq!(first, second);
    }
}
