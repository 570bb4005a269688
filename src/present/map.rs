//! Map presentations: sampled sale markers and the price choropleth.

use super::colour::{ColorClass, ColorScale, CHOROPLETH_CLASSES, YL_OR_RD};
use crate::aggregate::{float_column, GroupAggregate, Metric};
use crate::reader::sales::date_from_epoch_days;
use crate::reader::BoundarySet;
use crate::{naming, DataFrame, HouselensError, Result};
use polars::prelude::*;
use serde::Serialize;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap, HashSet};

/// Choropleth polygon fill opacity.
pub const FILL_OPACITY: f64 = 0.7;

/// Choropleth polygon outline opacity.
pub const LINE_OPACITY: f64 = 0.2;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

/// Initial viewport of a map.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct MapFrame {
    /// `None` when there are no rows to center on
    pub center: Option<LatLon>,
    /// Web map zoom level; `None` fits the view to the drawn data
    pub zoom: Option<u8>,
}

/// Settings for the sampled marker map.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerSettings {
    pub sample_size: usize,
    pub seed: u64,
    pub zoom: Option<u8>,
    pub cluster_cell_degrees: f64,
}

impl Default for MarkerSettings {
    fn default() -> Self {
        Self {
            sample_size: 10,
            seed: 42,
            zoom: None,
            cluster_cell_degrees: 0.05,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub position: LatLon,
    pub label: String,
}

/// Markers sharing one grid cell.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerCluster {
    /// Mean position of the members
    pub center: LatLon,
    /// Indices into [`MarkerMap::markers`]
    pub members: Vec<usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MarkerMap {
    pub frame: MapFrame,
    pub markers: Vec<Marker>,
    pub clusters: Vec<MarkerCluster>,
}

/// One boundary polygon with its aggregated value.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilledRegion {
    pub zip: String,
    pub value: f64,
    pub fill: String,
    pub geometry: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChoroplethMap {
    pub frame: MapFrame,
    pub regions: Vec<FilledRegion>,
    pub classes: Vec<ColorClass>,
    pub legend: String,
    pub fill_opacity: f64,
    pub line_opacity: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "variant", rename_all = "lowercase")]
pub enum MapView {
    Markers(MarkerMap),
    Choropleth(ChoroplethMap),
}

// =============================================================================
// Center
// =============================================================================

/// Mean `lat`/`long` of `df`, or `None` without usable coordinates.
pub fn map_center(df: &DataFrame) -> Result<Option<LatLon>> {
    let lat = float_column(df, naming::LAT)?.mean();
    let lon = float_column(df, naming::LONG)?.mean();
    Ok(lat.zip(lon).map(|(lat, lon)| LatLon { lat, lon }))
}

// =============================================================================
// Markers
// =============================================================================

/// Sample up to `settings.sample_size` sales and place one labelled marker
/// per sale. The map is centered on the full `df`, not the sample.
pub fn marker_map(df: &DataFrame, settings: &MarkerSettings) -> Result<MarkerMap> {
    let frame = MapFrame {
        center: map_center(df)?,
        zoom: settings.zoom,
    };

    let n = settings.sample_size.min(df.height());
    let sample = if n == 0 {
        df.head(Some(0))
    } else {
        df.sample_n_literal(n, false, false, Some(settings.seed))
            .map_err(|e| HouselensError::InternalError(format!("Failed to sample sales: {}", e)))?
    };

    let markers = markers_for(&sample)?;
    let clusters = cluster_markers(&markers, settings.cluster_cell_degrees);
    tracing::debug!(
        markers = markers.len(),
        clusters = clusters.len(),
        "Built marker map"
    );

    Ok(MarkerMap {
        frame,
        markers,
        clusters,
    })
}

fn markers_for(df: &DataFrame) -> Result<Vec<Marker>> {
    let lat = float_column(df, naming::LAT)?;
    let lon = float_column(df, naming::LONG)?;
    let price = float_column(df, naming::PRICE)?;
    let living = float_column(df, naming::SQFT_LIVING)?;
    let bedrooms = float_column(df, naming::BEDROOMS)?;
    let bathrooms = float_column(df, naming::BATHROOMS)?;
    let yr_built = float_column(df, naming::YR_BUILT)?;
    let dates = date_strings(df)?;

    let mut markers = Vec::with_capacity(df.height());
    for row in 0..df.height() {
        let (Some(lat), Some(lon)) = (lat.get(row), lon.get(row)) else {
            continue;
        };
        let label = marker_label(&SaleSummary {
            price: price.get(row),
            date: dates[row].as_deref(),
            sqft_living: living.get(row),
            bedrooms: bedrooms.get(row),
            bathrooms: bathrooms.get(row),
            yr_built: yr_built.get(row),
        });
        markers.push(Marker {
            position: LatLon { lat, lon },
            label,
        });
    }
    Ok(markers)
}

fn date_strings(df: &DataFrame) -> Result<Vec<Option<String>>> {
    let column = df.column(naming::DATE).map_err(|_| {
        HouselensError::ValidationError(format!("Column '{}' not found", naming::DATE))
    })?;
    let series = column.as_materialized_series();
    if series.dtype() == &DataType::Date {
        let days = series
            .cast(&DataType::Int32)
            .map_err(|e| HouselensError::InternalError(format!("Invalid date column: {}", e)))?;
        let ca = days
            .i32()
            .map_err(|e| HouselensError::InternalError(format!("Invalid date column: {}", e)))?;
        Ok(ca
            .into_iter()
            .map(|d| d.map(|d| date_from_epoch_days(d).format("%Y-%m-%d").to_string()))
            .collect())
    } else {
        let text = series
            .cast(&DataType::String)
            .map_err(|e| HouselensError::InternalError(format!("Invalid date column: {}", e)))?;
        let ca = text
            .str()
            .map_err(|e| HouselensError::InternalError(format!("Invalid date column: {}", e)))?;
        Ok(ca.into_iter().map(|d| d.map(str::to_string)).collect())
    }
}

/// Fields shown in a marker popup.
#[derive(Debug, Clone, Copy, Default)]
pub struct SaleSummary<'a> {
    pub price: Option<f64>,
    pub date: Option<&'a str>,
    pub sqft_living: Option<f64>,
    pub bedrooms: Option<f64>,
    pub bathrooms: Option<f64>,
    pub yr_built: Option<f64>,
}

/// Popup text for one sale. Each field appears exactly once.
pub fn marker_label(sale: &SaleSummary<'_>) -> String {
    format!(
        "Sold R${} on: {}. Features: {} sqft, {} bedrooms, {} bathrooms, year built: {}",
        format_number(sale.price),
        sale.date.unwrap_or("-"),
        format_number(sale.sqft_living),
        format_number(sale.bedrooms),
        format_number(sale.bathrooms),
        format_number(sale.yr_built),
    )
}

fn format_number(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 && v.abs() < 1e15 => format!("{}", v as i64),
        Some(v) => format!("{}", v),
        None => "-".to_string(),
    }
}

/// Group markers by a square lat/lon grid. Clusters are ordered by cell and
/// members by marker index.
pub fn cluster_markers(markers: &[Marker], cell_degrees: f64) -> Vec<MarkerCluster> {
    let mut cells: BTreeMap<(i64, i64), Vec<usize>> = BTreeMap::new();
    for (idx, marker) in markers.iter().enumerate() {
        let cell = (
            (marker.position.lat / cell_degrees).floor() as i64,
            (marker.position.lon / cell_degrees).floor() as i64,
        );
        cells.entry(cell).or_default().push(idx);
    }

    cells
        .into_values()
        .map(|members| {
            let n = members.len() as f64;
            let (lat, lon) = members.iter().fold((0.0, 0.0), |(lat, lon), &i| {
                (lat + markers[i].position.lat, lon + markers[i].position.lon)
            });
            MarkerCluster {
                center: LatLon {
                    lat: lat / n,
                    lon: lon / n,
                },
                members,
            }
        })
        .collect()
}

// =============================================================================
// Choropleth
// =============================================================================

/// Mean price per zip code (`ZIP`, `PRICE`), sorted by zip.
pub fn price_by_zip(df: &DataFrame) -> Result<DataFrame> {
    GroupAggregate::by(naming::ZIPCODE)
        .key_label(naming::LABEL_ZIP)
        .metric(Metric::mean(naming::PRICE, naming::LABEL_PRICE))
        .run(df)
}

/// Color each boundary region by its zip's mean price.
///
/// Only regions whose zip code appears in the price aggregate are kept, in
/// boundary file order. Zip codes are compared on their normalized key.
pub fn choropleth_map(
    df: &DataFrame,
    boundaries: &BoundarySet,
    zoom: Option<u8>,
) -> Result<ChoroplethMap> {
    let aggregate = price_by_zip(df)?;
    choropleth_from_aggregate(&aggregate, boundaries, MapFrame {
        center: map_center(df)?,
        zoom,
    })
}

/// Build a choropleth from a precomputed `ZIP`/`PRICE` aggregate.
pub fn choropleth_from_aggregate(
    aggregate: &DataFrame,
    boundaries: &BoundarySet,
    frame: MapFrame,
) -> Result<ChoroplethMap> {
    let zips = aggregate
        .column(naming::LABEL_ZIP)
        .map_err(|_| {
            HouselensError::ValidationError(format!(
                "Aggregate has no '{}' column",
                naming::LABEL_ZIP
            ))
        })?
        .as_materialized_series()
        .cast(&DataType::String)
        .map_err(|e| HouselensError::InternalError(format!("Invalid zip column: {}", e)))?;
    let zips = zips
        .str()
        .map_err(|e| HouselensError::InternalError(format!("Invalid zip column: {}", e)))?;
    let prices = float_column(aggregate, naming::LABEL_PRICE)?;

    let values: HashMap<String, f64> = zips
        .into_iter()
        .zip(prices.into_iter())
        .filter_map(|(zip, price)| Some((naming::zip_key(zip?)?, price?)))
        .collect();

    let keys: HashSet<String> = values.keys().cloned().collect();
    let restricted = boundaries.restrict_to(&keys);

    let all_values: Vec<f64> = restricted.iter().filter_map(|r| values.get(&r.zip).copied()).collect();
    let scale = ColorScale::equal_width(&all_values, CHOROPLETH_CLASSES, YL_OR_RD)?;

    let regions: Vec<FilledRegion> = restricted
        .iter()
        .filter_map(|region| {
            let value = *values.get(&region.zip)?;
            Some(FilledRegion {
                zip: region.zip.clone(),
                value,
                fill: scale.color_for(value)?.to_string(),
                geometry: region.geometry.clone(),
            })
        })
        .collect();

    tracing::debug!(
        zips = values.len(),
        boundaries = boundaries.len(),
        regions = regions.len(),
        "Built choropleth"
    );

    Ok(ChoroplethMap {
        frame,
        regions,
        classes: scale.classes().to_vec(),
        legend: naming::LEGEND_AVG_PRICE.to_string(),
        fill_opacity: FILL_OPACITY,
        line_opacity: LINE_OPACITY,
    })
}
