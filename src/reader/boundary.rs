//! Zip-code boundary regions parsed from GeoJSON.

use crate::{naming, HouselensError, Result};
use serde_json::{Map, Value};
use std::collections::HashSet;

/// One zip-code polygon from the boundary file.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryRegion {
    /// Normalized zip code (see [`naming::zip_key`])
    pub zip: String,
    /// Original feature properties
    pub properties: Map<String, Value>,
    /// GeoJSON geometry object, passed through untouched
    pub geometry: Value,
}

/// Ordered collection of boundary regions, in file order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundarySet {
    regions: Vec<BoundaryRegion>,
}

impl BoundarySet {
    pub fn new(regions: Vec<BoundaryRegion>) -> Self {
        Self { regions }
    }

    /// Parse GeoJSON text.
    pub fn parse(text: &str, zip_property: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text).map_err(|e| {
            HouselensError::ReaderError(format!("Boundary file is not valid JSON: {}", e))
        })?;
        Self::from_geojson(&value, zip_property)
    }

    /// Build from a parsed GeoJSON `FeatureCollection`.
    ///
    /// Features whose `zip_property` is missing or not a string/number are
    /// skipped with a warning.
    pub fn from_geojson(value: &Value, zip_property: &str) -> Result<Self> {
        if value.get("type").and_then(Value::as_str) != Some("FeatureCollection") {
            return Err(HouselensError::ReaderError(
                "Boundary file must be a GeoJSON FeatureCollection".to_string(),
            ));
        }
        let features = value
            .get("features")
            .and_then(Value::as_array)
            .ok_or_else(|| {
                HouselensError::ReaderError("FeatureCollection has no 'features' array".to_string())
            })?;

        let mut regions = Vec::with_capacity(features.len());
        for (idx, feature) in features.iter().enumerate() {
            let properties = feature
                .get("properties")
                .and_then(Value::as_object)
                .cloned()
                .unwrap_or_default();

            let Some(zip) = properties
                .get(zip_property)
                .and_then(naming::zip_key_from_json)
            else {
                tracing::warn!("Skipping boundary feature {}: no usable '{}'", idx, zip_property);
                continue;
            };

            let geometry = feature.get("geometry").cloned().unwrap_or(Value::Null);
            regions.push(BoundaryRegion {
                zip,
                properties,
                geometry,
            });
        }

        tracing::info!(regions = regions.len(), "Loaded boundary regions");
        Ok(Self { regions })
    }

    pub fn len(&self) -> usize {
        self.regions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BoundaryRegion> {
        self.regions.iter()
    }

    /// Regions whose zip code is in `zips`, keeping file order.
    pub fn restrict_to(&self, zips: &HashSet<String>) -> BoundarySet {
        BoundarySet {
            regions: self
                .regions
                .iter()
                .filter(|r| zips.contains(&r.zip))
                .cloned()
                .collect(),
        }
    }
}

/// Read boundary text from a local path or an `http(s)://` URL.
pub fn fetch(location: &str) -> Result<String> {
    if location.starts_with("http://") || location.starts_with("https://") {
        tracing::debug!("Fetching boundaries from {}", location);
        let response = reqwest::blocking::get(location)
            .and_then(|r| r.error_for_status())
            .map_err(|e| {
                HouselensError::ReaderError(format!("Failed to fetch {}: {}", location, e))
            })?;
        response.text().map_err(|e| {
            HouselensError::ReaderError(format!("Failed to read body of {}: {}", location, e))
        })
    } else {
        std::fs::read_to_string(location)
            .map_err(|e| HouselensError::ReaderError(format!("Failed to read {}: {}", location, e)))
    }
}
