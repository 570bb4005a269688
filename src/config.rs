//! Configuration file handling.
//!
//! Settings are read from a `houselens.toml` file. Every key has a default,
//! so an empty file (or no file at all) is a valid configuration.

use crate::{naming, HouselensError, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const DEFAULT_CONFIG_FILE: &str = "houselens.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct Config {
    /// Input locations.
    #[serde(default)]
    pub data: DataConfig,

    /// Overview page settings.
    #[serde(default)]
    pub overview: OverviewConfig,

    /// Region page settings.
    #[serde(default)]
    pub region: RegionConfig,

    /// Histogram bin counts.
    #[serde(default)]
    pub charts: ChartConfig,

    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Where the sales table and the boundary file come from.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DataConfig {
    /// Path of the sales CSV.
    #[serde(default = "default_sales_path")]
    pub sales_path: String,

    /// Path or `http(s)://` URL of the GeoJSON boundary file.
    #[serde(default = "default_boundaries")]
    pub boundaries: String,

    /// Feature property holding the zip code.
    #[serde(default = "default_zip_property")]
    pub zip_property: String,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            sales_path: default_sales_path(),
            boundaries: default_boundaries(),
            zip_property: default_zip_property(),
        }
    }
}

fn default_sales_path() -> String {
    "kc_house_data.csv".to_string()
}

fn default_boundaries() -> String {
    "https://opendata.arcgis.com/datasets/83fc2e72903343aabff6de8cb445b81c_2.geojson".to_string()
}

fn default_zip_property() -> String {
    naming::BOUNDARY_ZIP_PROPERTY.to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OverviewConfig {
    /// Rows shown in the data preview table.
    #[serde(default = "default_preview_rows")]
    pub preview_rows: usize,
}

impl Default for OverviewConfig {
    fn default() -> Self {
        Self {
            preview_rows: default_preview_rows(),
        }
    }
}

fn default_preview_rows() -> usize {
    5
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RegionConfig {
    /// Number of sales sampled onto the density map.
    #[serde(default = "default_sample_size")]
    pub sample_size: usize,

    /// Seed for the marker sample.
    #[serde(default = "default_seed")]
    pub seed: u64,

    /// Web map zoom level of both maps. Unset fits each map to its data.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub zoom: Option<u8>,

    /// Side of the square grid cell markers are clustered into, in degrees.
    #[serde(default = "default_cluster_cell_degrees")]
    pub cluster_cell_degrees: f64,
}

impl Default for RegionConfig {
    fn default() -> Self {
        Self {
            sample_size: default_sample_size(),
            seed: default_seed(),
            zoom: None,
            cluster_cell_degrees: default_cluster_cell_degrees(),
        }
    }
}

fn default_sample_size() -> usize {
    10
}

fn default_seed() -> u64 {
    42
}

fn default_cluster_cell_degrees() -> f64 {
    0.05
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ChartConfig {
    #[serde(default = "default_price_bins")]
    pub price_bins: usize,

    #[serde(default = "default_bedroom_bins")]
    pub bedroom_bins: usize,

    #[serde(default = "default_bathroom_bins")]
    pub bathroom_bins: usize,

    #[serde(default = "default_floor_bins")]
    pub floor_bins: usize,

    #[serde(default = "default_waterfront_bins")]
    pub waterfront_bins: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            price_bins: default_price_bins(),
            bedroom_bins: default_bedroom_bins(),
            bathroom_bins: default_bathroom_bins(),
            floor_bins: default_floor_bins(),
            waterfront_bins: default_waterfront_bins(),
        }
    }
}

fn default_price_bins() -> usize {
    50
}

fn default_bedroom_bins() -> usize {
    19
}

fn default_bathroom_bins() -> usize {
    10
}

fn default_floor_bins() -> usize {
    19
}

fn default_waterfront_bins() -> usize {
    10
}

/// Rendered document format.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Json,
    Html,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Rows shown per HTML table before a "more rows" marker.
    #[serde(default = "default_html_row_limit")]
    pub html_row_limit: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::default(),
            html_row_limit: default_html_row_limit(),
        }
    }
}

fn default_html_row_limit() -> usize {
    100
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            HouselensError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)
            .map_err(|e| HouselensError::ConfigError(format!("Invalid config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load `houselens.toml` from the working directory if it exists.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(DEFAULT_CONFIG_FILE);
        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Reject settings no page can work with.
    pub fn validate(&self) -> Result<()> {
        let bins = [
            ("price_bins", self.charts.price_bins),
            ("bedroom_bins", self.charts.bedroom_bins),
            ("bathroom_bins", self.charts.bathroom_bins),
            ("floor_bins", self.charts.floor_bins),
            ("waterfront_bins", self.charts.waterfront_bins),
        ];
        if let Some((name, _)) = bins.iter().find(|(_, n)| *n == 0) {
            return Err(HouselensError::ConfigError(format!(
                "charts.{} must be at least 1",
                name
            )));
        }
        let cell = self.region.cluster_cell_degrees;
        if cell.is_nan() || cell <= 0.0 {
            return Err(HouselensError::ConfigError(
                "region.cluster_cell_degrees must be positive".to_string(),
            ));
        }
        Ok(())
    }

    /// Default configuration rendered as TOML.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}
