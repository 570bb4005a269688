//! Presentation shapes
//!
//! Every page section is one of three shapes: a table passed through as-is,
//! a map (sampled markers or a price choropleth) or a chart (line or
//! histogram). Writers consume these without touching the sales data again.

mod chart;
pub mod colour;
mod map;

pub use chart::{ChartKind, ChartSpec};
pub use map::{
    choropleth_from_aggregate, choropleth_map, cluster_markers, map_center, marker_label,
    marker_map, price_by_zip, ChoroplethMap, FilledRegion, LatLon, MapFrame, MapView, Marker,
    MarkerCluster, MarkerMap, MarkerSettings, SaleSummary, FILL_OPACITY, LINE_OPACITY,
};

use crate::DataFrame;

/// Body of one page section.
#[derive(Debug, Clone)]
pub enum Presentation {
    Table(DataFrame),
    Map(MapView),
    Chart(ChartSpec),
    /// The section could not be built
    Error(String),
}

impl PartialEq for Presentation {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Presentation::Table(a), Presentation::Table(b)) => a.equals_missing(b),
            (Presentation::Map(a), Presentation::Map(b)) => a == b,
            (Presentation::Chart(a), Presentation::Chart(b)) => a == b,
            (Presentation::Error(a), Presentation::Error(b)) => a == b,
            _ => false,
        }
    }
}

impl Presentation {
    pub fn kind_name(&self) -> &'static str {
        match self {
            Presentation::Table(_) => "table",
            Presentation::Map(_) => "map",
            Presentation::Chart(_) => "chart",
            Presentation::Error(_) => "error",
        }
    }
}

/// A headed block of a page.
#[derive(Debug, Clone, PartialEq)]
pub struct Section {
    pub header: String,
    pub body: Presentation,
}

impl Section {
    pub fn new(header: impl Into<String>, body: Presentation) -> Self {
        Self {
            header: header.into(),
            body,
        }
    }

    pub fn table(header: impl Into<String>, df: DataFrame) -> Self {
        Self::new(header, Presentation::Table(df))
    }

    pub fn map(header: impl Into<String>, map: MapView) -> Self {
        Self::new(header, Presentation::Map(map))
    }

    pub fn chart(header: impl Into<String>, chart: ChartSpec) -> Self {
        Self::new(header, Presentation::Chart(chart))
    }

    pub fn error(header: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(header, Presentation::Error(message.into()))
    }
}
