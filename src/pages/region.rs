use super::{Page, PageKind, PageSettings};
use crate::filter::restrict_zipcodes;
use crate::present::{choropleth_map, marker_map, MapView, Section};
use crate::{Dataset, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegionFilters {
    /// Restrict both maps to these zip codes; empty means all.
    pub zipcodes: Vec<String>,
    /// Overrides the configured marker sample seed.
    pub seed: Option<u64>,
}

/// The "Region Overview" page: a sampled marker map and the mean price
/// choropleth, both centered on the (restricted) sales.
pub fn region(dataset: &Dataset, filters: &RegionFilters, settings: &PageSettings) -> Result<Page> {
    let sales = if filters.zipcodes.is_empty() {
        dataset.sales().clone()
    } else {
        restrict_zipcodes(dataset.sales(), &filters.zipcodes)?
    };

    let mut marker_settings = settings.markers;
    if let Some(seed) = filters.seed {
        marker_settings.seed = seed;
    }

    let markers = marker_map(&sales, &marker_settings)?;
    let choropleth = choropleth_map(&sales, dataset.boundaries(), settings.markers.zoom)?;

    tracing::debug!(
        rows = sales.height(),
        markers = markers.markers.len(),
        regions = choropleth.regions.len(),
        "Built region page"
    );

    Ok(Page::new(
        PageKind::Region,
        vec![
            Section::map("Portfolio Density", MapView::Markers(markers)),
            Section::map("Price Density", MapView::Choropleth(choropleth)),
        ],
    ))
}
