//! Report pages
//!
//! Each page is a pure function of the dataset, its filter struct and the
//! page settings. Pages never mutate the dataset, so any number of them can
//! be built from one load.
//!
//! | page                        | sections                                            |
//! |-----------------------------|-----------------------------------------------------|
//! | [`overview`] "Data Overview" | preview table, averages per zip, descriptive stats |
//! | [`region`] "Region Overview" | sampled marker map, price choropleth               |
//! | [`commercial`]               | price per year built, price per day, price histogram |
//! | [`physical`]                 | bedroom, bathroom, floor and water view histograms |

mod commercial;
mod overview;
mod physical;
mod region;

pub use commercial::{commercial, CommercialFilters};
pub use overview::{overview, OverviewFilters};
pub use physical::{physical, PhysicalFilters};
pub use region::{region, RegionFilters};

use crate::config::{ChartConfig, Config};
use crate::present::{MarkerSettings, Section};
use crate::{Dataset, FilterOptions, HouselensError, Result};
use std::fmt;
use std::str::FromStr;

/// Which report view a [`Page`] shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    Overview,
    Region,
    Commercial,
    Physical,
}

impl PageKind {
    pub const ALL: [PageKind; 4] = [
        PageKind::Overview,
        PageKind::Region,
        PageKind::Commercial,
        PageKind::Physical,
    ];

    pub fn title(&self) -> &'static str {
        match self {
            PageKind::Overview => "Data Overview",
            PageKind::Region => "Region Overview",
            PageKind::Commercial => "Commercial Attributes",
            PageKind::Physical => "House Attributes",
        }
    }

    /// Stable identifier used for CLI arguments and HTML anchors.
    pub fn slug(&self) -> &'static str {
        match self {
            PageKind::Overview => "overview",
            PageKind::Region => "region",
            PageKind::Commercial => "commercial",
            PageKind::Physical => "physical",
        }
    }
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

impl FromStr for PageKind {
    type Err = HouselensError;

    fn from_str(s: &str) -> Result<Self> {
        PageKind::ALL
            .into_iter()
            .find(|kind| kind.slug().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| {
                HouselensError::ValidationError(format!(
                    "Unknown page '{}', expected one of: overview, region, commercial, physical",
                    s
                ))
            })
    }
}

/// One rendered report view.
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    pub kind: PageKind,
    pub title: String,
    pub sections: Vec<Section>,
}

impl Page {
    pub fn new(kind: PageKind, sections: Vec<Section>) -> Self {
        Self {
            kind,
            title: kind.title().to_string(),
            sections,
        }
    }

    /// A page whose only section reports why it could not be built.
    pub fn failed(kind: PageKind, error: &HouselensError) -> Self {
        Self::new(kind, vec![Section::error(kind.title(), error.to_string())])
    }
}

/// Settings shared by all pages, taken from [`Config`].
#[derive(Debug, Clone, PartialEq)]
pub struct PageSettings {
    pub preview_rows: usize,
    pub markers: MarkerSettings,
    pub charts: ChartConfig,
}

impl Default for PageSettings {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl PageSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            preview_rows: config.overview.preview_rows,
            markers: MarkerSettings {
                sample_size: config.region.sample_size,
                seed: config.region.seed,
                zoom: config.region.zoom,
                cluster_cell_degrees: config.region.cluster_cell_degrees,
            },
            charts: config.charts.clone(),
        }
    }
}

/// Filters for every page, for callers that render more than one.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageFilters {
    pub overview: OverviewFilters,
    pub region: RegionFilters,
    pub commercial: CommercialFilters,
    pub physical: PhysicalFilters,
}

impl PageFilters {
    /// Default filters for every page, drawn from `options`.
    pub fn defaults(options: &FilterOptions) -> Self {
        Self {
            overview: OverviewFilters::default(),
            region: RegionFilters::default(),
            commercial: CommercialFilters::defaults(options),
            physical: PhysicalFilters::defaults(options),
        }
    }
}

/// Build the page of the given kind.
pub fn render(
    dataset: &Dataset,
    kind: PageKind,
    filters: &PageFilters,
    settings: &PageSettings,
) -> Result<Page> {
    match kind {
        PageKind::Overview => overview(dataset, &filters.overview, settings),
        PageKind::Region => region(dataset, &filters.region, settings),
        PageKind::Commercial => commercial(dataset, &filters.commercial, settings),
        PageKind::Physical => physical(dataset, &filters.physical, settings),
    }
}

/// Build each page in `kinds`. A page that fails is replaced by a
/// [`Page::failed`] page and the rest are still built.
pub fn render_all(
    dataset: &Dataset,
    kinds: &[PageKind],
    filters: &PageFilters,
    settings: &PageSettings,
) -> Vec<Page> {
    kinds
        .iter()
        .map(|&kind| {
            render(dataset, kind, filters, settings).unwrap_or_else(|e| {
                tracing::warn!(page = %kind, error = %e, "Page failed");
                Page::failed(kind, &e)
            })
        })
        .collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::Selection;
    use crate::present::Presentation;

    #[test]
    fn test_page_kind_parse() {
        assert_eq!("region".parse::<PageKind>().unwrap(), PageKind::Region);
        assert_eq!("Physical".parse::<PageKind>().unwrap(), PageKind::Physical);
        assert!("sales".parse::<PageKind>().is_err());
    }

    #[test]
    fn test_settings_from_config() {
        let mut config = Config::default();
        config.region.sample_size = 3;
        config.charts.price_bins = 20;
        let settings = PageSettings::from_config(&config);
        assert_eq!(settings.markers.sample_size, 3);
        assert_eq!(settings.charts.price_bins, 20);
        assert_eq!(settings.preview_rows, 5);
    }

    #[test]
    fn test_render_all_reports_failed_page() {
        let dataset = test_support::dataset();
        let options = dataset.filter_options().unwrap();
        let mut filters = PageFilters::defaults(&options);
        filters.overview.selection = Selection::new().with_columns(["no_such_column"]);

        let pages = render_all(&dataset, &PageKind::ALL, &filters, &PageSettings::default());
        assert_eq!(pages.len(), 4);
        assert!(matches!(pages[0].sections[0].body, Presentation::Error(_)));
        assert_eq!(pages[0].title, "Data Overview");
        for page in &pages[1..] {
            assert!(page
                .sections
                .iter()
                .all(|s| !matches!(s.body, Presentation::Error(_))));
        }
    }
}
