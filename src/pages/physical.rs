use super::{Page, PageKind, PageSettings};
use crate::filter::{apply, Predicate};
use crate::present::{ChartSpec, Section};
use crate::{naming, Dataset, DataFrame, FilterOptions, Result};

/// Exclusive upper bounds for the attribute histograms. `None` leaves that
/// histogram unrestricted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PhysicalFilters {
    pub max_bedrooms: Option<f64>,
    pub max_bathrooms: Option<f64>,
    pub max_floors: Option<f64>,
    /// Only count waterfront houses in the water view histogram
    pub waterfront_only: bool,
}

impl PhysicalFilters {
    /// Each bound at the smallest value present, water view off.
    pub fn defaults(options: &FilterOptions) -> Self {
        Self {
            max_bedrooms: options.bedrooms.first().copied(),
            max_bathrooms: options.bathrooms.first().copied(),
            max_floors: options.floors.first().copied(),
            waterfront_only: false,
        }
    }
}

/// The "House Attributes" page.
pub fn physical(
    dataset: &Dataset,
    filters: &PhysicalFilters,
    settings: &PageSettings,
) -> Result<Page> {
    let sales = dataset.sales();
    let bins = &settings.charts;

    let less_than =
        |column: &str, max: Option<f64>| max.map(|value| Predicate::less_than(column, value));

    let sections = vec![
        histogram(
            sales,
            "Houses per bedrooms",
            naming::BEDROOMS,
            less_than(naming::BEDROOMS, filters.max_bedrooms),
            bins.bedroom_bins,
        )?,
        histogram(
            sales,
            "Houses per bathrooms",
            naming::BATHROOMS,
            less_than(naming::BATHROOMS, filters.max_bathrooms),
            bins.bathroom_bins,
        )?,
        histogram(
            sales,
            "Houses per floors",
            naming::FLOORS,
            less_than(naming::FLOORS, filters.max_floors),
            bins.floor_bins,
        )?,
        histogram(
            sales,
            "Houses per water view",
            naming::WATERFRONT,
            filters
                .waterfront_only
                .then(|| Predicate::equals(naming::WATERFRONT, 1i64)),
            bins.waterfront_bins,
        )?,
    ];

    Ok(Page::new(PageKind::Physical, sections))
}

fn histogram(
    sales: &DataFrame,
    header: &str,
    column: &str,
    predicate: Option<Predicate>,
    bins: usize,
) -> Result<Section> {
    let rows = match predicate {
        Some(p) => apply(sales, &[p])?,
        None => sales.clone(),
    };
    tracing::debug!(column, rows = rows.height(), "Attribute histogram");
    Ok(Section::chart(header, ChartSpec::histogram(&rows, column, bins)?))
}
