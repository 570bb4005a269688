use super::{Page, PageKind, PageSettings};
use crate::aggregate::{describe, GroupAggregate, Metric};
use crate::filter::{resolve, restrict_zipcodes, Selection};
use crate::present::Section;
use crate::{naming, Dataset, DataFrame, Result};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OverviewFilters {
    pub selection: Selection,
}

/// The "Data Overview" page.
///
/// The preview and descriptive statistics follow the full selection. The
/// per-zip averages only honor the zip-code subset, since they need `id`,
/// `price`, `sqft_living` and `price_per_area` whatever columns were chosen.
pub fn overview(
    dataset: &Dataset,
    filters: &OverviewFilters,
    settings: &PageSettings,
) -> Result<Page> {
    let sales = dataset.sales();
    let view = resolve(sales, &filters.selection)?;

    let preview = view.head(Some(settings.preview_rows));
    let averages = zip_averages(sales, &filters.selection.zipcodes)?;
    let statistics = describe(&view)?;

    tracing::debug!(
        rows = view.height(),
        columns = view.width(),
        zipcodes = averages.height(),
        "Built overview page"
    );

    Ok(Page::new(
        PageKind::Overview,
        vec![
            Section::table("Data Overview", preview),
            Section::table("Average Values", averages),
            Section::table("Descriptive Analysis", statistics),
        ],
    ))
}

fn zip_averages(sales: &DataFrame, zipcodes: &[String]) -> Result<DataFrame> {
    let rows = if zipcodes.is_empty() {
        sales.clone()
    } else {
        restrict_zipcodes(sales, zipcodes)?
    };

    GroupAggregate::by(naming::ZIPCODE)
        .key_label(naming::LABEL_ZIPCODE)
        .metric(Metric::count(naming::ID, naming::LABEL_TOTAL_HOUSES))
        .metric(Metric::mean(naming::PRICE, naming::LABEL_PRICE))
        .metric(Metric::mean(naming::SQFT_LIVING, naming::LABEL_SQFT_LIVING))
        .metric(Metric::mean(naming::PRICE_PER_AREA, naming::LABEL_PRICE_PER_AREA))
        .run(&rows)
}
