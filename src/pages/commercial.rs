use super::{Page, PageKind, PageSettings};
use crate::filter::{apply, Predicate};
use crate::present::{ChartSpec, Section};
use crate::{naming, Dataset, DataFrame, FilterOptions, Result};
use chrono::NaiveDate;

/// Upper bounds for the commercial charts. `None` leaves that chart
/// unrestricted; each bound is exclusive.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CommercialFilters {
    pub max_year_built: Option<i64>,
    pub max_date: Option<NaiveDate>,
    pub max_price: Option<f64>,
}

impl CommercialFilters {
    /// Year and date at their minimum, price at the truncated mean.
    pub fn defaults(options: &FilterOptions) -> Self {
        Self {
            max_year_built: options.year_built.map(|(min, _)| min),
            max_date: options.date.map(|(min, _)| min),
            max_price: options.price.map(|p| p.mean.trunc()),
        }
    }
}

/// The "Commercial Attributes" page.
pub fn commercial(
    dataset: &Dataset,
    filters: &CommercialFilters,
    settings: &PageSettings,
) -> Result<Page> {
    let sales = dataset.sales();

    let by_year = below(
        sales,
        filters
            .max_year_built
            .map(|year| Predicate::less_than(naming::YR_BUILT, year)),
    )?;
    let by_date = below(
        sales,
        filters
            .max_date
            .map(|date| Predicate::less_than(naming::DATE, date)),
    )?;
    let by_price = below(
        sales,
        filters
            .max_price
            .map(|price| Predicate::less_than(naming::PRICE, price)),
    )?;

    let sections = vec![
        Section::chart(
            "Average price per year built",
            ChartSpec::mean_line(&by_year, naming::YR_BUILT, naming::PRICE)?,
        ),
        Section::chart(
            "Average Price per day",
            ChartSpec::mean_line(&by_date, naming::DATE, naming::PRICE)?,
        ),
        Section::chart(
            "Price Distribution",
            ChartSpec::histogram(&by_price, naming::PRICE, settings.charts.price_bins)?,
        ),
    ];

    Ok(Page::new(PageKind::Commercial, sections))
}

fn below(sales: &DataFrame, predicate: Option<Predicate>) -> Result<DataFrame> {
    let Some(predicate) = predicate else {
        return Ok(sales.clone());
    };
    let out = apply(sales, std::slice::from_ref(&predicate))?;
    tracing::debug!(column = predicate.column(), rows = out.height(), "Commercial filter");
    Ok(out)
}
