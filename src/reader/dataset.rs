//! The immutable base table and boundary collection shared by all pages.

use super::{sales, BoundarySet, FileReader, Reader};
use crate::config::DataConfig;
use crate::filter::FilterOptions;
use crate::{derive, DataFrame, Result};

/// Loaded, normalized inputs.
///
/// Built once at startup and borrowed by every report page. Nothing in the
/// crate mutates a `Dataset` after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    sales: DataFrame,
    boundaries: BoundarySet,
}

impl Dataset {
    /// Build from raw in-memory inputs, applying sale normalization and the
    /// derived `price_per_area` column.
    pub fn new(sales: DataFrame, boundaries: BoundarySet) -> Result<Self> {
        let normalized = sales::normalize(&sales)?;
        let sales = derive::with_price_per_area(&normalized)?;
        Ok(Self { sales, boundaries })
    }

    /// Read both inputs through `reader`.
    pub fn from_reader(reader: &dyn Reader) -> Result<Self> {
        let sales = reader.read_sales()?;
        let boundaries = reader.read_boundaries()?;
        Self::new(sales, boundaries)
    }

    /// Read both inputs from the configured file locations.
    pub fn load(config: &DataConfig) -> Result<Self> {
        Self::from_reader(&FileReader::new(config.clone()))
    }

    /// Sale records with derived columns.
    pub fn sales(&self) -> &DataFrame {
        &self.sales
    }

    pub fn boundaries(&self) -> &BoundarySet {
        &self.boundaries
    }

    /// Value domains for building filters against this dataset.
    pub fn filter_options(&self) -> Result<FilterOptions> {
        FilterOptions::from_table(&self.sales)
    }
}
