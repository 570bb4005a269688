//! Data source layer for houselens
//!
//! The reader module loads the two inputs every report page works from: the
//! sales table (a Polars DataFrame) and the zip-code boundary collection.
//!
//! # Architecture
//!
//! All readers implement the `Reader` trait, which provides:
//! - Sales table loading → DataFrame
//! - Boundary loading → [`BoundarySet`]
//!
//! Loading happens once. [`Dataset`] normalizes and derives columns and then
//! hands out shared borrows for the rest of the process.
//!
//! # Example
//!
//! ```rust,ignore
//! use houselens::config::DataConfig;
//! use houselens::reader::{Dataset, FileReader};
//!
//! let reader = FileReader::new(DataConfig::default());
//! let dataset = Dataset::from_reader(&reader)?;
//! println!("{} sales", dataset.sales().height());
//! ```

use crate::config::DataConfig;
use crate::{DataFrame, Result};

pub mod boundary;
pub mod sales;

mod dataset;

pub use boundary::{BoundaryRegion, BoundarySet};
pub use dataset::Dataset;

/// Trait for data source readers
///
/// Readers return raw inputs; [`Dataset::from_reader`] applies normalization
/// and the derived columns.
pub trait Reader {
    /// Read the sales table
    ///
    /// # Errors
    ///
    /// Returns `HouselensError::ReaderError` if the source is missing or malformed
    fn read_sales(&self) -> Result<DataFrame>;

    /// Read the zip-code boundary collection
    ///
    /// # Errors
    ///
    /// Returns `HouselensError::ReaderError` if the source cannot be fetched or
    /// is not a GeoJSON FeatureCollection
    fn read_boundaries(&self) -> Result<BoundarySet>;
}

/// Reader backed by a CSV path and a GeoJSON path or URL.
#[derive(Debug, Clone)]
pub struct FileReader {
    config: DataConfig,
}

impl FileReader {
    pub fn new(config: DataConfig) -> Self {
        Self { config }
    }
}

impl Reader for FileReader {
    fn read_sales(&self) -> Result<DataFrame> {
        sales::read_csv(std::path::Path::new(&self.config.sales_path))
    }

    fn read_boundaries(&self) -> Result<BoundarySet> {
        let text = boundary::fetch(&self.config.boundaries)?;
        BoundarySet::parse(&text, &self.config.zip_property)
    }
}
