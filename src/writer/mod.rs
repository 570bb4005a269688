//! Output writer abstraction layer for houselens
//!
//! The writer module provides a pluggable interface for rendering report
//! pages into documents.
//!
//! # Architecture
//!
//! All writers implement the `Writer` trait, which provides:
//! - Page → Output conversion for a single page
//! - Pages → Output conversion for a multi-page document
//!
//! # Example
//!
//! ```rust,ignore
//! use houselens::writer::{HtmlWriter, Writer};
//!
//! let html = HtmlWriter::new().write_all(&pages)?;
//! std::fs::write("report.html", html)?;
//! ```

use crate::config::{OutputConfig, OutputFormat};
use crate::pages::Page;
use crate::Result;

pub mod html;
pub mod vegalite;

pub use html::HtmlWriter;
pub use vegalite::VegaLiteWriter;

/// Trait for report output writers
///
/// # Associated Types
///
/// * `Output` - The type returned by `write()` and `write_all()`. Text
///   writers use `String`.
pub trait Writer {
    /// The output type produced by this writer.
    type Output;

    /// Render one page.
    ///
    /// # Errors
    ///
    /// Returns `HouselensError::WriterError` if a section cannot be converted
    /// or serialization fails.
    fn write(&self, page: &Page) -> Result<Self::Output>;

    /// Render several pages into one document, in order.
    fn write_all(&self, pages: &[Page]) -> Result<Self::Output>;
}

/// Render `pages` as configured by the `[output]` section.
pub fn render_document(output: &OutputConfig, pages: &[Page]) -> Result<String> {
    match output.format {
        OutputFormat::Json => VegaLiteWriter::new().write_all(pages),
        OutputFormat::Html => HtmlWriter::new()
            .with_row_limit(output.html_row_limit)
            .write_all(pages),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pages::PageKind;
    use crate::present::Section;
    use polars::prelude::*;

    fn pages() -> Vec<Page> {
        let df = df! { "price" => [1.0f64, 2.0, 3.0] }.unwrap();
        vec![Page::new(
            PageKind::Overview,
            vec![Section::table("Data Overview", df)],
        )]
    }

    #[test]
    fn test_render_document_json() {
        let doc = render_document(&OutputConfig::default(), &pages()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&doc).unwrap();
        assert_eq!(value["pages"][0]["sections"][0]["kind"], "table");
    }

    #[test]
    fn test_render_document_html_row_limit() {
        let output = OutputConfig {
            format: OutputFormat::Html,
            html_row_limit: 1,
        };
        let doc = render_document(&output, &pages()).unwrap();
        assert!(doc.starts_with("<!DOCTYPE html>"));
        assert!(doc.contains("... 2 more rows"));
    }
}
