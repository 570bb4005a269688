//! Standalone HTML writer
//!
//! Produces one HTML document with a navigation list of page anchors, a
//! `<section>` per page, HTML tables for table sections and vega-embed
//! containers for chart and map sections.

use super::vegalite::VegaLiteWriter;
use crate::pages::Page;
use crate::present::{Presentation, Section};
use crate::writer::Writer;
use crate::{DataFrame, HouselensError, Result};
use polars::prelude::AnyValue;
use std::fmt::Write as _;

const VEGA_SCRIPTS: [&str; 3] = [
    "https://cdn.jsdelivr.net/npm/vega@6",
    "https://cdn.jsdelivr.net/npm/vega-lite@6.4.1",
    "https://cdn.jsdelivr.net/npm/vega-embed@7",
];

/// HTML writer
pub struct HtmlWriter {
    specs: VegaLiteWriter,
    /// Rows rendered per table before truncation
    row_limit: usize,
}

impl HtmlWriter {
    pub fn new() -> Self {
        Self {
            specs: VegaLiteWriter::new(),
            row_limit: 100,
        }
    }

    pub fn with_row_limit(mut self, row_limit: usize) -> Self {
        self.row_limit = row_limit;
        self
    }

    fn document(&self, title: &str, pages: &[Page]) -> Result<String> {
        let mut html = String::new();
        html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"utf-8\">\n");
        push(&mut html, format_args!("<title>{}</title>\n", escape_html(title)))?;
        for src in VEGA_SCRIPTS {
            push(&mut html, format_args!("<script src=\"{}\"></script>\n", src))?;
        }
        html.push_str(STYLE);
        html.push_str("</head>\n<body>\n");

        html.push_str("<nav>\n<ul>\n");
        for page in pages {
            push(
                &mut html,
                format_args!(
                    "<li><a href=\"#{}\">{}</a></li>\n",
                    page.kind.slug(),
                    escape_html(&page.title)
                ),
            )?;
        }
        html.push_str("</ul>\n</nav>\n");

        let mut vis_count = 0usize;
        for page in pages {
            self.page(&mut html, page, &mut vis_count)?;
        }

        html.push_str("</body>\n</html>\n");
        Ok(html)
    }

    fn page(&self, html: &mut String, page: &Page, vis_count: &mut usize) -> Result<()> {
        push(
            html,
            format_args!(
                "<section id=\"{}\">\n<h1>{}</h1>\n",
                page.kind.slug(),
                escape_html(&page.title)
            ),
        )?;
        for section in &page.sections {
            self.section(html, page, section, vis_count)?;
        }
        html.push_str("</section>\n");
        Ok(())
    }

    fn section(
        &self,
        html: &mut String,
        page: &Page,
        section: &Section,
        vis_count: &mut usize,
    ) -> Result<()> {
        push(html, format_args!("<h2>{}</h2>\n", escape_html(&section.header)))?;
        match &section.body {
            Presentation::Table(df) => html.push_str(&dataframe_to_html(df, self.row_limit)),
            Presentation::Error(message) => push(
                html,
                format_args!("<p class=\"error\">{}</p>\n", escape_html(message)),
            )?,
            Presentation::Map(_) | Presentation::Chart(_) => {
                let value = self.specs.section_value(section)?;
                let spec = serde_json::to_string(&value["spec"]).map_err(|e| {
                    HouselensError::WriterError(format!("Failed to serialize spec: {}", e))
                })?;
                *vis_count += 1;
                let vis_id = format!("vis-{}-{}", page.kind.slug(), vis_count);
                push(
                    html,
                    format_args!(
                        "<div id=\"{id}\" class=\"vis\"></div>\n<script type=\"text/javascript\">\n  vegaEmbed('#{id}', {spec}, {{\"actions\": true}}).catch(console.error);\n</script>\n",
                        id = vis_id,
                        spec = escape_script(&spec),
                    ),
                )?;
            }
        }
        Ok(())
    }
}

impl Default for HtmlWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl Writer for HtmlWriter {
    type Output = String;

    fn write(&self, page: &Page) -> Result<String> {
        self.document(&page.title, std::slice::from_ref(page))
    }

    fn write_all(&self, pages: &[Page]) -> Result<String> {
        self.document("House Sales Report", pages)
    }
}

const STYLE: &str = "<style>
body { font-family: sans-serif; margin: 2rem; }
nav ul { list-style: none; padding: 0; display: flex; gap: 1.5rem; }
table.dataframe { border-collapse: collapse; font-size: 0.9rem; }
table.dataframe th, table.dataframe td { border: 1px solid #ccc; padding: 0.25rem 0.5rem; }
.vis { width: 100%; height: 400px; }
.error { color: #b00020; }
td.more { text-align: center; }
</style>
";

fn push(html: &mut String, args: std::fmt::Arguments<'_>) -> Result<()> {
    html.write_fmt(args)
        .map_err(|e| HouselensError::WriterError(format!("Failed to write HTML: {}", e)))
}

/// `<table>` of the first `row_limit` rows, with a trailing row counting
/// the rest. Nulls render as empty cells.
fn dataframe_to_html(df: &DataFrame, row_limit: usize) -> String {
    let header: String = df
        .get_column_names()
        .iter()
        .map(|name| format!("<th>{}</th>", escape_html(name)))
        .collect();

    let shown = df.height().min(row_limit);
    let mut body: String = (0..shown)
        .map(|row| {
            let cells: String = df
                .get_columns()
                .iter()
                .map(|col| format!("<td>{}</td>", escape_html(&cell_text(col.get(row).ok()))))
                .collect();
            format!("<tr>{}</tr>\n", cells)
        })
        .collect();

    let hidden = df.height() - shown;
    if hidden > 0 {
        body.push_str(&format!(
            "<tr><td class=\"more\" colspan=\"{}\">... {} more rows</td></tr>\n",
            df.width(),
            hidden
        ));
    }

    format!(
        "<table class=\"dataframe\">\n<thead><tr>{}</tr></thead>\n<tbody>\n{}</tbody>\n</table>\n",
        header, body
    )
}

fn cell_text(value: Option<AnyValue<'_>>) -> String {
    match value {
        None | Some(AnyValue::Null) => String::new(),
        Some(AnyValue::String(s)) => s.to_string(),
        Some(other) => other.to_string(),
    }
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

/// Keep inline JSON from closing its `<script>` element.
fn escape_script(json: &str) -> String {
    json.replace("</", "<\\/")
}
