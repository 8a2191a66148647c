//! Native citation formatting.
//!
//! Renders a normalized record field by field in a fixed order: authors, year,
//! title, source with publication details, DOI, and the access line for web
//! sources. Each style supplies its own rendering for every field.
//!
//! # Example
//!
//! ```
//! use chrono::NaiveDate;
//! use citegen::{BibliographicRecord, SourceType, StyleId};
//! use citegen::format::{FormatOptions, format_record};
//!
//! let record = BibliographicRecord::new(SourceType::Url, StyleId::Mla)
//!     .with_title("Example Page")
//!     .with_source_url("https://ex.com");
//! let options = FormatOptions::accessed_on(NaiveDate::from_ymd_opt(2024, 5, 4).unwrap());
//!
//! assert_eq!(
//!     format_record(&record, &options),
//!     "\"Example Page.\" https://ex.com. Accessed May 4, 2024."
//! );
//! ```

mod authors;
mod builder;
mod fallback;
mod fields;

pub use fallback::format_minimal;

use crate::normalize::{NormalizedRecord, normalize};
use crate::{BibliographicRecord, Result, SourceType, StyleId};
use builder::{CitationBuilder, terminate};
use chrono::{Local, NaiveDate};

/// Options that affect rendering but are not part of the record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatOptions {
    /// Date printed in access lines of web citations
    pub accessed: NaiveDate,
}

impl Default for FormatOptions {
    /// Uses today's local date, so web citations differ from day to day.
    fn default() -> Self {
        Self {
            accessed: Local::now().date_naive(),
        }
    }
}

impl FormatOptions {
    /// Pins the access date.
    #[must_use]
    pub fn accessed_on(accessed: NaiveDate) -> Self {
        Self { accessed }
    }

    /// Long-form access date, e.g. `May 4, 2024`.
    pub fn access_date(&self) -> String {
        self.accessed.format("%B %-d, %Y").to_string()
    }
}

/// Formats a normalized record in `style`.
pub fn format_citation(
    normalized: &NormalizedRecord,
    raw: &BibliographicRecord,
    style: StyleId,
    options: &FormatOptions,
) -> String {
    let meta = &normalized.extracted;
    let year = raw.year();
    let mut builder = CitationBuilder::new();

    builder.push_opt(
        authors::render_authors(&normalized.authors, style).map(|authors| {
            if style.is_author_date() {
                authors
            } else {
                terminate(&authors, '.')
            }
        }),
    );
    builder.push_opt(fields::render_year(year, meta.pages.as_ref(), style));
    builder.push_opt(fields::render_title(raw.title(), raw.source_type, style));
    builder.push_opt(fields::render_source(
        raw.source(),
        meta,
        style,
        fields::year_carries_pages(year, style),
    ));
    builder.push_opt(fields::render_doi(meta.doi.as_deref(), style));
    if raw.source_type == SourceType::Url {
        builder.push_opt(fields::render_access(
            raw.source_url(),
            &options.access_date(),
            style,
        ));
    }

    builder.finish()
}

/// Formats with a style given by its identifier, rejecting unknown ids.
pub fn format_style(
    normalized: &NormalizedRecord,
    raw: &BibliographicRecord,
    style: &str,
    options: &FormatOptions,
) -> Result<String> {
    let style: StyleId = style.parse()?;
    Ok(format_citation(normalized, raw, style, options))
}

/// Normalizes and formats a record in its own style.
pub fn format_record(raw: &BibliographicRecord, options: &FormatOptions) -> String {
    format_citation(&normalize(raw), raw, raw.style, options)
}
