//! The last-resort formatter.
//!
//! Uses the raw fields as given, without author parsing or detail mining.

use super::builder::{CitationBuilder, quoted, terminate};
use crate::{BibliographicRecord, SourceType, StyleId};

/// Formats `authors. (year). title. source. Retrieved from url`.
pub fn format_minimal(raw: &BibliographicRecord) -> String {
    let mut builder = CitationBuilder::new();

    if let Some(authors) = raw.authors() {
        builder.push(terminate(authors, '.'));
    }
    if let Some(year) = raw.year() {
        builder.push(format!("({year})."));
    }
    if let Some(title) = raw.title() {
        if matches!(raw.style, StyleId::Mla | StyleId::Chicago | StyleId::Ieee) {
            builder.push(quoted(title));
        } else {
            builder.push(terminate(title, '.'));
        }
    }
    if let Some(source) = raw.source() {
        builder.push(terminate(source, '.'));
    }
    if raw.source_type == SourceType::Url {
        if let Some(url) = raw.source_url() {
            builder.push(format!("Retrieved from {url}"));
        }
    }

    builder.finish()
}
