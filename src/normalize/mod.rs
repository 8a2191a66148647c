//! Metadata normalization.
//!
//! Turns a raw [`BibliographicRecord`] into the structured form the formatters
//! work from: a parsed author list and the publication details mined from the
//! record's `additionalInfo` text.
//!
//! # Example
//!
//! ```
//! use citegen::{BibliographicRecord, SourceType, StyleId};
//! use citegen::normalize::normalize;
//!
//! let record = BibliographicRecord::new(SourceType::Manual, StyleId::Apa)
//!     .with_authors("Smith, John and Doe, Jane")
//!     .with_additional_info("Volume 5, Issue 2");
//!
//! let normalized = normalize(&record);
//! assert_eq!(normalized.authors[1].surname, "Doe");
//! assert_eq!(normalized.extracted.volume.as_deref(), Some("5"));
//! ```

mod authors;
mod extract;

pub use authors::{ParsedAuthor, parse_authors};
pub use extract::{ExtractedMetadata, PageRange, extract_metadata};

use crate::BibliographicRecord;
use serde::{Deserialize, Serialize};

/// The structured form of a bibliographic record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedRecord {
    pub authors: Vec<ParsedAuthor>,
    pub extracted: ExtractedMetadata,
}

/// Normalizes a raw record. Pure and infallible.
pub fn normalize(raw: &BibliographicRecord) -> NormalizedRecord {
    NormalizedRecord {
        authors: raw.authors().map(parse_authors).unwrap_or_default(),
        extracted: raw
            .additional_info()
            .map(extract_metadata)
            .unwrap_or_default(),
    }
}
