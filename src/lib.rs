//! A library for generating formatted academic citations.
//!
//! `citegen` turns a bibliographic record, whether typed in by hand, mined
//! from a web page, or extracted from a PDF, into a reference string in one of
//! seven citation styles.
//!
//! # Key Features
//!
//! - **Seven Styles**: APA, MLA, Chicago, Harvard, IEEE, AMA and ASA
//!
//! - **Forgiving Input**:
//!   - Free-text author lists (`"Smith, John and Doe, Jane"`)
//!   - Volume, issue, pages and DOI mined from free text
//!   - Missing fields degrade (`(n.d.)`) instead of failing
//!
//! - **Pluggable Rendering**:
//!   - Native rule-table formatter
//!   - Optional delegation to an external CSL processor, with fallback
//!
//! - **Collaborators**: website and PDF metadata sources and a citation
//!   repository, all behind traits
//!
//! # Basic Usage
//!
//! ```rust
//! use citegen::{BibliographicRecord, SourceType, StyleId};
//! use citegen::format::{FormatOptions, format_record};
//!
//! let record = BibliographicRecord::new(SourceType::Manual, StyleId::Apa)
//!     .with_authors("Smith, John and Doe, Jane")
//!     .with_year("2020")
//!     .with_title("A Study of Things")
//!     .with_source("Journal X")
//!     .with_additional_info("Volume 5, Issue 2, pp. 100-110");
//!
//! let citation = format_record(&record, &FormatOptions::default());
//! assert_eq!(
//!     citation,
//!     "Smith, J., Doe, J. (2020). A Study of Things. Journal X, 5(2), 100-110."
//! );
//! ```
//!
//! # Error Handling
//!
//! Formatting itself cannot fail once a [`StyleId`] is in hand. Parsing a
//! style id can, and reports a [`CitationError`]:
//!
//! ```rust
//! use citegen::{CitationError, StyleId};
//!
//! match "vancouver".parse::<StyleId>() {
//!     Ok(style) => println!("Using {style}"),
//!     Err(CitationError::UnsupportedStyle(id)) => eprintln!("Unknown style: {id}"),
//!     Err(e) => eprintln!("Other error: {e}"),
//! }
//! ```
//!
//! # Thread Safety
//!
//! Normalization and formatting are pure functions. The service holds its
//! collaborators behind `Arc` and can be shared between tasks.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod csl;
pub mod engine;
pub mod error;
pub mod format;
pub mod normalize;
pub mod service;
pub mod sources;
pub mod store;
mod regex;
mod style;
mod utils;

// Reexports
pub use engine::{CitationFormatter, CslFallback, EngineKind, FormatterConfig};
pub use error::{
    ApiError, CitationError, CslError, FetchError, GenerateError, PdfError, StoreError, UploadError,
};
pub use service::{CitationService, GenerateRequest, ServiceConfig};
pub use store::{CitationRepository, JsonFileRepository, MemoryRepository};
pub use style::StyleId;

/// A specialized Result type for citation operations.
pub type Result<T> = std::result::Result<T, CitationError>;

/// Where a bibliographic record came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Url,
    Pdf,
    Manual,
    Book,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Url => "url",
            SourceType::Pdf => "pdf",
            SourceType::Manual => "manual",
            SourceType::Book => "book",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceType {
    type Err = CitationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "url" => Ok(SourceType::Url),
            "pdf" => Ok(SourceType::Pdf),
            "manual" => Ok(SourceType::Manual),
            "book" => Ok(SourceType::Book),
            _ => Err(CitationError::UnsupportedSourceType(s.to_string())),
        }
    }
}

/// A raw, unparsed bibliographic record.
///
/// Only `source_type` and `style` are required. Blank strings are treated the
/// same as absent fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BibliographicRecord {
    pub title: Option<String>,
    /// Free-text author list
    pub authors: Option<String>,
    pub year: Option<String>,
    /// Journal, publisher or site name
    pub source: Option<String>,
    pub source_type: SourceType,
    pub source_url: Option<String>,
    /// Free text that may hold volume, issue, pages and DOI
    pub additional_info: Option<String>,
    pub style: StyleId,
}

impl BibliographicRecord {
    /// Creates an empty record for the given source type and style.
    #[must_use]
    pub fn new(source_type: SourceType, style: StyleId) -> Self {
        Self {
            title: None,
            authors: None,
            year: None,
            source: None,
            source_type,
            source_url: None,
            additional_info: None,
            style,
        }
    }

    pub fn with_title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    pub fn with_authors(mut self, authors: &str) -> Self {
        self.authors = Some(authors.to_string());
        self
    }

    pub fn with_year(mut self, year: &str) -> Self {
        self.year = Some(year.to_string());
        self
    }

    pub fn with_source(mut self, source: &str) -> Self {
        self.source = Some(source.to_string());
        self
    }

    pub fn with_source_url(mut self, url: &str) -> Self {
        self.source_url = Some(url.to_string());
        self
    }

    pub fn with_additional_info(mut self, info: &str) -> Self {
        self.additional_info = Some(info.to_string());
        self
    }

    pub fn title(&self) -> Option<&str> {
        utils::non_blank(&self.title)
    }

    pub fn authors(&self) -> Option<&str> {
        utils::non_blank(&self.authors)
    }

    pub fn year(&self) -> Option<&str> {
        utils::non_blank(&self.year)
    }

    pub fn source(&self) -> Option<&str> {
        utils::non_blank(&self.source)
    }

    pub fn source_url(&self) -> Option<&str> {
        utils::non_blank(&self.source_url)
    }

    pub fn additional_info(&self) -> Option<&str> {
        utils::non_blank(&self.additional_info)
    }
}

/// A generated citation, as returned to callers and persisted by repositories.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Citation {
    pub id: String,
    /// The formatted reference string
    pub citation: String,
    pub style: StyleId,
    pub source_type: SourceType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_url: Option<String>,
    /// Upload id of the PDF this citation was generated from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authors: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl Citation {
    /// Applies a user edit in place. Fields the edit leaves unset are kept.
    pub fn apply_edit(&mut self, edit: CitationEdit) {
        let CitationEdit {
            citation,
            title,
            authors,
            year,
            source,
            additional_info,
        } = edit;

        if let Some(citation) = citation {
            self.citation = citation;
        }
        if title.is_some() {
            self.title = title;
        }
        if authors.is_some() {
            self.authors = authors;
        }
        if year.is_some() {
            self.year = year;
        }
        if source.is_some() {
            self.source = source;
        }
        if additional_info.is_some() {
            self.additional_info = additional_info;
        }
    }
}

/// A user edit to a saved citation.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationEdit {
    pub citation: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<String>,
    pub source: Option<String>,
    pub additional_info: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn citation() -> Citation {
        Citation {
            id: "abc".to_string(),
            citation: "Smith, J. (2020). Title.".to_string(),
            style: StyleId::Apa,
            source_type: SourceType::Manual,
            source_url: None,
            file_id: None,
            title: Some("Title".to_string()),
            authors: Some("John Smith".to_string()),
            year: Some("2020".to_string()),
            source: None,
            additional_info: Some("Volume 1".to_string()),
        }
    }

    #[test]
    fn test_apply_edit_keeps_unedited_fields() {
        let mut edited = citation();
        edited.apply_edit(CitationEdit {
            citation: Some("Smith, J. (2021). Title.".to_string()),
            year: Some("2021".to_string()),
            ..Default::default()
        });

        let mut expected = citation();
        expected.citation = "Smith, J. (2021). Title.".to_string();
        expected.year = Some("2021".to_string());
        assert_eq!(edited, expected);
    }

    #[test]
    fn test_citation_serializes_camel_case() {
        let json = serde_json::to_value(citation()).unwrap();
        assert_eq!(json["sourceType"], "manual");
        assert_eq!(json["additionalInfo"], "Volume 1");
        assert!(json.get("sourceUrl").is_none());
    }

    #[test]
    fn test_source_type_parse() {
        assert_eq!("URL".parse::<SourceType>().unwrap(), SourceType::Url);
        assert!(matches!(
            "tape".parse::<SourceType>(),
            Err(CitationError::UnsupportedSourceType(_))
        ));
    }

    #[test]
    fn test_record_blank_fields_read_as_absent() {
        let record = BibliographicRecord::new(SourceType::Manual, StyleId::Apa)
            .with_title("  ")
            .with_year("2020");
        assert_eq!(record.title(), None);
        assert_eq!(record.year(), Some("2020"));
    }

    #[test]
    fn test_record_deserializes_with_missing_optionals() {
        let record: BibliographicRecord =
            serde_json::from_str(r#"{"sourceType":"book","style":"chicago"}"#).unwrap();
        assert_eq!(record.source_type, SourceType::Book);
        assert_eq!(record.title, None);
    }
}
