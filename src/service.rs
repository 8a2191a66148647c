//! Request handling for citation generation and PDF uploads.
//!
//! [`CitationService`] validates requests, consults the metadata sources,
//! renders through the configured [`CitationFormatter`] and reports failures
//! as status-coded errors. Collaborator failures are logged and recovered:
//! a page that cannot be fetched falls back to the fields the user typed, and
//! an unreadable PDF yields placeholder metadata.
//!
//! # Example
//!
//! ```
//! use citegen::{CitationService, GenerateRequest};
//! use citegen::service::Caller;
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let service = CitationService::new();
//! let request = GenerateRequest {
//!     style: Some("apa".to_string()),
//!     source_type: Some("manual".to_string()),
//!     authors: Some("Smith, John".to_string()),
//!     year: Some("2020".to_string()),
//!     title: Some("A Study".to_string()),
//!     ..GenerateRequest::default()
//! };
//!
//! let citation = service.generate(&Caller::signed_in(), request).await.unwrap();
//! assert_eq!(citation.citation, "Smith, J. (2020). A Study.");
//! # });
//! ```

use crate::csl::CslProcessor;
use crate::error::{GenerateError, UploadError};
use crate::format::FormatOptions;
use crate::sources::{MetadataFetcher, PdfMetadata, PdfMetadataExtractor, WebsiteMetadata};
use crate::utils::{non_blank, replace_whitespace_runs};
use crate::{
    BibliographicRecord, Citation, CitationFormatter, FormatterConfig, Result, SourceType, StyleId,
};
use chrono::{Datelike, Local, NaiveDate};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::sync::Arc;

const MIB: usize = 1024 * 1024;
const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Who is making a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub authorized: bool,
}

impl Caller {
    pub fn signed_in() -> Self {
        Self { authorized: true }
    }

    pub fn anonymous() -> Self {
        Self { authorized: false }
    }
}

/// Body of a generate request.
///
/// Everything is optional on the wire; `style` and `sourceType` are
/// validated by [`CitationService::generate`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GenerateRequest {
    pub style: Option<String>,
    pub source_type: Option<String>,
    pub source_url: Option<String>,
    pub file_id: Option<String>,
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<String>,
    pub source: Option<String>,
    pub additional_info: Option<String>,
}

/// A file received by the upload endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Successful upload response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResponse {
    pub success: bool,
    pub file_id: String,
    pub file_name: String,
    pub file_type: String,
    pub metadata: PdfMetadata,
}

/// Service configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceConfig {
    pub formatter: FormatterConfig,
    /// Largest accepted upload, 10 MiB by default
    pub max_upload_bytes: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            formatter: FormatterConfig::default(),
            max_upload_bytes: 10 * MIB,
        }
    }
}

impl ServiceConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the formatter configuration
    pub fn set_formatter(&mut self, formatter: FormatterConfig) -> &mut Self {
        self.formatter = formatter;
        self
    }

    /// Sets the upload size limit in bytes
    pub fn set_max_upload_bytes(&mut self, max: usize) -> &mut Self {
        self.max_upload_bytes = max;
        self
    }
}

/// Generates citations and accepts PDF uploads.
#[derive(Clone, Default)]
pub struct CitationService {
    formatter: CitationFormatter,
    fetcher: Option<Arc<dyn MetadataFetcher>>,
    pdf: Option<PdfMetadataExtractor>,
    config: ServiceConfig,
    access_date: Option<NaiveDate>,
}

impl std::fmt::Debug for CitationService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CitationService")
            .field("formatter", &self.formatter)
            .field("fetcher", &self.fetcher.is_some())
            .field("pdf", &self.pdf)
            .field("config", &self.config)
            .field("access_date", &self.access_date)
            .finish()
    }
}

impl CitationService {
    /// A service with the native formatter and no metadata sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a service from `config`.
    ///
    /// # Errors
    ///
    /// Returns `CitationError::MissingField` if the configuration selects the
    /// CSL engine and no processor is given.
    pub fn from_config(
        config: ServiceConfig,
        processor: Option<Arc<dyn CslProcessor>>,
    ) -> Result<Self> {
        Ok(Self {
            formatter: CitationFormatter::from_config(&config.formatter, processor)?,
            config,
            ..Self::default()
        })
    }

    #[must_use]
    pub fn with_fetcher(mut self, fetcher: Arc<dyn MetadataFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    #[must_use]
    pub fn with_pdf_extractor(mut self, extractor: PdfMetadataExtractor) -> Self {
        self.pdf = Some(extractor);
        self
    }

    #[must_use]
    pub fn with_formatter(mut self, formatter: CitationFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Pins the access date printed in web citations.
    #[must_use]
    pub fn with_access_date(mut self, date: NaiveDate) -> Self {
        self.access_date = Some(date);
        self
    }

    fn format_options(&self) -> FormatOptions {
        self.access_date
            .map_or_else(FormatOptions::default, FormatOptions::accessed_on)
    }

    /// Generates a citation.
    ///
    /// For URL sources the page metadata is fetched first and takes
    /// precedence over the fields in the request. A failed fetch is logged
    /// and the request fields are used as given.
    ///
    /// # Errors
    ///
    /// Returns `GenerateError::Unauthorized` for anonymous callers,
    /// `MissingFields` without a style or source type, and
    /// `UnsupportedStyle`/`UnsupportedSourceType` for unknown ids.
    pub async fn generate(
        &self,
        caller: &Caller,
        request: GenerateRequest,
    ) -> std::result::Result<Citation, GenerateError> {
        if !caller.authorized {
            return Err(GenerateError::Unauthorized);
        }
        let (Some(style), Some(source_type)) =
            (non_blank(&request.style), non_blank(&request.source_type))
        else {
            return Err(GenerateError::MissingFields);
        };
        let style: StyleId = style.parse()?;
        let source_type: SourceType = source_type.parse()?;

        let mut record = BibliographicRecord {
            title: request.title,
            authors: request.authors,
            year: request.year,
            source: request.source,
            source_type,
            source_url: request.source_url,
            additional_info: request.additional_info,
            style,
        };

        if source_type == SourceType::Url {
            if let (Some(fetcher), Some(url)) = (&self.fetcher, record.source_url().map(str::to_string)) {
                match fetcher.fetch(&url).await {
                    Ok(metadata) => merge_website_metadata(&mut record, metadata),
                    Err(err) => {
                        tracing::warn!(%err, %url, "metadata fetch failed, using request fields");
                    }
                }
            }
        }

        let citation = self.formatter.render(&record, &self.format_options()).await;
        tracing::debug!(%style, %source_type, "generated citation");

        Ok(Citation {
            id: nanoid!(),
            citation,
            style,
            source_type,
            source_url: record.source_url.filter(|_| source_type == SourceType::Url),
            file_id: request.file_id.filter(|_| source_type == SourceType::Pdf),
            title: record.title,
            authors: record.authors,
            year: record.year,
            source: record.source,
            additional_info: record.additional_info,
        })
    }

    /// Handles a JSON generate request body, returning the status code and
    /// the JSON response body.
    pub async fn handle_generate(&self, caller: &Caller, body: &str) -> (u16, Value) {
        let result = match serde_json::from_str::<GenerateRequest>(body) {
            Ok(request) => self.generate(caller, request).await,
            Err(_) if !caller.authorized => Err(GenerateError::Unauthorized),
            Err(err) => Err(GenerateError::Internal(err.to_string())),
        };
        let response = result.and_then(|citation| {
            serde_json::to_value(citation).map_err(|err| GenerateError::Internal(err.to_string()))
        });

        match response {
            Ok(value) => (200, value),
            Err(err) => (err.status(), json!(err.body())),
        }
    }

    /// Accepts an uploaded PDF and guesses its citation metadata.
    ///
    /// Without a configured PDF extractor the metadata is a placeholder
    /// titled after the file name.
    ///
    /// # Errors
    ///
    /// Returns `UploadError` for anonymous callers, missing or empty files,
    /// files over the size limit, and non-PDF content types.
    pub async fn upload(
        &self,
        caller: &Caller,
        file: Option<UploadedFile>,
    ) -> std::result::Result<UploadResponse, UploadError> {
        if !caller.authorized {
            return Err(UploadError::Unauthorized);
        }
        let file = file
            .filter(|f| !f.bytes.is_empty())
            .ok_or(UploadError::NoFile)?;
        if file.bytes.len() > self.config.max_upload_bytes {
            return Err(UploadError::TooLarge {
                max_mib: self.config.max_upload_bytes / MIB,
            });
        }
        if !file.content_type.contains(PDF_CONTENT_TYPE) {
            return Err(UploadError::NotPdf);
        }

        let file_name = replace_whitespace_runs(&file.name, "_");
        let metadata = match &self.pdf {
            Some(extractor) => extractor.extract(&file.bytes).await,
            None => PdfMetadata::from_file_name(&file_name, Local::now().year()),
        };
        tracing::debug!(%file_name, bytes = file.bytes.len(), "accepted PDF upload");

        Ok(UploadResponse {
            success: true,
            file_id: nanoid!(),
            file_name,
            file_type: PDF_CONTENT_TYPE.to_string(),
            metadata,
        })
    }
}

/// Overlays fetched page metadata on a record. Fetched values win, except
/// that additional info is only filled in when the record has none.
fn merge_website_metadata(record: &mut BibliographicRecord, metadata: WebsiteMetadata) {
    let WebsiteMetadata {
        title,
        authors,
        year,
        source,
        additional_info,
        ..
    } = metadata;

    let fetched = [
        (&mut record.title, title),
        (&mut record.authors, authors),
        (&mut record.year, year),
        (&mut record.source, source),
    ];
    for (field, value) in fetched {
        if let Some(value) = value.filter(|v| !v.trim().is_empty()) {
            *field = Some(value);
        }
    }
    if record.additional_info().is_none() {
        record.additional_info = additional_info;
    }
}
