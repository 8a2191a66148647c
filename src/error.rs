//! Error types for citation generation and its collaborators.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised by the formatting core.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CitationError {
    #[error("Unsupported citation format: {0}")]
    UnsupportedStyle(String),

    #[error("Unsupported source type: {0}")]
    UnsupportedSourceType(String),

    #[error("Missing required field: {0}")]
    MissingField(String),
}

/// Failure of the website metadata collaborator.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Failed to load page: {0}")]
    Load(String),

    #[error("Failed to fetch website metadata")]
    Empty,
}

/// Failure of the PDF text extraction collaborator.
#[derive(Error, Debug)]
pub enum PdfError {
    #[error("Empty PDF data provided")]
    Empty,

    #[error("PDF extraction failed: {0}")]
    Extraction(String),
}

/// Failure of the external CSL processor.
#[derive(Error, Debug)]
pub enum CslError {
    #[error("CSL processor failed: {0}")]
    Processor(String),

    #[error("CSL processor returned no output for style {0}")]
    EmptyOutput(String),

    #[error("CSL item serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Failure of a citation repository.
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Corrupt citation store: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Failure of a citation generation request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GenerateError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("Missing required fields")]
    MissingFields,

    #[error("Unsupported citation format")]
    UnsupportedStyle,

    #[error("Unsupported source type")]
    UnsupportedSourceType,

    #[error("{0}")]
    Internal(String),
}

impl GenerateError {
    /// HTTP status code reported for this error.
    pub fn status(&self) -> u16 {
        match self {
            GenerateError::Unauthorized => 401,
            GenerateError::MissingFields
            | GenerateError::UnsupportedStyle
            | GenerateError::UnsupportedSourceType => 400,
            GenerateError::Internal(_) => 500,
        }
    }

    /// JSON error body for this error.
    pub fn body(&self) -> ApiError {
        ApiError::new(self)
    }
}

impl From<CitationError> for GenerateError {
    fn from(err: CitationError) -> Self {
        match err {
            CitationError::UnsupportedStyle(_) => GenerateError::UnsupportedStyle,
            CitationError::UnsupportedSourceType(_) => GenerateError::UnsupportedSourceType,
            CitationError::MissingField(_) => GenerateError::MissingFields,
        }
    }
}

/// Failure of a PDF upload request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UploadError {
    #[error("Unauthorized")]
    Unauthorized,

    #[error("No file uploaded")]
    NoFile,

    #[error("File too large (max {max_mib}MB)")]
    TooLarge { max_mib: usize },

    #[error("Only PDF files are supported")]
    NotPdf,
}

impl UploadError {
    /// HTTP status code reported for this error.
    pub fn status(&self) -> u16 {
        match self {
            UploadError::Unauthorized => 401,
            _ => 400,
        }
    }

    /// JSON error body for this error.
    pub fn body(&self) -> ApiError {
        ApiError::new(self)
    }
}

/// The `{ "error": "..." }` body returned with a failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

impl ApiError {
    fn new(err: &impl std::fmt::Display) -> Self {
        Self {
            error: err.to_string(),
        }
    }
}
