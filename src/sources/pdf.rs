//! PDF metadata.
//!
//! Text extraction is delegated to a [`PdfTextExtractor`]; the heuristics
//! here only look at the document info dictionary and the leading lines of
//! the extracted text.

use crate::PdfError;
use crate::regex::Regex;
use crate::utils::{clean_doi, truncate_with_ellipsis};
use async_trait::async_trait;
use chrono::{Datelike, Local};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::{Arc, LazyLock};

const UNREADABLE_TITLE: &str = "Error Processing PDF";
const UNKNOWN_AUTHOR: &str = "Unknown Author";
const UNTITLED: &str = "Untitled Document";

/// Lines considered when looking for a title.
const TITLE_LINES: usize = 5;
/// Lines considered when looking for authors.
const AUTHOR_LINES: usize = 20;
/// Lines considered when looking for the source and publication details.
const DETAIL_LINES: usize = 50;
const MAX_TITLE_LEN: usize = 100;

static TITLE_SKIP_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(?:abstract|introduction|copyright)").unwrap());

static AUTHOR_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bauthors?[\s:]+([^.]+)").unwrap());

static BY_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bby[\s:]+([^.]+)").unwrap());

static COMMA_LIST_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^,]+,[^,]+(?:,[^,]+)*$").unwrap());

static FOUR_DIGITS_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(\d{4})").unwrap());

static YEAR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b((?:19|20)\d{2})\b").unwrap());

static JOURNAL_OF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bjournal\s+of\s+[^,.]+").unwrap());

static IN_JOURNAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bin[\s:]+([^,.]+journal[^,.]+)").unwrap());

static PROCEEDINGS_OF_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bproceedings\s+of\s+[^,.]+").unwrap());

static VOLUME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\bvol(?:ume)?\.?\s*(\d+)").unwrap());

static ISSUE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)\b(?:no|issue|num)\.?\s*(\d+)").unwrap());

static PAGES_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)(?:\bpages?|\bpp\.)\s*(\d+)\s*[–—-]+\s*(\d+)").unwrap()
});

static DOI_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)\bdoi:?\s*(\S+)").unwrap());

/// The PDF document information dictionary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfInfo {
    pub title: Option<String>,
    pub author: Option<String>,
    /// Raw creation date, e.g. `D:20200101120000Z`
    pub creation_date: Option<String>,
    pub producer: Option<String>,
}

/// Text and info dictionary of a PDF.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PdfDocument {
    pub text: String,
    pub info: PdfInfo,
}

/// Extracts text from PDF bytes.
#[async_trait]
pub trait PdfTextExtractor: Send + Sync {
    async fn extract(&self, bytes: &[u8]) -> Result<PdfDocument, PdfError>;
}

/// Citation metadata guessed from a PDF.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PdfMetadata {
    pub title: String,
    pub authors: String,
    pub year: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub additional_info: Option<String>,
}

impl PdfMetadata {
    /// Placeholder metadata for a PDF that could not be read.
    pub fn unreadable(year: i32) -> Self {
        Self::placeholder(UNREADABLE_TITLE, year)
    }

    /// Placeholder metadata titled after the file stem.
    pub fn from_file_name(file_name: &str, year: i32) -> Self {
        let stem = Path::new(file_name)
            .file_stem()
            .and_then(|s| s.to_str())
            .filter(|s| !s.is_empty())
            .unwrap_or(file_name);
        Self::placeholder(stem, year)
    }

    fn placeholder(title: &str, year: i32) -> Self {
        Self {
            title: title.to_string(),
            authors: UNKNOWN_AUTHOR.to_string(),
            year: year.to_string(),
            source: None,
            additional_info: None,
        }
    }
}

/// Guesses citation metadata for uploaded PDFs.
#[derive(Clone)]
pub struct PdfMetadataExtractor {
    extractor: Arc<dyn PdfTextExtractor>,
}

impl std::fmt::Debug for PdfMetadataExtractor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PdfMetadataExtractor").finish_non_exhaustive()
    }
}

impl PdfMetadataExtractor {
    pub fn new(extractor: Arc<dyn PdfTextExtractor>) -> Self {
        Self { extractor }
    }

    /// Extracts metadata from `bytes`.
    ///
    /// Never fails: empty input or an extraction error yields
    /// [`PdfMetadata::unreadable`].
    pub async fn extract(&self, bytes: &[u8]) -> PdfMetadata {
        let year = Local::now().year();
        if bytes.is_empty() {
            tracing::warn!(error = %PdfError::Empty, "unreadable PDF");
            return PdfMetadata::unreadable(year);
        }
        match self.extractor.extract(bytes).await {
            Ok(document) => metadata_from_document(&document, year),
            Err(err) => {
                tracing::warn!(%err, "unreadable PDF");
                PdfMetadata::unreadable(year)
            }
        }
    }
}

/// Applies the metadata heuristics to an extracted document.
pub fn metadata_from_document(document: &PdfDocument, current_year: i32) -> PdfMetadata {
    let info = &document.info;
    let lines: Vec<&str> = document
        .text
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .collect();

    PdfMetadata {
        title: info_field(&info.title)
            .or_else(|| title_from_lines(&lines))
            .unwrap_or_else(|| UNTITLED.to_string()),
        authors: info_field(&info.author)
            .or_else(|| authors_from_lines(&lines))
            .unwrap_or_else(|| UNKNOWN_AUTHOR.to_string()),
        year: info
            .creation_date
            .as_deref()
            .and_then(|date| FOUR_DIGITS_REGEX.captures(date))
            .or_else(|| YEAR_REGEX.captures(&document.text))
            .map_or_else(|| current_year.to_string(), |caps| caps[1].to_string()),
        source: info_field(&info.producer).or_else(|| source_from_lines(&lines)),
        additional_info: details_from_lines(&lines),
    }
}

fn info_field(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn title_from_lines(lines: &[&str]) -> Option<String> {
    lines
        .iter()
        .take(TITLE_LINES)
        .find(|line| line.chars().count() > 10 && !TITLE_SKIP_REGEX.is_match(line))
        .map(|line| truncate_with_ellipsis(line, MAX_TITLE_LEN))
}

fn authors_from_lines(lines: &[&str]) -> Option<String> {
    let head = &lines[..lines.len().min(AUTHOR_LINES)];
    let joined = head.join(" ");
    let plausible = |candidate: &str| {
        let candidate = candidate.trim();
        let len = candidate.chars().count();
        (len > 3 && len < 150).then(|| candidate.to_string())
    };

    [&*AUTHOR_LABEL_REGEX, &*BY_LINE_REGEX]
        .iter()
        .find_map(|re| re.captures(&joined).and_then(|caps| plausible(&caps[1])))
        .or_else(|| {
            head.iter()
                .filter(|line| COMMA_LIST_REGEX.is_match(line))
                .find_map(|line| plausible(*line))
        })
}

fn source_from_lines(lines: &[&str]) -> Option<String> {
    let joined = lines[..lines.len().min(DETAIL_LINES)].join(" ");
    JOURNAL_OF_REGEX
        .find(&joined)
        .map(|m| m.as_str())
        .or_else(|| {
            IN_JOURNAL_REGEX
                .captures(&joined)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str())
        })
        .or_else(|| PROCEEDINGS_OF_REGEX.find(&joined).map(|m| m.as_str()))
        .map(|s| s.trim().to_string())
}

fn details_from_lines(lines: &[&str]) -> Option<String> {
    let joined = lines[..lines.len().min(DETAIL_LINES)].join(" ");
    let first = |re: &Regex| re.captures(&joined).map(|caps| caps[1].to_string());

    let mut parts = Vec::new();
    if let Some(volume) = first(&*VOLUME_REGEX) {
        parts.push(format!("Volume {volume}"));
    }
    if let Some(issue) = first(&*ISSUE_REGEX) {
        parts.push(format!("Issue {issue}"));
    }
    if let Some(caps) = PAGES_REGEX.captures(&joined) {
        parts.push(format!("pp. {}–{}", &caps[1], &caps[2]));
    }
    if let Some(doi) = DOI_REGEX
        .captures_iter(&joined)
        .find_map(|caps| clean_doi(&caps[1]))
    {
        parts.push(format!("DOI: {doi}"));
    }

    (!parts.is_empty()).then(|| parts.join(", "))
}
