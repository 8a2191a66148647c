//! Mining structured publication details out of free text.
//!
//! Each pattern is searched independently and case-insensitively. When a
//! pattern matches more than once the first match wins.

use crate::regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

static VOLUME_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Volume\s+(\d+)").unwrap());

static ISSUE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)Issue\s+(\d+)").unwrap());

static PAGES_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)pp\.\s+(\d+)[\s–—-]+(\d+)").unwrap());

/// Trailing sentence punctuation is not part of the DOI.
static DOI_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)DOI:\s*(\S+?)[.,;)]*(?:\s|$)").unwrap());

static PUBLISHER_PLACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Published in\s+([^,.]+)").unwrap());

static EVENT_PLACE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)Held in\s+([^,.]+)").unwrap());

/// An inclusive page range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRange {
    pub start: String,
    pub end: String,
}

impl PageRange {
    /// Joins the range with the given dash, e.g. `100-110` or `100–110`.
    pub fn joined(&self, dash: &str) -> String {
        format!("{}{}{}", self.start, dash, self.end)
    }
}

/// Publication details extracted from an `additionalInfo` blob.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractedMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pages: Option<PageRange>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
    /// Place of publication, from `Published in X`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_place: Option<String>,
    /// Conference location, from `Held in X`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_place: Option<String>,
}

impl ExtractedMetadata {
    /// Returns true if any of volume, issue or pages is present.
    pub(crate) fn has_publication_details(&self) -> bool {
        self.volume.is_some() || self.issue.is_some() || self.pages.is_some()
    }
}

/// Extracts volume, issue, pages, DOI and places from free text.
pub fn extract_metadata(additional_info: &str) -> ExtractedMetadata {
    if additional_info.trim().is_empty() {
        return ExtractedMetadata::default();
    }

    ExtractedMetadata {
        volume: first_group(&VOLUME_REGEX, additional_info),
        issue: first_group(&ISSUE_REGEX, additional_info),
        pages: PAGES_REGEX
            .captures(additional_info)
            .and_then(|caps| page_range(&caps)),
        doi: first_group(&DOI_REGEX, additional_info),
        publisher_place: first_group(&PUBLISHER_PLACE_REGEX, additional_info),
        event_place: first_group(&EVENT_PLACE_REGEX, additional_info),
    }
}

fn first_group(regex: &Regex, text: &str) -> Option<String> {
    regex
        .captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|s| !s.is_empty())
}

fn page_range(caps: &Captures<'_>) -> Option<PageRange> {
    Some(PageRange {
        start: caps.get(1)?.as_str().to_string(),
        end: caps.get(2)?.as_str().to_string(),
    })
}
