//! Citation style identifiers.

use crate::CitationError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The closed set of supported citation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StyleId {
    /// APA 7th edition
    Apa,
    /// MLA 9th edition
    Mla,
    /// Chicago author-date
    Chicago,
    /// Harvard
    Harvard,
    /// IEEE
    Ieee,
    /// American Medical Association
    Ama,
    /// American Sociological Association
    Asa,
}

impl StyleId {
    /// Every supported style, in display order.
    pub const ALL: [StyleId; 7] = [
        StyleId::Apa,
        StyleId::Mla,
        StyleId::Chicago,
        StyleId::Harvard,
        StyleId::Ieee,
        StyleId::Ama,
        StyleId::Asa,
    ];

    /// The short identifier used on the wire, e.g. `"apa"`.
    pub fn as_str(&self) -> &'static str {
        match self {
            StyleId::Apa => "apa",
            StyleId::Mla => "mla",
            StyleId::Chicago => "chicago",
            StyleId::Harvard => "harvard",
            StyleId::Ieee => "ieee",
            StyleId::Ama => "ama",
            StyleId::Asa => "asa",
        }
    }

    /// The CSL template name a CSL processor should render this style with.
    pub fn csl_template(&self) -> &'static str {
        match self {
            StyleId::Apa => "apa",
            StyleId::Mla => "modern-language-association",
            StyleId::Chicago => "chicago-author-date",
            StyleId::Harvard => "harvard1",
            StyleId::Ieee => "ieee",
            StyleId::Ama => "american-medical-association",
            StyleId::Asa => "american-sociological-association",
        }
    }

    /// Author-date styles print `(n.d.)` when the year is missing.
    pub(crate) fn is_author_date(&self) -> bool {
        matches!(self, StyleId::Apa | StyleId::Harvard)
    }

    /// Styles that wrap article titles in quotation marks.
    pub(crate) fn quotes_titles(&self) -> bool {
        matches!(
            self,
            StyleId::Mla | StyleId::Chicago | StyleId::Asa | StyleId::Ieee
        )
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StyleId {
    type Err = CitationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let style = match s.trim().to_ascii_lowercase().as_str() {
            "apa" => StyleId::Apa,
            "mla" => StyleId::Mla,
            "chicago" => StyleId::Chicago,
            "harvard" => StyleId::Harvard,
            "ieee" => StyleId::Ieee,
            "ama" => StyleId::Ama,
            "asa" => StyleId::Asa,
            _ => return Err(CitationError::UnsupportedStyle(s.to_string())),
        };
        Ok(style)
    }
}
