//! Per-style rendering of the non-author fields.
//!
//! Each renderer returns the field's text with its own trailing punctuation,
//! or `None` when the field is absent.

use super::builder::{bare, quoted, terminate};
use crate::normalize::{ExtractedMetadata, PageRange};
use crate::{SourceType, StyleId};

const HYPHEN: &str = "-";
const EN_DASH: &str = "–";

/// Whether the year field already printed the page range.
pub(crate) fn year_carries_pages(year: Option<&str>, style: StyleId) -> bool {
    year.is_some() && matches!(style, StyleId::Mla | StyleId::Chicago)
}

pub(crate) fn render_year(
    year: Option<&str>,
    pages: Option<&PageRange>,
    style: StyleId,
) -> Option<String> {
    let Some(year) = year else {
        return style.is_author_date().then(|| "(n.d.).".to_string());
    };

    let rendered = match style {
        StyleId::Apa | StyleId::Harvard => format!("({year})."),
        StyleId::Ama => format!("Published {year}."),
        StyleId::Chicago => match pages {
            Some(pages) => format!("{year} ({}).", pages.joined(EN_DASH)),
            None => format!("{year}."),
        },
        StyleId::Mla => match pages {
            Some(pages) => format!("{year}, pp. {}.", pages.joined(HYPHEN)),
            None => format!("{year}."),
        },
        StyleId::Ieee | StyleId::Asa => format!("{year}."),
    };
    Some(rendered)
}

/// Book titles stay plain; italics are left to the presentation layer.
pub(crate) fn render_title(
    title: Option<&str>,
    source_type: SourceType,
    style: StyleId,
) -> Option<String> {
    let title = title?;
    if source_type != SourceType::Book && style.quotes_titles() {
        Some(quoted(title))
    } else {
        Some(terminate(title, '.'))
    }
}

/// Renders the container name with volume, issue and pages.
///
/// `pages_in_year` suppresses the page range when the year already printed it.
pub(crate) fn render_source(
    source: Option<&str>,
    meta: &ExtractedMetadata,
    style: StyleId,
    pages_in_year: bool,
) -> Option<String> {
    let source = bare(source?);
    if source.is_empty() {
        return None;
    }
    let pages = meta.pages.as_ref().filter(|_| !pages_in_year);

    let mut out = source.to_string();
    match style {
        StyleId::Apa | StyleId::Harvard => {
            if let Some(volume) = &meta.volume {
                out.push_str(&format!(", {volume}"));
            }
            if let Some(issue) = &meta.issue {
                out.push_str(&format!("({issue})"));
            }
            if let Some(pages) = pages {
                out.push_str(&format!(", {}", pages.joined(HYPHEN)));
            }
            Some(terminate(&out, '.'))
        }
        StyleId::Mla => {
            if let Some(volume) = &meta.volume {
                out.push_str(&format!(", vol. {volume}"));
            }
            if let Some(issue) = &meta.issue {
                out.push_str(&format!(", no. {issue}"));
            }
            if let Some(pages) = pages {
                out.push_str(&format!(", pp. {}", pages.joined(HYPHEN)));
            }
            out.push(',');
            Some(out)
        }
        StyleId::Chicago => {
            if let Some(volume) = &meta.volume {
                out.push_str(&format!(" {volume}"));
            }
            if let Some(issue) = &meta.issue {
                out.push_str(&format!(", no. {issue}"));
            }
            if let Some(pages) = pages {
                out.push_str(&format!(": {}", pages.joined(EN_DASH)));
            }
            Some(terminate(&out, '.'))
        }
        StyleId::Ieee => {
            if let Some(volume) = &meta.volume {
                out.push_str(&format!(", vol. {volume}"));
            }
            if let Some(issue) = &meta.issue {
                out.push_str(&format!(", no. {issue}"));
            }
            if let Some(pages) = pages {
                out.push_str(&format!(", pp. {}", pages.joined(EN_DASH)));
            }
            out.push(',');
            Some(out)
        }
        StyleId::Ama => {
            if let Some(volume) = &meta.volume {
                out.push_str(&format!(". {volume}"));
            }
            if let Some(pages) = pages {
                out.push_str(&format!(":{}", pages.joined(HYPHEN)));
            }
            Some(terminate(&out, '.'))
        }
        StyleId::Asa => {
            if let Some(volume) = &meta.volume {
                out.push_str(&format!(" {volume}"));
            }
            if let Some(issue) = &meta.issue {
                out.push_str(&format!("({issue})"));
            }
            if let Some(pages) = pages {
                out.push_str(&format!(":{}", pages.joined(HYPHEN)));
            }
            Some(terminate(&out, '.'))
        }
    }
}

pub(crate) fn render_doi(doi: Option<&str>, style: StyleId) -> Option<String> {
    let doi = doi?;
    let rendered = match style {
        StyleId::Apa | StyleId::Harvard => format!("https://doi.org/{doi}"),
        StyleId::Mla | StyleId::Chicago | StyleId::Asa => format!("DOI: {doi}."),
        StyleId::Ieee => format!("doi: {doi}."),
        StyleId::Ama => format!("doi:{doi}."),
    };
    Some(rendered)
}

/// Access line for web sources. `accessed` is the long-form access date.
pub(crate) fn render_access(url: Option<&str>, accessed: &str, style: StyleId) -> Option<String> {
    let url = url?;
    let rendered = match style {
        StyleId::Apa => format!("Retrieved from {url}"),
        StyleId::Mla => format!("{url}. Accessed {accessed}."),
        StyleId::Chicago => format!("Accessed {accessed}. {url}."),
        StyleId::Harvard => format!("Available at: {url} (Accessed: {accessed})."),
        StyleId::Ieee => format!("[Online]. Available: {url}. [Accessed: {accessed}]."),
        StyleId::Ama => format!("Accessed {accessed}. {url}"),
        StyleId::Asa => format!("Retrieved {accessed} ({url})."),
    };
    Some(rendered)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::extract_metadata;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn full_meta() -> ExtractedMetadata {
        extract_metadata("Volume 5, Issue 2, pp. 100-110, DOI: 10.1/xyz")
    }

    #[rstest]
    #[case(StyleId::Apa, Some("(2020)."))]
    #[case(StyleId::Harvard, Some("(2020)."))]
    #[case(StyleId::Mla, Some("2020."))]
    #[case(StyleId::Chicago, Some("2020."))]
    #[case(StyleId::Ieee, Some("2020."))]
    #[case(StyleId::Ama, Some("Published 2020."))]
    #[case(StyleId::Asa, Some("2020."))]
    fn test_render_year(#[case] style: StyleId, #[case] expected: Option<&str>) {
        assert_eq!(render_year(Some("2020"), None, style).as_deref(), expected);
    }

    #[rstest]
    #[case(StyleId::Apa, Some("(n.d.)."))]
    #[case(StyleId::Harvard, Some("(n.d.)."))]
    #[case(StyleId::Mla, None)]
    #[case(StyleId::Ama, None)]
    fn test_render_missing_year(#[case] style: StyleId, #[case] expected: Option<&str>) {
        assert_eq!(render_year(None, None, style).as_deref(), expected);
    }

    #[test]
    fn test_year_with_pages() {
        let meta = full_meta();
        assert_eq!(
            render_year(Some("2020"), meta.pages.as_ref(), StyleId::Mla).as_deref(),
            Some("2020, pp. 100-110.")
        );
        assert_eq!(
            render_year(Some("2020"), meta.pages.as_ref(), StyleId::Chicago).as_deref(),
            Some("2020 (100–110).")
        );
        assert_eq!(
            render_year(Some("2020"), meta.pages.as_ref(), StyleId::Apa).as_deref(),
            Some("(2020).")
        );
    }

    #[rstest]
    #[case(SourceType::Manual, StyleId::Apa, "On Things.")]
    #[case(SourceType::Manual, StyleId::Mla, "\"On Things.\"")]
    #[case(SourceType::Url, StyleId::Ieee, "\"On Things.\"")]
    #[case(SourceType::Pdf, StyleId::Ama, "On Things.")]
    #[case(SourceType::Book, StyleId::Mla, "On Things.")]
    #[case(SourceType::Book, StyleId::Chicago, "On Things.")]
    fn test_render_title(
        #[case] source_type: SourceType,
        #[case] style: StyleId,
        #[case] expected: &str,
    ) {
        assert_eq!(
            render_title(Some("On Things"), source_type, style).as_deref(),
            Some(expected)
        );
    }

    #[rstest]
    #[case(StyleId::Apa, "Journal X, 5(2), 100-110.")]
    #[case(StyleId::Harvard, "Journal X, 5(2), 100-110.")]
    #[case(StyleId::Mla, "Journal X, vol. 5, no. 2, pp. 100-110,")]
    #[case(StyleId::Chicago, "Journal X 5, no. 2: 100–110.")]
    #[case(StyleId::Ieee, "Journal X, vol. 5, no. 2, pp. 100–110,")]
    #[case(StyleId::Ama, "Journal X. 5:100-110.")]
    #[case(StyleId::Asa, "Journal X 5(2):100-110.")]
    fn test_render_source_details(#[case] style: StyleId, #[case] expected: &str) {
        assert_eq!(
            render_source(Some("Journal X"), &full_meta(), style, false).as_deref(),
            Some(expected)
        );
    }

    #[test]
    fn test_render_source_skips_pages_already_in_year() {
        assert_eq!(
            render_source(Some("Journal X"), &full_meta(), StyleId::Mla, true).as_deref(),
            Some("Journal X, vol. 5, no. 2,")
        );
    }

    #[test]
    fn test_render_source_without_details() {
        let meta = ExtractedMetadata::default();
        assert_eq!(
            render_source(Some("Nature."), &meta, StyleId::Apa, false).as_deref(),
            Some("Nature.")
        );
        assert_eq!(render_source(None, &full_meta(), StyleId::Apa, false), None);
    }

    #[rstest]
    #[case(StyleId::Apa, "https://doi.org/10.1/xyz")]
    #[case(StyleId::Mla, "DOI: 10.1/xyz.")]
    #[case(StyleId::Ieee, "doi: 10.1/xyz.")]
    #[case(StyleId::Ama, "doi:10.1/xyz.")]
    fn test_render_doi(#[case] style: StyleId, #[case] expected: &str) {
        assert_eq!(render_doi(Some("10.1/xyz"), style).as_deref(), Some(expected));
    }

    #[rstest]
    #[case(StyleId::Apa, "Retrieved from https://ex.com")]
    #[case(StyleId::Mla, "https://ex.com. Accessed May 4, 2024.")]
    #[case(StyleId::Chicago, "Accessed May 4, 2024. https://ex.com.")]
    #[case(StyleId::Harvard, "Available at: https://ex.com (Accessed: May 4, 2024).")]
    #[case(
        StyleId::Ieee,
        "[Online]. Available: https://ex.com. [Accessed: May 4, 2024]."
    )]
    #[case(StyleId::Ama, "Accessed May 4, 2024. https://ex.com")]
    #[case(StyleId::Asa, "Retrieved May 4, 2024 (https://ex.com).")]
    fn test_render_access(#[case] style: StyleId, #[case] expected: &str) {
        assert_eq!(
            render_access(Some("https://ex.com"), "May 4, 2024", style).as_deref(),
            Some(expected)
        );
    }
}
