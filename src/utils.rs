use crate::regex::Regex;
use std::sync::LazyLock;

static DOI_URL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://(?:dx\.)?doi\.org/(.+)$").unwrap());

static HTML_TAG_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"<[^>]*>").unwrap());

static WHITESPACE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

const HTML_ENTITIES: [(&str, &str); 8] = [
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&#39;", "'"),
    ("&#x27;", "'"),
    ("&apos;", "'"),
    ("&nbsp;", " "),
    // must stay last so `&amp;lt;` decodes to `&lt;`
    ("&amp;", "&"),
];

/// Returns the trimmed value if it holds anything but whitespace.
pub(crate) fn non_blank(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|s| !s.is_empty())
}

/// Extracts a bare DOI from a string that may carry a `doi:` label,
/// a resolver URL prefix or surrounding noise.
///
/// # Arguments
///
/// * `doi_str` - The DOI string to clean
pub(crate) fn clean_doi(doi_str: &str) -> Option<String> {
    let doi: String = doi_str
        .trim()
        .trim_end_matches("[doi]")
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let doi = match DOI_URL_REGEX.captures(&doi) {
        Some(captures) => captures[1].to_string(),
        None => doi,
    };

    let pos = doi.find("10.")?;
    let doi = doi[pos..].trim_end_matches(['.', ',', ';']);
    (doi.len() > 3).then(|| doi.to_string())
}

/// Decodes the handful of HTML entities that show up in meta tags.
pub(crate) fn decode_html_entities(text: &str) -> String {
    HTML_ENTITIES
        .iter()
        .fold(text.to_string(), |acc, (entity, plain)| acc.replace(entity, plain))
}

/// Removes markup and collapses runs of whitespace.
pub(crate) fn strip_html_tags(html: &str) -> String {
    let text = HTML_TAG_REGEX.replace_all(html, "");
    let text = decode_html_entities(&text);
    replace_whitespace_runs(text.trim(), " ")
}

/// Replaces every run of whitespace with `with`.
pub(crate) fn replace_whitespace_runs(text: &str, with: &str) -> String {
    WHITESPACE_REGEX.replace_all(text, with).into_owned()
}

/// Shortens `text` to `max` characters, marking the cut with `...`.
pub(crate) fn truncate_with_ellipsis(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(3)).collect();
    format!("{kept}...")
}
