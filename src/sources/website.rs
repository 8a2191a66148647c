//! Web page metadata.
//!
//! Pages are mined for the usual `<meta>` conventions (Open Graph, Twitter
//! cards, Highwire `citation_*` tags) with a few fallbacks to visible markup.

use crate::FetchError;
use crate::utils::{clean_doi, replace_whitespace_runs};
use async_trait::async_trait;
use chrono::{DateTime, Local, NaiveDate};
use itertools::Itertools;
use kuchikikiki::NodeRef;
use kuchikikiki::traits::TendrilSink;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use url::Url;

/// Elements whose text is taken as a byline when no author meta tag exists.
const BYLINE_SELECTOR: &str = ".author, .byline, [rel=author]";

const TITLE_KEYS: [&str; 2] = ["og:title", "twitter:title"];
const AUTHOR_KEYS: [&str; 3] = ["author", "article:author", "citation_author"];
const PUBLISHED_KEYS: [&str; 3] = [
    "article:published_time",
    "publication_date",
    "citation_publication_date",
];
const DOI_KEYS: [&str; 2] = ["citation_doi", "dc.identifier"];
const PUBLISHER_KEYS: [&str; 2] = ["citation_publisher", "dc.publisher"];

/// Metadata mined from a web page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteMetadata {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<String>,
    pub source: Option<String>,
    pub publisher: Option<String>,
    /// `YYYY-MM-DD`
    pub date_published: Option<String>,
    /// `YYYY-MM-DD`
    pub date_accessed: Option<String>,
    pub url: Option<String>,
    /// `DOI: x` when the page declares one
    pub additional_info: Option<String>,
}

/// Looks up bibliographic metadata for a URL.
#[async_trait]
pub trait MetadataFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<WebsiteMetadata, FetchError>;
}

/// Downloads a page body.
#[async_trait]
pub trait PageLoader: Send + Sync {
    async fn load(&self, url: &Url) -> Result<String, FetchError>;
}

/// A [`MetadataFetcher`] that loads pages and mines their HTML.
#[derive(Debug, Clone)]
pub struct HtmlMetadataFetcher<L> {
    loader: L,
}

impl<L: PageLoader> HtmlMetadataFetcher<L> {
    #[must_use]
    pub fn new(loader: L) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl<L: PageLoader> MetadataFetcher for HtmlMetadataFetcher<L> {
    async fn fetch(&self, url: &str) -> Result<WebsiteMetadata, FetchError> {
        let parsed = Url::parse(url.trim())?;
        let html = self.loader.load(&parsed).await?;
        if html.trim().is_empty() {
            return Err(FetchError::Empty);
        }
        tracing::debug!(url = %parsed, bytes = html.len(), "mining page metadata");
        Ok(parse_website_metadata(url, &html, Local::now().date_naive()))
    }
}

/// Mines `html` for citation metadata.
///
/// `url` supplies the fallback source name (its host without `www.`).
pub fn parse_website_metadata(url: &str, html: &str, accessed: NaiveDate) -> WebsiteMetadata {
    let document = kuchikikiki::parse_html().one(html);
    let meta = collect_meta_tags(&document);
    let lookup = |keys: &[&str]| keys.iter().find_map(|key| meta.get(*key).cloned());

    let title = document
        .select_first("title")
        .ok()
        .map(|title| element_text(title.as_node()))
        .filter(|t| !t.is_empty())
        .or_else(|| lookup(&TITLE_KEYS));

    let authors = lookup(&AUTHOR_KEYS).or_else(|| byline_text(&document));

    let published = lookup(&PUBLISHED_KEYS).and_then(|value| parse_published_date(&value));

    let source = meta.get("og:site_name").cloned().or_else(|| {
        Url::parse(url.trim())
            .ok()
            .and_then(|u| u.host_str().map(|h| h.trim_start_matches("www.").to_string()))
    });

    WebsiteMetadata {
        title,
        authors,
        year: published.map(|d| d.format("%Y").to_string()),
        source,
        publisher: lookup(&PUBLISHER_KEYS),
        date_published: published.map(|d| d.format("%Y-%m-%d").to_string()),
        date_accessed: Some(accessed.format("%Y-%m-%d").to_string()),
        url: Some(url.to_string()),
        additional_info: lookup(&DOI_KEYS)
            .and_then(|value| clean_doi(&value))
            .map(|doi| format!("DOI: {doi}")),
    }
}

/// Maps lowercased `name`/`property` keys to `content`. The first tag wins.
fn collect_meta_tags(document: &NodeRef) -> HashMap<String, String> {
    let mut tags = HashMap::new();
    let Ok(metas) = document.select("meta") else {
        return tags;
    };
    for meta in metas {
        let attributes = meta.attributes.borrow();
        let key = attributes
            .get("name")
            .or_else(|| attributes.get("property"));
        let content = attributes.get("content").map(str::trim);
        if let (Some(key), Some(content)) = (key, content)
            && !content.is_empty()
        {
            tags.entry(key.to_ascii_lowercase())
                .or_insert_with(|| content.to_string());
        }
    }
    tags
}

/// Full text of every byline element, joined with `, `.
fn byline_text(document: &NodeRef) -> Option<String> {
    let names = document
        .select(BYLINE_SELECTOR)
        .ok()?
        .map(|element| element_text(element.as_node()))
        .filter(|name| !name.is_empty())
        .unique()
        .join(", ");
    (!names.is_empty()).then_some(names)
}

fn element_text(node: &NodeRef) -> String {
    replace_whitespace_runs(node.text_contents().trim(), " ")
}

fn parse_published_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    if let Ok(datetime) = DateTime::parse_from_rfc3339(value) {
        return Some(datetime.date_naive());
    }
    let day = value.get(..10).unwrap_or(value);
    NaiveDate::parse_from_str(day, "%Y-%m-%d")
        .or_else(|_| NaiveDate::parse_from_str(day, "%Y/%m/%d"))
        .ok()
}
