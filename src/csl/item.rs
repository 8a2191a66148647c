//! CSL-JSON projection of a normalized record.

use crate::normalize::NormalizedRecord;
use crate::{BibliographicRecord, SourceType};
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// CSL item types this crate produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CslItemType {
    Webpage,
    Book,
    Chapter,
    ArticleJournal,
    PaperConference,
}

impl CslItemType {
    /// Guesses the item type from the source type and the source name.
    pub fn infer(source_type: SourceType, source: Option<&str>) -> Self {
        let source = source.unwrap_or_default().to_lowercase();
        let mentions = |word: &str| source.contains(word);

        match source_type {
            SourceType::Book => CslItemType::Book,
            SourceType::Url => CslItemType::Webpage,
            SourceType::Pdf if mentions("conference") => CslItemType::PaperConference,
            SourceType::Pdf if mentions("book") => CslItemType::Chapter,
            SourceType::Pdf => CslItemType::ArticleJournal,
            SourceType::Manual if mentions("journal") => CslItemType::ArticleJournal,
            SourceType::Manual if mentions("conference") => CslItemType::PaperConference,
            SourceType::Manual if mentions("book") => CslItemType::Chapter,
            SourceType::Manual => CslItemType::Webpage,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslName {
    pub family: String,
    pub given: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CslDate {
    #[serde(rename = "date-parts")]
    pub date_parts: Vec<Vec<i32>>,
}

impl CslDate {
    fn year(year: i32) -> Self {
        Self {
            date_parts: vec![vec![year]],
        }
    }

    fn day(date: NaiveDate) -> Self {
        Self {
            date_parts: vec![vec![date.year(), date.month() as i32, date.day() as i32]],
        }
    }
}

/// A single CSL-JSON bibliography item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct CslItem {
    pub id: String,
    #[serde(rename = "type")]
    pub item_type: CslItemType,
    pub title: String,
    pub author: Vec<CslName>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issued: Option<CslDate>,
    pub accessed: CslDate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub volume: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_first: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub container_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub publisher_place: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_place: Option<String>,
    #[serde(rename = "URL", skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    #[serde(rename = "DOI", skip_serializing_if = "Option::is_none")]
    pub doi: Option<String>,
}

impl CslItem {
    /// Projects a normalized record into CSL-JSON.
    ///
    /// Container fields depend on the inferred item type: journal articles
    /// carry volume, issue and pages; books and chapters carry the publisher;
    /// conference papers carry the event place; web pages carry the URL.
    pub fn from_record(
        normalized: &NormalizedRecord,
        raw: &BibliographicRecord,
        accessed: NaiveDate,
    ) -> Self {
        let meta = &normalized.extracted;
        let item_type = CslItemType::infer(raw.source_type, raw.source());
        let source = raw.source().map(str::to_string);

        let mut item = Self {
            id: "ITEM-1".to_string(),
            item_type,
            title: raw.title().unwrap_or("Untitled").to_string(),
            author: normalized
                .authors
                .iter()
                .map(|a| CslName {
                    family: a.surname.clone(),
                    given: a.given_name.clone(),
                })
                .collect(),
            issued: raw
                .year()
                .and_then(|y| y.parse::<i32>().ok())
                .map(CslDate::year),
            accessed: CslDate::day(accessed),
            volume: None,
            issue: None,
            page_first: None,
            page: None,
            container_title: None,
            publisher: None,
            publisher_place: None,
            event_place: None,
            url: None,
            doi: meta.doi.clone(),
        };

        match item_type {
            CslItemType::ArticleJournal => {
                item.container_title = source;
                item.volume = meta.volume.clone();
                item.issue = meta.issue.clone();
                if let Some(pages) = &meta.pages {
                    item.page_first = Some(pages.start.clone());
                    item.page = Some(pages.joined("-"));
                }
            }
            CslItemType::Book | CslItemType::Chapter => {
                item.publisher = source;
                item.publisher_place = meta.publisher_place.clone();
            }
            CslItemType::PaperConference => {
                item.container_title = source;
                item.event_place = meta.event_place.clone();
            }
            CslItemType::Webpage => {
                item.container_title = source;
                if raw.source_type == SourceType::Url {
                    item.url = raw.source_url().map(str::to_string);
                }
            }
        }

        item
    }

    /// Serializes the item as a CSL-JSON array holding just this item.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&[self])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::StyleId;
    use crate::normalize::normalize;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn accessed() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 4).unwrap()
    }

    #[rstest]
    #[case(SourceType::Book, None, CslItemType::Book)]
    #[case(SourceType::Url, Some("Journal of Web"), CslItemType::Webpage)]
    #[case(SourceType::Pdf, None, CslItemType::ArticleJournal)]
    #[case(SourceType::Pdf, Some("IEEE Conference on X"), CslItemType::PaperConference)]
    #[case(SourceType::Pdf, Some("Handbook of Y"), CslItemType::Chapter)]
    #[case(SourceType::Manual, Some("The Journal of Z"), CslItemType::ArticleJournal)]
    #[case(SourceType::Manual, Some("Some Blog"), CslItemType::Webpage)]
    fn test_infer_type(
        #[case] source_type: SourceType,
        #[case] source: Option<&str>,
        #[case] expected: CslItemType,
    ) {
        assert_eq!(CslItemType::infer(source_type, source), expected);
    }

    #[test]
    fn test_journal_article_projection() {
        let raw = BibliographicRecord::new(SourceType::Manual, StyleId::Apa)
            .with_authors("Smith, John")
            .with_year("2020")
            .with_title("A Study")
            .with_source("Journal X")
            .with_additional_info("Volume 5, Issue 2, pp. 100-110, DOI: 10.1/xyz");
        let item = CslItem::from_record(&normalize(&raw), &raw, accessed());

        assert_eq!(item.item_type, CslItemType::ArticleJournal);
        assert_eq!(
            item.author,
            vec![CslName {
                family: "Smith".to_string(),
                given: "John".to_string(),
            }]
        );
        assert_eq!(item.issued, Some(CslDate::year(2020)));
        assert_eq!(item.container_title.as_deref(), Some("Journal X"));
        assert_eq!(item.page_first.as_deref(), Some("100"));
        assert_eq!(item.page.as_deref(), Some("100-110"));
        assert_eq!(item.doi.as_deref(), Some("10.1/xyz"));
        assert_eq!(item.url, None);
    }

    #[test]
    fn test_webpage_projection_json() {
        let raw = BibliographicRecord::new(SourceType::Url, StyleId::Mla)
            .with_source("Example")
            .with_source_url("https://ex.com");
        let item = CslItem::from_record(&normalize(&raw), &raw, accessed());
        let json: serde_json::Value = serde_json::from_str(&item.to_json().unwrap()).unwrap();

        assert_eq!(json[0]["type"], "webpage");
        assert_eq!(json[0]["title"], "Untitled");
        assert_eq!(json[0]["URL"], "https://ex.com");
        assert_eq!(json[0]["container-title"], "Example");
        assert_eq!(json[0]["accessed"]["date-parts"][0][1], 5);
        assert!(json[0].get("issued").is_none());
    }

    #[test]
    fn test_book_projection_uses_publisher() {
        let raw = BibliographicRecord::new(SourceType::Book, StyleId::Chicago)
            .with_source("Penguin")
            .with_additional_info("Published in London");
        let item = CslItem::from_record(&normalize(&raw), &raw, accessed());
        assert_eq!(item.publisher.as_deref(), Some("Penguin"));
        assert_eq!(item.publisher_place.as_deref(), Some("London"));
        assert_eq!(item.container_title, None);
    }
}
