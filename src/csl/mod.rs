//! Delegation to an external CSL processor.
//!
//! The crate does not interpret CSL styles itself. Instead it projects a
//! normalized record into CSL-JSON and hands it to a [`CslProcessor`]
//! together with the template name for the requested style.

mod item;

pub use item::{CslDate, CslItem, CslItemType, CslName};

use crate::format::FormatOptions;
use crate::normalize::NormalizedRecord;
use crate::utils::strip_html_tags;
use crate::{BibliographicRecord, CslError, StyleId};
use async_trait::async_trait;

/// Output flavours a CSL processor can be asked for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CslOutputFormat {
    Text,
    Html,
}

/// An external CSL processor.
#[async_trait]
pub trait CslProcessor: Send + Sync {
    /// Renders a one-item bibliography for `item` with the named template.
    async fn render(
        &self,
        item: &CslItem,
        template: &str,
        format: CslOutputFormat,
    ) -> Result<String, CslError>;
}

/// Formats a record through `processor`.
///
/// Plain text is requested first. If that fails the HTML rendering is
/// requested and its markup stripped.
///
/// # Errors
///
/// Returns `CslError` if both renderings fail or produce no text.
pub async fn format_with_csl(
    processor: &dyn CslProcessor,
    normalized: &NormalizedRecord,
    raw: &BibliographicRecord,
    style: StyleId,
    options: &FormatOptions,
) -> Result<String, CslError> {
    let item = CslItem::from_record(normalized, raw, options.accessed);
    let template = style.csl_template();

    let text = match processor.render(&item, template, CslOutputFormat::Text).await {
        Ok(text) => text,
        Err(err) => {
            tracing::debug!(%err, template, "CSL text rendering failed, retrying as HTML");
            let html = processor
                .render(&item, template, CslOutputFormat::Html)
                .await?;
            strip_html_tags(&html)
        }
    };

    let text = text.trim();
    if text.is_empty() {
        return Err(CslError::EmptyOutput(template.to_string()));
    }
    Ok(text.to_string())
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::SourceType;
    use crate::normalize::normalize;
    use chrono::NaiveDate;
    use pretty_assertions::assert_eq;
    use std::sync::Mutex;

    /// A scripted processor that records the templates it was asked for.
    pub(crate) struct ScriptedProcessor {
        pub(crate) text: Option<String>,
        pub(crate) html: Option<String>,
        pub(crate) calls: Mutex<Vec<(String, CslOutputFormat)>>,
    }

    impl ScriptedProcessor {
        pub(crate) fn new(text: Option<&str>, html: Option<&str>) -> Self {
            Self {
                text: text.map(str::to_string),
                html: html.map(str::to_string),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl CslProcessor for ScriptedProcessor {
        async fn render(
            &self,
            item: &CslItem,
            template: &str,
            format: CslOutputFormat,
        ) -> Result<String, CslError> {
            item.to_json()?;
            self.calls
                .lock()
                .unwrap()
                .push((template.to_string(), format));
            let output = match format {
                CslOutputFormat::Text => &self.text,
                CslOutputFormat::Html => &self.html,
            };
            output
                .clone()
                .ok_or_else(|| CslError::Processor(format!("no {format:?} output")))
        }
    }

    fn record() -> BibliographicRecord {
        BibliographicRecord::new(SourceType::Manual, StyleId::Mla)
            .with_authors("John Smith")
            .with_title("A Study")
    }

    fn options() -> FormatOptions {
        FormatOptions::accessed_on(NaiveDate::from_ymd_opt(2024, 5, 4).unwrap())
    }

    #[tokio::test]
    async fn test_text_output_is_used() {
        let processor = ScriptedProcessor::new(Some("  Smith, John. A Study.\n"), None);
        let raw = record();
        let result = format_with_csl(&processor, &normalize(&raw), &raw, StyleId::Mla, &options())
            .await
            .unwrap();
        assert_eq!(result, "Smith, John. A Study.");
        assert_eq!(
            *processor.calls.lock().unwrap(),
            vec![(
                "modern-language-association".to_string(),
                CslOutputFormat::Text
            )]
        );
    }

    #[tokio::test]
    async fn test_html_retry_strips_markup() {
        let processor = ScriptedProcessor::new(
            None,
            Some("<div class=\"csl-entry\">Smith, John. <i>A Study</i>.</div>"),
        );
        let raw = record();
        let result = format_with_csl(&processor, &normalize(&raw), &raw, StyleId::Ieee, &options())
            .await
            .unwrap();
        assert_eq!(result, "Smith, John. A Study.");
        assert_eq!(processor.calls.lock().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_both_renderings_failing_is_an_error() {
        let processor = ScriptedProcessor::new(None, None);
        let raw = record();
        let result =
            format_with_csl(&processor, &normalize(&raw), &raw, StyleId::Apa, &options()).await;
        assert!(matches!(result, Err(CslError::Processor(_))));
    }

    #[tokio::test]
    async fn test_blank_output_is_an_error() {
        let processor = ScriptedProcessor::new(Some("   "), None);
        let raw = record();
        let result =
            format_with_csl(&processor, &normalize(&raw), &raw, StyleId::Ama, &options()).await;
        assert!(matches!(result, Err(CslError::EmptyOutput(t)) if t == "american-medical-association"));
    }
}
