//! Formatter selection and the CSL fallback chain.
//!
//! # Example
//!
//! ```
//! use citegen::{BibliographicRecord, CitationFormatter, FormatterConfig, SourceType, StyleId};
//! use citegen::format::FormatOptions;
//!
//! # tokio_test_block(async {
//! let formatter = CitationFormatter::from_config(&FormatterConfig::default(), None).unwrap();
//! let record = BibliographicRecord::new(SourceType::Manual, StyleId::Apa).with_title("Notes");
//! let citation = formatter.render(&record, &FormatOptions::default()).await;
//! assert_eq!(citation, "(n.d.). Notes.");
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

use crate::csl::{CslProcessor, format_with_csl};
use crate::format::{FormatOptions, format_citation, format_minimal};
use crate::normalize::normalize;
use crate::{BibliographicRecord, CitationError, Result};
use std::fmt;
use std::sync::Arc;

/// Which rendering path a formatter uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EngineKind {
    /// The built-in rule table
    #[default]
    Native,
    /// An external CSL processor, with fallback on failure
    CslDelegate,
}

/// What to render when the CSL processor fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CslFallback {
    /// The built-in rule table
    #[default]
    Native,
    /// The minimal `authors. (year). title. source.` concatenation
    Minimal,
}

/// Configuration for building a [`CitationFormatter`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatterConfig {
    pub engine: EngineKind,
    pub csl_fallback: CslFallback,
}

impl FormatterConfig {
    /// Creates a configuration that uses the native formatter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the engine kind
    pub fn set_engine(&mut self, engine: EngineKind) -> &mut Self {
        self.engine = engine;
        self
    }

    /// Sets what the CSL engine falls back to
    pub fn set_csl_fallback(&mut self, fallback: CslFallback) -> &mut Self {
        self.csl_fallback = fallback;
        self
    }
}

/// A citation formatter: the native rule table or a CSL delegate.
#[derive(Clone, Default)]
pub enum CitationFormatter {
    #[default]
    Native,
    CslDelegate {
        processor: Arc<dyn CslProcessor>,
        fallback: CslFallback,
    },
}

impl fmt::Debug for CitationFormatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CitationFormatter::Native => f.write_str("Native"),
            CitationFormatter::CslDelegate { fallback, .. } => f
                .debug_struct("CslDelegate")
                .field("fallback", fallback)
                .finish_non_exhaustive(),
        }
    }
}

impl CitationFormatter {
    /// Builds the formatter `config` asks for.
    ///
    /// # Errors
    ///
    /// Returns `CitationError::MissingField` if the CSL engine is selected
    /// without a processor.
    pub fn from_config(
        config: &FormatterConfig,
        processor: Option<Arc<dyn CslProcessor>>,
    ) -> Result<Self> {
        match (config.engine, processor) {
            (EngineKind::Native, _) => Ok(CitationFormatter::Native),
            (EngineKind::CslDelegate, Some(processor)) => Ok(CitationFormatter::CslDelegate {
                processor,
                fallback: config.csl_fallback,
            }),
            (EngineKind::CslDelegate, None) => {
                Err(CitationError::MissingField("csl processor".to_string()))
            }
        }
    }

    /// Renders `raw` in its own style.
    ///
    /// The CSL path never surfaces its failures: they are logged and the
    /// configured fallback formatter renders the record instead.
    pub async fn render(&self, raw: &BibliographicRecord, options: &FormatOptions) -> String {
        let normalized = normalize(raw);
        let style = raw.style;

        let (processor, fallback) = match self {
            CitationFormatter::Native => {
                return format_citation(&normalized, raw, style, options);
            }
            CitationFormatter::CslDelegate {
                processor,
                fallback,
            } => (processor, fallback),
        };

        match format_with_csl(processor.as_ref(), &normalized, raw, style, options).await {
            Ok(citation) => citation,
            Err(err) => {
                tracing::warn!(%err, %style, ?fallback, "CSL rendering failed, using fallback formatter");
                match fallback {
                    CslFallback::Native => format_citation(&normalized, raw, style, options),
                    CslFallback::Minimal => format_minimal(raw),
                }
            }
        }
    }
}
