//! Metadata sources that pre-fill records before formatting.
//!
//! Both sources sit behind async traits so that the network and PDF parsing
//! layers stay outside this crate:
//!
//! - [`MetadataFetcher`] looks up a web page, with [`HtmlMetadataFetcher`]
//!   mining HTML obtained from any [`PageLoader`]
//! - [`PdfMetadataExtractor`] guesses citation fields from the text a
//!   [`PdfTextExtractor`] pulls out of an uploaded PDF

mod pdf;
mod website;

pub use pdf::{
    PdfDocument, PdfInfo, PdfMetadata, PdfMetadataExtractor, PdfTextExtractor,
    metadata_from_document,
};
pub use website::{
    HtmlMetadataFetcher, MetadataFetcher, PageLoader, WebsiteMetadata, parse_website_metadata,
};
