//! Turning scraped JSON exports into normalized [`Document`]s.
//!
//! [`records`] knows the structured record shapes the scraping jobs emit and
//! how to flatten them into prose; [`loader`] walks a source directory,
//! routes each file to the right extraction, and normalizes the text.
//!
//! [`Document`]: crate::types::Document

pub mod loader;
pub mod records;

pub use loader::load_documents;
pub use records::{ScrapedRecord, flatten_records};
