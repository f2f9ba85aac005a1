//! Entity loaders: literature JSON and footnote HTML into typed records.
//!
//! Both loaders assign synthetic sequential keys that are independent of any
//! identifier found in the source documents.

pub mod footnotes;
pub mod literature;

pub use footnotes::{DEFAULT_FOOTNOTE_TAG, load_footnotes, parse_footnotes};
pub use literature::{load_literature_entries, parse_literature_entries};
