//! Literature entries and footnotes: the two record kinds being matched.
//!
//! Both carry a synthetic key assigned by the loaders (`L00001`, `F00001`).
//! Prompts, LLM responses and match results refer to records only through
//! these keys, never through ids found in the source documents.

use serde::{Deserialize, Serialize};

/// A bibliography record to be matched against footnotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiteratureEntry {
    pub segment_id: String,
    pub title: String,
    pub author_first: String,
    pub author_last: String,
    pub doi: String,
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    /// Publication year as written in the source, kept when it is not a
    /// plain integer (`"o.J."`, `"ca. 1900"`).
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub year_text: String,
    /// Synthetic key, `L%05d`
    pub key: String,
}

/// A citation fragment extracted from the document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Footnote {
    /// The `id` attribute of the source element
    pub footnote_id: String,
    pub text: String,
    /// Synthetic key, `F%05d`
    pub key: String,
}

impl Footnote {
    pub fn new(footnote_id: impl Into<String>, text: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            footnote_id: footnote_id.into(),
            text: text.into(),
            key: key.into(),
        }
    }
}

/// Synthetic key for the `position`-th literature entry (1-based).
pub fn literature_key(position: usize) -> String {
    format!("L{position:05}")
}

/// Synthetic key for the `position`-th footnote node (1-based).
pub fn footnote_key(position: usize) -> String {
    format!("F{position:05}")
}
