//! Matching engine: every entry against every footnote chunk.
//!
//! The engine walks entries in load order. For each entry it splits the
//! footnotes into chunks, asks the verifier which footnotes of the chunk cite
//! the entry, and appends the confirmed keys to the entry's list. Failed chunks
//! are reported on the status channel and skipped. Once every entry has been
//! queried, duplicate resolution (see `disambiguation`) leaves each footnote on
//! at most one entry.

use crate::prompt::{FOOTNOTE_CHUNK_SIZE, PromptBuilder};
use crate::verifier::QueryVerifier;
use footmatch_core::entry::{Footnote, LiteratureEntry};
use footmatch_core::result::MatchResult;
use footmatch_core::status::{self, StatusReporter};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub struct Matcher {
    pub(crate) verifier: Arc<QueryVerifier>,
    pub(crate) prompts: PromptBuilder,
    pub(crate) status: Arc<dyn StatusReporter>,
    chunk_size: usize,
}

impl Matcher {
    pub fn new(
        verifier: Arc<QueryVerifier>,
        prompts: PromptBuilder,
        status: Arc<dyn StatusReporter>,
    ) -> Self {
        Self {
            verifier,
            prompts,
            status,
            chunk_size: FOOTNOTE_CHUNK_SIZE,
        }
    }

    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size.max(1);
        self
    }

    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Match every entry against every footnote, then resolve duplicates.
    ///
    /// Query failures are local: they are published under `error` and the run
    /// continues. An entry whose queries all failed is absent from the result.
    pub async fn match_entries(
        &self,
        entries: &[LiteratureEntry],
        footnotes: &[Footnote],
    ) -> MatchResult {
        let mut result = MatchResult::new();
        self.publish(status::PHASE, "matching");
        info!(
            entries = entries.len(),
            footnotes = footnotes.len(),
            chunk_size = self.chunk_size,
            "Matching started"
        );

        for entry in entries {
            self.publish(status::CURRENT_ENTRY, &entry.key);

            for (index, chunk) in footnotes.chunks(self.chunk_size).enumerate() {
                let name = format!("{}_chunk{index:03}", entry.key);
                let prompt = self.prompts.matching_prompt(entry, chunk);

                match self.verifier.query(&prompt, &name).await {
                    Ok(response) => {
                        let matched = extract_matches(&response, &entry.key, chunk);
                        debug!(entry = %entry.key, chunk = index, matched = matched.len(), "Chunk matched");
                        result.extend(&entry.key, matched);
                    }
                    Err(e) => {
                        warn!(entry = %entry.key, chunk = index, error = %e, "Chunk query failed");
                        self.publish(status::ERROR, &e.to_string());
                    }
                }
            }
        }

        self.publish(status::PHASE, "disambiguation");
        self.resolve_duplicates(entries, footnotes, &mut result).await;

        self.publish(status::PHASE, "done");
        self.publish(status::CURRENT_ENTRY, "done");
        info!(
            entries = result.len(),
            associations = result.association_count(),
            "Matching finished"
        );
        result
    }

    /// Status updates never abort the run.
    pub(crate) fn publish(&self, key: &str, value: &str) {
        if let Err(e) = self.status.update(key, value) {
            warn!(field = key, error = %e, "Status update failed");
        }
    }
}

/// Read the footnote keys listed under `entry_key`, keeping only keys that
/// belong to `chunk`.
fn extract_matches(response: &Value, entry_key: &str, chunk: &[Footnote]) -> Vec<String> {
    let Some(listed) = response.get(entry_key).and_then(Value::as_array) else {
        return Vec::new();
    };

    listed
        .iter()
        .filter_map(|item| {
            let Some(key) = item.as_str() else {
                warn!(entry = entry_key, value = %item, "Dropping non-string footnote key");
                return None;
            };
            if chunk.iter().any(|f| f.key == key) {
                Some(key.to_string())
            } else {
                warn!(entry = entry_key, footnote = key, "Dropping footnote key outside the chunk");
                None
            }
        })
        .collect()
}
