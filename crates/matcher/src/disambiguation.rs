//! Duplicate resolution for footnotes claimed by several entries.
//!
//! Each contested footnote gets one verified query listing its candidates.
//! The footnote stays only on the named winner. When arbitration fails for any
//! reason the footnote is removed from every claimant.

use crate::engine::Matcher;
use crate::prompt::WINNER_FIELD;
use footmatch_core::entry::{Footnote, LiteratureEntry};
use footmatch_core::error::DisambiguationError;
use footmatch_core::result::MatchResult;
use footmatch_core::status;
use serde_json::Value;
use tracing::{debug, info, warn};

impl Matcher {
    /// Leave every footnote on at most one entry.
    pub async fn resolve_duplicates(
        &self,
        entries: &[LiteratureEntry],
        footnotes: &[Footnote],
        result: &mut MatchResult,
    ) {
        let contested = result.contested();
        if contested.is_empty() {
            debug!("No contested footnotes");
            return;
        }
        info!(contested = contested.len(), "Resolving duplicate matches");

        for (footnote_key, claimants) in contested {
            self.publish(status::CURRENT_FOOTNOTE, &footnote_key);

            match self.arbitrate(entries, footnotes, &footnote_key, &claimants).await {
                Ok(winner) => {
                    debug!(footnote = %footnote_key, winner = %winner, "Duplicate resolved");
                    result.retain_only(&footnote_key, &winner);
                }
                Err(e) => {
                    warn!(footnote = %footnote_key, error = %e, "Disambiguation failed, dropping footnote");
                    self.publish(status::ERROR, &e.to_string());
                    result.strip(&footnote_key);
                }
            }
        }
    }

    async fn arbitrate(
        &self,
        entries: &[LiteratureEntry],
        footnotes: &[Footnote],
        footnote_key: &str,
        claimants: &[String],
    ) -> Result<String, DisambiguationError> {
        let footnote = footnotes
            .iter()
            .find(|f| f.key == footnote_key)
            .ok_or_else(|| DisambiguationError::UnknownFootnote(footnote_key.to_string()))?;

        let candidates: Vec<&LiteratureEntry> = claimants
            .iter()
            .filter_map(|key| entries.iter().find(|e| &e.key == key))
            .collect();

        let prompt = self.prompts.disambiguation_prompt(footnote, &candidates);
        let name = format!("disambiguate_{footnote_key}");
        let response = self.verifier.query(&prompt, &name).await?;

        let winner = match response.get(WINNER_FIELD) {
            None | Some(Value::Null) => {
                return Err(DisambiguationError::MissingWinner {
                    footnote: footnote_key.to_string(),
                });
            }
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
        };

        if claimants.contains(&winner) {
            Ok(winner)
        } else {
            Err(DisambiguationError::InvalidWinner {
                footnote: footnote_key.to_string(),
                winner,
                candidates: claimants.to_vec(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prompt::PromptBuilder;
    use crate::testing::ScriptedProvider;
    use crate::verifier::QueryVerifier;
    use footmatch_core::error::ProviderError;
    use footmatch_status::InMemoryStatus;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn entry(key: &str, last: &str) -> LiteratureEntry {
        LiteratureEntry {
            segment_id: String::new(),
            title: format!("Works of {last}"),
            author_first: String::new(),
            author_last: last.into(),
            doi: String::new(),
            url: String::new(),
            year: None,
            year_text: String::new(),
            key: key.into(),
        }
    }

    fn entries() -> Vec<LiteratureEntry> {
        vec![entry("L00001", "Kafka"), entry("L00002", "Mann")]
    }

    fn footnotes() -> Vec<Footnote> {
        vec![
            Footnote::new("fn1", "Kafka, Prozess.", "F00001"),
            Footnote::new("fn2", "Mann, Zauberberg.", "F00002"),
        ]
    }

    fn contested() -> MatchResult {
        let mut map = BTreeMap::new();
        map.insert("L00001".to_string(), vec!["F00001".to_string()]);
        map.insert("L00002".to_string(), vec!["F00001".to_string(), "F00002".to_string()]);
        MatchResult::from(map)
    }

    fn matcher(provider: Arc<ScriptedProvider>, status: Arc<InMemoryStatus>) -> Matcher {
        let verifier = Arc::new(QueryVerifier::new(provider, "m"));
        Matcher::new(verifier, PromptBuilder::default(), status)
    }

    async fn resolve(body: Result<String, ProviderError>) -> (MatchResult, Arc<InMemoryStatus>, Arc<ScriptedProvider>) {
        let provider = Arc::new(ScriptedProvider::new(move |_, _| body.clone()));
        let status = Arc::new(InMemoryStatus::new());
        let mut result = contested();
        matcher(provider.clone(), status.clone())
            .resolve_duplicates(&entries(), &footnotes(), &mut result)
            .await;
        (result, status, provider)
    }

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[tokio::test]
    async fn winner_keeps_footnote() {
        let (result, status, provider) = resolve(Ok(r#"{"winner": "L00001"}"#.into())).await;
        assert_eq!(result.get("L00001").unwrap(), keys(&["F00001"]).as_slice());
        assert_eq!(result.get("L00002").unwrap(), keys(&["F00002"]).as_slice());
        assert_eq!(status.values_of(status::CURRENT_FOOTNOTE), ["F00001"]);
        assert_eq!(provider.calls(), 2);

        let prompt = &provider.prompts()[0];
        assert!(prompt.contains("F00001: Kafka, Prozess."));
        assert!(prompt.contains("L00001: Kafka Works of Kafka"));
        assert!(prompt.contains("L00002: Mann Works of Mann"));
    }

    #[tokio::test]
    async fn query_failure_strips_all_claimants() {
        let (result, status, _) = resolve(Ok("no idea".into())).await;
        assert!(result.get("L00001").unwrap().is_empty());
        assert_eq!(result.get("L00002").unwrap(), keys(&["F00002"]).as_slice());
        assert!(status.get(status::ERROR).unwrap().contains("disambiguate_F00001"));
    }

    #[tokio::test]
    async fn winner_outside_candidates_strips_all_claimants() {
        let (result, status, _) = resolve(Ok(r#"{"winner": "L00009"}"#.into())).await;
        assert!(result.get("L00001").unwrap().is_empty());
        assert_eq!(result.get("L00002").unwrap(), keys(&["F00002"]).as_slice());
        assert!(status.get(status::ERROR).unwrap().contains("L00009"));
    }

    #[tokio::test]
    async fn null_winner_strips_all_claimants() {
        let (result, _, _) = resolve(Ok(r#"{"winner": null}"#.into())).await;
        assert!(result.get("L00001").unwrap().is_empty());
        assert_eq!(result.occurrences().get("F00001"), None);
    }

    #[tokio::test]
    async fn transport_error_strips_all_claimants() {
        let (result, status, provider) =
            resolve(Err(ProviderError::Network("down".into()))).await;
        assert_eq!(result.occurrences().get("F00001"), None);
        assert!(status.get(status::ERROR).is_some());
        assert_eq!(provider.calls(), 1);
    }

    #[tokio::test]
    async fn uncontested_result_is_untouched() {
        let provider = Arc::new(ScriptedProvider::constant("{}"));
        let mut result = MatchResult::new();
        result.extend("L00001", keys(&["F00001"]));
        let before = result.clone();
        matcher(provider.clone(), Arc::new(InMemoryStatus::new()))
            .resolve_duplicates(&entries(), &footnotes(), &mut result)
            .await;
        assert_eq!(result, before);
        assert_eq!(provider.calls(), 0);
    }

    #[tokio::test]
    async fn full_run_leaves_each_footnote_once() {
        // Both entries claim F00001 during matching; arbitration picks L00001.
        let provider = Arc::new(ScriptedProvider::by_prompt(|prompt| {
            let body = if prompt.contains("Candidates:") {
                r#"{"winner": "L00001"}"#
            } else if prompt.contains("Entry: L00001") {
                r#"{"L00001": ["F00001"]}"#
            } else {
                r#"{"L00002": ["F00001"]}"#
            };
            Ok(body.into())
        }));
        let status = Arc::new(InMemoryStatus::new());
        let result = matcher(provider, status.clone())
            .match_entries(&entries(), &footnotes()[..1])
            .await;

        assert_eq!(result.get("L00001").unwrap(), keys(&["F00001"]).as_slice());
        assert!(result.get("L00002").unwrap().is_empty());
        assert!(result.contested().is_empty());
        assert_eq!(status.get(status::CURRENT_ENTRY).as_deref(), Some("done"));
    }
}
