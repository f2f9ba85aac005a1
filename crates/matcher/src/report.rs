//! Output document: each entry with the source ids of its matched footnotes.

use chrono::{DateTime, Utc};
use footmatch_core::entry::{Footnote, LiteratureEntry};
use footmatch_core::result::MatchResult;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchReport {
    pub generated_at: DateTime<Utc>,
    pub entries: Vec<ReportEntry>,
    /// Source ids of footnotes matched to no entry, in document order.
    pub unmatched_footnote_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportEntry {
    #[serde(flatten)]
    pub entry: LiteratureEntry,
    pub footnote_ids: Vec<String>,
}

impl MatchReport {
    /// Translate synthetic keys back to source ids, one row per entry in load order.
    pub fn build(entries: &[LiteratureEntry], footnotes: &[Footnote], result: &MatchResult) -> Self {
        let source_ids: HashMap<&str, &str> = footnotes
            .iter()
            .map(|f| (f.key.as_str(), f.footnote_id.as_str()))
            .collect();

        let rows = entries
            .iter()
            .map(|entry| ReportEntry {
                entry: entry.clone(),
                footnote_ids: result
                    .get(&entry.key)
                    .unwrap_or_default()
                    .iter()
                    .filter_map(|key| source_ids.get(key.as_str()).map(|id| id.to_string()))
                    .collect(),
            })
            .collect();

        let matched: BTreeSet<&str> = result
            .iter()
            .flat_map(|(_, keys)| keys.iter().map(String::as_str))
            .collect();
        let unmatched_footnote_ids = footnotes
            .iter()
            .filter(|f| !matched.contains(f.key.as_str()))
            .map(|f| f.footnote_id.clone())
            .collect();

        Self {
            generated_at: Utc::now(),
            entries: rows,
            unmatched_footnote_ids,
        }
    }

    pub fn matched_entries(&self) -> usize {
        self.entries.iter().filter(|e| !e.footnote_ids.is_empty()).count()
    }

    pub fn association_count(&self) -> usize {
        self.entries.iter().map(|e| e.footnote_ids.len()).sum()
    }

    pub fn to_json_pretty(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(key: &str, title: &str) -> LiteratureEntry {
        LiteratureEntry {
            segment_id: format!("s{key}"),
            title: title.into(),
            author_first: "Franz".into(),
            author_last: "Kafka".into(),
            doi: String::new(),
            url: String::new(),
            year: Some(1925),
            year_text: String::new(),
            key: key.into(),
        }
    }

    fn sample() -> MatchReport {
        let entries = vec![entry("L00001", "Der Prozess"), entry("L00002", "Das Schloss")];
        let footnotes = vec![
            Footnote::new("fn-a", "a", "F00001"),
            Footnote::new("fn-b", "b", "F00002"),
            Footnote::new("fn-c", "c", "F00004"),
        ];
        let mut result = MatchResult::new();
        result.extend("L00001", vec!["F00004".to_string(), "F00001".to_string()]);
        MatchReport::build(&entries, &footnotes, &result)
    }

    #[test]
    fn maps_keys_to_source_ids() {
        let report = sample();
        assert_eq!(report.entries.len(), 2);
        assert_eq!(report.entries[0].footnote_ids, ["fn-c", "fn-a"]);
        assert!(report.entries[1].footnote_ids.is_empty());
        assert_eq!(report.unmatched_footnote_ids, ["fn-b"]);
        assert_eq!(report.matched_entries(), 1);
        assert_eq!(report.association_count(), 2);
    }

    #[test]
    fn entry_fields_are_flattened() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json_pretty().unwrap()).unwrap();
        let first = &json["entries"][0];
        assert_eq!(first["key"], "L00001");
        assert_eq!(first["title"], "Der Prozess");
        assert_eq!(first["year"], 1925);
        assert_eq!(first["footnote_ids"][1], "fn-a");
        assert!(json["generated_at"].is_string());
    }

    #[test]
    fn report_parses_back() {
        let report = sample();
        let parsed: MatchReport = serde_json::from_str(&report.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, report);
    }
}
