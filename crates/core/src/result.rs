//! Match results and the occurrence map used during duplicate resolution.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Entry key → ordered footnote keys matched to that entry.
///
/// Entries iterate (and serialize) in the order they were first extended,
/// which is load order however many entries there are.
/// Before duplicate resolution a footnote key may appear under several
/// entries; afterwards it appears at most once overall.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MatchResult {
    assignments: IndexMap<String, Vec<String>>,
}

/// Footnote key → distinct entry keys currently claiming it.
pub type OccurrenceMap = BTreeMap<String, Vec<String>>;

impl MatchResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append footnote keys to an entry's list, creating the entry if needed.
    ///
    /// A key already on the entry's list is not added twice.
    pub fn extend<I>(&mut self, entry_key: &str, footnote_keys: I)
    where
        I: IntoIterator<Item = String>,
    {
        let list = self.assignments.entry(entry_key.to_string()).or_default();
        for key in footnote_keys {
            if !list.contains(&key) {
                list.push(key);
            }
        }
    }

    pub fn get(&self, entry_key: &str) -> Option<&[String]> {
        self.assignments.get(entry_key).map(Vec::as_slice)
    }

    pub fn contains_entry(&self, entry_key: &str) -> bool {
        self.assignments.contains_key(entry_key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Vec<String>)> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Total number of (entry, footnote) associations.
    pub fn association_count(&self) -> usize {
        self.assignments.values().map(Vec::len).sum()
    }

    /// Build the footnote → claiming entries map.
    pub fn occurrences(&self) -> OccurrenceMap {
        let mut map = OccurrenceMap::new();
        for (entry_key, footnotes) in &self.assignments {
            for footnote in footnotes {
                let claimants = map.entry(footnote.clone()).or_default();
                if !claimants.contains(entry_key) {
                    claimants.push(entry_key.clone());
                }
            }
        }
        map
    }

    /// Footnotes claimed by more than one entry, with their claimants.
    pub fn contested(&self) -> OccurrenceMap {
        self.occurrences()
            .into_iter()
            .filter(|(_, claimants)| claimants.len() > 1)
            .collect()
    }

    /// Remove a footnote from every entry except `winner`.
    pub fn retain_only(&mut self, footnote_key: &str, winner: &str) {
        for (entry_key, footnotes) in self.assignments.iter_mut() {
            if entry_key != winner {
                footnotes.retain(|f| f != footnote_key);
            }
        }
    }

    /// Remove a footnote from every entry.
    pub fn strip(&mut self, footnote_key: &str) {
        for footnotes in self.assignments.values_mut() {
            footnotes.retain(|f| f != footnote_key);
        }
    }

    pub fn into_inner(self) -> IndexMap<String, Vec<String>> {
        self.assignments
    }
}

impl From<BTreeMap<String, Vec<String>>> for MatchResult {
    fn from(assignments: BTreeMap<String, Vec<String>>) -> Self {
        Self {
            assignments: assignments.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn contested_pair() -> MatchResult {
        let mut result = MatchResult::new();
        result.extend("L00001", keys(&["F00001", "F00002"]));
        result.extend("L00002", keys(&["F00001"]));
        result
    }

    #[test]
    fn extend_keeps_order_and_skips_repeats() {
        let mut result = MatchResult::new();
        result.extend("L00001", keys(&["F00003", "F00001"]));
        result.extend("L00001", keys(&["F00001", "F00002"]));
        assert_eq!(result.get("L00001").unwrap(), keys(&["F00003", "F00001", "F00002"]).as_slice());
    }

    #[test]
    fn extend_with_nothing_records_entry() {
        let mut result = MatchResult::new();
        result.extend("L00004", Vec::new());
        assert!(result.contains_entry("L00004"));
        assert!(result.get("L00004").unwrap().is_empty());
    }

    #[test]
    fn occurrences_collect_claimants() {
        let occ = contested_pair().occurrences();
        assert_eq!(occ["F00001"], keys(&["L00001", "L00002"]));
        assert_eq!(occ["F00002"], keys(&["L00001"]));
    }

    #[test]
    fn contested_only_lists_shared_footnotes() {
        let contested = contested_pair().contested();
        assert_eq!(contested.len(), 1);
        assert!(contested.contains_key("F00001"));
    }

    #[test]
    fn retain_only_keeps_winner() {
        let mut result = contested_pair();
        result.retain_only("F00001", "L00002");
        assert_eq!(result.get("L00001").unwrap(), keys(&["F00002"]).as_slice());
        assert_eq!(result.get("L00002").unwrap(), keys(&["F00001"]).as_slice());
    }

    #[test]
    fn strip_removes_everywhere_but_keeps_entries() {
        let mut result = contested_pair();
        result.strip("F00001");
        assert_eq!(result.get("L00001").unwrap(), keys(&["F00002"]).as_slice());
        assert!(result.get("L00002").unwrap().is_empty());
        assert_eq!(result.len(), 2);
    }

    #[test]
    fn serializes_as_plain_object() {
        let json = serde_json::to_value(contested_pair()).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"L00001": ["F00001", "F00002"], "L00002": ["F00001"]})
        );
    }

    #[test]
    fn entries_keep_load_order_past_five_digits() {
        let mut result = MatchResult::new();
        result.extend("L99999", keys(&["F00001"]));
        result.extend("L100000", keys(&["F00002"]));

        let order: Vec<_> = result.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(order, ["L99999", "L100000"]);

        let json = serde_json::to_string(&result).unwrap();
        assert!(json.find("L99999").unwrap() < json.find("L100000").unwrap());
    }
}
