//! Literature list loader.
//!
//! The source is a JSON array of objects with German field names:
//!
//! ```json
//! [{"segment_id": "s-1", "titel": "...", "autor": {"vorname": "...", "nachname": "..."},
//!   "doi": "...", "url": "...", "erscheinungsjahr": 2019}]
//! ```
//!
//! Missing fields load as empty strings. Keys `L00001…` follow array order.
//! A year that is not an integer loads as `year: None` with the source text
//! kept in `year_text`.

use footmatch_core::entry::{LiteratureEntry, literature_key};
use footmatch_core::error::IngestError;
use serde::Deserialize;
use std::path::Path;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    segment_id: Option<TextOrNumber>,
    #[serde(default)]
    titel: Option<String>,
    #[serde(default)]
    autor: Option<RawAuthor>,
    #[serde(default)]
    doi: Option<String>,
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    erscheinungsjahr: Option<TextOrNumber>,
}

#[derive(Debug, Default, Deserialize)]
struct RawAuthor {
    #[serde(default)]
    vorname: Option<String>,
    #[serde(default)]
    nachname: Option<String>,
}

/// Exports disagree on whether ids and years are strings or numbers.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Number(serde_json::Number),
    Text(String),
}

impl TextOrNumber {
    fn into_text(self) -> String {
        match self {
            Self::Number(n) => n.to_string(),
            Self::Text(s) => s,
        }
    }

    fn as_year(&self) -> Option<i32> {
        match self {
            Self::Number(n) => n.as_i64().and_then(|y| i32::try_from(y).ok()),
            Self::Text(s) => s.trim().parse().ok(),
        }
    }
}

/// Read and parse a literature file.
pub fn load_literature_entries(path: &Path) -> Result<Vec<LiteratureEntry>, IngestError> {
    let content = std::fs::read_to_string(path).map_err(|e| IngestError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let entries = parse_literature_entries(&content).map_err(|reason| IngestError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    debug!(path = %path.display(), count = entries.len(), "Loaded literature entries");
    Ok(entries)
}

/// Parse literature JSON, assigning keys in array order.
pub fn parse_literature_entries(json: &str) -> Result<Vec<LiteratureEntry>, String> {
    let raw: Vec<RawEntry> = serde_json::from_str(json).map_err(|e| e.to_string())?;

    Ok(raw
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            let author = item.autor.unwrap_or_default();
            let key = literature_key(i + 1);
            let (year, year_text) = match item.erscheinungsjahr {
                Some(raw) => {
                    let year = raw.as_year();
                    if year.is_some() {
                        (year, String::new())
                    } else {
                        let text = raw.into_text();
                        if !text.trim().is_empty() {
                            warn!(entry = %key, year = %text, "Publication year is not an integer");
                        }
                        (None, text)
                    }
                }
                None => (None, String::new()),
            };
            LiteratureEntry {
                segment_id: item.segment_id.map(TextOrNumber::into_text).unwrap_or_default(),
                title: item.titel.unwrap_or_default(),
                author_first: author.vorname.unwrap_or_default(),
                author_last: author.nachname.unwrap_or_default(),
                doi: item.doi.unwrap_or_default(),
                url: item.url.unwrap_or_default(),
                year,
                year_text,
                key,
            }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"[
        {"segment_id": "seg-1", "titel": "Der Prozess", "autor": {"vorname": "Franz", "nachname": "Kafka"},
         "doi": "10.1000/xyz", "url": "https://example.org/1", "erscheinungsjahr": 1925},
        {"segment_id": 17, "titel": "Faust", "autor": {"vorname": "Johann Wolfgang", "nachname": "Goethe"},
         "erscheinungsjahr": "1808"},
        {"titel": "Anonymous pamphlet", "autor": null, "erscheinungsjahr": null}
    ]"#;

    #[test]
    fn keys_follow_file_order() {
        let entries = parse_literature_entries(SAMPLE).unwrap();
        let keys: Vec<_> = entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, ["L00001", "L00002", "L00003"]);
    }

    #[test]
    fn fields_are_mapped() {
        let entries = parse_literature_entries(SAMPLE).unwrap();
        let kafka = &entries[0];
        assert_eq!(kafka.segment_id, "seg-1");
        assert_eq!(kafka.title, "Der Prozess");
        assert_eq!(kafka.author_first, "Franz");
        assert_eq!(kafka.author_last, "Kafka");
        assert_eq!(kafka.doi, "10.1000/xyz");
        assert_eq!(kafka.year, Some(1925));
    }

    #[test]
    fn numeric_ids_and_text_years_are_accepted() {
        let entries = parse_literature_entries(SAMPLE).unwrap();
        assert_eq!(entries[1].segment_id, "17");
        assert_eq!(entries[1].year, Some(1808));
        assert!(entries[1].doi.is_empty());
    }

    #[test]
    fn missing_fields_default_to_empty() {
        let entries = parse_literature_entries(SAMPLE).unwrap();
        let anon = &entries[2];
        assert!(anon.author_first.is_empty());
        assert!(anon.author_last.is_empty());
        assert!(anon.segment_id.is_empty());
        assert_eq!(anon.year, None);
    }

    #[test]
    fn free_text_year_is_kept_verbatim() {
        let entries = parse_literature_entries(
            r#"[{"titel": "Flugschrift", "erscheinungsjahr": "o.J."},
                {"titel": "Chronik", "erscheinungsjahr": "ca. 1900"},
                {"titel": "Almanach", "erscheinungsjahr": 1899.5}]"#,
        )
        .unwrap();
        assert_eq!(entries[0].year, None);
        assert_eq!(entries[0].year_text, "o.J.");
        assert_eq!(entries[1].year, None);
        assert_eq!(entries[1].year_text, "ca. 1900");
        assert_eq!(entries[2].year, None);
        assert_eq!(entries[2].year_text, "1899.5");
    }

    #[test]
    fn integer_years_leave_year_text_empty() {
        let entries = parse_literature_entries(SAMPLE).unwrap();
        assert!(entries.iter().all(|e| e.year_text.is_empty()));
    }

    #[test]
    fn non_array_is_rejected() {
        assert!(parse_literature_entries(r#"{"titel": "x"}"#).is_err());
    }

    #[test]
    fn load_reports_path_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("literature.json");
        std::fs::write(&path, "not json").unwrap();
        match load_literature_entries(&path).unwrap_err() {
            IngestError::Parse { path: p, .. } => assert_eq!(p, path),
            other => panic!("unexpected error: {other}"),
        }
        assert!(matches!(
            load_literature_entries(&dir.path().join("missing.json")),
            Err(IngestError::Read { .. })
        ));
    }
}
