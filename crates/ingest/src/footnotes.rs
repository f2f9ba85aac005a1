//! Footnote document loader.
//!
//! Citation nodes are elements of one tag (`div` by default) carrying an `id`
//! attribute. Numbering runs over every id-bearing node in document order;
//! nodes whose text is empty still consume their `F%05d` number and are then
//! dropped, so the retained keys can have gaps. Elements without an id are
//! not citation nodes and consume nothing.

use footmatch_core::entry::{Footnote, footnote_key};
use footmatch_core::error::IngestError;
use scraper::{Html, Selector};
use std::path::Path;
use tracing::{debug, trace};

pub const DEFAULT_FOOTNOTE_TAG: &str = "div";

/// Read and parse a footnote document.
pub fn load_footnotes(path: &Path, tag: &str) -> Result<Vec<Footnote>, IngestError> {
    let html = std::fs::read_to_string(path).map_err(|e| IngestError::Read {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })?;

    let footnotes = parse_footnotes(&html, tag).map_err(|reason| IngestError::Parse {
        path: path.to_path_buf(),
        reason,
    })?;

    debug!(path = %path.display(), count = footnotes.len(), "Loaded footnotes");
    Ok(footnotes)
}

/// Extract footnotes from HTML.
pub fn parse_footnotes(html: &str, tag: &str) -> Result<Vec<Footnote>, String> {
    let selector = Selector::parse(&format!("{tag}[id]"))
        .map_err(|e| format!("invalid footnote tag '{tag}': {e:?}"))?;
    let document = Html::parse_document(html);

    let mut footnotes = Vec::new();
    let mut position = 0;

    for element in document.select(&selector) {
        let Some(id) = element.value().id().filter(|id| !id.is_empty()) else {
            continue;
        };
        position += 1;

        let text = element.text().collect::<String>();
        let text = text.split_whitespace().collect::<Vec<_>>().join(" ");
        if text.is_empty() {
            trace!(id, position, "Skipping footnote without text");
            continue;
        }

        footnotes.push(Footnote::new(id, text, footnote_key(position)));
    }

    Ok(footnotes)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DOC: &str = r#"<!DOCTYPE html>
<html><body>
  <div class="wrapper">
    <div id="fn1">Kafka, <i>Der Prozess</i>, 1925, S. 12.</div>
    <div>no id here</div>
    <div id="fn2">   </div>
    <div id="fn3">
        Goethe, Faust, 1808.
    </div>
    <p id="fn-para">Not a div.</p>
    <div id="">empty id</div>
  </div>
</body></html>"#;

    #[test]
    fn keys_count_all_id_bearing_nodes() {
        let notes = parse_footnotes(DOC, DEFAULT_FOOTNOTE_TAG).unwrap();
        let keys: Vec<_> = notes.iter().map(|f| f.key.as_str()).collect();
        // fn2 has no text: it takes F00002 and is dropped.
        assert_eq!(keys, ["F00001", "F00003"]);
    }

    #[test]
    fn ids_and_text_are_extracted() {
        let notes = parse_footnotes(DOC, DEFAULT_FOOTNOTE_TAG).unwrap();
        assert_eq!(notes[0].footnote_id, "fn1");
        assert_eq!(notes[0].text, "Kafka, Der Prozess, 1925, S. 12.");
        assert_eq!(notes[1].footnote_id, "fn3");
        assert_eq!(notes[1].text, "Goethe, Faust, 1808.");
    }

    #[test]
    fn other_tags_can_be_selected() {
        let notes = parse_footnotes(DOC, "p").unwrap();
        assert_eq!(notes.len(), 1);
        assert_eq!(notes[0].footnote_id, "fn-para");
        assert_eq!(notes[0].key, "F00001");
    }

    #[test]
    fn invalid_tag_is_rejected() {
        assert!(parse_footnotes(DOC, "div[").is_err());
    }

    #[test]
    fn document_without_footnotes_is_empty() {
        let notes = parse_footnotes("<html><body><p>text</p></body></html>", "div").unwrap();
        assert!(notes.is_empty());
    }

    #[test]
    fn load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("footnotes.html");
        std::fs::write(&path, DOC).unwrap();
        let notes = load_footnotes(&path, DEFAULT_FOOTNOTE_TAG).unwrap();
        assert_eq!(notes.len(), 2);
    }
}
