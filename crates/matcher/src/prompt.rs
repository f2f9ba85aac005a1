//! Prompt rendering for matching and disambiguation.
//!
//! Both renderings are pure functions of their inputs: the verifier's
//! repeated calls rely on byte-identical prompts.

use footmatch_config::PromptConfig;
use footmatch_core::entry::{Footnote, LiteratureEntry};
use footmatch_core::error::Error;
use std::path::Path;

/// Footnotes per matching prompt.
pub const FOOTNOTE_CHUNK_SIZE: usize = 10;

/// Response member naming the disambiguation winner.
pub const WINNER_FIELD: &str = "winner";

pub const DEFAULT_MATCHING_TEMPLATE: &str = "\
You match bibliography entries to the footnotes that cite them.

Below is one literature entry and a numbered list of footnotes. Decide which
footnotes cite this entry. A footnote cites the entry when it refers to the
same work (author and title or year agree); a mere mention of the author is
not enough.

Respond with a JSON object and nothing else. Use the entry key as the only
property; its value is the array of keys of the citing footnotes, in the order
they appear. Use an empty array when no footnote cites the entry.
Example: {\"L00042\": [\"F00007\", \"F00012\"]}";

pub const DEFAULT_DISAMBIGUATION_TEMPLATE: &str = "\
Several bibliography entries were matched to the same footnote, but a footnote
cites at most one of them.

Below is the footnote and the candidate entries. Decide which single entry
the footnote cites.

Respond with a JSON object and nothing else, of the form
{\"winner\": \"<entry key>\"}, where the entry key is one of the candidate
keys listed. Use {\"winner\": null} if the footnote cites none of them.";

/// Fixed instruction texts, loaded once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PromptTemplates {
    pub matching: String,
    pub disambiguation: String,
}

impl Default for PromptTemplates {
    fn default() -> Self {
        Self {
            matching: DEFAULT_MATCHING_TEMPLATE.to_string(),
            disambiguation: DEFAULT_DISAMBIGUATION_TEMPLATE.to_string(),
        }
    }
}

impl PromptTemplates {
    /// Read the configured template files, falling back to the built-ins.
    pub fn load(config: &PromptConfig) -> Result<Self, Error> {
        let defaults = Self::default();
        Ok(Self {
            matching: read_or(config.matching_template.as_deref(), defaults.matching)?,
            disambiguation: read_or(
                config.disambiguation_template.as_deref(),
                defaults.disambiguation,
            )?,
        })
    }
}

fn read_or(path: Option<&Path>, fallback: String) -> Result<String, Error> {
    match path {
        None => Ok(fallback),
        Some(path) => std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read prompt template {}: {e}", path.display()),
        }),
    }
}

#[derive(Debug, Clone, Default)]
pub struct PromptBuilder {
    templates: PromptTemplates,
}

impl PromptBuilder {
    pub fn new(templates: PromptTemplates) -> Self {
        Self { templates }
    }

    pub fn templates(&self) -> &PromptTemplates {
        &self.templates
    }

    /// Matching prompt for one entry against one chunk of footnotes.
    pub fn matching_prompt(&self, entry: &LiteratureEntry, chunk: &[Footnote]) -> String {
        format!(
            "{}\n\n{}\n\nFootnotes:\n{}",
            self.templates.matching.trim_end(),
            render_entry(entry),
            render_footnotes(chunk),
        )
    }

    /// Disambiguation prompt for one contested footnote.
    pub fn disambiguation_prompt(
        &self,
        footnote: &Footnote,
        candidates: &[&LiteratureEntry],
    ) -> String {
        let candidates = candidates
            .iter()
            .map(|entry| render_candidate(entry))
            .collect::<Vec<_>>()
            .join("\n");

        format!(
            "{}\n\nFootnote:\n{}: {}\n\nCandidates:\n{}",
            self.templates.disambiguation.trim_end(),
            footnote.key,
            footnote.text,
            candidates,
        )
    }
}

fn render_year(entry: &LiteratureEntry) -> String {
    match entry.year {
        Some(year) => year.to_string(),
        None => entry.year_text.trim().to_string(),
    }
}

fn render_entry(entry: &LiteratureEntry) -> String {
    format!(
        "Entry: {}\nFirst name: {}\nLast name: {}\nYear: {}",
        entry.key,
        entry.author_first,
        entry.author_last,
        render_year(entry),
    )
}

fn render_footnotes(chunk: &[Footnote]) -> String {
    chunk
        .iter()
        .map(|f| format!("{}: {}", f.key, f.text))
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_candidate(entry: &LiteratureEntry) -> String {
    let author = [entry.author_first.as_str(), entry.author_last.as_str()]
        .into_iter()
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(" ");
    let mut line = format!("{}: {}", entry.key, author);
    let year = render_year(entry);
    if !year.is_empty() {
        line.push_str(&format!(" ({year})"));
    }
    if !entry.title.is_empty() {
        line.push_str(&format!(" {}", entry.title));
    }
    line
}
