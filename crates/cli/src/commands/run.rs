//! `footmatch run`: match every entry against every footnote and write the report.

use crate::logging;
use footmatch_config::AppConfig;
use footmatch_ingest::{load_footnotes, load_literature_entries};
use footmatch_matcher::{
    MatchReport, Matcher, PromptBuilder, PromptTemplates, QueryVerifier, ResponseTrail,
};
use footmatch_status::JsonStatusFile;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Command-line paths that take precedence over the config file.
#[derive(Debug, Default)]
pub struct Overrides {
    pub literature: Option<PathBuf>,
    pub footnotes: Option<PathBuf>,
    pub output: Option<PathBuf>,
}

impl Overrides {
    fn apply(self, config: &mut AppConfig) {
        if let Some(path) = self.literature {
            config.input.literature = path;
        }
        if let Some(path) = self.footnotes {
            config.input.footnotes = path;
        }
        if let Some(path) = self.output {
            config.output_path = path;
        }
    }
}

pub async fn run(
    config_path: Option<&Path>,
    overrides: Overrides,
    verbose: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    overrides.apply(&mut config);

    logging::init(verbose, config.log_file.as_deref())?;

    let trail = ResponseTrail::in_dir(&config.responses_dir);
    trail.reset().await.map_err(|e| {
        format!(
            "Failed to prepare responses directory {}: {e}",
            config.responses_dir.display()
        )
    })?;
    let status = Arc::new(JsonStatusFile::create(&config.status_path)?);

    let entries = load_literature_entries(&config.input.literature)?;
    let footnotes = load_footnotes(&config.input.footnotes, &config.input.footnote_tag)?;
    info!(
        entries = entries.len(),
        footnotes = footnotes.len(),
        "Inputs loaded"
    );

    let provider = footmatch_providers::build_from_config(&config);
    info!(provider = provider.name(), model = %config.model, "Using provider");

    let verifier = Arc::new(QueryVerifier::from_config(provider, &config).with_trail(trail));
    let templates = PromptTemplates::load(&config.prompts)?;
    let matcher = Matcher::new(verifier, PromptBuilder::new(templates), status.clone());

    let result = matcher.match_entries(&entries, &footnotes).await;
    let report = MatchReport::build(&entries, &footnotes, &result);

    if let Some(parent) = config.output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }
    std::fs::write(&config.output_path, report.to_json_pretty()?)?;
    info!(path = %config.output_path.display(), "Report written");

    println!("footmatch run complete");
    println!("  Entries:      {}", entries.len());
    println!("  Footnotes:    {}", footnotes.len());
    println!("  Matched:      {} entries, {} footnotes", report.matched_entries(), report.association_count());
    println!("  Unmatched:    {} footnotes", report.unmatched_footnote_ids.len());
    println!("  Report:       {}", config.output_path.display());
    println!("  Status:       {}", status.path().display());
    if let Some(error) = status.snapshot().get(footmatch_core::status::ERROR) {
        println!("  Last error:   {error}");
    }

    Ok(())
}
