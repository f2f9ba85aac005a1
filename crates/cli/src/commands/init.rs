//! `footmatch init`: Write a default config and the prompt templates.

use footmatch_config::{AppConfig, CONFIG_FILE};
use footmatch_matcher::prompt::{DEFAULT_DISAMBIGUATION_TEMPLATE, DEFAULT_MATCHING_TEMPLATE};
use std::path::{Path, PathBuf};

const PROMPTS_DIR: &str = "prompts";
const MATCHING_FILE: &str = "matching.txt";
const DISAMBIGUATION_FILE: &str = "disambiguation.txt";

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from(CONFIG_FILE));

    println!("footmatch init");
    println!("==============\n");

    let written = scaffold(&config_path)?;
    for path in &written {
        println!("  Created {}", path.display());
    }
    if written.is_empty() {
        println!("  Nothing to do, all files exist.");
    } else {
        println!("\n  Next: put your inputs under data/ and run `footmatch run`.");
    }
    Ok(())
}

/// Write whichever of the config and template files are missing.
fn scaffold(config_path: &Path) -> std::io::Result<Vec<PathBuf>> {
    let base = config_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or(Path::new("."));
    let prompts_dir = base.join(PROMPTS_DIR);
    let matching = prompts_dir.join(MATCHING_FILE);
    let disambiguation = prompts_dir.join(DISAMBIGUATION_FILE);

    let mut written = Vec::new();
    std::fs::create_dir_all(&prompts_dir)?;

    if write_if_absent(&matching, DEFAULT_MATCHING_TEMPLATE)? {
        written.push(matching.clone());
    }
    if write_if_absent(&disambiguation, DEFAULT_DISAMBIGUATION_TEMPLATE)? {
        written.push(disambiguation.clone());
    }

    let mut config = AppConfig::default();
    config.prompts.matching_template = Some(matching);
    config.prompts.disambiguation_template = Some(disambiguation);
    let toml = toml::to_string_pretty(&config).map_err(std::io::Error::other)?;
    if write_if_absent(config_path, &toml)? {
        written.push(config_path.to_path_buf());
    }

    Ok(written)
}

fn write_if_absent(path: &Path, contents: &str) -> std::io::Result<bool> {
    if path.exists() {
        return Ok(false);
    }
    std::fs::write(path, contents)?;
    Ok(true)
}
