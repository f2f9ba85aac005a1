//! `footmatch status`: Show the status snapshot.

use footmatch_config::AppConfig;
use footmatch_status::JsonStatusFile;
use std::path::Path;

pub async fn run(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;

    println!("footmatch status");
    println!("================");
    println!("  Status file:  {}", config.status_path.display());

    if !config.status_path.exists() {
        println!("\n  No status file yet. Start a run with `footmatch run`.");
        return Ok(());
    }

    let snapshot = JsonStatusFile::load(&config.status_path)?;
    if snapshot.is_empty() {
        println!("\n  (empty)");
        return Ok(());
    }

    println!();
    let width = snapshot.keys().map(String::len).max().unwrap_or(0);
    for (key, value) in &snapshot {
        println!("  {key:<width$}  {value}");
    }

    Ok(())
}
