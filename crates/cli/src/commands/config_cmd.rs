//! `footmatch config`: Print the resolved configuration.

use footmatch_config::AppConfig;
use std::path::Path;

pub async fn show(config_path: Option<&Path>) -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load(config_path).map_err(|e| format!("Failed to load config: {e}"))?;
    println!("{}", render(&config)?);

    if !config.has_api_key() {
        println!("# No API key set (FOOTMATCH_API_KEY or OPENAI_API_KEY); runs use the echo transport");
    }
    Ok(())
}

/// TOML rendering with the API key masked.
fn render(config: &AppConfig) -> Result<String, toml::ser::Error> {
    let mut shown = config.clone();
    if shown.api_key.is_some() {
        shown.api_key = Some("[REDACTED]".into());
    }
    toml::to_string_pretty(&shown)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_is_masked() {
        let config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        let out = render(&config).unwrap();
        assert!(!out.contains("sk-secret"));
        assert!(out.contains("[REDACTED]"));
        assert!(out.contains("gpt-4o-mini"));
    }

    #[test]
    fn missing_key_is_omitted() {
        let out = render(&AppConfig::default()).unwrap();
        assert!(!out.contains("api_key"));
    }
}
