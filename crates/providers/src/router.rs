//! Provider selection from configuration.
//!
//! No API key ⇒ the deterministic echo stub. Otherwise an OpenAI-compatible
//! transport for the configured provider name, base URL and timeout.

use std::sync::Arc;
use footmatch_core::provider::Provider;
use crate::echo::EchoProvider;
use crate::openai_compat::OpenAiCompatProvider;
use tracing::{info, warn};

/// Build the transport described by `config`.
pub fn build_from_config(config: &footmatch_config::AppConfig) -> Arc<dyn Provider> {
    let Some(api_key) = config.api_key.as_deref() else {
        warn!("No API key configured, using the echo transport (no matches will be found)");
        return Arc::new(EchoProvider::new());
    };

    let base_url = config
        .api_url
        .clone()
        .unwrap_or_else(|| default_base_url(&config.provider));

    info!(provider = %config.provider, base_url = %base_url, model = %config.model, "Using chat-completion transport");

    Arc::new(
        OpenAiCompatProvider::new(&config.provider, base_url, api_key)
            .with_timeout(config.request_timeout()),
    )
}

/// Get the default base URL for well-known providers.
fn default_base_url(provider_name: &str) -> String {
    match provider_name {
        "openrouter" => "https://openrouter.ai/api/v1".into(),
        "openai" => "https://api.openai.com/v1".into(),
        "ollama" => "http://localhost:11434/v1".into(),
        "deepseek" => "https://api.deepseek.com/v1".into(),
        "groq" => "https://api.groq.com/openai/v1".into(),
        "together" => "https://api.together.xyz/v1".into(),
        "vllm" => "http://localhost:8000/v1".into(),
        "llamacpp" | "llama.cpp" => "http://localhost:8080/v1".into(),
        _ => "https://api.openai.com/v1".into(),
    }
}
