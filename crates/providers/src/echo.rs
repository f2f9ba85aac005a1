//! Deterministic echo transport.
//!
//! Wraps the prompt in a JSON envelope `{"prompt": "..."}`. Used when no API
//! key is configured and in tests: two identical prompts always yield two
//! identical, parsable bodies, so every verified query succeeds on the first
//! attempt (and matches nothing, since no entry key appears in the envelope).

use async_trait::async_trait;
use footmatch_core::error::ProviderError;
use footmatch_core::message::Message;
use footmatch_core::provider::{Provider, ProviderRequest, ProviderResponse};

#[derive(Debug, Default, Clone)]
pub struct EchoProvider;

impl EchoProvider {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Provider for EchoProvider {
    fn name(&self) -> &str {
        "echo"
    }

    async fn complete(
        &self,
        request: ProviderRequest,
    ) -> std::result::Result<ProviderResponse, ProviderError> {
        let prompt = request.last_user_content().unwrap_or_default();
        let body = serde_json::json!({ "prompt": prompt }).to_string();
        Ok(ProviderResponse {
            message: Message::assistant(body),
            usage: None,
            model: request.model,
        })
    }
}
