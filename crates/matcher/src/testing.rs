//! Scripted transport for unit tests.

use async_trait::async_trait;
use footmatch_core::error::ProviderError;
use footmatch_core::message::Message;
use footmatch_core::provider::{Provider, ProviderRequest, ProviderResponse};
use std::sync::Mutex;

type Responder = Box<dyn Fn(&str, usize) -> Result<String, ProviderError> + Send + Sync>;

/// A provider whose bodies come from a closure over `(prompt, call index)`.
pub struct ScriptedProvider {
    responder: Responder,
    requests: Mutex<Vec<ProviderRequest>>,
}

impl ScriptedProvider {
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&str, usize) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Answer every prompt from `respond(prompt)`.
    pub fn by_prompt<F>(respond: F) -> Self
    where
        F: Fn(&str) -> Result<String, ProviderError> + Send + Sync + 'static,
    {
        Self::new(move |prompt, _| respond(prompt))
    }

    /// Same body for every call.
    pub fn constant(body: &str) -> Self {
        let body = body.to_string();
        Self::new(move |_, _| Ok(body.clone()))
    }

    /// Bodies in call order; panics when exhausted.
    pub fn sequence(bodies: Vec<Result<String, ProviderError>>) -> Self {
        Self::new(move |_, index| {
            bodies
                .get(index)
                .cloned()
                .unwrap_or_else(|| panic!("ScriptedProvider exhausted: call #{index}, have {}", bodies.len()))
        })
    }

    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Prompts received, in call order.
    pub fn prompts(&self) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter_map(|r| r.last_user_content().map(String::from))
            .collect()
    }

    pub fn last_request(&self) -> Option<ProviderRequest> {
        self.requests.lock().unwrap().last().cloned()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn complete(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        let index = {
            let mut requests = self.requests.lock().unwrap();
            requests.push(request.clone());
            requests.len() - 1
        };
        let prompt = request.last_user_content().unwrap_or_default();
        let body = (self.responder)(prompt, index)?;
        Ok(ProviderResponse {
            message: Message::assistant(body),
            usage: None,
            model: request.model,
        })
    }
}
