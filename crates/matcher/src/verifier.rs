//! Query verifier: one LLM question, asked until repeated answers agree.
//!
//! Each attempt sends the same prompt `calls_per_attempt` times through the
//! rate limiter, parses every body as JSON and hands the values to the
//! consistency check. An attempt fails when the check rejects the set, or when
//! any body is not JSON and the check does not tolerate malformed bodies. After `max_attempts` failed attempts the query fails with
//! [`QueryError::Validation`]. Transport errors end the query immediately.

use crate::consistency::{ConsistencyCheck, Unanimous};
use crate::rate_limit::RateLimiter;
use crate::trail::ResponseTrail;
use footmatch_config::AppConfig;
use footmatch_core::error::{ProviderError, QueryError};
use footmatch_core::provider::{Provider, ProviderRequest};
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};

pub const DEFAULT_MAX_ATTEMPTS: usize = 2;

pub struct QueryVerifier {
    provider: Arc<dyn Provider>,
    model: String,
    temperature: f32,
    max_tokens: Option<u32>,
    limiter: Arc<RateLimiter>,
    check: Arc<dyn ConsistencyCheck>,
    max_attempts: usize,
    trail: ResponseTrail,
}

impl QueryVerifier {
    /// A verifier with the double-call check, two attempts, no rate limit
    /// and a log-only trail.
    pub fn new(provider: Arc<dyn Provider>, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
            temperature: 0.0,
            max_tokens: None,
            limiter: Arc::new(RateLimiter::unlimited()),
            check: Arc::new(Unanimous::pair()),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            trail: ResponseTrail::disabled(),
        }
    }

    /// Wire a verifier from configuration around an existing transport.
    pub fn from_config(provider: Arc<dyn Provider>, config: &AppConfig) -> Self {
        Self::new(provider, &config.model)
            .with_temperature(config.temperature)
            .with_max_tokens(config.max_tokens)
            .with_rate_limiter(Arc::new(RateLimiter::new(config.request_interval())))
            .with_check(crate::consistency::from_config(&config.verification))
            .with_max_attempts(config.verification.max_attempts)
            .with_trail(ResponseTrail::in_dir(&config.responses_dir))
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = temperature;
        self
    }

    pub fn with_max_tokens(mut self, max: u32) -> Self {
        self.max_tokens = Some(max);
        self
    }

    /// Share a limiter (several verifiers may draw from one clock).
    pub fn with_rate_limiter(mut self, limiter: Arc<RateLimiter>) -> Self {
        self.limiter = limiter;
        self
    }

    pub fn with_check(mut self, check: Arc<dyn ConsistencyCheck>) -> Self {
        self.check = check;
        self
    }

    pub fn with_max_attempts(mut self, attempts: usize) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn with_trail(mut self, trail: ResponseTrail) -> Self {
        self.trail = trail;
        self
    }

    pub fn trail(&self) -> &ResponseTrail {
        &self.trail
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Ask `prompt` and return the agreed JSON value.
    ///
    /// `name` identifies the query in the trail and in logs.
    pub async fn query(&self, prompt: &str, name: &str) -> Result<Value, QueryError> {
        self.trail.record_prompt(name, prompt).await;
        let calls = self.check.calls_per_attempt();

        for attempt in 1..=self.max_attempts {
            let mut parsed = Vec::with_capacity(calls);
            let mut malformed = 0;

            for call in 1..=calls {
                let body = self.send(prompt).await?;
                self.trail.record_response(name, attempt, call, &body).await;

                match parse_body(&body) {
                    Ok(value) => parsed.push(value),
                    Err(e) => {
                        debug!(query = name, attempt, call, error = %e, "Response is not JSON");
                        malformed += 1;
                    }
                }
            }

            if malformed > 0 && !self.check.tolerates_malformed() {
                warn!(query = name, attempt, malformed, "Attempt rejected: malformed JSON");
                continue;
            }

            if let Some(value) = self.check.reconcile(&parsed) {
                debug!(query = name, attempt, check = self.check.name(), "Responses agree");
                return Ok(value);
            }

            warn!(query = name, attempt, check = self.check.name(), "Attempt rejected: responses disagree");
        }

        Err(QueryError::Validation {
            name: name.to_string(),
            attempts: self.max_attempts,
        })
    }

    async fn send(&self, prompt: &str) -> Result<String, ProviderError> {
        self.limiter.acquire().await;

        let request = ProviderRequest {
            max_tokens: self.max_tokens,
            temperature: self.temperature,
            ..ProviderRequest::prompt(&self.model, prompt)
        };

        let response = self.provider.complete(request).await?;
        Ok(response.message.content)
    }
}

/// Parse a response body, tolerating a Markdown code fence around the JSON.
fn parse_body(body: &str) -> Result<Value, serde_json::Error> {
    serde_json::from_str(strip_code_fence(body))
}

fn strip_code_fence(body: &str) -> &str {
    let trimmed = body.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(rest) = rest.strip_suffix("```") else {
        return trimmed;
    };
    // Drop the info string ("json") on the opening fence line.
    match rest.split_once('\n') {
        Some((_, inner)) => inner.trim(),
        None => rest.trim(),
    }
}
