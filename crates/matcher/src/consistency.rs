//! Confirmation-by-repetition strategies.
//!
//! The verifier sends the same prompt several times and hands the parsed
//! responses to a [`ConsistencyCheck`], which either settles on one value or
//! rejects the attempt. Swapping the strategy never touches the engine.

use footmatch_config::{VerificationConfig, VerificationStrategy};
use serde_json::Value;
use std::sync::Arc;

pub trait ConsistencyCheck: Send + Sync {
    fn name(&self) -> &str;

    /// How many identical prompts one attempt sends.
    fn calls_per_attempt(&self) -> usize;

    /// Settle on a value, or `None` to fail the attempt.
    fn reconcile(&self, responses: &[Value]) -> Option<Value>;

    /// Whether an attempt with unparsable bodies still goes to `reconcile`
    /// (with only the parsed values). When `false` such an attempt fails.
    fn tolerates_malformed(&self) -> bool {
        false
    }
}

/// All responses must be equal as JSON values.
#[derive(Debug, Clone, Copy)]
pub struct Unanimous {
    calls: usize,
}

impl Unanimous {
    pub fn new(calls: usize) -> Self {
        Self { calls: calls.max(1) }
    }

    /// The double-call check.
    pub fn pair() -> Self {
        Self::new(2)
    }
}

impl ConsistencyCheck for Unanimous {
    fn name(&self) -> &str {
        "unanimous"
    }

    fn calls_per_attempt(&self) -> usize {
        self.calls
    }

    fn reconcile(&self, responses: &[Value]) -> Option<Value> {
        if responses.len() < self.calls {
            return None;
        }
        let (first, rest) = responses.split_first()?;
        rest.iter().all(|v| v == first).then(|| first.clone())
    }
}

/// The most frequent response wins once it has `quorum` votes.
///
/// A tie for the top count fails the attempt. Unparsable bodies count as
/// votes for nothing.
#[derive(Debug, Clone, Copy)]
pub struct MajorityVote {
    calls: usize,
    quorum: usize,
}

impl MajorityVote {
    pub fn new(calls: usize, quorum: usize) -> Self {
        let calls = calls.max(1);
        Self {
            calls,
            quorum: quorum.clamp(1, calls),
        }
    }
}

impl ConsistencyCheck for MajorityVote {
    fn name(&self) -> &str {
        "majority"
    }

    fn calls_per_attempt(&self) -> usize {
        self.calls
    }

    fn reconcile(&self, responses: &[Value]) -> Option<Value> {
        // serde_json::Value is not Hash; response counts are tiny.
        let mut tally: Vec<(&Value, usize)> = Vec::new();
        for response in responses {
            match tally.iter_mut().find(|(v, _)| *v == response) {
                Some((_, count)) => *count += 1,
                None => tally.push((response, 1)),
            }
        }

        let top = tally.iter().map(|(_, count)| *count).max()?;
        let mut leaders = tally.iter().filter(|(_, count)| *count == top);
        let (value, _) = leaders.next()?;
        if leaders.next().is_some() || top < self.quorum {
            return None;
        }
        Some((*value).clone())
    }

    fn tolerates_malformed(&self) -> bool {
        true
    }
}

/// Build the strategy named in configuration.
pub fn from_config(config: &VerificationConfig) -> Arc<dyn ConsistencyCheck> {
    match config.strategy {
        VerificationStrategy::Unanimous => Arc::new(Unanimous::new(config.calls)),
        VerificationStrategy::Majority => {
            Arc::new(MajorityVote::new(config.calls, config.effective_quorum()))
        }
    }
}
