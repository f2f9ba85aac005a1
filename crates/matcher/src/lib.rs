//! The footmatch matching pipeline.
//!
//! A [`QueryVerifier`] turns one prompt into one trusted JSON value by asking
//! repeatedly through a shared [`RateLimiter`] until a [`ConsistencyCheck`]
//! accepts the answers. The [`Matcher`] drives it over every entry and footnote
//! chunk, then resolves footnotes claimed by several entries.

pub mod consistency;
pub mod disambiguation;
pub mod engine;
pub mod prompt;
pub mod rate_limit;
pub mod report;
pub mod trail;
pub mod verifier;

#[cfg(test)]
mod testing;

pub use consistency::{ConsistencyCheck, MajorityVote, Unanimous};
pub use engine::Matcher;
pub use prompt::{FOOTNOTE_CHUNK_SIZE, PromptBuilder, PromptTemplates};
pub use rate_limit::RateLimiter;
pub use report::{MatchReport, ReportEntry};
pub use trail::ResponseTrail;
pub use verifier::QueryVerifier;
