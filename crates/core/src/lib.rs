//! # footmatch core
//!
//! Domain types, traits, and error definitions shared by every footmatch
//! crate. Literature entries, footnotes and match results live here, together
//! with the two seams the matching engine talks through:
//!
//! - [`Provider`]: the LLM transport ("send a prompt, get text back")
//! - [`StatusReporter`]: the small key/value progress side channel
//!
//! Implementations live in their own crates so the engine can be tested with
//! scripted transports and in-memory status sinks.

pub mod entry;
pub mod error;
pub mod message;
pub mod provider;
pub mod result;
pub mod status;

// Re-export key types at crate root for ergonomics
pub use entry::{Footnote, LiteratureEntry, footnote_key, literature_key};
pub use error::{
    DisambiguationError, Error, IngestError, ProviderError, QueryError, Result, StatusError,
};
pub use message::{Message, Role};
pub use provider::{Provider, ProviderRequest, ProviderResponse, Usage};
pub use result::{MatchResult, OccurrenceMap};
pub use status::StatusReporter;
