//! LLM transports for footmatch.
//!
//! All transports implement the `footmatch_core::Provider` trait.
//! The router picks one based on configuration.

pub mod echo;
pub mod openai_compat;
pub mod router;

pub use echo::EchoProvider;
pub use openai_compat::OpenAiCompatProvider;
pub use router::build_from_config;
