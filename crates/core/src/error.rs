//! Error types for the footmatch domain.
//!
//! Uses `thiserror` for ergonomic error definitions.
//! Each bounded context has its own error enum; [`Error`] wraps them all.

use std::path::PathBuf;
use thiserror::Error;

/// The top-level error type for all footmatch operations.
#[derive(Debug, Error)]
pub enum Error {
    // --- Transport errors ---
    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    // --- Verified query errors ---
    #[error("Query error: {0}")]
    Query(#[from] QueryError),

    // --- Duplicate resolution ---
    #[error("Disambiguation error: {0}")]
    Disambiguation(#[from] DisambiguationError),

    // --- Input loading ---
    #[error("Ingest error: {0}")]
    Ingest(#[from] IngestError),

    // --- Status side channel ---
    #[error("Status error: {0}")]
    Status(#[from] StatusError),

    // --- Configuration errors ---
    #[error("Configuration error: {message}")]
    Config { message: String },

    // --- Filesystem ---
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    // --- Serialization ---
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias using our Error.
pub type Result<T> = std::result::Result<T, Error>;

// --- Bounded context errors ---

/// Failures of the LLM transport itself.
#[derive(Debug, Clone, Error)]
pub enum ProviderError {
    #[error("API request failed: {message} (status: {status_code})")]
    ApiError { status_code: u16, message: String },

    #[error("Rate limited by provider, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    #[error("Authentication failed: {0}")]
    AuthenticationFailed(String),

    #[error("Provider not configured: {0}")]
    NotConfigured(String),

    #[error("Request timed out: {0}")]
    Timeout(String),

    #[error("Network error: {0}")]
    Network(String),
}

/// Failures of a verified (repeated) LLM query.
#[derive(Debug, Clone, Error)]
pub enum QueryError {
    /// The transport failed; the query was abandoned on the spot.
    #[error("transport failed: {0}")]
    Transport(#[from] ProviderError),

    /// No attempt produced parsable responses that passed the consistency check.
    #[error("no consistent JSON response for '{name}' after {attempts} attempts")]
    Validation { name: String, attempts: usize },
}

/// Failures while arbitrating a footnote claimed by several entries.
#[derive(Debug, Clone, Error)]
pub enum DisambiguationError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("no winner named for footnote {footnote}")]
    MissingWinner { footnote: String },

    #[error("winner {winner} for footnote {footnote} is not a candidate ({})", .candidates.join(", "))]
    InvalidWinner {
        footnote: String,
        winner: String,
        candidates: Vec<String>,
    },

    #[error("unknown footnote {0}")]
    UnknownFootnote(String),
}

#[derive(Debug, Error)]
pub enum IngestError {
    #[error("Failed to read {path}: {reason}")]
    Read { path: PathBuf, reason: String },

    #[error("Failed to parse {path}: {reason}")]
    Parse { path: PathBuf, reason: String },
}

#[derive(Debug, Error)]
pub enum StatusError {
    #[error("Failed to write status file {path}: {reason}")]
    Write { path: PathBuf, reason: String },

    #[error("Failed to read status file {path}: {reason}")]
    Read { path: PathBuf, reason: String },
}
