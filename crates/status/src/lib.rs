//! Status reporters for footmatch.
//!
//! Both implement `footmatch_core::StatusReporter`. The JSON file is what the
//! CLI uses; the in-memory reporter backs tests and embedding.

pub mod file;
pub mod memory;

pub use file::JsonStatusFile;
pub use memory::InMemoryStatus;
