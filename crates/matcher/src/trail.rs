//! Response trail: every prompt and raw response body, per query name.
//!
//! Files written under the trail directory:
//!
//! - `<name>.prompt.txt`
//! - `<name>.attempt<N>.call<M>.txt`
//!
//! Without a directory, bodies go to the log at `trace` level. Write failures
//! are logged and never fail a query. `reset` only deletes files with these
//! two name shapes.

use std::path::{Path, PathBuf};
use tracing::{debug, trace, warn};

#[derive(Debug, Clone, Default)]
pub struct ResponseTrail {
    dir: Option<PathBuf>,
}

impl ResponseTrail {
    /// Log-only trail.
    pub fn disabled() -> Self {
        Self { dir: None }
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: Some(dir.into()),
        }
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }

    /// Remove trail files left by a previous run and make sure the directory
    /// exists. Any other file in the directory is left alone.
    pub async fn reset(&self) -> std::io::Result<()> {
        let Some(dir) = &self.dir else {
            return Ok(());
        };
        tokio::fs::create_dir_all(dir).await?;

        let mut listing = tokio::fs::read_dir(dir).await?;
        let mut removed = 0usize;
        while let Some(item) = listing.next_entry().await? {
            let is_trail_file = item
                .file_name()
                .to_str()
                .is_some_and(is_trail_file_name);
            if is_trail_file && item.file_type().await?.is_file() {
                tokio::fs::remove_file(item.path()).await?;
                removed += 1;
            }
        }
        debug!(dir = %dir.display(), removed, "Response trail reset");
        Ok(())
    }

    pub(crate) async fn record_prompt(&self, name: &str, prompt: &str) {
        self.write(&format!("{}.prompt.txt", file_stem(name)), prompt)
            .await;
    }

    pub(crate) async fn record_response(&self, name: &str, attempt: usize, call: usize, body: &str) {
        self.write(
            &format!("{}.attempt{attempt}.call{call}.txt", file_stem(name)),
            body,
        )
        .await;
    }

    async fn write(&self, file_name: &str, contents: &str) {
        let Some(dir) = &self.dir else {
            trace!(file = file_name, body = contents, "LLM exchange");
            return;
        };

        let path = dir.join(file_name);
        if let Err(e) = tokio::fs::create_dir_all(dir).await {
            warn!(dir = %dir.display(), error = %e, "Cannot create response trail directory");
            return;
        }
        if let Err(e) = tokio::fs::write(&path, contents).await {
            warn!(path = %path.display(), error = %e, "Cannot write response trail file");
        }
    }
}

/// `<stem>.prompt.txt` or `<stem>.attempt<N>.call<M>.txt`.
fn is_trail_file_name(name: &str) -> bool {
    if let Some(stem) = name.strip_suffix(".prompt.txt") {
        return !stem.is_empty();
    }
    let Some(rest) = name.strip_suffix(".txt") else {
        return false;
    };
    let Some((rest, call)) = rest.rsplit_once(".call") else {
        return false;
    };
    let Some((stem, attempt)) = rest.rsplit_once(".attempt") else {
        return false;
    };
    let is_number = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    !stem.is_empty() && is_number(attempt) && is_number(call)
}

/// Keep query names usable as file names.
fn file_stem(name: &str) -> String {
    name.chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '_' })
        .collect()
}
