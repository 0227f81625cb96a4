//! Result of comparing the rendered virtual host against the remote copy

use serde::Serialize;

/// What the config converger did
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ConvergeOutcome {
    /// Remote matched byte-for-byte; nothing uploaded, nothing reloaded
    Unchanged,
    /// New config uploaded, tested and nginx reloaded
    Updated,
}

/// Remote state of a config document relative to the freshly rendered one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoteState {
    Absent,
    Identical,
    Divergent,
}

impl RemoteState {
    /// Three-way comparison; `None` means the remote file does not exist
    pub fn compare(remote: Option<&str>, rendered: &str) -> Self {
        match remote {
            None => RemoteState::Absent,
            Some(current) if current == rendered => RemoteState::Identical,
            Some(_) => RemoteState::Divergent,
        }
    }

    pub fn needs_update(&self) -> bool {
        !matches!(self, RemoteState::Identical)
    }
}
