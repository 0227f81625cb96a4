//! File transfer port - bulk delta sync of the site directory
//!
//! The transfer runs as a separate process. Its per-item output lines are
//! handed to the caller one at a time, in order, as they are produced.

use std::path::Path;

use thiserror::Error;

use crate::domain::value_objects::SiteName;

/// Everything the transfer needs to know for one run
#[derive(Debug, Clone, Copy)]
pub struct TransferRequest<'a> {
    /// Local source directory, already ending with `/`
    pub source: &'a str,
    /// rsync module (and auth user) on the daemon
    pub module: &'a SiteName,
    pub host: &'a str,
    pub port: u16,
    /// File holding the daemon secret
    pub password_file: &'a Path,
}

/// How the transfer process ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransferExit {
    /// Exit code; `None` when the process was killed by a signal
    pub code: Option<i32>,
}

impl TransferExit {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }

    /// Exit code for reporting; signals are reported as -1
    pub fn status(&self) -> i32 {
        self.code.unwrap_or(-1)
    }
}

/// Transfer errors (failure to run at all, not a non-zero exit)
#[derive(Error, Debug)]
pub enum TransferError {
    #[error("{0}")]
    NotAvailable(String),

    #[error("transfer IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Strategy for syncing a local directory to the rsync daemon
pub trait FileTransfer {
    /// Get the name of this transfer method (for logging)
    fn name(&self) -> &'static str;

    /// Run the transfer, calling `on_line` for each output line
    fn run(
        &self,
        request: &TransferRequest<'_>,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<TransferExit, TransferError>;
}
