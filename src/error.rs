//! Error types for Jamal
//!
//! Library layers use `thiserror`; the CLI wraps everything in `anyhow`.
//!
//! Every workflow (setup, deploy, remove) reports exactly one
//! [`WorkflowError`]. Authentication failures keep their own message, every
//! other cause is folded into `"<workflow> failed: <cause>"`.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

use crate::domain::ports::{ChannelError, TransferError};

/// Result type alias for provisioning steps
pub type ProvisionResult<T> = Result<T, ProvisionError>;

/// Everything that can go wrong while provisioning or syncing a site
#[derive(Error, Debug)]
pub enum ProvisionError {
    /// The remote host rejected the SSH credentials
    #[error("SSH authentication failed for {user}@{host}")]
    Authentication { host: String, user: String },

    /// A remote command reported an error
    #[error("{step}: {message}")]
    StepFailure { step: String, message: String },

    /// `nginx -t` rejected the rendered virtual host
    #[error("invalid nginx configuration: {0}")]
    ConfigValidation(String),

    /// rsync exited with a non-zero status
    #[error(
        "rsync failed with status: {status}. Please check the rsync daemon is running and port {port} is accessible."
    )]
    SyncFailure { status: i32, port: u16 },

    /// Site document failed validation before anything touched the host
    #[error("invalid site configuration: {0}")]
    InvalidSite(String),

    /// Site document could not be loaded or saved
    #[error("site configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Local IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Anything else
    #[error("{0}")]
    Generic(String),
}

impl ProvisionError {
    pub fn step(step: impl fmt::Display, message: impl Into<String>) -> Self {
        ProvisionError::StepFailure {
            step: step.to_string(),
            message: message.into(),
        }
    }

    pub fn is_authentication(&self) -> bool {
        matches!(self, ProvisionError::Authentication { .. })
    }
}

impl From<ChannelError> for ProvisionError {
    fn from(err: ChannelError) -> Self {
        match err {
            ChannelError::Authentication { host, user } => {
                ProvisionError::Authentication { host, user }
            }
            other => ProvisionError::Generic(other.to_string()),
        }
    }
}

impl From<TransferError> for ProvisionError {
    fn from(err: TransferError) -> Self {
        ProvisionError::Generic(err.to_string())
    }
}

/// The three top-level workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WorkflowKind {
    Setup,
    Deploy,
    Remove,
}

impl WorkflowKind {
    /// Command name used in JSON events and headers
    pub fn command(&self) -> &'static str {
        match self {
            WorkflowKind::Setup => "setup",
            WorkflowKind::Deploy => "deploy",
            WorkflowKind::Remove => "remove",
        }
    }

    fn failure_label(&self) -> &'static str {
        match self {
            WorkflowKind::Setup => "Setup",
            WorkflowKind::Deploy => "Deployment",
            WorkflowKind::Remove => "Removal",
        }
    }
}

impl fmt::Display for WorkflowKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.command())
    }
}

/// Workflow-scoped error surfaced to the user
#[derive(Debug)]
pub struct WorkflowError {
    workflow: WorkflowKind,
    cause: ProvisionError,
}

impl WorkflowError {
    pub fn new(workflow: WorkflowKind, cause: ProvisionError) -> Self {
        Self { workflow, cause }
    }

    pub fn workflow(&self) -> WorkflowKind {
        self.workflow
    }

    /// The underlying failure kind
    pub fn cause(&self) -> &ProvisionError {
        &self.cause
    }
}

impl fmt::Display for WorkflowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.cause.is_authentication() {
            return f.write_str("SSH authentication failed");
        }
        write!(f, "{} failed: {}", self.workflow.failure_label(), self.cause)
    }
}

// Display already carries the cause, so there is no `source()`.
impl std::error::Error for WorkflowError {}

/// Errors raised while reading or writing the local site document
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Config file not found: {}. Run `jamal init` to create one.", path.display())]
    NotFound { path: PathBuf },

    #[error("Invalid YAML in {}: {message}", file.display())]
    InvalidYaml { file: PathBuf, message: String },

    #[error("Invalid configuration in {}: {message}", file.display())]
    Invalid { file: PathBuf, message: String },

    #[error("{} already exists. Use --force to overwrite.", file.display())]
    AlreadyExists { file: PathBuf },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
