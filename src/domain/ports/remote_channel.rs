//! Remote channel port - one authenticated shell session on the target host
//!
//! The workflows only ever need two primitives: run a shell command and get
//! its output plus exit status, and upload a small document. Commands are
//! executed one at a time, synchronously.

use thiserror::Error;

/// Output of one remote command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }

    /// stdout followed by stderr
    pub fn combined(&self) -> String {
        if self.stderr.is_empty() {
            return self.stdout.clone();
        }
        if self.stdout.is_empty() {
            return self.stderr.clone();
        }
        format!("{}{}", self.stdout, self.stderr)
    }

    /// Whether `marker` appears in stdout or stderr
    pub fn contains(&self, marker: &str) -> bool {
        self.stdout.contains(marker) || self.stderr.contains(marker)
    }
}

/// Remote channel errors
#[derive(Error, Debug)]
pub enum ChannelError {
    /// Credentials rejected while establishing the session
    #[error("SSH authentication failed for {user}@{host}")]
    Authentication { host: String, user: String },

    /// Host unreachable or connection dropped
    #[error("connection to {host} failed: {message}")]
    Connection { host: String, message: String },

    /// Writing a document to the host failed
    #[error("upload to {path} failed: {message}")]
    UploadFailed { path: String, message: String },

    /// Local client binary missing or failed to start
    #[error("{0}")]
    NotAvailable(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// An established session bound to one (host, user, password) triple
pub trait RemoteSession {
    /// Run one shell command and wait for it to finish
    fn run(&self, command: &str) -> Result<CommandOutput, ChannelError>;

    /// Write `content` to `remote_path` as the session user
    fn upload(&self, content: &[u8], remote_path: &str) -> Result<(), ChannelError>;
}

/// Factory for sessions
pub trait RemoteChannel {
    type Session: RemoteSession;

    /// Authenticate and return a session; `password: None` means key-based auth
    fn connect(
        &self,
        host: &str,
        user: &str,
        password: Option<&str>,
    ) -> Result<Self::Session, ChannelError>;
}
