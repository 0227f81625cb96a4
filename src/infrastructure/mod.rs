//! Infrastructure Layer
//!
//! Concrete implementations of domain ports.
//! This layer handles all I/O operations.
//!
//! ## Structure
//!
//! - `remote/` - OpenSSH remote channel
//! - `transfer/` - rsync daemon transfer
//! - `probe` - TCP reachability probe
//! - `process` - child process cleanup
//! - `repositories/` - YAML site repository
//! - `events/` - NDJSON event sink

pub mod events;
pub mod probe;
mod process;
pub mod remote;
pub mod repositories;
pub mod transfer;

// Re-export for convenience
pub use events::JsonEventSink;
pub use probe::TcpPortProbe;
pub use remote::{SshChannel, SshSession};
pub use repositories::YamlSiteRepository;
pub use transfer::RsyncDaemonTransfer;
