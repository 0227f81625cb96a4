//! Remote channel implementations

mod ssh;

pub use ssh::{SshChannel, SshSession};
