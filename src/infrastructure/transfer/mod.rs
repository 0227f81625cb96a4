//! File transfer implementations

mod rsync;

pub use rsync::RsyncDaemonTransfer;
