//! Domain Ports (Interfaces)
//!
//! These traits define the boundaries of the domain layer.
//! Infrastructure layer provides concrete implementations.

pub mod file_transfer;
pub mod port_probe;
pub mod provision_events;
pub mod remote_channel;
pub mod site_repository;

pub use file_transfer::{FileTransfer, TransferError, TransferExit, TransferRequest};
pub use port_probe::{PortProbe, ProbeReport};
pub use provision_events::{NoopEventSink, ProvisionEvent, ProvisionEventSink};
pub use remote_channel::{ChannelError, CommandOutput, RemoteChannel, RemoteSession};
pub use site_repository::{LoadedSite, SiteRepository};
