//! Domain Services
//!
//! Stateless helpers shared by the workflows.
//!
//! - `remote_ops` - typed remote operations and the one place shell strings are built

mod remote_ops;

pub use remote_ops::{sed_escape, shell_quote, RemoteCommand, RemoteOp, SystemctlAction};
