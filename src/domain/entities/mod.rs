//! Domain Entities
//!
//! - `SiteConfig` / `SitePatch` - the site document and its only mutation
//! - `TransferCredential` - rsync daemon secret
//! - `VirtualHostConfig` - rendered nginx server block
//! - `DaemonModule` - rendered rsyncd module block

mod credential;
mod daemon_module;
pub(crate) mod site;
mod vhost;

pub use credential::{secret_alphabet, TransferCredential, SECRET_LEN, SECRET_PUNCTUATION};
pub use daemon_module::{global_section, DaemonModule, EXCLUDE_PATTERNS, MAX_CONNECTIONS};
pub use site::{SiteConfig, SitePatch, SiteValidationError, TRANSFER_PASSWORD_KEY};
pub use vhost::VirtualHostConfig;
