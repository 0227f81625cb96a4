//! Jamal - static site provisioning and deployment
//!
//! Jamal turns a bare Debian/Ubuntu host into a static-site server: it installs
//! nginx, registers an rsync daemon module with a generated credential, keeps
//! the site's nginx virtual host converged, and pushes the local site directory
//! through the daemon. Everything the host needs is described by one small YAML
//! site document.

pub mod application;
pub mod config;
pub mod domain;
pub mod error;
pub mod infrastructure;
pub mod presentation;

// Re-exports for convenience
pub use config::ConfigWarning;
pub use domain::entities::{SiteConfig, SitePatch};
pub use domain::value_objects::{classify_line, SiteName, SyncCategory, SyncEvent};
pub use error::{ConfigError, ProvisionError, ProvisionResult, WorkflowError, WorkflowKind};
