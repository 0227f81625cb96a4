//! Site document configuration
//!
//! The site document (`_jamal.yml` by default) is resolved in this order:
//! 1. Environment variables (`JAMAL_HOST`, `JAMAL_USER`, `JAMAL_PASSWORD`)
//! 2. The YAML document named by `--config` / `JAMAL_CONFIG`

mod loader;
mod types;

pub use loader::{
    apply_patch, load_with_warnings, read_document, with_env_overrides, write_default,
    ConfigWarning,
};
pub use types::{DomainList, SiteDocument, KNOWN_KEYS};

/// Default site document path
pub const DEFAULT_CONFIG_FILE: &str = "_jamal.yml";
