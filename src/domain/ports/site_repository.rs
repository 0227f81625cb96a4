//! Site repository port - loading and patching the local site document

use std::path::Path;

use crate::config::ConfigWarning;
use crate::domain::entities::{SiteConfig, SitePatch};
use crate::error::ConfigError;

/// A loaded site plus non-fatal warnings about the document
#[derive(Debug, Clone)]
pub struct LoadedSite {
    pub site: SiteConfig,
    pub warnings: Vec<ConfigWarning>,
}

/// Persistence collaborator for the site document
pub trait SiteRepository {
    /// Path of the backing document (for messages)
    fn location(&self) -> &Path;

    /// Load and validate the site document
    fn load(&self) -> Result<LoadedSite, ConfigError>;

    /// Apply a patch to the stored document, leaving every other key untouched
    fn apply(&self, patch: &SitePatch) -> Result<(), ConfigError>;
}
