//! YAML site repository
//!
//! Persists the site document through the config loader.

use std::path::{Path, PathBuf};

use crate::config;
use crate::domain::entities::SitePatch;
use crate::domain::ports::{LoadedSite, SiteRepository};
use crate::error::ConfigError;

/// Site repository backed by a `_jamal.yml` file
#[derive(Debug, Clone)]
pub struct YamlSiteRepository {
    path: PathBuf,
}

impl YamlSiteRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

impl SiteRepository for YamlSiteRepository {
    fn location(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<LoadedSite, ConfigError> {
        let (site, warnings) = config::load_with_warnings(&self.path)?;
        Ok(LoadedSite { site, warnings })
    }

    fn apply(&self, patch: &SitePatch) -> Result<(), ConfigError> {
        config::apply_patch(&self.path, patch)
    }
}
