//! Site document type definitions

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::domain::entities::SiteConfig;
use crate::domain::value_objects::SiteName;

/// Keys a site document understands, used for "did you mean" hints
pub const KNOWN_KEYS: &[&str] = &[
    "name",
    "host",
    "user",
    "password",
    "domains",
    "local_path",
    "rsync_password",
];

/// A single domain or a list of them
///
/// `domains: example.com` is accepted as shorthand for a one-element list.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum DomainList {
    One(String),
    Many(Vec<String>),
}

impl DomainList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            DomainList::One(domain) => vec![domain],
            DomainList::Many(domains) => domains,
        }
    }
}

/// The `_jamal.yml` document as written on disk
#[derive(Clone, Serialize, Deserialize)]
pub struct SiteDocument {
    pub name: String,
    pub host: String,
    pub user: String,

    #[serde(default)]
    pub password: Option<String>,

    pub domains: DomainList,

    pub local_path: PathBuf,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rsync_password: Option<String>,
}

impl fmt::Debug for SiteDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SiteDocument")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("user", &self.user)
            .field("password", &self.password.as_ref().map(|_| "<redacted>"))
            .field("domains", &self.domains)
            .field("local_path", &self.local_path)
            .field(
                "rsync_password",
                &self.rsync_password.as_ref().map(|_| "<redacted>"),
            )
            .finish()
    }
}

impl SiteDocument {
    /// Document written by `jamal init`
    pub fn example() -> Self {
        Self {
            name: "example".to_string(),
            host: "1.2.3.4".to_string(),
            user: "root".to_string(),
            password: Some("password".to_string()),
            domains: DomainList::Many(vec![
                "example.com".to_string(),
                "www.example.com".to_string(),
            ]),
            local_path: PathBuf::from("./_site"),
            rsync_password: None,
        }
    }

    /// Convert into a validated [`SiteConfig`]
    ///
    /// Returns a human-readable reason on failure; the loader attaches the file.
    pub fn into_site(self) -> Result<SiteConfig, String> {
        let name = SiteName::parse(&self.name).map_err(|e| e.to_string())?;
        let site = SiteConfig {
            name,
            host: self.host,
            user: self.user,
            password: self.password,
            domains: self.domains.into_vec(),
            local_path: self.local_path,
            rsync_password: self.rsync_password,
        };
        site.validate().map_err(|e| e.to_string())?;
        Ok(site)
    }
}
