//! SiteName value object
//!
//! The site name doubles as the rsync module name, the rsync auth user, the
//! key in `/etc/rsyncd.secrets` and a path segment under `/var/www` and
//! `/etc/nginx`. It is interpolated into `sed` patterns and shell commands, so
//! it is validated once here instead of being escaped ad hoc everywhere.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Maximum accepted length of a site name
pub const MAX_SITE_NAME_LEN: usize = 64;

/// A validated site identifier: `[A-Za-z0-9][A-Za-z0-9_-]*`
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SiteName(String);

/// Why a candidate site name was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiteNameError {
    #[error("site name must not be empty")]
    Empty,
    #[error("site name '{0}' is longer than 64 characters")]
    TooLong(String),
    #[error("site name '{name}' must start with a letter or digit")]
    BadStart { name: String },
    #[error(
        "site name '{name}' contains '{ch}'; only letters, digits, '-' and '_' are allowed"
    )]
    InvalidChar { name: String, ch: char },
}

impl SiteName {
    pub fn parse(raw: &str) -> Result<Self, SiteNameError> {
        if raw.is_empty() {
            return Err(SiteNameError::Empty);
        }
        if raw.len() > MAX_SITE_NAME_LEN {
            return Err(SiteNameError::TooLong(raw.to_string()));
        }
        if let Some(ch) = raw
            .chars()
            .find(|c| !(c.is_ascii_alphanumeric() || *c == '-' || *c == '_'))
        {
            return Err(SiteNameError::InvalidChar {
                name: raw.to_string(),
                ch,
            });
        }
        // '-' first would be read as an option by rm/mkdir/sed
        if !raw.starts_with(|c: char| c.is_ascii_alphanumeric()) {
            return Err(SiteNameError::BadStart {
                name: raw.to_string(),
            });
        }
        Ok(Self(raw.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for SiteName {
    type Error = SiteNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<SiteName> for String {
    fn from(name: SiteName) -> Self {
        name.0
    }
}

impl AsRef<str> for SiteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SiteName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
