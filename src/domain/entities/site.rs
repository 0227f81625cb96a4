//! Site entity - one static website bound to one remote host
//!
//! The site document is an immutable input to every workflow. The only field
//! a workflow changes is `rsync_password`, and it does so by returning a
//! [`SitePatch`] that the persistence layer applies after the step succeeded.

use std::path::PathBuf;

use crate::domain::value_objects::SiteName;

/// Key of the transfer credential in the site document
pub const TRANSFER_PASSWORD_KEY: &str = "rsync_password";

/// Validated site configuration
#[derive(Clone, PartialEq, Eq)]
pub struct SiteConfig {
    /// Site identifier (rsync module, auth user, path segment)
    pub name: SiteName,
    /// Remote host name or address
    pub host: String,
    /// SSH user; also owns the web root
    pub user: String,
    /// SSH password; `None` means key-based authentication
    pub password: Option<String>,
    /// Virtual-host names, in order
    pub domains: Vec<String>,
    /// Local directory whose contents are synced
    pub local_path: PathBuf,
    /// rsync daemon secret; present only after setup
    pub rsync_password: Option<String>,
}

/// Typed change to the persisted site document
#[derive(Clone, PartialEq, Eq)]
pub enum SitePatch {
    SetTransferPassword(String),
    UnsetTransferPassword,
}

/// Why a site document was rejected
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SiteValidationError {
    #[error("'{field}' must not be empty")]
    Empty { field: &'static str },
    #[error("'{field}' must not contain whitespace: {value:?}")]
    Whitespace { field: &'static str, value: String },
    #[error("'{field}' must not start with '-': {value:?}")]
    LeadingDash { field: &'static str, value: String },
    #[error("domain {0:?} contains an invalid character")]
    InvalidDomain(String),
    #[error("'rsync_password' must not contain ':' or line breaks")]
    InvalidTransferPassword,
}

impl SiteConfig {
    /// Check the free-form fields that end up in remote commands and configs
    pub fn validate(&self) -> Result<(), SiteValidationError> {
        check_token("host", &self.host)?;
        check_token("user", &self.user)?;

        if self.domains.is_empty() {
            return Err(SiteValidationError::Empty { field: "domains" });
        }
        for domain in &self.domains {
            check_token("domains", domain)?;
            if domain.contains([';', '{', '}', '\'', '"']) {
                return Err(SiteValidationError::InvalidDomain(domain.clone()));
            }
        }

        if let Some(secret) = &self.rsync_password {
            if secret.is_empty() || secret.contains([':', '\n', '\r']) {
                return Err(SiteValidationError::InvalidTransferPassword);
            }
        }
        Ok(())
    }

    pub fn transfer_password(&self) -> Option<&str> {
        self.rsync_password.as_deref()
    }

    /// SSH password, treating an empty string as "use keys"
    pub fn ssh_password(&self) -> Option<&str> {
        self.password.as_deref().filter(|p| !p.is_empty())
    }

    /// Return a copy with the patch applied
    pub fn patched(&self, patch: &SitePatch) -> Self {
        let mut site = self.clone();
        match patch {
            SitePatch::SetTransferPassword(secret) => site.rsync_password = Some(secret.clone()),
            SitePatch::UnsetTransferPassword => site.rsync_password = None,
        }
        site
    }
}

fn check_token(field: &'static str, value: &str) -> Result<(), SiteValidationError> {
    if value.is_empty() {
        return Err(SiteValidationError::Empty { field });
    }
    if value.chars().any(char::is_whitespace) {
        return Err(SiteValidationError::Whitespace {
            field,
            value: value.to_string(),
        });
    }
    if value.starts_with('-') {
        return Err(SiteValidationError::LeadingDash {
            field,
            value: value.to_string(),
        });
    }
    Ok(())
}

// Credentials stay out of debug output and logs.
impl std::fmt::Debug for SiteConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SiteConfig")
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

impl std::fmt::Debug for SitePatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SitePatch::SetTransferPassword(_) => f.write_str("SetTransferPassword(<redacted>)"),
            SitePatch::UnsetTransferPassword => f.write_str("UnsetTransferPassword"),
        }
    }
}

#[cfg(test)]
pub(crate) fn sample_site() -> SiteConfig {
    SiteConfig {
        name: SiteName::parse("example").unwrap(),
        host: "203.0.113.7".to_string(),
        user: "deploy".to_string(),
        password: Some("hunter2".to_string()),
        domains: vec!["example.com".to_string(), "www.example.com".to_string()],
        local_path: PathBuf::from("./_site"),
        rsync_password: Some("Ab3!xY9@qW2#eR5$".to_string()),
    }
}
