//! Credential manager - lifecycle of the rsync daemon secret
//!
//! Covers generation, installing the secret in the remote secrets file,
//! removing it again, and the short-lived local copy handed to rsync with
//! `--password-file`.

use std::io::Write;
use std::path::Path;

use tempfile::NamedTempFile;

use crate::domain::entities::TransferCredential;
use crate::domain::ports::RemoteSession;
use crate::domain::services::RemoteOp;
use crate::domain::value_objects::{ServerLayout, SiteName};
use crate::error::ProvisionResult;

use super::workflow::RemoteExecutor;

/// Permission bits of the remote secrets file
const SECRETS_MODE: &str = "600";

pub struct CredentialManager<'a> {
    layout: &'a ServerLayout,
}

impl<'a> CredentialManager<'a> {
    pub fn new(layout: &'a ServerLayout) -> Self {
        Self { layout }
    }

    /// Fresh secret for `site`; any earlier secret becomes invalid once installed
    pub fn rotate(&self, site: &SiteName) -> TransferCredential {
        TransferCredential::generate(site)
    }

    /// Replace the site's line in the remote secrets file and lock the file down
    pub fn install<S: RemoteSession>(
        &self,
        exec: &RemoteExecutor<'_, S>,
        credential: &TransferCredential,
    ) -> ProvisionResult<()> {
        let secrets = self.layout.rsyncd_secrets;
        exec.run(&self.delete_entry_op(credential.site()))?;
        exec.run(&RemoteOp::AppendText {
            path: secrets.to_string(),
            text: format!("{}\n", credential.secrets_entry()),
            sensitive: true,
        })?;
        exec.run(&RemoteOp::Chmod {
            mode: SECRETS_MODE.to_string(),
            path: secrets.to_string(),
            recursive: false,
        })?;
        Ok(())
    }

    /// Drop the site's line from the remote secrets file (no-op when absent)
    pub fn revoke<S: RemoteSession>(
        &self,
        exec: &RemoteExecutor<'_, S>,
        site: &SiteName,
    ) -> ProvisionResult<()> {
        exec.run(&self.delete_entry_op(site))?;
        Ok(())
    }

    fn delete_entry_op(&self, site: &SiteName) -> RemoteOp {
        RemoteOp::DeleteLinesWithPrefix {
            path: self.layout.rsyncd_secrets.to_string(),
            prefix: format!("{site}:"),
        }
    }
}

/// Local owner-only copy of a secret, deleted when released or dropped
#[derive(Debug)]
pub struct EphemeralCredentialFile {
    file: NamedTempFile,
}

impl EphemeralCredentialFile {
    /// Write `secret` (no trailing newline) to a new uniquely named file
    pub fn create(secret: &str) -> std::io::Result<Self> {
        let mut file = tempfile::Builder::new()
            .prefix("rsync_password")
            .tempfile()?;
        restrict_to_owner(file.path())?;
        file.write_all(secret.as_bytes())?;
        file.flush()?;
        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Delete the file now, reporting any error
    pub fn release(self) -> std::io::Result<()> {
        self.file.close()
    }
}

/// Run `f` with a credential file for `secret`
///
/// The file exists only while `f` runs. It is removed when `f` returns,
/// whatever `f` returns, and also if `f` panics.
pub fn with_ephemeral_credential_file<T>(
    secret: &str,
    f: impl FnOnce(&Path) -> T,
) -> std::io::Result<T> {
    let file = EphemeralCredentialFile::create(secret)?;
    let value = f(file.path());
    file.release()?;
    Ok(value)
}

#[cfg(unix)]
fn restrict_to_owner(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    std::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_to_owner(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
