//! rsync daemon configuration for one site
//!
//! `/etc/rsyncd.conf` holds a global section followed by one bracketed module
//! per site. A module block always ends with a blank line so it can be removed
//! again with a `/^\[name\]$/,/^$/d` range delete.

use crate::domain::value_objects::{ServerLayout, SiteName};

use super::SiteConfig;

/// Maximum simultaneous connections per module
pub const MAX_CONNECTIONS: u32 = 4;

/// Patterns never synced to the server
pub const EXCLUDE_PATTERNS: &str = ".git/ .gitignore";

/// Rendered rsyncd module block
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DaemonModule {
    site: SiteName,
    block: String,
}

impl DaemonModule {
    pub fn render(site: &SiteConfig, layout: &ServerLayout) -> Self {
        let name = &site.name;
        let user = &site.user;
        let lines = [
            format!("[{name}]"),
            format!("    path = {}", layout.web_root(name)),
            format!("    comment = Website files for {name}"),
            "    read only = no".to_string(),
            format!("    uid = {user}"),
            format!("    gid = {user}"),
            "    use chroot = no".to_string(),
            format!("    max connections = {MAX_CONNECTIONS}"),
            format!("    exclude = {EXCLUDE_PATTERNS}"),
            format!("    auth users = {name}"),
            format!("    secrets file = {}", layout.rsyncd_secrets),
        ];

        let mut block = lines.join("\n");
        block.push_str("\n\n");

        Self {
            site: name.clone(),
            block,
        }
    }

    pub fn site(&self) -> &SiteName {
        &self.site
    }

    /// Block text, terminated by a blank line
    pub fn block(&self) -> &str {
        &self.block
    }

    /// Header line that starts this module's block
    pub fn header(&self) -> String {
        Self::header_for(&self.site)
    }

    pub fn header_for(site: &SiteName) -> String {
        format!("[{site}]")
    }
}

/// Global section written once, when the daemon config is still empty
///
/// Global parameters must precede every module, so this is never appended to
/// a file that already has content.
pub fn global_section(layout: &ServerLayout) -> String {
    format!("pid file = {}\n\n", layout.rsyncd_pid_file)
}
