//! Remote path and service conventions
//!
//! Everything the workflows touch on the host is derived from these values
//! plus the site name.

use super::SiteName;

/// Default rsync daemon TCP port
pub const RSYNC_DAEMON_PORT: u16 = 873;

/// Where things live on a Debian/Ubuntu host running nginx and rsyncd
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerLayout {
    pub web_root_base: &'static str,
    pub nginx_sites_available: &'static str,
    pub nginx_sites_enabled: &'static str,
    pub staging_dir: &'static str,
    pub rsyncd_conf: &'static str,
    pub rsyncd_secrets: &'static str,
    pub rsyncd_pid_file: &'static str,
    pub rsync_unit: &'static str,
    pub nginx_unit: &'static str,
    pub nginx_package: &'static str,
    pub rsync_port: u16,
}

impl Default for ServerLayout {
    fn default() -> Self {
        Self {
            web_root_base: "/var/www",
            nginx_sites_available: "/etc/nginx/sites-available",
            nginx_sites_enabled: "/etc/nginx/sites-enabled",
            staging_dir: "/tmp",
            rsyncd_conf: "/etc/rsyncd.conf",
            rsyncd_secrets: "/etc/rsyncd.secrets",
            rsyncd_pid_file: "/var/run/rsyncd.pid",
            rsync_unit: "rsync",
            nginx_unit: "nginx",
            nginx_package: "nginx",
            rsync_port: RSYNC_DAEMON_PORT,
        }
    }
}

impl ServerLayout {
    /// Document root and rsync module path
    pub fn web_root(&self, site: &SiteName) -> String {
        format!("{}/{}", self.web_root_base, site)
    }

    pub fn vhost_available(&self, site: &SiteName) -> String {
        format!("{}/{}", self.nginx_sites_available, site)
    }

    pub fn vhost_enabled(&self, site: &SiteName) -> String {
        format!("{}/{}", self.nginx_sites_enabled, site)
    }

    /// Where the rendered vhost is uploaded before being moved into place
    pub fn vhost_staging(&self, site: &SiteName) -> String {
        format!("{}/{}.conf", self.staging_dir, site)
    }
}
