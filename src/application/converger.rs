//! Config converger - keeps the site's nginx virtual host in sync
//!
//! Nothing on the host is touched when the remote document already equals
//! the rendered one. A changed document is staged, moved into place, tested
//! with `nginx -t` and only then is nginx reloaded.

use crate::domain::entities::{SiteConfig, VirtualHostConfig};
use crate::domain::ports::{ProvisionEvent, RemoteSession};
use crate::domain::services::{RemoteOp, SystemctlAction};
use crate::domain::value_objects::{ConvergeOutcome, RemoteState, ServerLayout};
use crate::error::{ProvisionError, ProvisionResult};

use super::workflow::RemoteExecutor;

/// Marker nginx prints for fatal config problems
const NGINX_EMERG_MARKER: &str = "[emerg]";
const NGINX_TEST_FAILED_MARKER: &str = "test failed";

const WEB_ROOT_MODE: &str = "755";

pub struct ConfigConverger<'a> {
    layout: &'a ServerLayout,
}

impl<'a> ConfigConverger<'a> {
    pub fn new(layout: &'a ServerLayout) -> Self {
        Self { layout }
    }

    pub fn render(&self, site: &SiteConfig) -> VirtualHostConfig {
        VirtualHostConfig::render(site, self.layout)
    }

    /// Fetch the remote copy; `None` when it does not exist
    pub fn fetch_remote<S: RemoteSession>(
        &self,
        exec: &RemoteExecutor<'_, S>,
        site: &SiteConfig,
    ) -> ProvisionResult<Option<String>> {
        let output = exec.probe(&RemoteOp::ReadFile {
            path: self.layout.vhost_available(&site.name),
        })?;
        Ok(output.success().then_some(output.stdout))
    }

    pub fn converge<S: RemoteSession>(
        &self,
        exec: &RemoteExecutor<'_, S>,
        site: &SiteConfig,
        rendered: &VirtualHostConfig,
    ) -> ProvisionResult<ConvergeOutcome> {
        let current = self.fetch_remote(exec, site)?;
        let state = RemoteState::compare(current.as_deref(), rendered.content());
        if !state.needs_update() {
            exec.notice("Nginx configuration unchanged, skipping update...");
            return Ok(ConvergeOutcome::Unchanged);
        }

        let available = self.layout.vhost_available(&site.name);
        if exec.events().wants_detailed_events() {
            exec.events().on_event(ProvisionEvent::ConfigDiff {
                path: available.clone(),
                current,
                rendered: rendered.content().to_string(),
            });
        }
        exec.notice("Setting up nginx configuration...");

        self.prepare_web_root(exec, site)?;

        let staging = self.layout.vhost_staging(&site.name);
        exec.upload(rendered.as_bytes(), &staging)?;
        exec.run(&RemoteOp::Move {
            from: staging,
            to: available.clone(),
        })?;
        exec.run(&RemoteOp::Symlink {
            target: available,
            link_dir: self.layout.nginx_sites_enabled.to_string(),
        })?;

        exec.notice("Testing nginx configuration...");
        let test = exec.probe(&RemoteOp::NginxTest)?;
        if !test.success()
            || test.contains(NGINX_EMERG_MARKER)
            || test.contains(NGINX_TEST_FAILED_MARKER)
        {
            return Err(ProvisionError::ConfigValidation(
                test.combined().trim().to_string(),
            ));
        }

        exec.run(&RemoteOp::systemctl(
            SystemctlAction::Reload,
            self.layout.nginx_unit,
        ))?;
        exec.notice("Nginx configuration updated successfully!");
        Ok(ConvergeOutcome::Updated)
    }

    fn prepare_web_root<S: RemoteSession>(
        &self,
        exec: &RemoteExecutor<'_, S>,
        site: &SiteConfig,
    ) -> ProvisionResult<()> {
        let root = self.layout.web_root(&site.name);
        exec.run(&RemoteOp::MakeDir { path: root.clone() })?;
        exec.run(&RemoteOp::Chown {
            owner: format!("{0}:{0}", site.user),
            path: root.clone(),
            recursive: true,
        })?;
        exec.run(&RemoteOp::Chmod {
            mode: WEB_ROOT_MODE.to_string(),
            path: root,
            recursive: true,
        })?;
        Ok(())
    }
}
