//! Remove Use Case

use std::sync::Arc;

use crate::application::credentials::CredentialManager;
use crate::application::workflow::{run_plan, PlanStep, RemoteExecutor, StepOutcome};
use crate::domain::entities::{DaemonModule, SiteConfig, SitePatch};
use crate::domain::ports::{
    NoopEventSink, ProvisionEvent, ProvisionEventSink, RemoteChannel, RemoteSession,
    SiteRepository,
};
use crate::domain::services::{RemoteOp, SystemctlAction};
use crate::domain::value_objects::ServerLayout;
use crate::error::{ProvisionError, ProvisionResult, WorkflowError, WorkflowKind};

use super::result::RemoveReport;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RemoveStep {
    DropVHost,
    ReloadServer,
    DeleteWebRoot,
    RevokeSecret,
    DropDaemonModule,
    TidyDaemonConfig,
    ForgetCredential,
}

impl RemoveStep {
    pub const PLAN: [RemoveStep; 7] = [
        RemoveStep::DropVHost,
        RemoveStep::ReloadServer,
        RemoveStep::DeleteWebRoot,
        RemoveStep::RevokeSecret,
        RemoveStep::DropDaemonModule,
        RemoveStep::TidyDaemonConfig,
        RemoveStep::ForgetCredential,
    ];
}

impl PlanStep for RemoveStep {
    fn name(&self) -> &'static str {
        match self {
            RemoveStep::DropVHost => "drop-vhost",
            RemoveStep::ReloadServer => "reload-server",
            RemoveStep::DeleteWebRoot => "delete-web-root",
            RemoveStep::RevokeSecret => "revoke-secret",
            RemoveStep::DropDaemonModule => "drop-daemon-module",
            RemoveStep::TidyDaemonConfig => "tidy-daemon-config",
            RemoveStep::ForgetCredential => "forget-credential",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            RemoveStep::DropVHost => "Removing nginx configuration",
            RemoveStep::ReloadServer => "Reloading nginx",
            RemoveStep::DeleteWebRoot => "Removing website files",
            RemoveStep::RevokeSecret => "Removing rsync secrets",
            RemoveStep::DropDaemonModule => "Removing rsync configuration",
            RemoveStep::TidyDaemonConfig => "Cleaning up rsync configuration",
            RemoveStep::ForgetCredential => "Forgetting rsync password",
        }
    }
}

pub struct RemoveUseCase<C, R>
where
    C: RemoteChannel,
    R: SiteRepository,
{
    channel: C,
    repository: R,
    layout: ServerLayout,
}

impl<C, R> RemoveUseCase<C, R>
where
    C: RemoteChannel,
    R: SiteRepository,
{
    pub fn new(channel: C, repository: R) -> Self {
        Self {
            channel,
            repository,
            layout: ServerLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: ServerLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn execute(&self, site: &SiteConfig) -> Result<RemoveReport, WorkflowError> {
        self.execute_with_events(site, Arc::new(NoopEventSink))
    }

    pub fn execute_with_events(
        &self,
        site: &SiteConfig,
        events: Arc<dyn ProvisionEventSink>,
    ) -> Result<RemoveReport, WorkflowError> {
        self.run(site, events.as_ref())
            .map_err(|cause| WorkflowError::new(WorkflowKind::Remove, cause))
    }

    fn run(
        &self,
        site: &SiteConfig,
        events: &dyn ProvisionEventSink,
    ) -> ProvisionResult<RemoveReport> {
        site.validate()
            .map_err(|e| ProvisionError::InvalidSite(e.to_string()))?;

        let session = self
            .channel
            .connect(&site.host, &site.user, site.ssh_password())?;
        events.on_event(ProvisionEvent::Connected {
            host: site.host.clone(),
        });

        let exec = RemoteExecutor::new(&session, events);
        let steps = run_plan(WorkflowKind::Remove, &RemoveStep::PLAN, events, |step| {
            self.run_step(step, site, &exec)
        })?;

        events.on_event(ProvisionEvent::Completed {
            workflow: WorkflowKind::Remove,
            message: format!("Successfully removed all configurations for {}!", site.name),
        });

        Ok(RemoveReport {
            site: site.name.clone(),
            host: site.host.clone(),
            steps,
        })
    }

    fn run_step<S: RemoteSession>(
        &self,
        step: RemoveStep,
        site: &SiteConfig,
        exec: &RemoteExecutor<'_, S>,
    ) -> ProvisionResult<StepOutcome> {
        let layout = &self.layout;
        match step {
            RemoveStep::DropVHost => {
                exec.run(&RemoteOp::RemoveFile {
                    path: layout.vhost_enabled(&site.name),
                })?;
                exec.run(&RemoteOp::RemoveFile {
                    path: layout.vhost_available(&site.name),
                })?;
            }
            RemoveStep::ReloadServer => {
                exec.run(&RemoteOp::systemctl(
                    SystemctlAction::Reload,
                    layout.nginx_unit,
                ))?;
            }
            RemoveStep::DeleteWebRoot => {
                exec.run(&RemoteOp::RemoveTree {
                    path: layout.web_root(&site.name),
                })?;
            }
            RemoveStep::RevokeSecret => {
                CredentialManager::new(layout).revoke(exec, &site.name)?;
            }
            RemoveStep::DropDaemonModule => {
                exec.run(&RemoteOp::DeleteBlock {
                    path: layout.rsyncd_conf.to_string(),
                    header: DaemonModule::header_for(&site.name),
                })?;
            }
            RemoveStep::TidyDaemonConfig => {
                exec.run(&RemoteOp::SqueezeBlankLines {
                    path: layout.rsyncd_conf.to_string(),
                })?;
            }
            RemoveStep::ForgetCredential => {
                if site.transfer_password().is_none() {
                    return Ok(StepOutcome::Skipped(
                        "no rsync_password in the site configuration".to_string(),
                    ));
                }
                self.repository.apply(&SitePatch::UnsetTransferPassword)?;
            }
        }
        Ok(StepOutcome::Done)
    }
}
