//! Setup Use Case
//!
//! Steps, in order:
//! 1. Check whether nginx is installed
//! 2. Install it when missing (one attempt, verified afterwards)
//! 3. Render the rsync module block
//! 4. Generate a new transfer secret
//! 5. Replace the site's line in the secrets file
//! 6. Replace the site's module block in the daemon config
//! 7. Persist the secret in the site document
//! 8. Enable and start the rsync daemon

use std::sync::Arc;

use crate::application::credentials::CredentialManager;
use crate::application::workflow::{run_plan, PlanStep, RemoteExecutor, StepOutcome};
use crate::domain::entities::{global_section, DaemonModule, SiteConfig, SitePatch, TransferCredential};
use crate::domain::ports::{
    CommandOutput, NoopEventSink, ProvisionEvent, ProvisionEventSink, RemoteChannel,
    RemoteSession, SiteRepository,
};
use crate::domain::services::{RemoteOp, SystemctlAction};
use crate::domain::value_objects::ServerLayout;
use crate::error::{ProvisionError, ProvisionResult, WorkflowError, WorkflowKind};

use super::result::SetupReport;

/// Output marker of a missing binary
const NOT_FOUND_MARKER: &str = "not found";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupStep {
    CheckServerInstalled,
    InstallServer,
    RenderDaemonConfig,
    RotateSecret,
    WriteSecretsEntry,
    WriteDaemonConfig,
    PersistCredential,
    EnableAndStart,
}

impl SetupStep {
    pub const PLAN: [SetupStep; 8] = [
        SetupStep::CheckServerInstalled,
        SetupStep::InstallServer,
        SetupStep::RenderDaemonConfig,
        SetupStep::RotateSecret,
        SetupStep::WriteSecretsEntry,
        SetupStep::WriteDaemonConfig,
        SetupStep::PersistCredential,
        SetupStep::EnableAndStart,
    ];
}

impl PlanStep for SetupStep {
    fn name(&self) -> &'static str {
        match self {
            SetupStep::CheckServerInstalled => "check-server-installed",
            SetupStep::InstallServer => "install-server",
            SetupStep::RenderDaemonConfig => "render-daemon-config",
            SetupStep::RotateSecret => "rotate-secret",
            SetupStep::WriteSecretsEntry => "write-secrets-entry",
            SetupStep::WriteDaemonConfig => "write-daemon-config",
            SetupStep::PersistCredential => "persist-credential",
            SetupStep::EnableAndStart => "enable-and-start",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            SetupStep::CheckServerInstalled => "Checking for nginx",
            SetupStep::InstallServer => "Installing nginx",
            SetupStep::RenderDaemonConfig => "Rendering rsync module",
            SetupStep::RotateSecret => "Generating rsync password",
            SetupStep::WriteSecretsEntry => "Writing rsync secrets",
            SetupStep::WriteDaemonConfig => "Writing rsync daemon config",
            SetupStep::PersistCredential => "Saving rsync password",
            SetupStep::EnableAndStart => "Starting rsync daemon",
        }
    }
}

/// Values produced by earlier steps and consumed by later ones
#[derive(Default)]
struct SetupState {
    server_present: bool,
    installed_server: bool,
    replaced_credential: bool,
    module: Option<DaemonModule>,
    credential: Option<TransferCredential>,
}

/// Setup use case
///
/// Generic over the remote channel and the site repository so tests can run
/// it against in-memory doubles.
pub struct SetupUseCase<C, R>
where
    C: RemoteChannel,
    R: SiteRepository,
{
    channel: C,
    repository: R,
    layout: ServerLayout,
}

impl<C, R> SetupUseCase<C, R>
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

    /// Execute setup silently
    pub fn execute(&self, site: &SiteConfig) -> Result<SetupReport, WorkflowError> {
        self.execute_with_events(site, Arc::new(NoopEventSink))
    }

    /// Execute setup, reporting progress to `events`
    pub fn execute_with_events(
        &self,
        site: &SiteConfig,
        events: Arc<dyn ProvisionEventSink>,
    ) -> Result<SetupReport, WorkflowError> {
        self.run(site, events.as_ref())
            .map_err(|cause| WorkflowError::new(WorkflowKind::Setup, cause))
    }

    fn run(&self, site: &SiteConfig, events: &dyn ProvisionEventSink) -> ProvisionResult<SetupReport> {
        site.validate()
            .map_err(|e| ProvisionError::InvalidSite(e.to_string()))?;

        let session = self
            .channel
            .connect(&site.host, &site.user, site.ssh_password())?;
        events.on_event(ProvisionEvent::Connected {
            host: site.host.clone(),
        });

        let exec = RemoteExecutor::new(&session, events);
        let credentials = CredentialManager::new(&self.layout);
        let mut state = SetupState::default();

        let steps = run_plan(WorkflowKind::Setup, &SetupStep::PLAN, events, |step| {
            self.run_step(step, site, &exec, &credentials, &mut state)
        })?;

        events.on_event(ProvisionEvent::Completed {
            workflow: WorkflowKind::Setup,
            message: "Rsync daemon configured successfully!".to_string(),
        });

        Ok(SetupReport {
            site: site.name.clone(),
            host: site.host.clone(),
            installed_server: state.installed_server,
            replaced_credential: state.replaced_credential,
            steps,
        })
    }

    fn run_step<S: RemoteSession>(
        &self,
        step: SetupStep,
        site: &SiteConfig,
        exec: &RemoteExecutor<'_, S>,
        credentials: &CredentialManager<'_>,
        state: &mut SetupState,
    ) -> ProvisionResult<StepOutcome> {
        match step {
            SetupStep::CheckServerInstalled => {
                state.server_present = server_present(&exec.probe(&RemoteOp::NginxVersion)?);
                if state.server_present {
                    exec.notice("nginx is already installed");
                }
            }
            SetupStep::InstallServer => {
                if state.server_present {
                    return Ok(StepOutcome::Skipped("nginx is already installed".to_string()));
                }
                exec.notice("Installing nginx...");
                exec.run(&RemoteOp::AptUpdate)?;
                exec.run(&RemoteOp::AptInstall {
                    package: self.layout.nginx_package.to_string(),
                })?;
                if !server_present(&exec.probe(&RemoteOp::NginxVersion)?) {
                    return Err(ProvisionError::step("install nginx", "Failed to install nginx"));
                }
                state.server_present = true;
                state.installed_server = true;
                exec.notice("nginx installed successfully");
            }
            SetupStep::RenderDaemonConfig => {
                exec.notice("Setting up rsync daemon...");
                state.module = Some(DaemonModule::render(site, &self.layout));
            }
            SetupStep::RotateSecret => {
                if site.transfer_password().is_some() {
                    state.replaced_credential = true;
                    exec.warn(format!(
                        "Replacing the existing rsync password for '{}'; anything still using the old one loses access",
                        site.name
                    ));
                }
                state.credential = Some(credentials.rotate(&site.name));
            }
            SetupStep::WriteSecretsEntry => {
                credentials.install(exec, require(&state.credential, "rsync password")?)?;
            }
            SetupStep::WriteDaemonConfig => {
                let module = require(&state.module, "rsync module")?;
                let conf = self.layout.rsyncd_conf.to_string();
                exec.run(&RemoteOp::WriteIfEmpty {
                    path: conf.clone(),
                    text: global_section(&self.layout),
                })?;
                exec.run(&RemoteOp::DeleteBlock {
                    path: conf.clone(),
                    header: module.header(),
                })?;
                exec.run(&RemoteOp::AppendText {
                    path: conf,
                    text: module.block().to_string(),
                    sensitive: false,
                })?;
            }
            SetupStep::PersistCredential => {
                let credential = require(&state.credential, "rsync password")?;
                self.repository
                    .apply(&SitePatch::SetTransferPassword(credential.secret().to_string()))?;
            }
            SetupStep::EnableAndStart => {
                let unit = self.layout.rsync_unit;
                exec.run(&RemoteOp::systemctl(SystemctlAction::Enable, unit))?;
                exec.run(&RemoteOp::systemctl(SystemctlAction::Start, unit))?;
            }
        }
        Ok(StepOutcome::Done)
    }
}

/// nginx is present when `nginx -v` ran and did not report a missing binary
fn server_present(output: &CommandOutput) -> bool {
    output.success() && !output.contains(NOT_FOUND_MARKER)
}

fn require<'s, T>(value: &'s Option<T>, what: &str) -> ProvisionResult<&'s T> {
    value
        .as_ref()
        .ok_or_else(|| ProvisionError::Generic(format!("{what} was not prepared")))
}
