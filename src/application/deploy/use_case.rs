//! Deploy Use Case
//!
//! Orchestrates the deployment flow:
//! 1. Restart the rsync daemon if it is not running
//! 2. Converge the nginx virtual host (aborts the deploy on a bad config)
//! 3. Sync the site directory through the rsync daemon
//!
//! The rsync password file exists only while the transfer runs.

use std::path::Path;
use std::sync::Arc;

use crate::application::converger::ConfigConverger;
use crate::application::credentials::with_ephemeral_credential_file;
use crate::application::workflow::{run_plan, PlanStep, RemoteExecutor, StepOutcome};
use crate::domain::entities::SiteConfig;
use crate::domain::ports::{
    FileTransfer, NoopEventSink, PortProbe, ProvisionEvent, ProvisionEventSink, RemoteChannel,
    RemoteSession, TransferRequest,
};
use crate::domain::services::{RemoteOp, SystemctlAction};
use crate::domain::value_objects::{classify_line, ConvergeOutcome, ServerLayout, SyncTally};
use crate::error::{ProvisionError, ProvisionResult, WorkflowError, WorkflowKind};

use super::result::DeployReport;

/// `systemctl status` marker of a healthy unit
const ACTIVE_MARKER: &str = "active (running)";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployStep {
    EnsureDaemonRunning,
    ConvergeVHost,
    SyncFiles,
}

impl DeployStep {
    pub const PLAN: [DeployStep; 3] = [
        DeployStep::EnsureDaemonRunning,
        DeployStep::ConvergeVHost,
        DeployStep::SyncFiles,
    ];
}

impl PlanStep for DeployStep {
    fn name(&self) -> &'static str {
        match self {
            DeployStep::EnsureDaemonRunning => "ensure-daemon-running",
            DeployStep::ConvergeVHost => "converge-vhost",
            DeployStep::SyncFiles => "sync-files",
        }
    }

    fn description(&self) -> &'static str {
        match self {
            DeployStep::EnsureDaemonRunning => "Checking rsync daemon status",
            DeployStep::ConvergeVHost => "Checking nginx configuration",
            DeployStep::SyncFiles => "Syncing website files",
        }
    }
}

#[derive(Default)]
struct DeployState {
    restarted_daemon: bool,
    vhost: Option<ConvergeOutcome>,
    tally: SyncTally,
}

/// Deploy use case
///
/// Parameterized by its ports so the whole flow can be tested without a
/// host, an rsync binary or a network.
pub struct DeployUseCase<C, T, P>
where
    C: RemoteChannel,
    T: FileTransfer,
    P: PortProbe,
{
    channel: C,
    transfer: T,
    probe: P,
    layout: ServerLayout,
}

impl<C, T, P> DeployUseCase<C, T, P>
where
    C: RemoteChannel,
    T: FileTransfer,
    P: PortProbe,
{
    pub fn new(channel: C, transfer: T, probe: P) -> Self {
        Self {
            channel,
            transfer,
            probe,
            layout: ServerLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: ServerLayout) -> Self {
        self.layout = layout;
        self
    }

    /// Execute the deploy use case
    pub fn execute(&self, site: &SiteConfig) -> Result<DeployReport, WorkflowError> {
        self.execute_with_events(site, Arc::new(NoopEventSink))
    }

    /// Execute the deploy use case with event reporting
    pub fn execute_with_events(
        &self,
        site: &SiteConfig,
        events: Arc<dyn ProvisionEventSink>,
    ) -> Result<DeployReport, WorkflowError> {
        self.run(site, events.as_ref())
            .map_err(|cause| WorkflowError::new(WorkflowKind::Deploy, cause))
    }

    fn run(
        &self,
        site: &SiteConfig,
        events: &dyn ProvisionEventSink,
    ) -> ProvisionResult<DeployReport> {
        site.validate()
            .map_err(|e| ProvisionError::InvalidSite(e.to_string()))?;
        let secret = site.transfer_password().ok_or_else(|| {
            ProvisionError::InvalidSite(
                "no rsync_password in the site configuration; run `jamal setup` first".to_string(),
            )
        })?;
        check_local_path(&site.local_path)?;

        let session = self
            .channel
            .connect(&site.host, &site.user, site.ssh_password())?;
        events.on_event(ProvisionEvent::Connected {
            host: site.host.clone(),
        });

        let exec = RemoteExecutor::new(&session, events);
        let mut state = DeployState::default();

        let steps = run_plan(WorkflowKind::Deploy, &DeployStep::PLAN, events, |step| {
            match step {
                DeployStep::EnsureDaemonRunning => {
                    state.restarted_daemon = self.ensure_daemon_running(&exec)?;
                }
                DeployStep::ConvergeVHost => {
                    let converger = ConfigConverger::new(&self.layout);
                    let rendered = converger.render(site);
                    let outcome = converger.converge(&exec, site, &rendered)?;
                    events.on_event(ProvisionEvent::ConfigConverged { outcome });
                    state.vhost = Some(outcome);
                }
                DeployStep::SyncFiles => {
                    state.tally = self.sync_files(site, secret, events)?;
                }
            }
            Ok(StepOutcome::Done)
        })?;

        events.on_event(ProvisionEvent::Completed {
            workflow: WorkflowKind::Deploy,
            message: "Sync completed!".to_string(),
        });

        Ok(DeployReport {
            site: site.name.clone(),
            host: site.host.clone(),
            restarted_daemon: state.restarted_daemon,
            vhost: state.vhost.unwrap_or(ConvergeOutcome::Unchanged),
            sync: state.tally,
            steps,
        })
    }

    /// Returns whether a restart was issued
    fn ensure_daemon_running<S: RemoteSession>(
        &self,
        exec: &RemoteExecutor<'_, S>,
    ) -> ProvisionResult<bool> {
        let unit = self.layout.rsync_unit;
        let status = exec.probe(&RemoteOp::systemctl(SystemctlAction::Status, unit))?;
        if status.contains(ACTIVE_MARKER) {
            return Ok(false);
        }
        exec.notice("Restarting rsync daemon...");
        exec.run(&RemoteOp::systemctl(SystemctlAction::Restart, unit))?;
        Ok(true)
    }

    fn sync_files(
        &self,
        site: &SiteConfig,
        secret: &str,
        events: &dyn ProvisionEventSink,
    ) -> ProvisionResult<SyncTally> {
        let source = normalized_source(&site.local_path);
        let mut tally = SyncTally::default();

        let exit = with_ephemeral_credential_file(secret, |password_file| {
            let request = TransferRequest {
                source: &source,
                module: &site.name,
                host: &site.host,
                port: self.layout.rsync_port,
                password_file,
            };
            self.transfer.run(&request, &mut |line| {
                let event = classify_line(line);
                tally.record(event.category);
                events.on_event(ProvisionEvent::Sync(event));
            })
        })??;

        events.on_event(ProvisionEvent::SyncFinished {
            tally,
            status: exit.status(),
        });

        if !exit.success() {
            events.on_event(ProvisionEvent::Notice {
                message: "Rsync failed. Checking daemon accessibility...".to_string(),
            });
            let port = self.layout.rsync_port;
            let report = self.probe.probe(&site.host, port);
            events.on_event(ProvisionEvent::ProbeResult {
                host: site.host.clone(),
                port,
                reachable: report.reachable,
                detail: report.detail,
            });
            return Err(ProvisionError::SyncFailure {
                status: exit.status(),
                port,
            });
        }
        Ok(tally)
    }
}

/// Source argument for rsync: the directory's contents, not the directory
pub fn normalized_source(local_path: &Path) -> String {
    let mut source = local_path.to_string_lossy().into_owned();
    if !source.ends_with('/') {
        source.push('/');
    }
    source
}

fn check_local_path(path: &Path) -> ProvisionResult<()> {
    if path.is_dir() {
        return Ok(());
    }
    let problem = if path.exists() {
        "is not a directory"
    } else {
        "does not exist"
    };
    Err(ProvisionError::InvalidSite(format!(
        "local_path {} {problem}",
        path.display()
    )))
}
