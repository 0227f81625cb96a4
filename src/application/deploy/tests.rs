//! Deploy Use Case Tests

use std::sync::Arc;

use tempfile::TempDir;

use super::*;
use crate::application::test_support::{
    FakeProbe, FakeTransfer, MockChannel, MockSession, RecordingEventSink,
};
use crate::domain::entities::site::sample_site;
use crate::domain::entities::{SiteConfig, VirtualHostConfig};
use crate::domain::ports::ProvisionEvent;
use crate::domain::value_objects::{ConvergeOutcome, ServerLayout, SyncCategory};
use crate::error::ProvisionError;

struct Fixture {
    _dir: TempDir,
    site: SiteConfig,
    session: MockSession,
    sink: Arc<RecordingEventSink>,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let mut site = sample_site();
        site.local_path = dir.path().to_path_buf();
        Self {
            _dir: dir,
            site,
            session: MockSession::new(),
            sink: Arc::new(RecordingEventSink::new()),
        }
    }

    /// Daemon running and remote vhost identical to the rendered one
    fn steady_state(self) -> Self {
        self.session
            .respond("systemctl status", "   Active: active (running) since Mon", "", 0);
        let rendered = VirtualHostConfig::render(&self.site, &ServerLayout::default());
        self.session.respond("sudo cat", rendered.content(), "", 0);
        self
    }

    fn run(
        &self,
        transfer: &FakeTransfer,
        probe: &FakeProbe,
    ) -> Result<DeployReport, crate::error::WorkflowError> {
        DeployUseCase::new(
            MockChannel::new(self.session.clone()),
            transfer.clone(),
            probe.clone(),
        )
        .execute_with_events(&self.site, self.sink.clone())
    }
}

const QUIET_SYNC: &[&str] = &[
    ".d..t...... | ./",
    ".f..t...... | index.html",
    ".f..t...... | css/site.css",
];

#[test]
fn noop_deploy_touches_nothing() {
    let fx = Fixture::new().steady_state();
    let transfer = FakeTransfer::new(QUIET_SYNC, Some(0));
    let probe = FakeProbe::new(true);

    let report = fx.run(&transfer, &probe).unwrap();

    assert!(report.is_noop());
    assert!(!report.restarted_daemon);
    assert_eq!(report.vhost, ConvergeOutcome::Unchanged);
    assert_eq!(report.sync.unchanged, 2);
    assert_eq!(report.sync.accessed, 1);
    assert!(!fx.session.ran("reload"));
    assert!(!fx.session.ran("restart"));
    assert!(fx.session.uploads().is_empty());
    assert!(probe.calls().is_empty());
}

#[test]
fn transfer_targets_daemon_module_with_trailing_slash() {
    let fx = Fixture::new().steady_state();
    let transfer = FakeTransfer::new(QUIET_SYNC, Some(0));

    fx.run(&transfer, &FakeProbe::new(true)).unwrap();

    let calls = transfer.calls();
    assert_eq!(calls.len(), 1);
    let call = &calls[0];
    assert!(call.source.ends_with('/'));
    assert!(!call.source.ends_with("//"));
    assert_eq!(call.module, "example");
    assert_eq!(call.host, "203.0.113.7");
    assert_eq!(call.port, 873);
}

#[test]
fn credential_file_exists_only_during_transfer() {
    let fx = Fixture::new().steady_state();
    let transfer = FakeTransfer::new(QUIET_SYNC, Some(0));

    fx.run(&transfer, &FakeProbe::new(true)).unwrap();

    let call = &transfer.calls()[0];
    assert_eq!(
        call.password_file_content.as_deref(),
        fx.site.transfer_password()
    );
    #[cfg(unix)]
    assert_eq!(call.password_file_mode, Some(0o600));
    assert!(!call.password_file.exists());
}

#[test]
fn sync_failure_carries_status_probes_and_cleans_up() {
    let fx = Fixture::new().steady_state();
    let transfer = FakeTransfer::new(
        &["@ERROR: auth failed on module example"],
        Some(5),
    );
    let probe = FakeProbe::new(false);

    let err = fx.run(&transfer, &probe).unwrap_err();

    assert!(matches!(
        err.cause(),
        ProvisionError::SyncFailure {
            status: 5,
            port: 873
        }
    ));
    assert!(err
        .to_string()
        .starts_with("Deployment failed: rsync failed with status: 5."));
    assert_eq!(probe.calls(), vec![("203.0.113.7".to_string(), 873)]);
    assert!(fx.sink.events().iter().any(|e| matches!(
        e,
        ProvisionEvent::ProbeResult {
            reachable: false,
            ..
        }
    )));
    assert!(!transfer.calls()[0].password_file.exists());
}

#[test]
fn killed_transfer_reports_minus_one() {
    let fx = Fixture::new().steady_state();
    let transfer = FakeTransfer::new(&[], None);

    let err = fx.run(&transfer, &FakeProbe::new(true)).unwrap_err();

    assert!(matches!(
        err.cause(),
        ProvisionError::SyncFailure { status: -1, .. }
    ));
}

#[test]
fn transfer_that_cannot_start_still_removes_credential_file() {
    let fx = Fixture::new().steady_state();
    let transfer = FakeTransfer::unavailable();

    let err = fx.run(&transfer, &FakeProbe::new(true)).unwrap_err();

    assert!(err.to_string().contains("rsync not found"));
    assert!(!transfer.calls()[0].password_file.exists());
}

#[test]
fn stopped_daemon_is_restarted() {
    let fx = Fixture::new().steady_state();
    fx.session
        .respond("systemctl status", "   Active: inactive (dead)", "", 3);
    let transfer = FakeTransfer::new(QUIET_SYNC, Some(0));

    let report = fx.run(&transfer, &FakeProbe::new(true)).unwrap();

    assert!(report.restarted_daemon);
    assert_eq!(fx.session.count("systemctl restart 'rsync'"), 1);
}

#[test]
fn bad_vhost_aborts_before_sync() {
    let fx = Fixture::new().steady_state();
    fx.session.respond("sudo cat", "", "", 1);
    fx.session
        .respond("nginx -t", "nginx: [emerg] invalid parameter", "", 1);
    let transfer = FakeTransfer::new(QUIET_SYNC, Some(0));

    let err = fx.run(&transfer, &FakeProbe::new(true)).unwrap_err();

    assert!(matches!(err.cause(), ProvisionError::ConfigValidation(_)));
    assert!(transfer.calls().is_empty());
    assert!(!fx.session.ran("reload"));
}

#[test]
fn changed_files_are_classified_in_order() {
    let fx = Fixture::new().steady_state();
    let transfer = FakeTransfer::new(
        &[
            "cd+++++++++ | blog/",
            "<f+++++++++ | blog/post.html",
            "*deleting   | old.html",
            "sent 1.02K bytes  received 64 bytes  2.17K bytes/sec",
        ],
        Some(0),
    );

    let report = fx.run(&transfer, &FakeProbe::new(true)).unwrap();

    let categories: Vec<SyncCategory> = fx
        .sink
        .events()
        .into_iter()
        .filter_map(|e| match e {
            ProvisionEvent::Sync(ev) => Some(ev.category),
            _ => None,
        })
        .collect();
    assert_eq!(
        categories,
        vec![
            SyncCategory::Creating,
            SyncCategory::Uploading,
            SyncCategory::Deleting,
            SyncCategory::Raw
        ]
    );
    assert_eq!(report.sync.changes(), 3);
    assert!(!report.is_noop());
}

#[test]
fn missing_transfer_password_points_to_setup() {
    let mut fx = Fixture::new();
    fx.site.rsync_password = None;
    let transfer = FakeTransfer::new(QUIET_SYNC, Some(0));

    let err = fx.run(&transfer, &FakeProbe::new(true)).unwrap_err();

    assert!(err.to_string().contains("jamal setup"));
    assert!(fx.session.commands().is_empty());
}

#[test]
fn missing_local_path_fails_before_connecting() {
    let mut fx = Fixture::new();
    fx.site.local_path = fx.site.local_path.join("does-not-exist");
    let transfer = FakeTransfer::new(QUIET_SYNC, Some(0));

    let err = fx.run(&transfer, &FakeProbe::new(true)).unwrap_err();

    assert!(err.to_string().contains("does not exist"));
    assert!(fx.session.commands().is_empty());
}

#[test]
fn authentication_failure_is_reported_plainly() {
    let fx = Fixture::new();
    let transfer = FakeTransfer::new(QUIET_SYNC, Some(0));

    let err = DeployUseCase::new(MockChannel::rejecting(), transfer.clone(), FakeProbe::new(true))
        .execute(&fx.site)
        .unwrap_err();

    assert_eq!(err.to_string(), "SSH authentication failed");
    assert!(transfer.calls().is_empty());
}

#[test]
fn normalized_source_adds_one_slash() {
    assert_eq!(normalized_source(std::path::Path::new("./_site")), "./_site/");
    assert_eq!(normalized_source(std::path::Path::new("./_site/")), "./_site/");
}
