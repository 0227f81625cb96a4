//! Provision Event Port
//!
//! Progress of setup/deploy/remove is reported as it happens through this
//! port. Console output, NDJSON for CI and silent operation are all sinks.

use crate::domain::value_objects::{ConvergeOutcome, SyncEvent, SyncTally};
use crate::error::WorkflowKind;

/// Event emitted during a workflow
#[derive(Debug, Clone, PartialEq)]
pub enum ProvisionEvent {
    /// Session established
    Connected { host: String },

    /// A workflow step is starting
    StepStarted {
        workflow: WorkflowKind,
        step: &'static str,
        description: &'static str,
    },

    /// A conditional step did not need to run
    StepSkipped {
        workflow: WorkflowKind,
        step: &'static str,
        reason: String,
    },

    /// Informational progress message
    Notice { message: String },

    /// Something the operator should know about, but not a failure
    Warning { message: String },

    /// A remote command about to run (secrets redacted)
    RemoteCommand { command: String },

    /// Rendered vhost differs from the remote copy
    ConfigDiff {
        path: String,
        current: Option<String>,
        rendered: String,
    },

    /// Outcome of the vhost convergence
    ConfigConverged { outcome: ConvergeOutcome },

    /// One classified line of transfer output
    Sync(SyncEvent),

    /// Transfer process finished
    SyncFinished { tally: SyncTally, status: i32 },

    /// Reachability probe after a failed sync
    ProbeResult {
        host: String,
        port: u16,
        reachable: bool,
        detail: String,
    },

    /// Workflow finished successfully
    Completed {
        workflow: WorkflowKind,
        message: String,
    },
}

/// Trait for receiving provision events
///
/// Implementations:
/// - `ConsoleEventSink`: human progress output
/// - `JsonEventSink`: NDJSON event stream for CI
/// - `NoopEventSink`: silent operation
pub trait ProvisionEventSink: Send + Sync {
    /// Handle a provision event
    fn on_event(&self, event: ProvisionEvent);

    /// Whether verbose events (remote commands, diffs) are wanted
    fn wants_detailed_events(&self) -> bool {
        true
    }
}

/// No-op event sink for silent operation
pub struct NoopEventSink;

impl ProvisionEventSink for NoopEventSink {
    fn on_event(&self, _event: ProvisionEvent) {}

    fn wants_detailed_events(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Test event sink that records all events
    struct RecordingEventSink {
        events: Arc<Mutex<Vec<ProvisionEvent>>>,
    }

    impl ProvisionEventSink for RecordingEventSink {
        fn on_event(&self, event: ProvisionEvent) {
            self.events.lock().unwrap().push(event);
        }
    }

    #[test]
    fn recording_sink_captures_events() {
        let events = Arc::new(Mutex::new(Vec::new()));
        let sink = RecordingEventSink {
            events: events.clone(),
        };

        sink.on_event(ProvisionEvent::Connected {
            host: "203.0.113.7".to_string(),
        });
        sink.on_event(ProvisionEvent::Notice {
            message: "nginx is already installed".to_string(),
        });

        assert_eq!(events.lock().unwrap().len(), 2);
        assert!(sink.wants_detailed_events());
    }

    #[test]
    fn noop_sink_wants_no_details() {
        assert!(!NoopEventSink.wants_detailed_events());
    }
}
