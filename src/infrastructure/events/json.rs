//! JSON Event Sink
//!
//! Outputs provision events as NDJSON for CI/automation consumption.

use std::io::{self, Write};
use std::sync::Mutex;

use serde_json::json;

use crate::domain::ports::{ProvisionEvent, ProvisionEventSink};
use crate::error::WorkflowKind;

/// Event sink that outputs NDJSON events to stdout
pub struct JsonEventSink {
    command: &'static str,
    detailed: bool,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl JsonEventSink {
    /// Create a new JSON event sink writing to stdout
    pub fn stdout(workflow: WorkflowKind) -> Self {
        Self::with_writer(workflow, io::stdout())
    }

    /// Create a JSON event sink writing to a custom writer
    pub fn with_writer<W: Write + Send + 'static>(workflow: WorkflowKind, writer: W) -> Self {
        Self {
            command: workflow.command(),
            detailed: false,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    /// Also emit remote commands and config diffs
    pub fn detailed(mut self, detailed: bool) -> Self {
        self.detailed = detailed;
        self
    }

    fn write_event(&self, event: serde_json::Value) {
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{}", event);
            let _ = writer.flush();
        }
    }

    fn to_json(&self, event: ProvisionEvent) -> serde_json::Value {
        let command = self.command;
        match event {
            ProvisionEvent::Connected { host } => json!({
                "event": "connected",
                "command": command,
                "host": host,
            }),
            ProvisionEvent::StepStarted {
                step, description, ..
            } => json!({
                "event": "step_start",
                "command": command,
                "step": step,
                "description": description,
            }),
            ProvisionEvent::StepSkipped { step, reason, .. } => json!({
                "event": "step_skipped",
                "command": command,
                "step": step,
                "reason": reason,
            }),
            ProvisionEvent::Notice { message } => json!({
                "event": "notice",
                "command": command,
                "message": message,
            }),
            ProvisionEvent::Warning { message } => json!({
                "event": "warning",
                "command": command,
                "message": message,
            }),
            ProvisionEvent::RemoteCommand { command: script } => json!({
                "event": "remote_command",
                "command": command,
                "script": script,
            }),
            ProvisionEvent::ConfigDiff {
                path,
                current,
                rendered,
            } => json!({
                "event": "config_diff",
                "command": command,
                "path": path,
                "current": current,
                "rendered": rendered,
            }),
            ProvisionEvent::ConfigConverged { outcome } => json!({
                "event": "config_converged",
                "command": command,
                "outcome": outcome,
            }),
            ProvisionEvent::Sync(sync) => json!({
                "event": "sync",
                "command": command,
                "category": sync.category,
                "filename": sync.filename,
            }),
            ProvisionEvent::SyncFinished { tally, status } => json!({
                "event": "sync_finished",
                "command": command,
                "status": status,
                "tally": tally,
                "changes": tally.changes(),
            }),
            ProvisionEvent::ProbeResult {
                host,
                port,
                reachable,
                detail,
            } => json!({
                "event": "probe",
                "command": command,
                "host": host,
                "port": port,
                "reachable": reachable,
                "detail": detail,
            }),
            ProvisionEvent::Completed { message, .. } => json!({
                "event": "complete",
                "command": command,
                "message": message,
            }),
        }
    }
}

impl ProvisionEventSink for JsonEventSink {
    fn on_event(&self, event: ProvisionEvent) {
        let json = self.to_json(event);
        self.write_event(json);
    }

    fn wants_detailed_events(&self) -> bool {
        self.detailed
    }
}
