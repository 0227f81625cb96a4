//! Workflow plumbing shared by setup, deploy and remove
//!
//! Each workflow is an ordered list of named steps. [`run_plan`] walks the
//! list, reports every step through the event sink and stops at the first
//! failure. Already-applied remote changes are never rolled back.
//!
//! [`RemoteExecutor`] is the single place where a [`RemoteOp`] is rendered
//! and sent over the session, so every remote command goes through the same
//! escaping, reporting and exit-status handling.

use serde::Serialize;

use crate::domain::ports::{CommandOutput, ProvisionEvent, ProvisionEventSink, RemoteSession};
use crate::domain::services::RemoteOp;
use crate::error::{ProvisionError, ProvisionResult, WorkflowKind};

/// A named state in a workflow plan
pub trait PlanStep: Copy {
    fn name(&self) -> &'static str;
    fn description(&self) -> &'static str;
}

/// Result of running one step
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    Done,
    /// The step had nothing to do; the reason is reported
    Skipped(String),
}

/// What happened to one step of a finished workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StepRecord {
    pub step: &'static str,
    pub skipped: bool,
}

/// Run `steps` in order, aborting on the first error
pub fn run_plan<P, F>(
    workflow: WorkflowKind,
    steps: &[P],
    events: &dyn ProvisionEventSink,
    mut run_step: F,
) -> ProvisionResult<Vec<StepRecord>>
where
    P: PlanStep,
    F: FnMut(P) -> ProvisionResult<StepOutcome>,
{
    let mut records = Vec::with_capacity(steps.len());
    for &step in steps {
        events.on_event(ProvisionEvent::StepStarted {
            workflow,
            step: step.name(),
            description: step.description(),
        });

        let skipped = match run_step(step)? {
            StepOutcome::Done => false,
            StepOutcome::Skipped(reason) => {
                events.on_event(ProvisionEvent::StepSkipped {
                    workflow,
                    step: step.name(),
                    reason,
                });
                true
            }
        };
        records.push(StepRecord {
            step: step.name(),
            skipped,
        });
    }
    Ok(records)
}

/// Renders and runs remote operations over one session
pub struct RemoteExecutor<'a, S: RemoteSession> {
    session: &'a S,
    events: &'a dyn ProvisionEventSink,
}

impl<'a, S: RemoteSession> RemoteExecutor<'a, S> {
    pub fn new(session: &'a S, events: &'a dyn ProvisionEventSink) -> Self {
        Self { session, events }
    }

    pub fn events(&self) -> &'a dyn ProvisionEventSink {
        self.events
    }

    /// Run an operation and fail the step on a non-zero exit status
    pub fn run(&self, op: &RemoteOp) -> ProvisionResult<CommandOutput> {
        let command = op.render();
        let output = self.send(op)?;
        if !output.success() {
            return Err(ProvisionError::step(
                op.label(),
                failure_message(command.display(), &output),
            ));
        }
        Ok(output)
    }

    /// Run an operation whose exit status is interpreted by the caller
    pub fn probe(&self, op: &RemoteOp) -> ProvisionResult<CommandOutput> {
        self.send(op)
    }

    pub fn upload(&self, content: &[u8], remote_path: &str) -> ProvisionResult<()> {
        if self.events.wants_detailed_events() {
            self.events.on_event(ProvisionEvent::RemoteCommand {
                command: format!("upload {} bytes to {remote_path}", content.len()),
            });
        }
        self.session.upload(content, remote_path)?;
        Ok(())
    }

    pub fn notice(&self, message: impl Into<String>) {
        self.events.on_event(ProvisionEvent::Notice {
            message: message.into(),
        });
    }

    pub fn warn(&self, message: impl Into<String>) {
        self.events.on_event(ProvisionEvent::Warning {
            message: message.into(),
        });
    }

    fn send(&self, op: &RemoteOp) -> ProvisionResult<CommandOutput> {
        let command = op.render();
        if self.events.wants_detailed_events() {
            self.events.on_event(ProvisionEvent::RemoteCommand {
                command: command.display().to_string(),
            });
        }
        Ok(self.session.run(command.script())?)
    }
}

fn failure_message(display: &str, output: &CommandOutput) -> String {
    let detail = output.combined();
    let detail = detail.trim();
    if detail.is_empty() {
        format!("`{display}` exited with status {}", output.exit_code)
    } else {
        format!(
            "`{display}` exited with status {}: {detail}",
            output.exit_code
        )
    }
}
