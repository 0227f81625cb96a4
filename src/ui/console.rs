//! Console Event Sink
//!
//! Human-readable progress for setup/deploy/remove.

use std::io::{self, Write};
use std::sync::Mutex;

use crossterm::style::Stylize;
use jamal::domain::ports::{ProvisionEvent, ProvisionEventSink};
use jamal::domain::value_objects::{ConvergeOutcome, SyncCategory, SyncTally};

use crate::ui::components::diff::render_unified_diff_with_line_numbers;
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;
use crate::ui::theme;

/// Width of the sync category column ("Uploading" is the longest label)
const LABEL_WIDTH: usize = 9;

pub struct ConsoleEventSink {
    ui: UiContext,
    writer: Mutex<Box<dyn Write + Send>>,
}

impl ConsoleEventSink {
    pub fn stdout(ui: UiContext) -> Self {
        Self::with_writer(ui, io::stdout())
    }

    pub fn with_writer<W: Write + Send + 'static>(ui: UiContext, writer: W) -> Self {
        Self {
            ui,
            writer: Mutex::new(Box::new(writer)),
        }
    }

    fn icon(&self, icon: Icon) -> String {
        icon.colored(self.ui.color, self.ui.unicode)
    }

    fn dim(&self, text: &str) -> String {
        if self.ui.color {
            format!("{}", text.with(theme::colors::DIM))
        } else {
            text.to_string()
        }
    }

    fn render(&self, event: ProvisionEvent) -> Option<String> {
        let line = match event {
            ProvisionEvent::Connected { host } => {
                format!("{} Connected to {host}", self.icon(Icon::Remote))
            }
            ProvisionEvent::StepStarted { description, .. } => {
                format!("{} {description}...", self.icon(Icon::Progress))
            }
            ProvisionEvent::StepSkipped { step, reason, .. } => {
                let text = format!("{step} skipped: {reason}");
                format!("{} {}", self.icon(Icon::Pending), self.dim(&text))
            }
            ProvisionEvent::Notice { message } => {
                format!("  {} {message}", self.icon(Icon::Arrow))
            }
            ProvisionEvent::Warning { message } => {
                format!("{} {message}", self.icon(Icon::Warning))
            }
            ProvisionEvent::RemoteCommand { command } if self.ui.verbose >= 1 => {
                format!("    {}", self.dim(&format!("$ {command}")))
            }
            ProvisionEvent::ConfigDiff {
                path,
                current,
                rendered,
            } if self.ui.verbose >= 2 => render_unified_diff_with_line_numbers(
                &path,
                current.as_deref().unwrap_or(""),
                &rendered,
                self.ui.color,
            )
            .trim_end()
            .to_string(),
            ProvisionEvent::ConfigConverged {
                outcome: ConvergeOutcome::Updated,
            } if self.ui.verbose >= 1 => {
                format!("  {} virtual host replaced and nginx reloaded", self.icon(Icon::Arrow))
            }
            ProvisionEvent::Sync(sync) => self.sync_line(sync.category, &sync.filename),
            ProvisionEvent::SyncFinished { tally, .. } => self.tally_line(&tally),
            ProvisionEvent::ProbeResult {
                host,
                port,
                reachable,
                detail,
            } => {
                if reachable {
                    format!(
                        "{} Port {port} on {host} accepts connections ({detail})",
                        self.icon(Icon::Success)
                    )
                } else {
                    format!(
                        "{} Port {port} on {host} is not reachable: {detail}",
                        self.icon(Icon::Error)
                    )
                }
            }
            ProvisionEvent::Completed { message, .. } => {
                let message = if self.ui.color {
                    format!("{}", message.as_str().with(theme::colors::SUCCESS))
                } else {
                    message
                };
                format!("{} {message}", self.icon(Icon::Success))
            }
            _ => return None,
        };
        Some(line)
    }

    fn sync_line(&self, category: SyncCategory, filename: &str) -> String {
        if category == SyncCategory::Raw {
            return filename.to_string();
        }
        let label = format!("{:<LABEL_WIDTH$}", category.label());
        if !self.ui.color {
            return format!("{label} {filename}");
        }
        let label = match category {
            SyncCategory::Uploading | SyncCategory::Creating => label.with(theme::colors::SUCCESS),
            SyncCategory::Deleting => label.with(theme::colors::ERROR),
            _ => label.with(theme::colors::DIM),
        };
        format!("{label} {filename}")
    }

    fn tally_line(&self, tally: &SyncTally) -> String {
        let summary = format!(
            "{} uploaded, {} created, {} deleted, {} unchanged",
            tally.uploaded, tally.created, tally.deleted, tally.unchanged
        );
        format!("  {} {}", self.icon(Icon::Arrow), self.dim(&summary))
    }
}

impl ProvisionEventSink for ConsoleEventSink {
    fn on_event(&self, event: ProvisionEvent) {
        let Some(line) = self.render(event) else {
            return;
        };
        if let Ok(mut writer) = self.writer.lock() {
            let _ = writeln!(writer, "{line}");
            let _ = writer.flush();
        }
    }

    fn wants_detailed_events(&self) -> bool {
        self.ui.verbose >= 1
    }
}
