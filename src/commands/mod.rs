//! Command handlers for the jamal binary
//!
//! Each handler loads the site document, picks the event sink for the output
//! mode and hands the site to a use case from the presentation factory.

pub mod deploy;
pub mod init;
pub mod remove;
pub mod setup;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;

use jamal::domain::ports::{ProvisionEventSink, SiteRepository};
use jamal::infrastructure::JsonEventSink;
use jamal::presentation::create_site_repository;
use jamal::{SiteConfig, WorkflowKind};

use crate::ui::console::ConsoleEventSink;
use crate::ui::context::UiContext;
use crate::ui::output::print_config_warnings;

/// Load and validate the site document, printing any unknown-key warnings
pub(crate) fn load_site(config_path: &Path, ui: &UiContext) -> Result<SiteConfig> {
    let repository = create_site_repository(config_path);
    let loaded = repository.load()?;
    print_config_warnings(ui, &loaded.warnings);
    Ok(loaded.site)
}

/// Event sink for the current output mode
pub(crate) fn event_sink(workflow: WorkflowKind, ui: &UiContext) -> Arc<dyn ProvisionEventSink> {
    if ui.json {
        Arc::new(JsonEventSink::stdout(workflow).detailed(ui.verbose >= 1))
    } else {
        Arc::new(ConsoleEventSink::stdout(*ui))
    }
}
