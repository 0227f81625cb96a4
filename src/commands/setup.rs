//! Setup command - prepare the host for the site

use std::path::Path;

use anyhow::Result;

use jamal::presentation::create_setup_use_case;
use jamal::WorkflowKind;

use super::{event_sink, load_site};
use crate::ui::context::UiContext;

pub fn cmd_setup(config_path: &Path, ui: &UiContext) -> Result<()> {
    let site = load_site(config_path, ui)?;
    let use_case = create_setup_use_case(config_path);
    let report = use_case.execute_with_events(&site, event_sink(WorkflowKind::Setup, ui))?;

    if ui.json {
        crate::ui::json::emit(serde_json::json!({
            "event": "setup_summary",
            "report": report,
        }))?;
        return Ok(());
    }

    if !report.installed_server && ui.verbose >= 1 {
        println!("  nginx was already installed on {}", report.host);
    }
    Ok(())
}
