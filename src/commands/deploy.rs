//! Deploy command - converge the virtual host and push the site

use std::path::Path;

use anyhow::Result;

use jamal::presentation::create_deploy_use_case;
use jamal::WorkflowKind;

use super::{event_sink, load_site};
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;

pub fn cmd_deploy(config_path: &Path, ui: &UiContext) -> Result<()> {
    let site = load_site(config_path, ui)?;
    let use_case = create_deploy_use_case();
    let report = use_case.execute_with_events(&site, event_sink(WorkflowKind::Deploy, ui))?;

    if ui.json {
        crate::ui::json::emit(serde_json::json!({
            "event": "deploy_summary",
            "report": report,
            "noop": report.is_noop(),
        }))?;
        return Ok(());
    }

    if report.is_noop() {
        println!(
            "{} {} is already up to date",
            Icon::Pending.colored(ui.color, ui.unicode),
            report.site
        );
    }
    Ok(())
}
