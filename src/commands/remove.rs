//! Remove command - tear the site down on the host

use std::path::Path;

use anyhow::{bail, Context, Result};
use dialoguer::Confirm;

use jamal::domain::value_objects::ServerLayout;
use jamal::presentation::create_remove_use_case;
use jamal::{SiteConfig, WorkflowKind};

use super::{event_sink, load_site};
use crate::ui::context::UiContext;

pub fn cmd_remove(config_path: &Path, yes: bool, ui: &UiContext) -> Result<()> {
    let site = load_site(config_path, ui)?;

    if !yes && !confirm(&site, ui)? {
        println!("Aborted.");
        return Ok(());
    }

    let use_case = create_remove_use_case(config_path);
    let report = use_case.execute_with_events(&site, event_sink(WorkflowKind::Remove, ui))?;

    if ui.json {
        crate::ui::json::emit(serde_json::json!({
            "event": "remove_summary",
            "report": report,
        }))?;
    }
    Ok(())
}

fn confirm(site: &SiteConfig, ui: &UiContext) -> Result<bool> {
    if !ui.interactive() {
        bail!(
            "refusing to remove {} from {} without confirmation; pass --yes",
            site.name,
            site.host
        );
    }
    Confirm::new()
        .with_prompt(format!(
            "Remove {} from {}? This deletes {} and its nginx and rsync configuration",
            site.name,
            site.host,
            ServerLayout::default().web_root(&site.name)
        ))
        .default(false)
        .interact()
        .context("Failed to read confirmation")
}
