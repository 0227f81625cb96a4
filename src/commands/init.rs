//! Init command - write a default site document

use std::path::Path;

use anyhow::Result;

use jamal::config::write_default;

use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;

pub fn cmd_init(config_path: &Path, force: bool, ui: &UiContext) -> Result<()> {
    write_default(config_path, force)?;

    if ui.json {
        crate::ui::json::emit(serde_json::json!({
            "event": "init_complete",
            "path": config_path.display().to_string(),
        }))?;
        return Ok(());
    }

    println!(
        "{} Created {} with default configuration.",
        Icon::Success.colored(ui.color, ui.unicode),
        config_path.display()
    );
    println!("  Edit host, user and domains, then run `jamal setup`.");
    Ok(())
}
