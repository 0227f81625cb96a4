use jamal::config::ConfigWarning;

use crate::ui::ci::{self, Annotation};
use crate::ui::context::UiContext;
use crate::ui::primitives::icon::Icon;

pub fn print_config_warnings(ui: &UiContext, warnings: &[ConfigWarning]) {
    for w in warnings {
        if ui.json {
            let _ = crate::ui::json::emit(serde_json::json!({
                "event": "config_warning",
                "key": w.key,
                "file": w.file.display().to_string(),
                "line": w.line,
                "suggestion": w.suggestion,
            }));
            continue;
        }

        let message = format_config_warning(w);
        if ci::github_actions(&ui.caps) {
            println!(
                "{}",
                Annotation::warning(&message).at(Some(w.file.as_path()), w.line)
            );
        }
        eprintln!("{} {}", Icon::Warning.colored(ui.color, ui.unicode), message);
    }
}

fn format_config_warning(w: &ConfigWarning) -> String {
    let location = match w.line {
        Some(line) => format!("{}:{}", w.file.display(), line),
        None => w.file.display().to_string(),
    };
    match &w.suggestion {
        Some(suggestion) => format!(
            "Unknown config key '{}' in {} (did you mean '{}'?)",
            w.key, location, suggestion
        ),
        None => format!("Unknown config key '{}' in {}", w.key, location),
    }
}
