use std::path::Path;

use crossterm::style::Stylize;
use jamal::{ConfigError, ProvisionError, WorkflowError};

use crate::ui::ci::{self, Annotation};
use crate::ui::primitives::icon::Icon;
use crate::ui::theme;

pub fn format_error(err: &anyhow::Error, supports_color: bool, supports_unicode: bool) -> String {
    let icon = Icon::Error.colored(supports_color, supports_unicode);
    let message = format!("{err:#}");
    let mut out = if supports_color {
        format!("{icon} {}\n", message.as_str().with(theme::colors::ERROR))
    } else {
        format!("{icon} {message}\n")
    };

    if let Some(fix) = fix_hint(err) {
        out.push_str(&format!("  FIX: {fix}\n"));
    }
    out
}

pub fn print_error(err: &anyhow::Error, json: bool) {
    if json {
        let _ = crate::ui::json::emit(error_event(err));
        return;
    }

    let caps = crate::ui::terminal::detect_capabilities();
    if ci::github_actions(&caps) {
        let message = format!("{err:#}");
        println!("{}", Annotation::error(&message).at(error_file(err), None));
    }

    eprint!(
        "{}",
        format_error(err, caps.supports_color && !caps.is_ci, caps.supports_unicode)
    );
}

/// NDJSON `error` event; workflow failures also name their command
fn error_event(err: &anyhow::Error) -> serde_json::Value {
    let mut event = serde_json::json!({
        "event": "error",
        "message": format!("{err:#}"),
    });
    if let Some(workflow) = err.chain().find_map(|e| e.downcast_ref::<WorkflowError>()) {
        event["command"] = workflow.workflow().command().into();
    }
    event
}

fn config_error(err: &anyhow::Error) -> Option<&ConfigError> {
    err.chain().find_map(|e| {
        e.downcast_ref::<ConfigError>().or_else(|| {
            e.downcast_ref::<WorkflowError>()
                .and_then(|w| match w.cause() {
                    ProvisionError::Config(c) => Some(c),
                    _ => None,
                })
        })
    })
}

fn error_file(err: &anyhow::Error) -> Option<&Path> {
    match config_error(err)? {
        ConfigError::InvalidYaml { file, .. }
        | ConfigError::Invalid { file, .. }
        | ConfigError::AlreadyExists { file } => Some(file.as_path()),
        ConfigError::NotFound { path } => Some(path.as_path()),
        ConfigError::Io(_) => None,
    }
}

fn fix_hint(err: &anyhow::Error) -> Option<&'static str> {
    let workflow = err.chain().find_map(|e| e.downcast_ref::<WorkflowError>());
    match workflow.map(WorkflowError::cause) {
        Some(ProvisionError::Authentication { .. }) => Some(
            "check `user` and `password` in the site document, or leave `password` out to use your SSH keys",
        ),
        Some(ProvisionError::SyncFailure { .. }) => {
            Some("run `jamal setup` again if the rsync daemon was reconfigured by hand")
        }
        _ => None,
    }
}
