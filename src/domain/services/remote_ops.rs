//! Structured remote operations
//!
//! Workflows never build shell strings themselves. Each remote action is a
//! [`RemoteOp`] with typed parameters, rendered into a [`RemoteCommand`] here,
//! and every interpolated value goes through [`shell_quote`] (and
//! [`sed_escape`] for values used inside `sed` addresses).

use std::fmt;

/// `systemctl` verbs used by the workflows
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SystemctlAction {
    Enable,
    Start,
    Restart,
    Reload,
    Status,
}

impl SystemctlAction {
    fn verb(&self) -> &'static str {
        match self {
            SystemctlAction::Enable => "enable",
            SystemctlAction::Start => "start",
            SystemctlAction::Restart => "restart",
            SystemctlAction::Reload => "reload",
            SystemctlAction::Status => "status",
        }
    }
}

/// One remote action with typed parameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteOp {
    /// `nginx -v`; output contains "not found" when nginx is absent
    NginxVersion,
    /// `nginx -t` self-test
    NginxTest,
    AptUpdate,
    AptInstall { package: String },
    Systemctl { action: SystemctlAction, unit: String },
    /// Print a file; non-zero exit when it does not exist
    ReadFile { path: String },
    /// Append `text` verbatim (no newline added)
    AppendText {
        path: String,
        text: String,
        sensitive: bool,
    },
    /// Write `text` only when the file is missing or empty
    WriteIfEmpty { path: String, text: String },
    /// Drop every line starting with `prefix` (no-op when the file is missing)
    DeleteLinesWithPrefix { path: String, prefix: String },
    /// Drop the block from the line equal to `header` through the next blank line
    DeleteBlock { path: String, header: String },
    /// Collapse runs of blank lines into one
    SqueezeBlankLines { path: String },
    MakeDir { path: String },
    Chown {
        owner: String,
        path: String,
        recursive: bool,
    },
    Chmod {
        mode: String,
        path: String,
        recursive: bool,
    },
    Move { from: String, to: String },
    /// `ln -sf target link_dir/`
    Symlink { target: String, link_dir: String },
    RemoveFile { path: String },
    RemoveTree { path: String },
}

/// A rendered shell command plus the form that is safe to show or log
#[derive(Clone, PartialEq, Eq)]
pub struct RemoteCommand {
    script: String,
    display: String,
}

impl RemoteCommand {
    fn plain(script: String) -> Self {
        Self {
            display: script.clone(),
            script,
        }
    }

    /// The exact shell string sent to the host
    pub fn script(&self) -> &str {
        &self.script
    }

    /// The shell string with secrets replaced
    pub fn display(&self) -> &str {
        &self.display
    }
}

impl fmt::Display for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.display)
    }
}

impl fmt::Debug for RemoteCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "RemoteCommand({:?})", self.display)
    }
}

/// Quote a value for POSIX `sh`
pub fn shell_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "'\\''"))
}

/// Escape a literal for use inside a `/.../` sed BRE address
pub fn sed_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for ch in s.chars() {
        if matches!(ch, '\\' | '/' | '.' | '*' | '[' | ']' | '^' | '$') {
            out.push('\\');
        }
        out.push(ch);
    }
    out
}

fn unless_missing(path: &str, command: String) -> String {
    format!("[ ! -e {} ] || {}", shell_quote(path), command)
}

fn recursive_flag(recursive: bool) -> &'static str {
    if recursive {
        " -R"
    } else {
        ""
    }
}

impl RemoteOp {
    pub fn systemctl(action: SystemctlAction, unit: &str) -> Self {
        RemoteOp::Systemctl {
            action,
            unit: unit.to_string(),
        }
    }

    /// Short human label used in step failures
    pub fn label(&self) -> String {
        match self {
            RemoteOp::NginxVersion => "check nginx version".to_string(),
            RemoteOp::NginxTest => "test nginx configuration".to_string(),
            RemoteOp::AptUpdate => "update package lists".to_string(),
            RemoteOp::AptInstall { package } => format!("install {package}"),
            RemoteOp::Systemctl { action, unit } => format!("{} {unit}", action.verb()),
            RemoteOp::ReadFile { path } => format!("read {path}"),
            RemoteOp::AppendText { path, .. } => format!("append to {path}"),
            RemoteOp::WriteIfEmpty { path, .. } => format!("initialize {path}"),
            RemoteOp::DeleteLinesWithPrefix { path, .. } => format!("remove entry from {path}"),
            RemoteOp::DeleteBlock { path, header } => format!("remove {header} from {path}"),
            RemoteOp::SqueezeBlankLines { path } => format!("tidy {path}"),
            RemoteOp::MakeDir { path } => format!("create {path}"),
            RemoteOp::Chown { path, .. } => format!("chown {path}"),
            RemoteOp::Chmod { path, .. } => format!("chmod {path}"),
            RemoteOp::Move { to, .. } => format!("move into {to}"),
            RemoteOp::Symlink { target, .. } => format!("enable {target}"),
            RemoteOp::RemoveFile { path } | RemoteOp::RemoveTree { path } => {
                format!("remove {path}")
            }
        }
    }

    /// Render to a shell command
    pub fn render(&self) -> RemoteCommand {
        let q = shell_quote;
        match self {
            RemoteOp::NginxVersion => RemoteCommand::plain("nginx -v 2>&1".to_string()),
            RemoteOp::NginxTest => RemoteCommand::plain("sudo nginx -t 2>&1".to_string()),
            RemoteOp::AptUpdate => RemoteCommand::plain("sudo apt-get update".to_string()),
            RemoteOp::AptInstall { package } => RemoteCommand::plain(format!(
                "sudo DEBIAN_FRONTEND=noninteractive apt-get install -y {}",
                q(package)
            )),
            RemoteOp::Systemctl { action, unit } => {
                RemoteCommand::plain(format!("sudo systemctl {} {}", action.verb(), q(unit)))
            }
            RemoteOp::ReadFile { path } => {
                RemoteCommand::plain(format!("sudo cat {} 2>/dev/null", q(path)))
            }
            RemoteOp::AppendText {
                path,
                text,
                sensitive,
            } => {
                let render = |t: &str| {
                    format!(
                        "printf '%s' {} | sudo tee -a {} > /dev/null",
                        q(t),
                        q(path)
                    )
                };
                let script = render(text);
                let display = if *sensitive {
                    render("<redacted>")
                } else {
                    script.clone()
                };
                RemoteCommand { script, display }
            }
            RemoteOp::WriteIfEmpty { path, text } => RemoteCommand::plain(format!(
                "[ -s {path} ] || printf '%s' {text} | sudo tee {path} > /dev/null",
                path = q(path),
                text = q(text)
            )),
            RemoteOp::DeleteLinesWithPrefix { path, prefix } => {
                let script = format!("/^{}/d", sed_escape(prefix));
                RemoteCommand::plain(unless_missing(
                    path,
                    format!("sudo sed -i {} {}", q(&script), q(path)),
                ))
            }
            RemoteOp::DeleteBlock { path, header } => {
                let script = format!("/^{}$/,/^$/d", sed_escape(header));
                RemoteCommand::plain(unless_missing(
                    path,
                    format!("sudo sed -i {} {}", q(&script), q(path)),
                ))
            }
            RemoteOp::SqueezeBlankLines { path } => RemoteCommand::plain(unless_missing(
                path,
                format!("sudo sed -i {} {}", q("/^$/N;/^\\n$/D"), q(path)),
            )),
            RemoteOp::MakeDir { path } => RemoteCommand::plain(format!("sudo mkdir -p {}", q(path))),
            RemoteOp::Chown {
                owner,
                path,
                recursive,
            } => RemoteCommand::plain(format!(
                "sudo chown{} {} {}",
                recursive_flag(*recursive),
                q(owner),
                q(path)
            )),
            RemoteOp::Chmod {
                mode,
                path,
                recursive,
            } => RemoteCommand::plain(format!(
                "sudo chmod{} {} {}",
                recursive_flag(*recursive),
                q(mode),
                q(path)
            )),
            RemoteOp::Move { from, to } => {
                RemoteCommand::plain(format!("sudo mv -f {} {}", q(from), q(to)))
            }
            RemoteOp::Symlink { target, link_dir } => RemoteCommand::plain(format!(
                "sudo ln -sf {} {}",
                q(target),
                q(&format!("{}/", link_dir.trim_end_matches('/')))
            )),
            RemoteOp::RemoveFile { path } => RemoteCommand::plain(format!("sudo rm -f {}", q(path))),
            RemoteOp::RemoveTree { path } => {
                RemoteCommand::plain(format!("sudo rm -rf {}", q(path)))
            }
        }
    }
}
