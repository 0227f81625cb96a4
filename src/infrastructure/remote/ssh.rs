//! SSH Remote Channel
//!
//! Implements the RemoteChannel port on top of the OpenSSH client.
//!
//! Every command is its own `ssh` invocation; connection reuse is left to the
//! user's ssh configuration (`ControlMaster`). With a password the client is
//! wrapped in `sshpass -e`, which reads the password from `SSHPASS` so it never
//! shows up in the process list.

use std::io::{self, Write};
use std::process::{Child, Command, Stdio};

use crate::domain::ports::{ChannelError, CommandOutput, RemoteChannel, RemoteSession};
use crate::domain::services::shell_quote;
use crate::infrastructure::process::abandon;

/// Default `ConnectTimeout` in seconds
const DEFAULT_CONNECT_TIMEOUT: u32 = 15;

/// sshpass exit status for a rejected password
const SSHPASS_BAD_PASSWORD: i32 = 5;

/// ssh exit status for transport-level failures
const SSH_TRANSPORT_FAILURE: i32 = 255;

/// Factory for [`SshSession`]s
#[derive(Debug, Clone)]
pub struct SshChannel {
    connect_timeout: u32,
}

impl Default for SshChannel {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

impl SshChannel {
    pub fn new() -> Self {
        Self::default()
    }
}

impl RemoteChannel for SshChannel {
    type Session = SshSession;

    fn connect(
        &self,
        host: &str,
        user: &str,
        password: Option<&str>,
    ) -> Result<SshSession, ChannelError> {
        let session = SshSession {
            host: host.to_string(),
            user: user.to_string(),
            password: password.map(str::to_string),
            connect_timeout: self.connect_timeout,
        };
        let handshake = session.exec("true", None)?;
        session.check_handshake(&handshake)?;
        Ok(session)
    }
}

/// One (host, user, password) binding
pub struct SshSession {
    host: String,
    user: String,
    password: Option<String>,
    connect_timeout: u32,
}

impl SshSession {
    fn command(&self) -> Command {
        let mut cmd = match &self.password {
            Some(password) => {
                let mut cmd = Command::new("sshpass");
                cmd.arg("-e").arg("ssh").env("SSHPASS", password);
                cmd.args(["-o", "NumberOfPasswordPrompts=1"]);
                cmd
            }
            None => {
                let mut cmd = Command::new("ssh");
                cmd.args(["-o", "BatchMode=yes"]);
                cmd
            }
        };
        cmd.args(["-o", "StrictHostKeyChecking=accept-new"])
            .arg("-o")
            .arg(format!("ConnectTimeout={}", self.connect_timeout))
            .args(["-o", "LogLevel=ERROR"])
            .arg("-l")
            .arg(&self.user)
            .arg("--")
            .arg(&self.host);
        cmd
    }

    fn exec(&self, script: &str, input: Option<&[u8]>) -> Result<CommandOutput, ChannelError> {
        let mut child = self
            .command()
            .arg(script)
            .stdin(if input.is_some() {
                Stdio::piped()
            } else {
                Stdio::null()
            })
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.spawn_error(e))?;

        if let Some(bytes) = input {
            write_input(&mut child, bytes)?;
        }

        let output = child.wait_with_output()?;
        Ok(CommandOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        })
    }

    fn spawn_error(&self, err: io::Error) -> ChannelError {
        if err.kind() != io::ErrorKind::NotFound {
            return ChannelError::Io(err);
        }
        let message = if self.password.is_some() {
            "sshpass not found on PATH; install it or remove `password` to use key authentication"
        } else {
            "ssh not found on PATH"
        };
        ChannelError::NotAvailable(message.to_string())
    }

    /// Map the output of the initial `true` onto a channel error
    fn check_handshake(&self, out: &CommandOutput) -> Result<(), ChannelError> {
        if out.success() {
            return Ok(());
        }
        let rejected = (self.password.is_some() && out.exit_code == SSHPASS_BAD_PASSWORD)
            || (out.exit_code == SSH_TRANSPORT_FAILURE && out.contains("Permission denied"));
        if rejected {
            return Err(ChannelError::Authentication {
                host: self.host.clone(),
                user: self.user.clone(),
            });
        }
        let detail = out.combined();
        let detail = detail.trim();
        Err(ChannelError::Connection {
            host: self.host.clone(),
            message: if detail.is_empty() {
                format!("ssh exited with status {}", out.exit_code)
            } else {
                detail.to_string()
            },
        })
    }
}

/// Feed `bytes` to the child's stdin and close it
///
/// On a failed write the child is killed and reaped before the error is
/// returned.
fn write_input(child: &mut Child, bytes: &[u8]) -> io::Result<()> {
    let Some(mut stdin) = child.stdin.take() else {
        return Ok(());
    };
    let result = stdin.write_all(bytes);
    drop(stdin);
    if result.is_err() {
        abandon(child);
    }
    result
}

impl RemoteSession for SshSession {
    fn run(&self, command: &str) -> Result<CommandOutput, ChannelError> {
        self.exec(command, None)
    }

    fn upload(&self, content: &[u8], remote_path: &str) -> Result<(), ChannelError> {
        let out = self.exec(&format!("cat > {}", shell_quote(remote_path)), Some(content))?;
        if out.success() {
            return Ok(());
        }
        Err(ChannelError::UploadFailed {
            path: remote_path.to_string(),
            message: out.stderr.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use std::ffi::OsStr;

    use super::*;

    fn session(password: Option<&str>) -> SshSession {
        SshSession {
            host: "203.0.113.7".to_string(),
            user: "deploy".to_string(),
            password: password.map(str::to_string),
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    fn failed(exit_code: i32, stderr: &str) -> CommandOutput {
        CommandOutput {
            stdout: String::new(),
            stderr: stderr.to_string(),
            exit_code,
        }
    }

    #[test]
    fn key_auth_uses_batch_mode() {
        let cmd = session(None).command();
        assert_eq!(cmd.get_program(), OsStr::new("ssh"));
        let args = args(&cmd);
        assert!(args.contains(&"BatchMode=yes".to_string()));
        assert_eq!(args[args.len() - 2..], ["--", "203.0.113.7"]);
        assert!(cmd.get_envs().all(|(k, _)| k != OsStr::new("SSHPASS")));
    }

    #[test]
    fn password_travels_in_environment_only() {
        let cmd = session(Some("hunter2")).command();
        assert_eq!(cmd.get_program(), OsStr::new("sshpass"));
        let args = args(&cmd);
        assert_eq!(args[..2], ["-e", "ssh"]);
        assert!(!args.iter().any(|a| a.contains("hunter2")));
        assert!(cmd
            .get_envs()
            .any(|(k, v)| k == OsStr::new("SSHPASS") && v == Some(OsStr::new("hunter2"))));
    }

    #[test]
    fn user_is_passed_as_login_option() {
        let args = args(&session(None).command());
        let pos = args.iter().position(|a| a == "-l").unwrap();
        assert_eq!(args[pos + 1], "deploy");
        assert!(args.contains(&"ConnectTimeout=15".to_string()));
    }

    #[test]
    fn rejected_password_is_authentication_failure() {
        let err = session(Some("wrong"))
            .check_handshake(&failed(SSHPASS_BAD_PASSWORD, ""))
            .unwrap_err();
        assert!(matches!(err, ChannelError::Authentication { .. }));
    }

    #[test]
    fn rejected_key_is_authentication_failure() {
        let err = session(None)
            .check_handshake(&failed(255, "deploy@203.0.113.7: Permission denied (publickey)."))
            .unwrap_err();
        assert!(matches!(err, ChannelError::Authentication { .. }));
    }

    #[test]
    fn unreachable_host_is_connection_failure() {
        let err = session(None)
            .check_handshake(&failed(255, "ssh: connect to host 203.0.113.7 port 22: Connection timed out\n"))
            .unwrap_err();
        match err {
            ChannelError::Connection { host, message } => {
                assert_eq!(host, "203.0.113.7");
                assert!(message.ends_with("Connection timed out"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[cfg(unix)]
    #[test]
    fn failed_upload_write_reaps_the_child() {
        let mut child = Command::new("sh")
            .args(["-c", "exec 0<&-; sleep 30"])
            .stdin(Stdio::piped())
            .spawn()
            .unwrap();

        let err = write_input(&mut child, &vec![b'x'; 1 << 20]).unwrap_err();

        assert_eq!(err.kind(), io::ErrorKind::BrokenPipe);
        assert!(child.try_wait().unwrap().is_some());
    }

    #[cfg(unix)]
    #[test]
    fn input_is_delivered_and_closed() {
        let mut child = Command::new("cat")
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .spawn()
            .unwrap();

        write_input(&mut child, b"server {}\n").unwrap();

        let output = child.wait_with_output().unwrap();
        assert_eq!(output.stdout, b"server {}\n");
    }

    #[test]
    fn successful_handshake_is_ok() {
        assert!(session(None)
            .check_handshake(&CommandOutput::default())
            .is_ok());
    }
}
