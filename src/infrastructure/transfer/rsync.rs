//! Rsync Daemon Transfer
//!
//! Pushes the site directory to the rsync daemon module with
//! `--delete` and an itemized `%i | %n` output format, streaming each stdout
//! line back to the caller as soon as rsync prints it. stderr is left attached
//! to the terminal.

use std::ffi::OsString;
use std::io::{self, BufRead, BufReader};
use std::process::{Command, Stdio};

use crate::domain::ports::{FileTransfer, TransferError, TransferExit, TransferRequest};
use crate::domain::value_objects::RSYNC_DAEMON_PORT;
use crate::infrastructure::process::abandon;

/// Output format parsed by the sync event classifier
pub const OUT_FORMAT: &str = "%i | %n";

/// Transfer strategy using an rsync daemon module
#[derive(Debug, Clone, Copy, Default)]
pub struct RsyncDaemonTransfer;

impl RsyncDaemonTransfer {
    pub fn new() -> Self {
        Self
    }

    fn args(request: &TransferRequest<'_>) -> Vec<OsString> {
        let mut password_file = OsString::from("--password-file=");
        password_file.push(request.password_file);
        vec![
            "-ahi".into(),
            "--delete".into(),
            format!("--out-format={OUT_FORMAT}").into(),
            password_file,
            request.source.into(),
            daemon_url(request).into(),
        ]
    }
}

/// `rsync://module@host[:port]/module/`
fn daemon_url(request: &TransferRequest<'_>) -> String {
    let host = if request.host.contains(':') {
        format!("[{}]", request.host)
    } else {
        request.host.to_string()
    };
    let port = if request.port == RSYNC_DAEMON_PORT {
        String::new()
    } else {
        format!(":{}", request.port)
    };
    format!(
        "rsync://{module}@{host}{port}/{module}/",
        module = request.module
    )
}

impl FileTransfer for RsyncDaemonTransfer {
    fn name(&self) -> &'static str {
        "rsync"
    }

    fn run(
        &self,
        request: &TransferRequest<'_>,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<TransferExit, TransferError> {
        let mut child = Command::new("rsync")
            .args(Self::args(request))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| match e.kind() {
                io::ErrorKind::NotFound => {
                    TransferError::NotAvailable("rsync not found on PATH".to_string())
                }
                _ => TransferError::Io(e),
            })?;

        if let Some(stdout) = child.stdout.take() {
            if let Err(e) = stream_lines(BufReader::new(stdout), on_line) {
                abandon(&mut child);
                return Err(e.into());
            }
        }

        let status = child.wait()?;
        Ok(TransferExit {
            code: status.code(),
        })
    }
}

/// Hand each line of `reader` to `on_line` as soon as it is complete
///
/// Invalid UTF-8 is replaced rather than rejected; the line terminator is
/// stripped.
fn stream_lines(mut reader: impl BufRead, on_line: &mut dyn FnMut(&str)) -> io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        on_line(line.trim_end_matches(['\n', '\r']));
    }
}
