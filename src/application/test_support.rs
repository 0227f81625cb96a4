//! In-memory port implementations shared by the use-case tests

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::sync::Mutex;

use crate::domain::entities::{SiteConfig, SitePatch};
use crate::domain::ports::{
    ChannelError, CommandOutput, FileTransfer, LoadedSite, PortProbe, ProbeReport,
    ProvisionEvent, ProvisionEventSink, RemoteChannel, RemoteSession, SiteRepository,
    TransferError, TransferExit, TransferRequest,
};
use crate::error::ConfigError;

pub fn output(stdout: &str, stderr: &str, exit_code: i32) -> CommandOutput {
    CommandOutput {
        stdout: stdout.to_string(),
        stderr: stderr.to_string(),
        exit_code,
    }
}

struct Scripted {
    pattern: String,
    outputs: Vec<CommandOutput>,
    calls: usize,
}

#[derive(Default)]
struct SessionState {
    scripted: Vec<Scripted>,
    commands: Vec<String>,
    uploads: Vec<(String, Vec<u8>)>,
}

/// Session that answers commands by substring match
///
/// Unmatched commands succeed with empty output. A pattern registered later
/// wins over an earlier one. A sequence answers one entry per call and then
/// keeps repeating its last entry.
#[derive(Clone, Default)]
pub struct MockSession {
    state: Rc<RefCell<SessionState>>,
}

impl MockSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, pattern: &str, stdout: &str, stderr: &str, exit_code: i32) {
        self.respond_seq(pattern, vec![output(stdout, stderr, exit_code)]);
    }

    pub fn respond_seq(&self, pattern: &str, outputs: Vec<CommandOutput>) {
        self.state.borrow_mut().scripted.push(Scripted {
            pattern: pattern.to_string(),
            outputs,
            calls: 0,
        });
    }

    pub fn commands(&self) -> Vec<String> {
        self.state.borrow().commands.clone()
    }

    pub fn count(&self, needle: &str) -> usize {
        self.commands().iter().filter(|c| c.contains(needle)).count()
    }

    pub fn ran(&self, needle: &str) -> bool {
        self.count(needle) > 0
    }

    /// Position of the first command containing `needle`
    pub fn position(&self, needle: &str) -> Option<usize> {
        self.commands().iter().position(|c| c.contains(needle))
    }

    pub fn uploads(&self) -> Vec<(String, Vec<u8>)> {
        self.state.borrow().uploads.clone()
    }
}

impl RemoteSession for MockSession {
    fn run(&self, command: &str) -> Result<CommandOutput, ChannelError> {
        let mut state = self.state.borrow_mut();
        state.commands.push(command.to_string());
        let reply = state
            .scripted
            .iter_mut()
            .rev()
            .find(|s| command.contains(&s.pattern))
            .map(|s| {
                let idx = s.calls.min(s.outputs.len() - 1);
                s.calls += 1;
                s.outputs[idx].clone()
            });
        Ok(reply.unwrap_or_default())
    }

    fn upload(&self, content: &[u8], remote_path: &str) -> Result<(), ChannelError> {
        self.state
            .borrow_mut()
            .uploads
            .push((remote_path.to_string(), content.to_vec()));
        Ok(())
    }
}

/// Channel handing out one shared [`MockSession`]
#[derive(Clone)]
pub struct MockChannel {
    pub session: MockSession,
    reject: bool,
    connects: Rc<RefCell<Vec<(String, String, Option<String>)>>>,
}

impl MockChannel {
    pub fn new(session: MockSession) -> Self {
        Self {
            session,
            reject: false,
            connects: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::new(MockSession::new())
        }
    }

    pub fn connects(&self) -> Vec<(String, String, Option<String>)> {
        self.connects.borrow().clone()
    }
}

impl RemoteChannel for MockChannel {
    type Session = MockSession;

    fn connect(
        &self,
        host: &str,
        user: &str,
        password: Option<&str>,
    ) -> Result<MockSession, ChannelError> {
        self.connects.borrow_mut().push((
            host.to_string(),
            user.to_string(),
            password.map(str::to_string),
        ));
        if self.reject {
            return Err(ChannelError::Authentication {
                host: host.to_string(),
                user: user.to_string(),
            });
        }
        Ok(self.session.clone())
    }
}

/// Event sink that records every event
#[derive(Default)]
pub struct RecordingEventSink {
    events: Mutex<Vec<ProvisionEvent>>,
}

impl RecordingEventSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<ProvisionEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn started_steps(&self) -> Vec<&'static str> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProvisionEvent::StepStarted { step, .. } => Some(step),
                _ => None,
            })
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                ProvisionEvent::Warning { message } => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl ProvisionEventSink for RecordingEventSink {
    fn on_event(&self, event: ProvisionEvent) {
        self.events.lock().unwrap().push(event);
    }
}

/// Site repository backed by memory
#[derive(Clone)]
pub struct MemoryRepository {
    site: Rc<RefCell<SiteConfig>>,
    patches: Rc<RefCell<Vec<SitePatch>>>,
}

impl MemoryRepository {
    pub fn new(site: SiteConfig) -> Self {
        Self {
            site: Rc::new(RefCell::new(site)),
            patches: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn current(&self) -> SiteConfig {
        self.site.borrow().clone()
    }

    pub fn patches(&self) -> Vec<SitePatch> {
        self.patches.borrow().clone()
    }
}

impl SiteRepository for MemoryRepository {
    fn location(&self) -> &Path {
        Path::new("memory")
    }

    fn load(&self) -> Result<LoadedSite, ConfigError> {
        Ok(LoadedSite {
            site: self.current(),
            warnings: Vec::new(),
        })
    }

    fn apply(&self, patch: &SitePatch) -> Result<(), ConfigError> {
        let patched = self.site.borrow().patched(patch);
        *self.site.borrow_mut() = patched;
        self.patches.borrow_mut().push(patch.clone());
        Ok(())
    }
}

/// What the fake transfer saw while it was running
#[derive(Debug, Clone)]
pub struct TransferCall {
    pub source: String,
    pub module: String,
    pub host: String,
    pub port: u16,
    pub password_file: PathBuf,
    pub password_file_content: Option<String>,
    #[cfg(unix)]
    pub password_file_mode: Option<u32>,
}

/// Transfer that replays canned output lines and exits with a fixed code
#[derive(Clone)]
pub struct FakeTransfer {
    lines: Vec<String>,
    code: Option<i32>,
    fail_to_start: bool,
    calls: Rc<RefCell<Vec<TransferCall>>>,
}

impl FakeTransfer {
    pub fn new(lines: &[&str], code: Option<i32>) -> Self {
        Self {
            lines: lines.iter().map(|l| l.to_string()).collect(),
            code,
            fail_to_start: false,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn unavailable() -> Self {
        Self {
            fail_to_start: true,
            ..Self::new(&[], Some(0))
        }
    }

    pub fn calls(&self) -> Vec<TransferCall> {
        self.calls.borrow().clone()
    }
}

impl FileTransfer for FakeTransfer {
    fn name(&self) -> &'static str {
        "fake"
    }

    fn run(
        &self,
        request: &TransferRequest<'_>,
        on_line: &mut dyn FnMut(&str),
    ) -> Result<TransferExit, TransferError> {
        #[cfg(unix)]
        let password_file_mode = {
            use std::os::unix::fs::PermissionsExt;
            std::fs::metadata(request.password_file)
                .ok()
                .map(|m| m.permissions().mode() & 0o777)
        };
        self.calls.borrow_mut().push(TransferCall {
            source: request.source.to_string(),
            module: request.module.to_string(),
            host: request.host.to_string(),
            port: request.port,
            password_file: request.password_file.to_path_buf(),
            password_file_content: std::fs::read_to_string(request.password_file).ok(),
            #[cfg(unix)]
            password_file_mode,
        });
        if self.fail_to_start {
            return Err(TransferError::NotAvailable("rsync not found".to_string()));
        }
        for line in &self.lines {
            on_line(line);
        }
        Ok(TransferExit { code: self.code })
    }
}

/// Probe with a fixed answer
#[derive(Clone, Default)]
pub struct FakeProbe {
    pub reachable: bool,
    calls: Rc<RefCell<Vec<(String, u16)>>>,
}

impl FakeProbe {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable,
            calls: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn calls(&self) -> Vec<(String, u16)> {
        self.calls.borrow().clone()
    }
}

impl PortProbe for FakeProbe {
    fn probe(&self, host: &str, port: u16) -> ProbeReport {
        self.calls.borrow_mut().push((host.to_string(), port));
        ProbeReport {
            reachable: self.reachable,
            detail: if self.reachable {
                "connection succeeded".to_string()
            } else {
                "connection refused".to_string()
            },
        }
    }
}
