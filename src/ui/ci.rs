//! GitHub Actions workflow commands

use std::fmt;
use std::path::Path;

use crate::ui::terminal::TerminalCapabilities;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationLevel {
    Warning,
    Error,
}

/// A `::warning` / `::error` line that GitHub renders next to the file
#[derive(Debug, Clone)]
pub struct Annotation<'a> {
    pub level: AnnotationLevel,
    pub message: &'a str,
    pub file: Option<&'a Path>,
    pub line: Option<usize>,
}

impl<'a> Annotation<'a> {
    pub fn error(message: &'a str) -> Self {
        Self {
            level: AnnotationLevel::Error,
            message,
            file: None,
            line: None,
        }
    }

    pub fn warning(message: &'a str) -> Self {
        Self {
            level: AnnotationLevel::Warning,
            ..Self::error(message)
        }
    }

    pub fn at(mut self, file: Option<&'a Path>, line: Option<usize>) -> Self {
        self.file = file;
        self.line = line;
        self
    }
}

impl fmt::Display for Annotation<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let level = match self.level {
            AnnotationLevel::Warning => "warning",
            AnnotationLevel::Error => "error",
        };

        let mut props = Vec::new();
        if let Some(file) = self.file {
            props.push(format!("file={}", escape(&file.to_string_lossy())));
        }
        if let Some(line) = self.line {
            props.push(format!("line={line}"));
        }
        props.push("title=jamal".to_string());

        write!(f, "::{level} {}::{}", props.join(","), escape(self.message))
    }
}

/// Annotations are only meaningful inside a GitHub Actions runner
pub fn github_actions(caps: &TerminalCapabilities) -> bool {
    caps.is_ci && std::env::var_os("GITHUB_ACTIONS").is_some()
}

fn escape(s: &str) -> String {
    s.replace('%', "%25").replace('\r', "%0D").replace('\n', "%0A")
}
