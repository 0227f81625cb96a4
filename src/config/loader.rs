//! Site document loading and persistence

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde_yaml_ng::Value;

use crate::domain::entities::{SiteConfig, SitePatch, TRANSFER_PASSWORD_KEY};
use crate::error::ConfigError;

use super::types::{SiteDocument, KNOWN_KEYS};

/// Non-fatal configuration warning surfaced to CLI users.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigWarning {
    pub key: String,
    pub file: PathBuf,
    pub line: Option<usize>,
    pub suggestion: Option<String>,
}

/// Read the raw document and collect warnings for keys it does not know.
pub fn read_document(path: &Path) -> Result<(SiteDocument, Vec<ConfigWarning>), ConfigError> {
    let content = read(path)?;

    let mut unknown_paths: Vec<String> = Vec::new();
    let deserializer = serde_yaml_ng::Deserializer::from_str(&content);

    let document: SiteDocument = serde_ignored::deserialize(deserializer, |p| {
        unknown_paths.push(p.to_string());
    })
    .map_err(|e| ConfigError::InvalidYaml {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;

    let warnings = unknown_paths
        .into_iter()
        .map(|path_str| {
            let key = path_str
                .split('.')
                .next_back()
                .unwrap_or(path_str.as_str())
                .to_string();
            ConfigWarning {
                line: find_line_number(&content, &key),
                suggestion: suggest_key(&key),
                key,
                file: path.to_path_buf(),
            }
        })
        .collect();

    Ok((document, warnings))
}

/// Load, apply `JAMAL_*` overrides and validate.
pub fn load_with_warnings(path: &Path) -> Result<(SiteConfig, Vec<ConfigWarning>), ConfigError> {
    let (document, warnings) = read_document(path)?;
    let site = with_env_overrides(document)
        .into_site()
        .map_err(|message| ConfigError::Invalid {
            file: path.to_path_buf(),
            message,
        })?;
    Ok((site, warnings))
}

/// Apply environment variable overrides
///
/// `JAMAL_HOST` and `JAMAL_USER` replace their keys when non-empty.
/// `JAMAL_PASSWORD` replaces the SSH password even when empty, which selects
/// key-based authentication.
pub fn with_env_overrides(document: SiteDocument) -> SiteDocument {
    with_env_overrides_from(document, |key| std::env::var(key).ok())
}

pub(crate) fn with_env_overrides_from(
    mut document: SiteDocument,
    get_env: impl Fn(&str) -> Option<String>,
) -> SiteDocument {
    if let Some(host) = get_env("JAMAL_HOST").filter(|v| !v.is_empty()) {
        document.host = host;
    }
    if let Some(user) = get_env("JAMAL_USER").filter(|v| !v.is_empty()) {
        document.user = user;
    }
    if let Some(password) = get_env("JAMAL_PASSWORD") {
        document.password = Some(password);
    }
    document
}

/// Apply a patch to the document on disk
///
/// Works on the raw YAML mapping so that keys this program does not know, and
/// the order of the ones it does, survive the save. The file is replaced
/// atomically and keeps its permissions.
pub fn apply_patch(path: &Path, patch: &SitePatch) -> Result<(), ConfigError> {
    let content = read(path)?;
    let mut value: Value =
        serde_yaml_ng::from_str(&content).map_err(|e| ConfigError::InvalidYaml {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;

    let mapping = value.as_mapping_mut().ok_or_else(|| ConfigError::Invalid {
        file: path.to_path_buf(),
        message: "expected a mapping at the top level".to_string(),
    })?;

    match patch {
        SitePatch::SetTransferPassword(secret) => {
            mapping.insert(
                Value::String(TRANSFER_PASSWORD_KEY.to_string()),
                Value::String(secret.clone()),
            );
        }
        SitePatch::UnsetTransferPassword => {
            mapping.shift_remove(TRANSFER_PASSWORD_KEY);
        }
    }

    let rendered = serde_yaml_ng::to_string(&value).map_err(|e| ConfigError::Invalid {
        file: path.to_path_buf(),
        message: e.to_string(),
    })?;
    write_atomic(path, &rendered)?;
    Ok(())
}

/// Write the `init` document
pub fn write_default(path: &Path, force: bool) -> Result<(), ConfigError> {
    if path.exists() && !force {
        return Err(ConfigError::AlreadyExists {
            file: path.to_path_buf(),
        });
    }
    let rendered =
        serde_yaml_ng::to_string(&SiteDocument::example()).map_err(|e| ConfigError::Invalid {
            file: path.to_path_buf(),
            message: e.to_string(),
        })?;
    fs::write(path, rendered)?;
    Ok(())
}

fn read(path: &Path) -> Result<String, ConfigError> {
    fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => ConfigError::NotFound {
            path: path.to_path_buf(),
        },
        _ => ConfigError::Io(e),
    })
}

fn write_atomic(path: &Path, content: &str) -> io::Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let permissions = fs::metadata(path)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.as_file().sync_all()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

fn find_line_number(content: &str, needle: &str) -> Option<usize> {
    content
        .lines()
        .position(|line| {
            line.trim_start()
                .strip_prefix(needle)
                .is_some_and(|rest| rest.trim_start().starts_with(':'))
        })
        .map(|i| i + 1)
}

fn suggest_key(unknown: &str) -> Option<String> {
    KNOWN_KEYS
        .iter()
        .map(|candidate| (candidate, levenshtein(unknown, candidate)))
        .min_by_key(|(_, dist)| *dist)
        .filter(|(_, dist)| *dist <= 2)
        .map(|(candidate, _)| candidate.to_string())
}

fn levenshtein(a: &str, b: &str) -> usize {
    if a == b {
        return 0;
    }

    let b_chars: Vec<char> = b.chars().collect();
    let mut prev: Vec<usize> = (0..=b_chars.len()).collect();
    let mut curr = vec![0usize; b_chars.len() + 1];

    for (i, ac) in a.chars().enumerate() {
        curr[0] = i + 1;
        for (j, bc) in b_chars.iter().enumerate() {
            let cost = usize::from(ac != *bc);
            curr[j + 1] = (prev[j + 1] + 1).min(curr[j] + 1).min(prev[j] + cost);
        }
        std::mem::swap(&mut prev, &mut curr);
    }

    prev[b_chars.len()]
}
