//! Configuration management for docsnap.
//!
//! Configuration is loaded from multiple sources and merged:
//! 1. Global config: `~/.config/docsnap/config.json`
//! 2. Environment variable: `DOCSNAP_CONFIG_CONTENT`
//! 3. Project config: `docsnap.jsonc` or `docsnap.json` in the working directory
//!
//! Supports JSONC (JSON with comments) and `{env:VAR_NAME}` substitution.

use crate::error::{ConfigError, CoreResult};
use docsnap_diff::DiffConfig;
use docsnap_snapshot::SnapshotConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Environment variable holding inline configuration.
pub const CONFIG_CONTENT_ENV: &str = "DOCSNAP_CONFIG_CONTENT";

const GLOBAL_FILES: &[&str] = &["config.json", "docsnap.json", "docsnap.jsonc"];
const PROJECT_FILES: &[&str] = &["docsnap.jsonc", "docsnap.json"];

static VAR_REGEX: OnceLock<regex::Regex> = OnceLock::new();

fn var_regex() -> &'static regex::Regex {
    VAR_REGEX.get_or_init(|| {
        regex::Regex::new(r"\{env:([^}]+)\}")
            .expect("Invalid regex pattern - this is a compile-time constant")
    })
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// JSON Schema reference.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,

    /// Log level.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<LogLevel>,

    /// Root for the version index and snapshot copies.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Diff settings. A later source replaces the whole section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub diff: Option<DiffConfig>,

    /// Snapshot store settings. A later source replaces the whole section.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<SnapshotConfig>,
}

/// Log level as written in config files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for docsnap_util::log::LogLevel {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Trace => Self::Trace,
            LogLevel::Debug => Self::Debug,
            LogLevel::Info => Self::Info,
            LogLevel::Warn => Self::Warn,
            LogLevel::Error => Self::Error,
        }
    }
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Returns the merged config and the files it was read from.
    pub async fn load(project_dir: Option<&Path>) -> CoreResult<(Self, Vec<PathBuf>)> {
        let env_content = std::env::var(CONFIG_CONTENT_ENV).ok();
        Self::load_layers(
            docsnap_util::path::config_dir().as_deref(),
            env_content.as_deref(),
            project_dir,
        )
        .await
    }

    /// Load and merge explicit layers (later layers override earlier ones).
    pub async fn load_layers(
        global_dir: Option<&Path>,
        env_content: Option<&str>,
        project_dir: Option<&Path>,
    ) -> CoreResult<(Self, Vec<PathBuf>)> {
        let mut config = Config::default();
        let mut sources = Vec::new();

        if let Some(dir) = global_dir {
            if let Some(path) = first_existing(dir, GLOBAL_FILES) {
                config = config.merge(Self::load_file(&path).await?);
                sources.push(path);
            }
        }

        if let Some(content) = env_content {
            let content = Self::substitute_variables(content)?;
            config = config.merge(Self::parse_jsonc(&content, "<env>")?);
        }

        if let Some(dir) = project_dir {
            if let Some(path) = first_existing(dir, PROJECT_FILES) {
                config = config.merge(Self::load_file(&path).await?);
                sources.push(path);
            }
        }

        tracing::debug!(sources = sources.len(), "Loaded configuration");
        Ok((config, sources))
    }

    /// Load configuration from a file.
    pub async fn load_file(path: &Path) -> CoreResult<Self> {
        let content = tokio::fs::read_to_string(path).await?;
        let content = Self::substitute_variables(&content)?;
        Self::parse_jsonc(&content, &path.display().to_string())
    }

    /// Data directory: the configured one, or the per-user default.
    pub fn resolved_data_dir(&self) -> CoreResult<PathBuf> {
        self.data_dir
            .clone()
            .or_else(docsnap_util::path::data_dir)
            .ok_or_else(|| {
                ConfigError::InvalidPath("Could not determine data directory".to_string()).into()
            })
    }

    pub fn diff_config(&self) -> DiffConfig {
        self.diff.clone().unwrap_or_default()
    }

    pub fn snapshot_config(&self) -> SnapshotConfig {
        self.snapshot.clone().unwrap_or_default()
    }

    /// Parse JSONC (JSON with comments).
    fn parse_jsonc(content: &str, source: &str) -> CoreResult<Self> {
        let stripped = Self::strip_comments(content);
        serde_json::from_str(&stripped).map_err(|e| {
            ConfigError::InvalidJson {
                path: source.to_string(),
                message: e.to_string(),
            }
            .into()
        })
    }

    /// Strip `//` and `/* */` comments outside of strings.
    fn strip_comments(input: &str) -> String {
        let mut result = String::with_capacity(input.len());
        let mut chars = input.chars().peekable();
        let mut in_string = false;
        let mut escape_next = false;

        while let Some(c) = chars.next() {
            if escape_next {
                result.push(c);
                escape_next = false;
                continue;
            }
            if c == '\\' && in_string {
                result.push(c);
                escape_next = true;
                continue;
            }
            if c == '"' {
                in_string = !in_string;
                result.push(c);
                continue;
            }
            if in_string {
                result.push(c);
                continue;
            }

            if c == '/' {
                match chars.peek() {
                    Some('/') => {
                        chars.next();
                        for c in chars.by_ref() {
                            if c == '\n' {
                                result.push('\n');
                                break;
                            }
                        }
                        continue;
                    }
                    Some('*') => {
                        chars.next();
                        let mut prev = ' ';
                        for c in chars.by_ref() {
                            if prev == '*' && c == '/' {
                                break;
                            }
                            // Keep line numbers stable for parse errors.
                            if c == '\n' {
                                result.push('\n');
                            }
                            prev = c;
                        }
                        continue;
                    }
                    _ => {}
                }
            }

            result.push(c);
        }

        result
    }

    /// Replace `{env:VAR_NAME}` with the variable's value.
    fn substitute_variables(content: &str) -> CoreResult<String> {
        let mut missing = None;
        let result = var_regex().replace_all(content, |cap: &regex::Captures<'_>| {
            let name = &cap[1];
            std::env::var(name).unwrap_or_else(|_| {
                missing = Some(name.to_string());
                String::new()
            })
        });

        if let Some(name) = missing {
            return Err(ConfigError::EnvVarNotFound { name }.into());
        }
        Ok(result.into_owned())
    }

    /// Merge another config into this one (other takes precedence).
    pub fn merge(mut self, other: Self) -> Self {
        self.schema = merge_option(self.schema, other.schema);
        self.log_level = merge_option(self.log_level, other.log_level);
        self.data_dir = merge_option(self.data_dir, other.data_dir);
        self.diff = merge_option(self.diff, other.diff);
        self.snapshot = merge_option(self.snapshot, other.snapshot);
        self
    }
}

fn first_existing(dir: &Path, names: &[&str]) -> Option<PathBuf> {
    names.iter().map(|name| dir.join(name)).find(|p| p.exists())
}

fn merge_option<T>(base: Option<T>, other: Option<T>) -> Option<T> {
    match (base, other) {
        (_, Some(o)) => Some(o),
        (b, None) => b,
    }
}
