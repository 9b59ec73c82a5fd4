//! Configuration loading with env-var overrides.
//!
//! Reads `config/default.toml` relative to the current working directory
//! (or the file named by `SHELL_CONFIG`), then applies `SHELL_ORIGIN` and
//! `SHELL_LOG_LEVEL` env overrides. When no path is given and the default
//! file does not exist, built-in defaults are used.

use std::{
    collections::HashMap,
    env, fs,
    path::{Path, PathBuf},
};

use serde::Deserialize;

use crate::error::AppError;
use crate::loader::ManifestErrorPolicy;
use crate::logger;
use crate::manifest::is_http_origin;

const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Fully-resolved shell configuration.
#[derive(Debug, Clone)]
pub struct Config {
    pub name: String,
    /// Base the manifest path is resolved against: an `http(s)://` origin or
    /// a local build directory (already expanded, no `~`).
    pub origin: String,
    pub log_level: String,
    /// `true` when `log_level` came from `SHELL_LOG_LEVEL`; it then takes
    /// precedence over `RUST_LOG`.
    pub log_level_pinned: bool,
    /// Lookup key of the entry point started after the manifest is merged.
    pub entry: String,
    pub on_manifest_error: ManifestErrorPolicy,
    /// Default remotes, present before the manifest is merged.
    pub remotes: HashMap<String, String>,
}

/// Raw TOML shape, the `serde` target before resolution.
#[derive(Deserialize, Default)]
struct RawConfig {
    #[serde(default)]
    shell: RawShell,
    #[serde(default)]
    loader: RawLoader,
    #[serde(default)]
    remotes: HashMap<String, String>,
}

#[derive(Deserialize)]
struct RawShell {
    #[serde(default = "default_name")]
    name: String,
    #[serde(default = "default_origin")]
    origin: String,
    #[serde(default = "default_log_level")]
    log_level: String,
    #[serde(default = "default_entry")]
    entry: String,
}

impl Default for RawShell {
    fn default() -> Self {
        Self {
            name: default_name(),
            origin: default_origin(),
            log_level: default_log_level(),
            entry: default_entry(),
        }
    }
}

#[derive(Deserialize, Default)]
struct RawLoader {
    #[serde(default)]
    on_manifest_error: ManifestErrorPolicy,
}

fn default_name() -> String { "shell".to_string() }
fn default_origin() -> String { "http://localhost:4200".to_string() }
fn default_log_level() -> String { "info".to_string() }
fn default_entry() -> String { "bootstrap".to_string() }

/// Load config from `SHELL_CONFIG` or `config/default.toml`, then apply
/// env-var overrides.
pub fn load() -> Result<Config, AppError> {
    let explicit = env::var("SHELL_CONFIG").ok();
    let origin_override = env::var("SHELL_ORIGIN").ok();
    let log_level_override = env::var("SHELL_LOG_LEVEL").ok();

    match explicit {
        Some(path) => load_from(
            Path::new(&path),
            origin_override.as_deref(),
            log_level_override.as_deref(),
        ),
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => load_from(
            Path::new(DEFAULT_CONFIG_PATH),
            origin_override.as_deref(),
            log_level_override.as_deref(),
        ),
        None => resolve(
            RawConfig::default(),
            origin_override.as_deref(),
            log_level_override.as_deref(),
        ),
    }
}

/// Internal loader; accepts an explicit path and optional overrides.
/// Tests pass overrides directly instead of mutating env vars.
pub fn load_from(
    path: &Path,
    origin_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let raw = fs::read_to_string(path)
        .map_err(|e| AppError::Config(format!("cannot read {}: {e}", path.display())))?;

    let parsed: RawConfig = toml::from_str(&raw)
        .map_err(|e| AppError::Config(format!("parse error in {}: {e}", path.display())))?;

    resolve(parsed, origin_override, log_level_override)
}

fn resolve(
    parsed: RawConfig,
    origin_override: Option<&str>,
    log_level_override: Option<&str>,
) -> Result<Config, AppError> {
    let s = parsed.shell;

    let origin = origin_override.unwrap_or(&s.origin).trim().to_string();
    if origin.is_empty() {
        return Err(AppError::Config("shell.origin must not be empty".into()));
    }
    let origin = if is_http_origin(&origin) {
        origin
    } else {
        expand_home(&origin).display().to_string()
    };

    let log_level = log_level_override.unwrap_or(&s.log_level).to_string();
    logger::parse_level(&log_level).map_err(|e| AppError::Config(e.to_string()))?;

    if s.entry.is_empty() {
        return Err(AppError::Config("shell.entry must not be empty".into()));
    }

    Ok(Config {
        name: s.name,
        origin,
        log_level,
        log_level_pinned: log_level_override.is_some(),
        entry: s.entry,
        on_manifest_error: parsed.loader.on_manifest_error,
        remotes: parsed.remotes,
    })
}

/// Expand a leading `~` to the user's home directory.
/// Absolute or relative paths without `~` are returned unchanged.
pub fn expand_home(path: &str) -> PathBuf {
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    PathBuf::from(path)
}

// ── test helpers ──────────────────────────────────────────────────────────────

/// `Config` for unit tests: given origin, abort policy, no default remotes.
#[cfg(test)]
impl Config {
    pub fn test_default(origin: &str) -> Self {
        Self {
            name: "test".into(),
            origin: origin.to_string(),
            log_level: "info".into(),
            log_level_pinned: false,
            entry: "bootstrap".into(),
            on_manifest_error: ManifestErrorPolicy::Abort,
            remotes: HashMap::new(),
        }
    }
}
