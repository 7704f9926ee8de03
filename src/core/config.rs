//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.duonav/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.

use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use log::{LevelFilter, debug, info, warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::pane::channel::DEFAULT_LAYOUT_QUEUE_CAPACITY;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct DuonavConfig {
    #[serde(default)]
    pub general: GeneralConfig,
    #[serde(default)]
    pub snapshot: SnapshotConfig,
    #[serde(default)]
    pub graph: GraphConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GeneralConfig {
    pub exit_policy: Option<ExitPolicy>,
    pub layout_queue_capacity: Option<usize>,
    pub log_level: Option<String>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct SnapshotConfig {
    pub dir: Option<String>,
    pub autosave: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct GraphConfig {
    pub file: Option<String>,
}

/// What a pop of the last entry does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ExitPolicy {
    /// Refuse the pop and report `false`.
    #[default]
    Refuse,
    /// Tear the stack down and signal the host to exit.
    ExitHost,
}

impl FromStr for ExitPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "refuse" => Ok(ExitPolicy::Refuse),
            "exit_host" | "exit-host" | "exit" => Ok(ExitPolicy::ExitHost),
            other => Err(format!("unknown exit policy \"{other}\"")),
        }
    }
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::Info;
pub const DEFAULT_AUTOSAVE: bool = false;

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub exit_policy: ExitPolicy,
    pub layout_queue_capacity: usize,
    pub log_level: LevelFilter,
    pub snapshot_dir: PathBuf,
    pub autosave: bool,
    pub graph_file: Option<PathBuf>,
}

/// The part of the configuration a `NavController` needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ControllerConfig {
    pub exit_policy: ExitPolicy,
    pub layout_queue_capacity: usize,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            exit_policy: ExitPolicy::default(),
            layout_queue_capacity: DEFAULT_LAYOUT_QUEUE_CAPACITY,
        }
    }
}

impl From<&ResolvedConfig> for ControllerConfig {
    fn from(config: &ResolvedConfig) -> Self {
        Self {
            exit_policy: config.exit_policy,
            layout_queue_capacity: config.layout_queue_capacity,
        }
    }
}

/// Values given on the command line. `None` = not specified.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub exit_policy: Option<ExitPolicy>,
    pub log_level: Option<String>,
    pub snapshot_dir: Option<PathBuf>,
    pub graph_file: Option<PathBuf>,
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("config parse error: {0}")]
    Parse(#[from] toml::de::Error),
}

// ============================================================================
// Loading
// ============================================================================

/// Returns `~/.duonav/`.
pub fn base_dir() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".duonav"))
}

/// Returns the path to `~/.duonav/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    base_dir().map(|d| d.join("config.toml"))
}

/// Load config from `~/.duonav/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `DuonavConfig::default()`.
pub fn load_config() -> Result<DuonavConfig, ConfigError> {
    match config_path() {
        Some(path) => load_config_from(&path),
        None => {
            warn!("Could not determine home directory, using default config");
            Ok(DuonavConfig::default())
        }
    }
}

pub fn load_config_from(path: &Path) -> Result<DuonavConfig, ConfigError> {
    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(path);
        return Ok(DuonavConfig::default());
    }

    let contents = fs::read_to_string(path)?;
    let config: DuonavConfig = toml::from_str(&contents)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

/// Generates a commented-out default config file at the given path.
fn generate_default_config(path: &Path) {
    let default_content = r#"# duonav configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [general]
# exit_policy = "refuse"            # "refuse" or "exit_host" (DUONAV_EXIT_POLICY)
# layout_queue_capacity = 8         # pending pane-layout events before senders wait
# log_level = "info"                # "error" .. "trace" (DUONAV_LOG_LEVEL)

# [snapshot]
# dir = "snapshots"                 # relative to ~/.duonav/ (DUONAV_SNAPSHOT_DIR)
# autosave = false                  # save a snapshot after every replayed script

# [graph]
# file = "graph.toml"               # relative to ~/.duonav/ (DUONAV_GRAPH)
"#;

    if let Some(parent) = path.parent()
        && let Err(e) = fs::create_dir_all(parent)
    {
        warn!("Failed to create config directory: {}", e);
        return;
    }
    if let Err(e) = fs::write(path, default_content) {
        warn!("Failed to write default config: {}", e);
    }
}

// ============================================================================
// Resolution
// ============================================================================

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &DuonavConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |key| std::env::var(key).ok())
}

/// Relative paths in the config file are taken from `~/.duonav/`.
fn config_relative(raw: &str) -> PathBuf {
    let path = PathBuf::from(raw);
    if path.is_absolute() {
        return path;
    }
    base_dir().map(|d| d.join(&path)).unwrap_or(path)
}

/// Parses one layer's log level. An unknown value is skipped so the next
/// layer applies.
fn parse_log_level(source: &str, raw: Option<&str>) -> Option<LevelFilter> {
    let raw = raw?;
    match LevelFilter::from_str(raw) {
        Ok(level) => Some(level),
        Err(_) => {
            warn!("Ignoring unknown log level \"{raw}\" from {source}");
            None
        }
    }
}

pub(crate) fn resolve_with_env<F>(config: &DuonavConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Exit policy: CLI → env → config → default
    let exit_policy = cli
        .exit_policy
        .or_else(|| {
            env("DUONAV_EXIT_POLICY").and_then(|raw| match raw.parse() {
                Ok(policy) => Some(policy),
                Err(e) => {
                    warn!("Ignoring DUONAV_EXIT_POLICY: {e}");
                    None
                }
            })
        })
        .or(config.general.exit_policy)
        .unwrap_or_default();

    // Log level: CLI → env → config → default
    let log_level = parse_log_level("--log-level", cli.log_level.as_deref())
        .or_else(|| parse_log_level("DUONAV_LOG_LEVEL", env("DUONAV_LOG_LEVEL").as_deref()))
        .or_else(|| parse_log_level("log_level", config.general.log_level.as_deref()))
        .unwrap_or(DEFAULT_LOG_LEVEL);

    // Snapshot dir: CLI → env → config → ~/.duonav/snapshots
    let snapshot_dir = cli
        .snapshot_dir
        .clone()
        .or_else(|| env("DUONAV_SNAPSHOT_DIR").map(PathBuf::from))
        .or_else(|| config.snapshot.dir.as_deref().map(config_relative))
        .unwrap_or_else(|| config_relative("snapshots"));

    // Graph file: CLI → env → config
    let graph_file = cli
        .graph_file
        .clone()
        .or_else(|| env("DUONAV_GRAPH").map(PathBuf::from))
        .or_else(|| config.graph.file.as_deref().map(config_relative));

    let layout_queue_capacity = match config.general.layout_queue_capacity {
        Some(0) => {
            warn!("layout_queue_capacity must be at least 1, using 1");
            1
        }
        Some(n) => n,
        None => DEFAULT_LAYOUT_QUEUE_CAPACITY,
    };

    ResolvedConfig {
        exit_policy,
        layout_queue_capacity,
        log_level,
        snapshot_dir,
        autosave: config.snapshot.autosave.unwrap_or(DEFAULT_AUTOSAVE),
        graph_file,
    }
}
