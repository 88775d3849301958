//! # Configuration
//!
//! Centralizes all settings with a clear override hierarchy:
//! defaults → config file → env vars → CLI flags.
//!
//! Config lives at `~/.trackview/config.toml`. If missing on first run, a
//! commented-out default is generated so users can discover all options.
//!
//! The environment is read once, here. The resolved values are passed
//! explicitly into the table; nothing downstream looks at env vars.

use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::core::announce::AnnouncementFormat;

// ============================================================================
// Config Structs (all fields Option<T> for sparse TOML)
// ============================================================================

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TrackviewConfig {
    #[serde(default)]
    pub accessibility: AccessibilityConfig,
    #[serde(default)]
    pub table: TableConfig,
    #[serde(default)]
    pub style: StyleConfig,
    #[serde(default)]
    pub pager: PagerConfig,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct AccessibilityConfig {
    pub enabled: Option<bool>,
    pub format: Option<AnnouncementFormat>,
    /// `"stderr"` or a file path.
    pub output: Option<String>,
    pub initial_announcement_delay_ms: Option<u64>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct TableConfig {
    pub column_padding: Option<u16>,
    pub max_column_width: Option<u16>,
    pub fixed_columns: Option<usize>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct StyleConfig {
    pub selection_background: Option<String>,
    pub selection_foreground: Option<String>,
    pub selection_bold: Option<bool>,
}

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct PagerConfig {
    pub command: Option<String>,
}

// ============================================================================
// Defaults
// ============================================================================

pub const DEFAULT_COLUMN_PADDING: u16 = 1;
pub const DEFAULT_MAX_COLUMN_WIDTH: u16 = 80;
pub const DEFAULT_PAGER: &str = "less -r";
pub const DEFAULT_ANNOUNCEMENT_DELAY_MS: u64 = 100;
pub const ACCESSIBILITY_ENV: &str = "TRACKVIEW_ACCESSIBILITY_MODE";

// ============================================================================
// Resolved Config (concrete values, no Options)
// ============================================================================

/// Where announcements are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnnouncementOutput {
    Stderr,
    File(PathBuf),
}

impl AnnouncementOutput {
    fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "stderr" => AnnouncementOutput::Stderr,
            path => AnnouncementOutput::File(PathBuf::from(path)),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionStyle {
    pub background: Option<String>,
    pub foreground: Option<String>,
    pub bold: bool,
}

#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    pub accessibility: bool,
    pub announcement_format: AnnouncementFormat,
    pub announcement_output: AnnouncementOutput,
    pub initial_announcement_delay_ms: u64,
    pub column_padding: u16,
    pub max_column_width: u16,
    pub fixed_columns: usize,
    pub selection_style: SelectionStyle,
    pub pager: String,
}

impl Default for ResolvedConfig {
    fn default() -> Self {
        Self {
            accessibility: false,
            announcement_format: AnnouncementFormat::default(),
            announcement_output: AnnouncementOutput::Stderr,
            initial_announcement_delay_ms: DEFAULT_ANNOUNCEMENT_DELAY_MS,
            column_padding: DEFAULT_COLUMN_PADDING,
            max_column_width: DEFAULT_MAX_COLUMN_WIDTH,
            fixed_columns: 0,
            selection_style: SelectionStyle::default(),
            pager: DEFAULT_PAGER.to_string(),
        }
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "config I/O error: {e}"),
            ConfigError::Parse(e) => write!(f, "config parse error: {e}"),
        }
    }
}

impl std::error::Error for ConfigError {}

// ============================================================================
// Loading
// ============================================================================

/// Returns the path to `~/.trackview/config.toml`.
pub fn config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(".trackview").join("config.toml"))
}

/// Load config from `~/.trackview/config.toml`.
///
/// If the file doesn't exist, generates a commented-out default and
/// returns `TrackviewConfig::default()`. If it exists but is malformed,
/// returns `ConfigError::Parse`.
pub fn load_config() -> Result<TrackviewConfig, ConfigError> {
    let path = match config_path() {
        Some(p) => p,
        None => {
            warn!("Could not determine home directory, using default config");
            return Ok(TrackviewConfig::default());
        }
    };

    if !path.exists() {
        info!("No config file found, generating default at {}", path.display());
        generate_default_config(&path);
        return Ok(TrackviewConfig::default());
    }

    load_config_from(&path)
}

pub fn load_config_from(path: &Path) -> Result<TrackviewConfig, ConfigError> {
    let contents = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let config: TrackviewConfig = toml::from_str(&contents).map_err(ConfigError::Parse)?;
    info!("Loaded config from {}", path.display());
    debug!("Config: {:?}", config);
    Ok(config)
}

fn generate_default_config(path: &Path) {
    let default_content = r##"# Trackview Configuration
# All settings are optional. Defaults are used for anything not specified.
# Override hierarchy: defaults → this file → env vars → CLI flags.

# [accessibility]
# enabled = false                     # Or set TRACKVIEW_ACCESSIBILITY_MODE, or pass --accessibility
# format = "marker"                   # "marker" or "concealed"
# output = "stderr"                   # "stderr" or a file path
# initial_announcement_delay_ms = 100

# [table]
# column_padding = 1
# max_column_width = 80
# fixed_columns = 0                   # Leading columns that never scroll horizontally

# [style]
# selection_background = "cyan"       # Color name or "#rrggbb"
# selection_foreground = "black"
# selection_bold = true

# [pager]
# command = "less -r"                 # Or set TRACKVIEW_PAGER / PAGER
"##;

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

/// Overrides taken from the command line (`None` = not specified).
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub accessibility: bool,
    pub pager: Option<String>,
}

/// Resolve the final config by collapsing: defaults → config file → env vars → CLI.
pub fn resolve(config: &TrackviewConfig, cli: &CliOverrides) -> ResolvedConfig {
    resolve_with_env(config, cli, |name| std::env::var(name).ok())
}

/// Like [`resolve`], reading env vars through `env`.
pub fn resolve_with_env<F>(config: &TrackviewConfig, cli: &CliOverrides, env: F) -> ResolvedConfig
where
    F: Fn(&str) -> Option<String>,
{
    // Accessibility: CLI flag → env presence → config → off
    let accessibility = cli.accessibility
        || env(ACCESSIBILITY_ENV).is_some()
        || config.accessibility.enabled.unwrap_or(false);

    // Pager: CLI → TRACKVIEW_PAGER → PAGER → config → default
    let pager = cli
        .pager
        .clone()
        .or_else(|| env("TRACKVIEW_PAGER"))
        .or_else(|| env("PAGER"))
        .or_else(|| config.pager.command.clone())
        .filter(|p| !p.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_PAGER.to_string());

    let announcement_output = config
        .accessibility
        .output
        .as_deref()
        .map(AnnouncementOutput::parse)
        .unwrap_or(AnnouncementOutput::Stderr);

    ResolvedConfig {
        accessibility,
        announcement_format: config.accessibility.format.unwrap_or_default(),
        announcement_output,
        initial_announcement_delay_ms: config
            .accessibility
            .initial_announcement_delay_ms
            .unwrap_or(DEFAULT_ANNOUNCEMENT_DELAY_MS),
        column_padding: config
            .table
            .column_padding
            .unwrap_or(DEFAULT_COLUMN_PADDING),
        max_column_width: config
            .table
            .max_column_width
            .unwrap_or(DEFAULT_MAX_COLUMN_WIDTH),
        fixed_columns: config.table.fixed_columns.unwrap_or(0),
        selection_style: SelectionStyle {
            background: config.style.selection_background.clone(),
            foreground: config.style.selection_foreground.clone(),
            bold: config.style.selection_bold.unwrap_or(false),
        },
        pager,
    }
}
