use std::path::{Path, PathBuf};
use std::time::Duration;

use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

// =============================================================================
// File configuration
// =============================================================================
//
// Three equivalent ways to set any value, later layers winning:
//
//   panecast.toml:   [capture]
//                    session = "btop"
//
//   env var:         PANECAST_CAPTURE__SESSION=btop   (double underscore nests)
//
//   CLI flag:        --session btop                   (applied in main)

/// Everything tunable, as it appears on disk and in the environment.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct FileConfig {
    #[serde(default)]
    pub server: ServerFileConfig,
    #[serde(default)]
    pub capture: CaptureFileConfig,
    #[serde(default)]
    pub monitor: MonitorFileConfig,
}

/// `[server]`: listener address and viewer delivery.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerFileConfig {
    /// Address to bind
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// Viewer page served at `/`; the built-in page is used when this file
    /// does not exist
    #[serde(default = "default_viewer_path")]
    pub viewer_path: PathBuf,

    /// How often each stream connection checks for a new frame, in ms
    #[serde(default = "default_stream_tick_ms")]
    pub stream_tick_ms: u64,
}

impl Default for ServerFileConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            viewer_path: default_viewer_path(),
            stream_tick_ms: default_stream_tick_ms(),
        }
    }
}

/// `[capture]`: which pane to sample and at what geometry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CaptureFileConfig {
    /// tmux session (or any tmux target) to capture
    #[serde(default = "default_session")]
    pub session: String,

    /// Grid width in cells
    #[serde(default = "default_cols")]
    pub cols: u16,

    /// Grid height in cells
    #[serde(default = "default_rows")]
    pub rows: u16,

    /// Time between captures, in ms
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Deadline for a single tmux invocation, in ms
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Grace period before the first capture, in ms
    #[serde(default = "default_startup_delay_ms")]
    pub startup_delay_ms: u64,
}

impl Default for CaptureFileConfig {
    fn default() -> Self {
        Self {
            session: default_session(),
            cols: default_cols(),
            rows: default_rows(),
            interval_ms: default_interval_ms(),
            timeout_ms: default_timeout_ms(),
            startup_delay_ms: default_startup_delay_ms(),
        }
    }
}

/// `[monitor]`: periodic pane geometry correction.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MonitorFileConfig {
    #[serde(default = "default_monitor_enabled")]
    pub enabled: bool,

    /// Time between corrections, in seconds
    #[serde(default = "default_monitor_interval_secs")]
    pub interval_secs: u64,
}

impl Default for MonitorFileConfig {
    fn default() -> Self {
        Self {
            enabled: default_monitor_enabled(),
            interval_secs: default_monitor_interval_secs(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    4102
}

fn default_viewer_path() -> PathBuf {
    PathBuf::from("/var/www/viewer.html")
}

fn default_stream_tick_ms() -> u64 {
    500
}

fn default_session() -> String {
    "btop".to_string()
}

fn default_cols() -> u16 {
    200
}

fn default_rows() -> u16 {
    50
}

fn default_interval_ms() -> u64 {
    1000
}

fn default_timeout_ms() -> u64 {
    5000
}

fn default_startup_delay_ms() -> u64 {
    3000
}

fn default_monitor_enabled() -> bool {
    true
}

fn default_monitor_interval_secs() -> u64 {
    30
}

/// Layer defaults, the TOML file (if present), and `PANECAST_*` env vars.
pub fn load_config(path: Option<&Path>) -> Figment {
    let toml_path = path.unwrap_or_else(|| Path::new("panecast.toml"));
    Figment::from(Serialized::defaults(FileConfig::default()))
        .merge(Toml::file(toml_path))
        .merge(Env::prefixed("PANECAST_").split("__"))
}

// =============================================================================
// Runtime views
// =============================================================================

/// Capture settings with durations resolved. Intervals are clamped to at
/// least 1ms so a zero in the file cannot produce a zero-period timer.
#[derive(Clone, Debug)]
pub struct CaptureConfig {
    pub session: String,
    pub cols: u16,
    pub rows: u16,
    pub interval: Duration,
    pub timeout: Duration,
    pub startup_delay: Duration,
}

impl CaptureConfig {
    pub fn from_file(config: &CaptureFileConfig) -> Self {
        Self {
            session: config.session.clone(),
            cols: config.cols,
            rows: config.rows,
            interval: Duration::from_millis(config.interval_ms.max(1)),
            timeout: Duration::from_millis(config.timeout_ms.max(1)),
            startup_delay: Duration::from_millis(config.startup_delay_ms),
        }
    }
}

/// Monitor settings with durations resolved.
#[derive(Clone, Debug)]
pub struct MonitorConfig {
    pub enabled: bool,
    pub interval: Duration,
}

impl MonitorConfig {
    pub fn from_file(config: &MonitorFileConfig) -> Self {
        Self {
            enabled: config.enabled,
            interval: Duration::from_secs(config.interval_secs.max(1)),
        }
    }
}

/// Everything the running server needs, resolved once at startup.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub viewer_path: PathBuf,
    pub stream_tick: Duration,
    pub capture: CaptureConfig,
    pub monitor: MonitorConfig,
}

impl AppConfig {
    pub fn from_file(config: &FileConfig) -> Self {
        Self {
            host: config.server.host.clone(),
            port: config.server.port,
            viewer_path: config.server.viewer_path.clone(),
            stream_tick: Duration::from_millis(config.server.stream_tick_ms.max(1)),
            capture: CaptureConfig::from_file(&config.capture),
            monitor: MonitorConfig::from_file(&config.monitor),
        }
    }
}
