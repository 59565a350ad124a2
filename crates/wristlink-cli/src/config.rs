//! Demo configuration – reads/writes `~/.wristlink/config.toml`.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use wristlink_smoothing::AxisMap;

/// Named axis-map presets selectable from the config file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum AxisMapChoice {
    /// rx ← roll, ry ← pitch, rz ← yaw.
    #[default]
    Identity,
    /// Same, but with the yaw sign flipped for mirrored hand models.
    MirroredYaw,
}

impl AxisMapChoice {
    pub fn to_axis_map(self) -> AxisMap {
        match self {
            AxisMapChoice::Identity => AxisMap::IDENTITY,
            AxisMapChoice::MirroredYaw => AxisMap::MIRRORED_YAW,
        }
    }
}

impl std::fmt::Display for AxisMapChoice {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AxisMapChoice::Identity => write!(f, "identity"),
            AxisMapChoice::MirroredYaw => write!(f, "mirrored-yaw"),
        }
    }
}

/// Persisted demo configuration stored in `~/.wristlink/config.toml`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Wrist sampling rate in Hz.
    #[serde(default = "default_sample_rate_hz")]
    pub sample_rate_hz: f64,

    /// Smoothing factor per axis (0–1; lower is smoother and laggier).
    #[serde(default = "default_alpha")]
    pub alpha: f64,

    /// Attitude-to-model axis correspondence for the rendered hand.
    #[serde(default)]
    pub axis_map: AxisMapChoice,
}

fn default_sample_rate_hz() -> f64 {
    wristlink_sampler::DEFAULT_RATE_HZ
}
fn default_alpha() -> f64 {
    wristlink_smoothing::DEFAULT_ALPHA
}

impl Default for Config {
    fn default() -> Self {
        Self {
            sample_rate_hz: default_sample_rate_hz(),
            alpha: default_alpha(),
            axis_map: AxisMapChoice::default(),
        }
    }
}

/// Return the path to `~/.wristlink/config.toml`.
pub fn config_path() -> PathBuf {
    config_path_for_home(
        &std::env::var("HOME")
            .or_else(|_| std::env::var("USERPROFILE"))
            .unwrap_or_else(|_| ".".to_string()),
    )
}

/// Build the config path relative to the given home directory.
/// Extracted for testability without mutating environment variables.
pub(crate) fn config_path_for_home(home: &str) -> PathBuf {
    PathBuf::from(home).join(".wristlink").join("config.toml")
}

/// Load the config from disk. Returns `None` if the file does not exist.
pub fn load() -> Result<Option<Config>, String> {
    load_from(&config_path())
}

/// Load the config from a specific path.
pub(crate) fn load_from(path: &PathBuf) -> Result<Option<Config>, String> {
    if !path.exists() {
        return Ok(None);
    }
    let raw = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config at {}: {}", path.display(), e))?;
    let mut cfg: Config =
        toml::from_str(&raw).map_err(|e| format!("Failed to parse config: {}", e))?;
    apply_env_overrides(&mut cfg);
    Ok(Some(cfg))
}

/// Apply `WRISTLINK_*` environment variable overrides to `cfg`.
///
/// Supported variables:
///
/// | Variable | Config field |
/// |---|---|
/// | `WRISTLINK_SAMPLE_RATE_HZ` | `sample_rate_hz` |
/// | `WRISTLINK_ALPHA` | `alpha` |
/// | `WRISTLINK_AXIS_MAP` | `axis_map` (`identity` or `mirrored-yaw`) |
pub fn apply_env_overrides(cfg: &mut Config) {
    if let Ok(v) = std::env::var("WRISTLINK_SAMPLE_RATE_HZ")
        && let Ok(rate) = v.parse::<f64>()
    {
        cfg.sample_rate_hz = rate;
    }
    if let Ok(v) = std::env::var("WRISTLINK_ALPHA")
        && let Ok(alpha) = v.parse::<f64>()
    {
        cfg.alpha = alpha;
    }
    if let Ok(v) = std::env::var("WRISTLINK_AXIS_MAP") {
        match v.as_str() {
            "identity" => cfg.axis_map = AxisMapChoice::Identity,
            "mirrored-yaw" => cfg.axis_map = AxisMapChoice::MirroredYaw,
            _ => {}
        }
    }
}

/// Save the config to disk, creating `~/.wristlink/` if necessary.
pub fn save(cfg: &Config) -> Result<(), String> {
    save_to(cfg, &config_path())
}

/// Save the config to a specific path.
pub(crate) fn save_to(cfg: &Config, path: &PathBuf) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .map_err(|e| format!("Failed to create config directory: {}", e))?;
        // Restrict the config directory to the owner only (rwx------) on Unix.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(parent, fs::Permissions::from_mode(0o700))
                .map_err(|e| format!("Failed to set config directory permissions: {}", e))?;
        }
    }
    let raw =
        toml::to_string_pretty(cfg).map_err(|e| format!("Failed to serialize config: {}", e))?;
    // Write the file with owner-only read/write (rw-------) on Unix.
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        fs::OpenOptions::new()
            .write(true)
            .create(true)
            .truncate(true)
            .mode(0o600)
            .open(path)
            .and_then(|mut f| {
                use std::io::Write;
                f.write_all(raw.as_bytes())
            })
            .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    }
    #[cfg(not(unix))]
    fs::write(path, raw)
        .map_err(|e| format!("Failed to write config at {}: {}", path.display(), e))?;
    Ok(())
}
