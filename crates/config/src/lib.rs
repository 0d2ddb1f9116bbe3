pub mod schema;
pub mod watcher;

pub use schema::{
    Averaging, CpuField, DialConfig, GaugeConfig, SamplerConfig, SurfaceLayer, ThemeConfig,
    WindowConfig,
};
pub use watcher::ConfigWatcher;

use dial_core::{DialError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `DialConfig::default()` if
/// the file doesn't exist so the overlay always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<DialConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(DialConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| DialError::Config(format!("cannot read '{}': {e}", path.display())))?;

    toml::from_str(&raw).map_err(|e| DialError::Config(format!("TOML parse error: {e}")))
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("dial").join("dial.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(cfg, DialConfig::default());
    }

    #[test]
    fn invalid_toml_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dial.toml");
        std::fs::write(&path, "[sampler\ncpu_interval = ").unwrap();
        assert!(matches!(load(&path), Err(DialError::Config(_))));
    }

    #[test]
    fn reads_values_from_disk() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dial.toml");
        std::fs::write(&path, "[gauges]\nbattery = \"BAT0\"\n").unwrap();
        assert_eq!(load(&path).unwrap().gauges.battery, "BAT0");
    }
}
