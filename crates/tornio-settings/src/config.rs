//! Configuration and settings management for Tornio
//!
//! Configuration is organized into logical sections:
//! - Simulation (home position, pacing, real-time playback, mirrored view)
//! - Storage (programs directory and file extension)
//! - Firmware (arduino-cli location, board, upload port, sketch directory)
//!
//! Files are JSON or TOML, chosen by extension, and validated on both load
//! and save.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tornio_core::constants::{HOME_X, HOME_Y, PACING_STEPS_PER_UNIT, PROGRAM_EXTENSION};
use tornio_core::Point2D;
use tracing::{debug, info};

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// Application directory name under the platform config/data dirs
const APP_DIR: &str = "tornio";

/// Default configuration file name
const CONFIG_FILE: &str = "config.toml";

/// Supported configuration file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// Format implied by a file extension
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

/// Simulation engine settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Home X position (mm)
    pub home_x: f64,
    /// Home Y position (mm)
    pub home_y: f64,
    /// Sub-segments per unit of distance for paced feed moves
    pub steps_per_unit: f64,
    /// Sleep through feed moves instead of drawing them instantly
    pub realtime: bool,
    /// Playback speed multiplier when `realtime` is on
    pub speed: f64,
    /// Draw the mirrored "show piece" view
    pub mirror_piece: bool,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            home_x: HOME_X,
            home_y: HOME_Y,
            steps_per_unit: PACING_STEPS_PER_UNIT,
            realtime: false,
            speed: 1.0,
            mirror_piece: false,
        }
    }
}

impl SimulationConfig {
    pub fn home(&self) -> Point2D {
        Point2D::new(self.home_x, self.home_y)
    }
}

/// Program storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding saved programs
    pub programs_dir: PathBuf,
    /// Program file extension, without the dot
    pub extension: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            programs_dir: dirs::data_dir()
                .map(|dir| dir.join(APP_DIR).join("programs"))
                .unwrap_or_else(|| PathBuf::from("programs")),
            extension: PROGRAM_EXTENSION.to_string(),
        }
    }
}

/// Firmware toolchain settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FirmwareConfig {
    /// `arduino-cli` executable (a bare name is looked up on PATH)
    pub cli_path: PathBuf,
    /// Fully qualified board name
    pub fqbn: String,
    /// Upload port; empty compiles without uploading
    pub port: String,
    /// Where sketches are written; unset means next to the programs
    pub sketch_dir: Option<PathBuf>,
}

impl Default for FirmwareConfig {
    fn default() -> Self {
        Self {
            cli_path: PathBuf::from("arduino-cli"),
            fqbn: "arduino:avr:uno".to_string(),
            port: "COM3".to_string(),
            sketch_dir: None,
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub simulation: SimulationConfig,
    pub storage: StorageConfig,
    pub firmware: FirmwareConfig,
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform default location, `<config_dir>/tornio/config.toml`
    pub fn default_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no platform config directory".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = ConfigFormat::from_path(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| SettingsError::LoadError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        let config: Self = match format {
            ConfigFormat::Json => serde_json::from_str(&content)?,
            ConfigFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Load `path` if it exists, defaults otherwise
    pub fn load_or_default(path: &Path) -> SettingsResult<Self> {
        if path.exists() {
            Self::load_from_file(path)
        } else {
            debug!("No configuration at {}, using defaults", path.display());
            Ok(Self::default())
        }
    }

    /// Save config to file (JSON or TOML), creating parent directories
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match ConfigFormat::from_path(path)? {
            ConfigFormat::Json => serde_json::to_string_pretty(self)?,
            ConfigFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| SettingsError::SaveError {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;

        info!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let sim = &self.simulation;
        if !sim.home_x.is_finite() || !sim.home_y.is_finite() {
            return Err(ConfigError::ValueOutOfRange {
                key: "simulation.home".to_string(),
                value: format!("({}, {})", sim.home_x, sim.home_y),
            });
        }
        if !(sim.steps_per_unit.is_finite() && sim.steps_per_unit > 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "simulation.steps_per_unit".to_string(),
                value: sim.steps_per_unit.to_string(),
            });
        }
        if !(sim.speed.is_finite() && sim.speed > 0.0) {
            return Err(ConfigError::ValueOutOfRange {
                key: "simulation.speed".to_string(),
                value: sim.speed.to_string(),
            });
        }

        if self.storage.programs_dir.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey("storage.programs_dir".to_string()));
        }
        if self.storage.extension.trim_start_matches('.').is_empty() {
            return Err(ConfigError::MissingKey("storage.extension".to_string()));
        }

        if self.firmware.cli_path.as_os_str().is_empty() {
            return Err(ConfigError::MissingKey("firmware.cli_path".to_string()));
        }
        if self.firmware.fqbn.trim().is_empty() {
            return Err(ConfigError::MissingKey("firmware.fqbn".to_string()));
        }

        Ok(())
    }

    /// Directory sketches are written to
    pub fn sketch_dir(&self) -> &Path {
        self.firmware
            .sketch_dir
            .as_deref()
            .unwrap_or(&self.storage.programs_dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::new();
        assert!(config.validate().is_ok());
        assert_eq!(config.simulation.home(), Point2D::new(30.0, -10.0));
        assert_eq!(config.simulation.steps_per_unit, 10.0);
        assert_eq!(config.storage.extension, "gcode");
        assert_eq!(config.firmware.fqbn, "arduino:avr:uno");
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.json")).unwrap(),
            ConfigFormat::Json
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.toml")).unwrap(),
            ConfigFormat::Toml
        );
        assert_eq!(
            ConfigFormat::from_path(Path::new("a.yaml")).unwrap_err(),
            ConfigError::UnsupportedFormat("yaml".to_string())
        );
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = Config::new();
        config.simulation.steps_per_unit = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValueOutOfRange { .. })
        ));

        let mut config = Config::new();
        config.firmware.fqbn = " ".to_string();
        assert_eq!(
            config.validate().unwrap_err(),
            ConfigError::MissingKey("firmware.fqbn".to_string())
        );
    }

    #[test]
    fn test_sketch_dir_falls_back_to_programs() {
        let mut config = Config::new();
        config.storage.programs_dir = PathBuf::from("/work/programs");
        assert_eq!(config.sketch_dir(), Path::new("/work/programs"));

        config.firmware.sketch_dir = Some(PathBuf::from("/work/sketches"));
        assert_eq!(config.sketch_dir(), Path::new("/work/sketches"));
    }
}
