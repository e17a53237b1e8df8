//! Tornio Settings Crate
//!
//! Handles application configuration: simulation tuning, program storage
//! location and firmware toolchain settings, persisted as JSON or TOML.

pub mod config;
pub mod error;

pub use config::{Config, ConfigFormat, FirmwareConfig, SimulationConfig, StorageConfig};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
