//! Deploy sinks for generated firmware

pub mod arduino_cli;
pub mod sketch;

pub use arduino_cli::{ArduinoCliSink, DEFAULT_FQBN};
pub use sketch::SketchDirectorySink;

use tornio_core::DeployError;

use crate::firmware::FirmwareSource;

/// Destination for generated firmware
pub trait DeploySink {
    /// Deliver `source` under `target_id` (program name, sketch name)
    fn deploy(&self, source: &FirmwareSource, target_id: &str) -> Result<(), DeployError>;
}

impl<S: DeploySink + ?Sized> DeploySink for &S {
    fn deploy(&self, source: &FirmwareSource, target_id: &str) -> Result<(), DeployError> {
        (**self).deploy(source, target_id)
    }
}
