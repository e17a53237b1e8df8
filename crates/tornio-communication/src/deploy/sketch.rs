//! Sketch directory sink
//!
//! Arduino tooling expects a sketch to live in a folder of the same name,
//! so `<root>/<name>/<name>.ino`.

use std::fs;
use std::path::{Path, PathBuf};

use tornio_core::constants::SKETCH_EXTENSION;
use tornio_core::DeployError;
use tracing::info;

use super::DeploySink;
use crate::firmware::FirmwareSource;

/// Writes firmware as an Arduino sketch folder
#[derive(Debug, Clone)]
pub struct SketchDirectorySink {
    root: PathBuf,
}

impl SketchDirectorySink {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Folder holding the sketch for `target_id`
    pub fn sketch_dir(&self, target_id: &str) -> Result<PathBuf, DeployError> {
        let name = target_id.trim();
        if name.is_empty() || name == "." || name == ".." || name.contains(['/', '\\']) {
            return Err(DeployError::InvalidTarget {
                target: target_id.to_string(),
            });
        }
        Ok(self.root.join(name))
    }

    /// Full `.ino` path for `target_id`
    pub fn sketch_path(&self, target_id: &str) -> Result<PathBuf, DeployError> {
        let name = target_id.trim();
        Ok(self.sketch_dir(name)?.join(format!("{}.{}", name, SKETCH_EXTENSION)))
    }

    /// Write the sketch and return its path
    pub fn write(
        &self,
        firmware: &FirmwareSource,
        target_id: &str,
    ) -> Result<PathBuf, DeployError> {
        let dir = self.sketch_dir(target_id)?;
        let path = self.sketch_path(target_id)?;

        fs::create_dir_all(&dir).map_err(|source| DeployError::Io {
            path: dir.display().to_string(),
            source,
        })?;
        fs::write(&path, firmware.as_str()).map_err(|source| DeployError::Io {
            path: path.display().to_string(),
            source,
        })?;

        info!("Firmware sketch written to {}", path.display());
        Ok(path)
    }
}

impl DeploySink for SketchDirectorySink {
    fn deploy(&self, source: &FirmwareSource, target_id: &str) -> Result<(), DeployError> {
        self.write(source, target_id).map(|_| ())
    }
}
