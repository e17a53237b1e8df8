//! `arduino-cli` sink: write the sketch, compile it, optionally upload it

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use tornio_core::DeployError;
use tracing::{debug, info, warn};

use super::{DeploySink, SketchDirectorySink};
use crate::firmware::FirmwareSource;

/// Board the trainer ships with
pub const DEFAULT_FQBN: &str = "arduino:avr:uno";

/// Compiles and uploads sketches through the `arduino-cli` tool
#[derive(Debug, Clone)]
pub struct ArduinoCliSink {
    sketches: SketchDirectorySink,
    cli_path: PathBuf,
    fqbn: String,
    port: Option<String>,
}

impl ArduinoCliSink {
    /// Sink writing sketches under `sketch_root` and compiling with `cli_path`
    pub fn new(sketch_root: impl Into<PathBuf>, cli_path: impl Into<PathBuf>) -> Self {
        Self {
            sketches: SketchDirectorySink::new(sketch_root),
            cli_path: cli_path.into(),
            fqbn: DEFAULT_FQBN.to_string(),
            port: None,
        }
    }

    /// Fully qualified board name passed to `--fqbn`
    pub fn with_fqbn(mut self, fqbn: impl Into<String>) -> Self {
        self.fqbn = fqbn.into();
        self
    }

    /// Serial port to upload to; without one the sketch is only compiled
    pub fn with_port(mut self, port: impl Into<String>) -> Self {
        let port = port.into();
        self.port = if port.trim().is_empty() {
            None
        } else {
            Some(port)
        };
        self
    }

    pub fn cli_path(&self) -> &Path {
        &self.cli_path
    }

    pub fn fqbn(&self) -> &str {
        &self.fqbn
    }

    pub fn port(&self) -> Option<&str> {
        self.port.as_deref()
    }

    pub fn sketches(&self) -> &SketchDirectorySink {
        &self.sketches
    }

    fn run_cli(&self, args: &[&str], sketch_dir: &Path) -> Result<Output, DeployError> {
        debug!(
            "Running {} {} {}",
            self.cli_path.display(),
            args.join(" "),
            sketch_dir.display()
        );
        Command::new(&self.cli_path)
            .args(args)
            .arg(sketch_dir)
            .output()
            .map_err(|e| DeployError::ToolNotFound {
                tool: self.cli_path.display().to_string(),
                reason: match e.kind() {
                    ErrorKind::NotFound => "not found".to_string(),
                    ErrorKind::PermissionDenied => "permission denied".to_string(),
                    _ => e.to_string(),
                },
            })
    }
}

fn stderr_text(output: &Output) -> String {
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    if stderr.is_empty() {
        format!("exited with {}", output.status)
    } else {
        stderr
    }
}

impl DeploySink for ArduinoCliSink {
    fn deploy(&self, source: &FirmwareSource, target_id: &str) -> Result<(), DeployError> {
        self.sketches.write(source, target_id)?;
        let sketch_dir = self.sketches.sketch_dir(target_id)?;

        let output = self.run_cli(&["compile", "--fqbn", &self.fqbn], &sketch_dir)?;
        if !output.status.success() {
            let stderr = stderr_text(&output);
            warn!("Compilation of {} failed: {}", target_id, stderr);
            return Err(DeployError::CompileFailed { stderr });
        }
        info!("Compiled sketch {} for {}", target_id, self.fqbn);

        let Some(port) = self.port.as_deref() else {
            debug!("No upload port configured, skipping upload");
            return Ok(());
        };

        let output = self.run_cli(&["upload", "-p", port, "--fqbn", &self.fqbn], &sketch_dir)?;
        if !output.status.success() {
            let stderr = stderr_text(&output);
            warn!("Upload of {} to {} failed: {}", target_id, port, stderr);
            return Err(DeployError::UploadFailed {
                target: port.to_string(),
                stderr,
            });
        }
        info!("Uploaded sketch {} to {}", target_id, port);
        Ok(())
    }
}
