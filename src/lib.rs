//! # Tornio
//!
//! Author simple G-code toolpath programs for a small CNC lathe trainer,
//! simulate them on a 2D plot, and translate them into firmware for the
//! microcontroller that drives the trainer's output pins.
//!
//! ## Architecture
//!
//! Tornio is organized as a workspace with multiple crates:
//!
//! 1. **tornio-core** - Errors, operator messages, the 2D point model
//! 2. **tornio-visualizer** - G-code parser and validator, motion model,
//!    simulation engine, renderers, program storage
//! 3. **tornio-communication** - Firmware lowering and deploy sinks
//! 4. **tornio-settings** - Configuration files
//! 5. **tornio** - Logging setup and the command-line shell

pub mod cli;

pub use tornio_core::{
    DeployError, Error, GcodeError, MessageLevel, Messenger, Point2D,
    Result, SimulationError, StorageError, TracingMessenger,
};

pub use tornio_visualizer::{
    apply, parse_line, parse_program, validate, DrawStyle, FileProgramRepository, InstantPacer,
    Instruction, InstructionKind, MirroredRenderer, MotionOutcome, Opcode, Pacer,
    ProgramLibrary, ProgramRepository, Renderer, RunOutcome, SimulationControl,
    SimulationEngine, SimulationPhase, SimulationSettings, StepOutcome, SvgPathRenderer,
    ThreadPacer,
};

pub use tornio_communication::{
    lower, ArduinoCliSink, DeploySink, FirmwareSource, SketchDirectorySink,
};

pub use tornio_settings::{Config, FirmwareConfig, SimulationConfig, StorageConfig};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("TORNIO_BUILD_DATE");

/// Log output style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Multi-line human readable output
    #[default]
    Pretty,
    /// One JSON object per line
    Json,
}

/// Initialize logging with the default configuration
///
/// Sets up structured logging with:
/// - Output on stderr, leaving stdout to command results
/// - RUST_LOG environment variable support
/// - `default_level` when RUST_LOG is unset
pub fn init_logging(default_level: tracing::Level, format: LogFormat) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str().to_lowercase()));

    match format {
        LogFormat::Pretty => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .with_thread_names(true)
                .with_line_number(true)
                .pretty();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
        LogFormat::Json => {
            let fmt_layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .with_level(true)
                .json();

            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt_layer)
                .try_init()?;
        }
    }

    Ok(())
}
