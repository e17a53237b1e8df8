//! # Tornio Communication
//!
//! Everything between a validated program and the microcontroller:
//! lowering instructions into Arduino-style firmware source, and deploy
//! sinks that write the sketch to disk or compile and upload it with
//! `arduino-cli`.

pub mod deploy;
pub mod firmware;

pub use deploy::{ArduinoCliSink, DeploySink, SketchDirectorySink, DEFAULT_FQBN};
pub use firmware::{lower, FirmwareSource, EPILOGUE, PREAMBLE};
