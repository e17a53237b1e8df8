//! # Tornio Core
//!
//! Core types, errors and messaging shared by every Tornio crate.
//! Provides the 2D point model, the unified error hierarchy and the
//! messaging interface used to surface results to the operator.

pub mod constants;
pub mod core;
pub mod data;
pub mod error;

pub use core::message::{
    MessageLevel, Messenger, TracingMessenger,
};

pub use data::Point2D;

pub use error::{
    DeployError, Error, GcodeError, Result, SimulationError, StorageError,
};
