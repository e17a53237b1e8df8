//! Firmware generation for the pin-driving microcontroller
//!
//! The generated program is a fixed skeleton (routine declarations, `setup`,
//! the three routine bodies) followed by a `loop` that calls one routine per
//! firmware action, in program order.

pub mod lowering;
pub mod preamble;

pub use lowering::{lower, FirmwareSource};
pub use preamble::{EPILOGUE, PREAMBLE};
