//! Whole-program validation
//!
//! Runs the line parser over every line and stops at the first failure.
//! Saving, simulating and translating all go through this gate.

use tornio_core::GcodeError;
use tracing::debug;

use super::{parse_line, Instruction};

/// Validate a program
///
/// # Errors
/// The first line that fails to parse, with its 1-based line number and text.
pub fn validate(text: &str) -> Result<(), GcodeError> {
    parse_program(text).map(|_| ())
}

/// Validate a program and return its instruction stream
///
/// Blank lines are skipped; line numbers keep counting across them.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>, GcodeError> {
    let mut instructions = Vec::new();
    for (index, line) in text.lines().enumerate() {
        let line_number = u32::try_from(index + 1).unwrap_or(u32::MAX);
        if let Some(instruction) = parse_line(line, line_number)? {
            instructions.push(instruction);
        }
    }
    debug!("Parsed {} instructions", instructions.len());
    Ok(instructions)
}
