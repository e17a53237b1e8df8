//! Instruction stream → firmware source

use std::fmt;
use tornio_visualizer::{Instruction, InstructionKind};
use tracing::debug;

use super::preamble::{EPILOGUE, PREAMBLE};

/// Generated firmware program text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareSource(String);

impl FirmwareSource {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Lines of the `loop()` body, in order
    pub fn calls(&self) -> impl Iterator<Item = &str> {
        self.0[PREAMBLE.len()..self.0.len() - EPILOGUE.len()]
            .lines()
            .map(str::trim)
    }
}

impl fmt::Display for FirmwareSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for FirmwareSource {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Lower a validated program into firmware source
///
/// Emits one routine call per blink, digital pulse and analog pulse;
/// every other instruction contributes nothing. Values are passed through
/// as parsed.
pub fn lower(instructions: &[Instruction]) -> FirmwareSource {
    let mut source = String::from(PREAMBLE);
    let mut calls = 0usize;

    for call in instructions.iter().filter_map(firmware_call) {
        source.push_str("  ");
        source.push_str(&call);
        source.push_str(";\n");
        calls += 1;
    }

    source.push_str(EPILOGUE);
    debug!(
        "Lowered {} instructions into {} firmware calls",
        instructions.len(),
        calls
    );
    FirmwareSource(source)
}

/// Routine call for one instruction, `None` when it has no firmware effect
fn firmware_call(instruction: &Instruction) -> Option<String> {
    match instruction.kind {
        InstructionKind::Blink {
            count,
            on_secs,
            off_secs,
        } => Some(format!("blink({}, {}, {})", count, on_secs, off_secs)),
        InstructionKind::DigitalPulse { pin, duration_secs } => {
            Some(format!("turnOnPin({}, {})", pin, duration_secs))
        }
        InstructionKind::AnalogPulse { pin, duration_secs } => {
            Some(format!("turnOnAnalogPin({}, {})", pin, duration_secs))
        }
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tornio_visualizer::parse_program;

    fn lowered(program: &str) -> FirmwareSource {
        lower(&parse_program(program).unwrap())
    }

    #[test]
    fn test_empty_program_is_skeleton() {
        let source = lower(&[]);
        assert_eq!(source.as_str(), format!("{}{}", PREAMBLE, EPILOGUE));
        assert_eq!(source.calls().count(), 0);
    }

    #[test]
    fn test_calls_follow_program_order() {
        let source = lowered("G2 X13 Y2\nG0 X1 Y1\nG1 X3 Y1 Z2\nG3 X9 Y0.5\nM30\n");
        let calls: Vec<&str> = source.calls().collect();
        assert_eq!(
            calls,
            vec![
                "turnOnPin(13, 2);",
                "blink(3, 1, 2);",
                "turnOnAnalogPin(9, 0.5);"
            ]
        );
    }

    #[test]
    fn test_motion_lines_contribute_nothing() {
        let source = lowered("G0 X10 Y5\nG1 X20 Y5 F2\nG28\nG2 X1\n");
        assert_eq!(source.calls().count(), 0);
    }

    #[test]
    fn test_fractional_values_are_unmodified() {
        let source = lowered("G1 X2 Y0.25 Z1.75\n");
        assert_eq!(source.calls().collect::<Vec<_>>(), vec!["blink(2, 0.25, 1.75);"]);
    }

    #[test]
    fn test_firmware_call_per_instruction() {
        let program = parse_program("G1 X3 Y1 Z2\nG2 X13 Y2\nG3 X9 Y0.5\nG0 X1\nM30\n").unwrap();
        let calls: Vec<Option<String>> = program.iter().map(firmware_call).collect();
        assert_eq!(
            calls,
            vec![
                Some("blink(3, 1, 2)".to_string()),
                Some("turnOnPin(13, 2)".to_string()),
                Some("turnOnAnalogPin(9, 0.5)".to_string()),
                None,
                None,
            ]
        );
    }
}
