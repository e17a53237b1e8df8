//! G-Code instruction types

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Every opcode token accepted by the validator, as written in program text
pub const ACCEPTED_OPCODES: [&str; 18] = [
    "G0", "G1", "G2", "G3", "G4", "G17", "G18", "G19", "G20", "G21", "G28", "G30", "G90", "G91",
    "G92", "G00", "G01", "M30",
];

/// Accepted opcode
///
/// Variants mirror the literal tokens. `G00`/`G0` and `G01`/`G1` are kept
/// apart so the original spelling survives a round trip, but dispatch on
/// them identically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Opcode {
    /// Rapid positioning
    G0,
    /// Rapid positioning, zero-padded spelling
    G00,
    /// Linear feed move (or blink when X, Y and Z are given)
    G1,
    /// Linear feed move, zero-padded spelling
    G01,
    /// Digital pin pulse
    G2,
    /// Analog pin pulse
    G3,
    /// Dwell
    G4,
    /// XY plane select
    G17,
    /// XZ plane select
    G18,
    /// YZ plane select
    G19,
    /// Inch units
    G20,
    /// Millimeter units
    G21,
    /// Return to home
    G28,
    /// Return to secondary home
    G30,
    /// Absolute positioning
    G90,
    /// Incremental positioning
    G91,
    /// Set position
    G92,
    /// Program end
    M30,
}

impl Opcode {
    /// Literal token for this opcode
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::G0 => "G0",
            Self::G00 => "G00",
            Self::G1 => "G1",
            Self::G01 => "G01",
            Self::G2 => "G2",
            Self::G3 => "G3",
            Self::G4 => "G4",
            Self::G17 => "G17",
            Self::G18 => "G18",
            Self::G19 => "G19",
            Self::G20 => "G20",
            Self::G21 => "G21",
            Self::G28 => "G28",
            Self::G30 => "G30",
            Self::G90 => "G90",
            Self::G91 => "G91",
            Self::G92 => "G92",
            Self::M30 => "M30",
        }
    }

    /// `G0` or `G00`
    pub fn is_rapid(&self) -> bool {
        matches!(self, Self::G0 | Self::G00)
    }

    /// `G1` or `G01`
    pub fn is_linear(&self) -> bool {
        matches!(self, Self::G1 | Self::G01)
    }

    /// Human-readable description of the opcode
    pub fn description(&self) -> &'static str {
        match self {
            Self::G0 | Self::G00 => "Rapid positioning",
            Self::G1 | Self::G01 => "Linear interpolation",
            Self::G2 => "Digital pin pulse",
            Self::G3 => "Analog pin pulse",
            Self::G4 => "Dwell",
            Self::G17 => "XY plane",
            Self::G18 => "XZ plane",
            Self::G19 => "YZ plane",
            Self::G20 => "Inches",
            Self::G21 => "Millimeters",
            Self::G28 => "Return to home",
            Self::G30 => "Return to secondary home",
            Self::G90 => "Absolute positioning",
            Self::G91 => "Incremental positioning",
            Self::G92 => "Set position",
            Self::M30 => "Program end",
        }
    }
}

impl FromStr for Opcode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "G0" => Ok(Self::G0),
            "G00" => Ok(Self::G00),
            "G1" => Ok(Self::G1),
            "G01" => Ok(Self::G01),
            "G2" => Ok(Self::G2),
            "G3" => Ok(Self::G3),
            "G4" => Ok(Self::G4),
            "G17" => Ok(Self::G17),
            "G18" => Ok(Self::G18),
            "G19" => Ok(Self::G19),
            "G20" => Ok(Self::G20),
            "G21" => Ok(Self::G21),
            "G28" => Ok(Self::G28),
            "G30" => Ok(Self::G30),
            "G90" => Ok(Self::G90),
            "G91" => Ok(Self::G91),
            "G92" => Ok(Self::G92),
            "M30" => Ok(Self::M30),
            _ => Err(format!("Unsupported opcode: {}", s)),
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Target of a rapid or linear move
///
/// A missing axis holds its current value; the motion model resolves it.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MoveTarget {
    /// Absolute X target (mm)
    pub x: Option<f64>,
    /// Absolute Y target (mm)
    pub y: Option<f64>,
    /// Feed rate (units/second)
    pub feed_rate: Option<f64>,
}

/// What an instruction does
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InstructionKind {
    /// Positioning move drawn instantly
    RapidMove(MoveTarget),
    /// Feed move, drawn incrementally when a feed rate is given
    LinearMove(MoveTarget),
    /// Blink pin 13 `count` times
    Blink {
        count: u32,
        on_secs: f64,
        off_secs: f64,
    },
    /// Drive a digital pin high for a duration
    DigitalPulse { pin: u8, duration_secs: f64 },
    /// Drive an analog pin at full duty for a duration
    AnalogPulse { pin: u8, duration_secs: f64 },
    /// Accepted but without motion, render or firmware effect
    NoOp,
}

/// A parsed program line
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Instruction {
    /// 1-based source line number
    pub line_number: u32,
    /// Opcode as written
    pub opcode: Opcode,
    /// Payload
    pub kind: InstructionKind,
}

impl Instruction {
    /// Create an instruction
    pub fn new(line_number: u32, opcode: Opcode, kind: InstructionKind) -> Self {
        Self {
            line_number,
            opcode,
            kind,
        }
    }

    /// Whether this instruction moves the tool
    pub fn is_motion(&self) -> bool {
        matches!(
            self.kind,
            InstructionKind::RapidMove(_) | InstructionKind::LinearMove(_)
        )
    }

    /// Whether this instruction produces a firmware call
    pub fn is_firmware_action(&self) -> bool {
        matches!(
            self.kind,
            InstructionKind::Blink { .. }
                | InstructionKind::DigitalPulse { .. }
                | InstructionKind::AnalogPulse { .. }
        )
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.line_number, self.opcode)?;
        match &self.kind {
            InstructionKind::RapidMove(target) | InstructionKind::LinearMove(target) => {
                if let Some(x) = target.x {
                    write!(f, " X{}", x)?;
                }
                if let Some(y) = target.y {
                    write!(f, " Y{}", y)?;
                }
                if let Some(feed) = target.feed_rate {
                    write!(f, " F{}", feed)?;
                }
                Ok(())
            }
            InstructionKind::Blink {
                count,
                on_secs,
                off_secs,
            } => write!(f, " X{} Y{} Z{}", count, on_secs, off_secs),
            InstructionKind::DigitalPulse { pin, duration_secs }
            | InstructionKind::AnalogPulse { pin, duration_secs } => {
                write!(f, " X{} Y{}", pin, duration_secs)
            }
            InstructionKind::NoOp => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_opcode_round_trip() {
        for token in ACCEPTED_OPCODES {
            let opcode: Opcode = token.parse().unwrap();
            assert_eq!(opcode.as_str(), token);
        }
    }

    #[test]
    fn test_opcode_rejects_unknown() {
        assert!("G99".parse::<Opcode>().is_err());
        assert!("g1".parse::<Opcode>().is_err());
        assert!("G000".parse::<Opcode>().is_err());
    }

    #[test]
    fn test_padded_spellings_dispatch_alike() {
        assert!(Opcode::G0.is_rapid() && Opcode::G00.is_rapid());
        assert!(Opcode::G1.is_linear() && Opcode::G01.is_linear());
        assert_ne!(Opcode::G0, Opcode::G00);
    }

    #[test]
    fn test_instruction_display() {
        let inst = Instruction::new(
            3,
            Opcode::G1,
            InstructionKind::LinearMove(MoveTarget {
                x: Some(10.0),
                y: None,
                feed_rate: Some(2.5),
            }),
        );
        assert_eq!(inst.to_string(), "3: G1 X10 F2.5");
        assert!(inst.is_motion());
        assert!(!inst.is_firmware_action());
    }
}
