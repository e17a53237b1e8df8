//! G-Code line parser

use regex::Regex;
use std::sync::OnceLock;
use tornio_core::GcodeError;
use tracing::trace;

use super::{Instruction, InstructionKind, MoveTarget, Opcode};

/// Leading opcode token: `G` or `M` followed by digits, ending at
/// whitespace, an operand letter or the end of the line
fn opcode_regex() -> &'static Regex {
    static OPCODE_REGEX: OnceLock<Regex> = OnceLock::new();
    OPCODE_REGEX
        .get_or_init(|| Regex::new(r"^([GM]\d+)(?:\s|[A-Z]|$)").expect("invalid regex pattern"))
}

/// Parse one program line
///
/// Returns `Ok(None)` for a blank line; callers skip it without consuming
/// an instruction slot. Line numbers are 1-based.
///
/// # Errors
/// `GcodeError::InvalidInstruction` when the line does not start with an
/// accepted opcode, `GcodeError::InvalidOperand` when a recognized operand
/// carries a value that is not a number.
pub fn parse_line(text: &str, line_number: u32) -> Result<Option<Instruction>, GcodeError> {
    let line = text.trim();
    if line.is_empty() {
        return Ok(None);
    }

    let invalid = || GcodeError::InvalidInstruction {
        line_number,
        raw_text: line.to_string(),
    };

    let token = opcode_regex()
        .captures(line)
        .and_then(|caps| caps.get(1))
        .ok_or_else(invalid)?;
    let opcode: Opcode = token.as_str().parse().map_err(|_| invalid())?;

    let operands = Operands {
        line_number,
        raw_text: line,
        tokens: line[token.end()..].split_whitespace().collect(),
    };

    let kind = match opcode {
        Opcode::G0 | Opcode::G00 => InstructionKind::RapidMove(operands.move_target()?),
        Opcode::G1 | Opcode::G01 => operands.linear_or_blink()?,
        Opcode::G2 => operands
            .pin_pulse()?
            .map(|(pin, duration_secs)| InstructionKind::DigitalPulse { pin, duration_secs })
            .unwrap_or(InstructionKind::NoOp),
        Opcode::G3 => operands
            .pin_pulse()?
            .map(|(pin, duration_secs)| InstructionKind::AnalogPulse { pin, duration_secs })
            .unwrap_or(InstructionKind::NoOp),
        _ => InstructionKind::NoOp,
    };

    trace!("Line {}: {} -> {:?}", line_number, opcode, kind);
    Ok(Some(Instruction::new(line_number, opcode, kind)))
}

/// Operand tokens following the opcode
struct Operands<'a> {
    line_number: u32,
    raw_text: &'a str,
    tokens: Vec<&'a str>,
}

impl Operands<'_> {
    /// Numeric value of the last token starting with `letter`
    fn number(&self, letter: char) -> Result<Option<f64>, GcodeError> {
        let token = self.operand_token(letter);
        if token.is_empty() {
            return Ok(None);
        }
        match token[letter.len_utf8()..].parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Some(value)),
            _ => Err(self.invalid_operand(token)),
        }
    }

    fn invalid_operand(&self, token: &str) -> GcodeError {
        GcodeError::InvalidOperand {
            line_number: self.line_number,
            raw_text: self.raw_text.to_string(),
            operand: token.to_string(),
        }
    }

    fn operand_token(&self, letter: char) -> &str {
        self.tokens
            .iter()
            .rev()
            .find(|t| t.starts_with(letter))
            .copied()
            .unwrap_or_default()
    }

    fn move_target(&self) -> Result<MoveTarget, GcodeError> {
        Ok(MoveTarget {
            x: self.number('X')?,
            y: self.number('Y')?,
            feed_rate: self.number('F')?,
        })
    }

    /// `G1 X<count> Y<on> Z<off>` is a blink; anything else is a feed move
    fn linear_or_blink(&self) -> Result<InstructionKind, GcodeError> {
        let target = self.move_target()?;
        let off = self.number('Z')?;

        if let (Some(count), Some(on_secs), Some(off_secs)) = (target.x, target.y, off) {
            if let Some(count) = as_whole::<u32>(count) {
                if on_secs >= 0.0 && off_secs >= 0.0 {
                    return Ok(InstructionKind::Blink {
                        count,
                        on_secs,
                        off_secs,
                    });
                }
            }
        }

        Ok(InstructionKind::LinearMove(target))
    }

    /// `X<pin> Y<duration>`; `None` when either operand is missing
    fn pin_pulse(&self) -> Result<Option<(u8, f64)>, GcodeError> {
        let (Some(pin), Some(duration_secs)) = (self.number('X')?, self.number('Y')?) else {
            return Ok(None);
        };
        let pin = as_whole::<u8>(pin).ok_or_else(|| self.invalid_operand(self.operand_token('X')))?;
        if duration_secs < 0.0 {
            return Err(self.invalid_operand(self.operand_token('Y')));
        }
        Ok(Some((pin, duration_secs)))
    }
}

/// Convert a non-negative whole number to an integer type
fn as_whole<T: TryFrom<u64>>(value: f64) -> Option<T> {
    if value < 0.0 || value.fract() != 0.0 || value > u64::MAX as f64 {
        return None;
    }
    T::try_from(value as u64).ok()
}
