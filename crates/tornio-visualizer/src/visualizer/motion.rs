//! Motion model
//!
//! Given the tool position and one instruction, computes the next position,
//! the segment to render and the pacing duration.

use tornio_core::Point2D;

use super::renderer::DrawStyle;
use crate::gcode::{Instruction, InstructionKind, MoveTarget};

/// A straight path segment to render
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub from: Point2D,
    pub to: Point2D,
    /// `Rapid` for G0/G00, `Feed` for G1/G01
    pub style: DrawStyle,
}

impl Segment {
    /// Segment length (mm)
    pub fn length(&self) -> f64 {
        self.from.distance_to(&self.to)
    }
}

/// Result of applying one instruction to the tool position
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MotionOutcome {
    /// Tool position after the instruction
    pub position: Point2D,
    /// Segment to draw, if the instruction moves the tool
    pub segment: Option<Segment>,
    /// Parsed feed rate (units/second)
    pub feed_rate: Option<f64>,
    /// Traversal time in seconds; zero without a positive feed rate
    pub duration_secs: f64,
}

impl MotionOutcome {
    fn stationary(position: Point2D) -> Self {
        Self {
            position,
            segment: None,
            feed_rate: None,
            duration_secs: 0.0,
        }
    }
}

/// Apply an instruction to the current tool position
pub fn apply(instruction: &Instruction, position: Point2D) -> MotionOutcome {
    match &instruction.kind {
        InstructionKind::RapidMove(target) => move_to(target, position, DrawStyle::Rapid),
        InstructionKind::LinearMove(target) => move_to(target, position, DrawStyle::Feed),
        _ => MotionOutcome::stationary(position),
    }
}

fn move_to(target: &MoveTarget, position: Point2D, style: DrawStyle) -> MotionOutcome {
    let next = Point2D {
        x: target.x.unwrap_or(position.x),
        y: target.y.unwrap_or(position.y),
    };

    let duration_secs = match target.feed_rate {
        Some(feed) if feed > 0.0 => position.distance_to(&next) / feed,
        _ => 0.0,
    };

    MotionOutcome {
        position: next,
        segment: Some(Segment {
            from: position,
            to: next,
            style,
        }),
        feed_rate: target.feed_rate,
        duration_secs,
    }
}
