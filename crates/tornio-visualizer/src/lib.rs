//! # Tornio Visualizer
//!
//! G-code parsing, validation, motion model and 2D simulation for Tornio.
//! Includes the parser, the program validator, the simulation engine with
//! its renderer and pacing interfaces, and the program repository.

pub mod gcode;
pub mod utils;
pub mod visualizer;

pub use gcode::{
    parse_line, parse_program, validate, Instruction, InstructionKind, MoveTarget, Opcode,
    ACCEPTED_OPCODES,
};

pub use visualizer::{
    apply, DrawStyle, InstantPacer, MirroredRenderer, MotionOutcome, Pacer, Renderer,
    RunOutcome, Segment, SimulationControl, SimulationEngine, SimulationPhase,
    SimulationSettings, StepOutcome, SvgPathRenderer, SvgPaths, ThreadPacer,
};

pub use utils::{FileProgramRepository, ProgramLibrary, ProgramRepository};
