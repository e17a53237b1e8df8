//! Motion model, simulation engine and renderers

pub mod motion;
pub mod pacing;
pub mod renderer;
pub mod simulation;
pub mod svg_renderer;

pub use motion::{apply, MotionOutcome, Segment};
pub use pacing::{InstantPacer, Pacer, ThreadPacer};
pub use renderer::{DrawStyle, MirroredRenderer, Renderer};
pub use simulation::{
    RunOutcome, SimulationControl, SimulationEngine, SimulationPhase, SimulationSettings,
    StepOutcome,
};
pub use svg_renderer::{SvgPathRenderer, SvgPaths};
