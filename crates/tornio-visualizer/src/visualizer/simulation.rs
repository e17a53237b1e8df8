//! Simulation engine
//!
//! Owns the run state of one loaded program (instruction index, phase, tool
//! position, highlighted line) and drives it through `step`/`run`. All
//! drawing goes to a [`Renderer`], all operator text to a [`Messenger`] and
//! all waiting to a [`Pacer`].
//!
//! Pause and cancel requests may arrive while `run` is in progress; they are
//! recorded on a shared [`SimulationControl`] and observed before every
//! instruction and before every paced sub-segment.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tornio_core::constants::PACING_STEPS_PER_UNIT;
use tornio_core::{Messenger, Point2D, SimulationError};
use tracing::{debug, trace};

use super::motion::{self, Segment};
use super::pacing::Pacer;
use super::renderer::Renderer;
use crate::gcode::{Instruction, InstructionKind};

/// Upper bound on sub-segments for a single paced draw
const MAX_PACING_STEPS: usize = 10_000;

/// Phase of the simulation state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationPhase {
    /// Loaded, index 0, not started
    Ready,
    /// Advancing automatically inside `run`
    Running,
    /// Suspended mid-program, resumable
    Paused,
    /// Cancelled; needs `load` or `reset`
    Stopped,
    /// Reached the end of the program
    Completed,
}

impl fmt::Display for SimulationPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ready => write!(f, "ready"),
            Self::Running => write!(f, "running"),
            Self::Paused => write!(f, "paused"),
            Self::Stopped => write!(f, "stopped"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

/// How a call to `run` or `resume` returned
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Completed,
    Paused,
    Stopped,
}

/// Result of a single manual step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepOutcome {
    /// The instruction at this index was executed
    Executed(usize),
    /// The index was already at the end; the engine was reset
    Completed,
    /// A cancel request aborted the step
    Stopped,
}

#[derive(Debug, Default)]
struct ControlFlags {
    running: AtomicBool,
    paused: AtomicBool,
    stopped: AtomicBool,
}

/// Cloneable handle for recording pause/cancel requests
///
/// Clones share the same flags, so a handle held by a shell thread or a
/// pacer affects the engine that created it.
#[derive(Debug, Clone, Default)]
pub struct SimulationControl {
    flags: Arc<ControlFlags>,
}

impl SimulationControl {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request a pause; ignored unless a run is in progress
    ///
    /// Returns `true` when the request was recorded.
    pub fn pause(&self) -> bool {
        if self.flags.running.load(Ordering::SeqCst) {
            self.flags.paused.store(true, Ordering::SeqCst);
            true
        } else {
            false
        }
    }

    /// Request cancellation; honoured from any state
    pub fn cancel(&self) {
        self.flags.stopped.store(true, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.flags.running.load(Ordering::SeqCst)
    }

    pub fn is_paused(&self) -> bool {
        self.flags.paused.load(Ordering::SeqCst)
    }

    pub fn is_stopped(&self) -> bool {
        self.flags.stopped.load(Ordering::SeqCst)
    }

    fn begin_run(&self) {
        self.flags.paused.store(false, Ordering::SeqCst);
        self.flags.running.store(true, Ordering::SeqCst);
    }

    fn end_run(&self) {
        self.flags.running.store(false, Ordering::SeqCst);
    }

    fn clear(&self) {
        self.flags.running.store(false, Ordering::SeqCst);
        self.flags.paused.store(false, Ordering::SeqCst);
        self.flags.stopped.store(false, Ordering::SeqCst);
    }
}

/// Engine tuning
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSettings {
    /// Tool position at load and after every reset
    pub home: Point2D,
    /// Sub-segments per unit of distance for paced feed moves
    pub steps_per_unit: f64,
}

impl Default for SimulationSettings {
    fn default() -> Self {
        Self {
            home: Point2D::home(),
            steps_per_unit: PACING_STEPS_PER_UNIT,
        }
    }
}

/// Step-wise and full-run executor for one loaded program
pub struct SimulationEngine<R, M, P> {
    renderer: R,
    messenger: M,
    pacer: P,
    settings: SimulationSettings,
    control: SimulationControl,
    instructions: Vec<Instruction>,
    index: usize,
    position: Point2D,
    phase: SimulationPhase,
    highlighted: Option<usize>,
}

impl<R: Renderer, M: Messenger, P: Pacer> SimulationEngine<R, M, P> {
    /// Create an engine with an empty program
    pub fn new(renderer: R, messenger: M, pacer: P, settings: SimulationSettings) -> Self {
        Self {
            renderer,
            messenger,
            pacer,
            position: settings.home,
            settings,
            control: SimulationControl::new(),
            instructions: Vec::new(),
            index: 0,
            phase: SimulationPhase::Ready,
            highlighted: None,
        }
    }

    /// Replace the program and return to `Ready`
    pub fn load(&mut self, instructions: Vec<Instruction>) {
        debug!("Loading {} instructions for simulation", instructions.len());
        self.instructions = instructions;
        self.reset();
    }

    /// Return to `Ready` at index 0 and home, from any phase
    pub fn reset(&mut self) {
        self.rewind();
        self.phase = SimulationPhase::Ready;
    }

    /// Execute exactly one instruction
    ///
    /// At the end of the program the engine reports completion, rewinds and
    /// enters `Completed`. Otherwise the run is left suspended in `Paused`.
    ///
    /// # Errors
    /// `SimulationError::InvalidState` after a cancel.
    pub fn step(&mut self) -> Result<StepOutcome, SimulationError> {
        self.ensure_not_stopped("step")?;
        if self.control.is_stopped() {
            self.stop();
            return Ok(StepOutcome::Stopped);
        }

        if self.index >= self.instructions.len() {
            self.finish("All instructions executed");
            return Ok(StepOutcome::Completed);
        }

        let executed = self.index;
        if !self.execute_current() {
            self.stop();
            return Ok(StepOutcome::Stopped);
        }
        self.phase = SimulationPhase::Paused;
        Ok(StepOutcome::Executed(executed))
    }

    /// Advance automatically until the end, a pause request or a cancel
    ///
    /// Starts from the current index, so a paused run continues where it
    /// left off.
    ///
    /// # Errors
    /// `SimulationError::InvalidState` after a cancel.
    pub fn run(&mut self) -> Result<RunOutcome, SimulationError> {
        self.ensure_not_stopped("run")?;
        if self.control.is_stopped() {
            self.stop();
            return Ok(RunOutcome::Stopped);
        }

        debug!(
            "Running simulation from instruction {} of {}",
            self.index,
            self.instructions.len()
        );
        self.control.begin_run();
        self.phase = SimulationPhase::Running;

        let outcome = loop {
            if self.control.is_stopped() {
                break RunOutcome::Stopped;
            }
            if self.control.is_paused() {
                break RunOutcome::Paused;
            }
            if self.index >= self.instructions.len() {
                break RunOutcome::Completed;
            }
            if !self.execute_current() {
                break RunOutcome::Stopped;
            }
            self.pacer.yield_now();
        };

        self.control.end_run();
        match outcome {
            RunOutcome::Completed => self.finish("Simulation completed"),
            RunOutcome::Paused => {
                debug!("Simulation paused at instruction {}", self.index);
                self.phase = SimulationPhase::Paused;
            }
            RunOutcome::Stopped => self.stop(),
        }
        Ok(outcome)
    }

    /// Record a pause request; no effect unless a run is in progress
    pub fn pause(&mut self) -> bool {
        self.control.pause()
    }

    /// Continue a paused simulation from the current index
    ///
    /// # Errors
    /// `SimulationError::InvalidState` unless the phase is `Paused`.
    pub fn resume(&mut self) -> Result<RunOutcome, SimulationError> {
        if self.phase != SimulationPhase::Paused {
            return Err(self.invalid_state("resume"));
        }
        self.run()
    }

    /// Cancel the simulation; the engine stays `Stopped` until reset
    pub fn cancel(&mut self) {
        self.control.cancel();
        if self.phase != SimulationPhase::Stopped {
            self.stop();
        }
    }

    pub fn phase(&self) -> SimulationPhase {
        self.phase
    }

    /// Index of the next instruction to execute
    pub fn index(&self) -> usize {
        self.index
    }

    /// Current tool position
    pub fn position(&self) -> Point2D {
        self.position
    }

    /// Handle for requesting pause/cancel from outside the engine
    pub fn control(&self) -> SimulationControl {
        self.control.clone()
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn settings(&self) -> &SimulationSettings {
        &self.settings
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    pub fn messenger(&self) -> &M {
        &self.messenger
    }

    pub fn pacer_mut(&mut self) -> &mut P {
        &mut self.pacer
    }

    /// Tear the engine apart, returning the renderer
    pub fn into_renderer(self) -> R {
        self.renderer
    }

    /// Execute the instruction at the current index
    ///
    /// Returns `false` when a cancel request aborted a paced draw; the
    /// index and position are then left unchanged.
    fn execute_current(&mut self) -> bool {
        let index = self.index;
        if let Some(previous) = self.highlighted.take() {
            self.renderer.unhighlight_instruction(previous);
        }
        self.renderer.highlight_instruction(index);
        self.highlighted = Some(index);

        let instruction = &self.instructions[index];
        let paced = matches!(instruction.kind, InstructionKind::LinearMove(_));
        let outcome = motion::apply(instruction, self.position);
        trace!("Executing {}", instruction);

        if let Some(segment) = outcome.segment {
            if paced && outcome.duration_secs > 0.0 {
                if !self.paced_draw(segment, outcome.duration_secs) {
                    return false;
                }
            } else {
                self.renderer.draw_segment(segment.from, segment.to, segment.style);
            }
        }

        self.position = outcome.position;
        self.renderer.set_marker(self.position);
        self.messenger.info(&format!("Position {}", self.position));
        self.index += 1;
        true
    }

    /// Draw a feed move in sub-segments spread over `duration_secs`
    fn paced_draw(&mut self, segment: Segment, duration_secs: f64) -> bool {
        let steps = pacing_steps(segment.length(), self.settings.steps_per_unit);
        let delay =
            Duration::try_from_secs_f64(duration_secs / steps as f64).unwrap_or(Duration::MAX);
        trace!("Paced draw: {} sub-segments, {:?} apart", steps, delay);

        let mut from = segment.from;
        for i in 1..=steps {
            if self.control.is_stopped() {
                debug!(
                    "Paced draw cancelled after {} of {} sub-segments",
                    i - 1,
                    steps
                );
                return false;
            }
            let to = if i == steps {
                segment.to
            } else {
                segment.from.lerp(&segment.to, i as f64 / steps as f64)
            };
            self.renderer.draw_segment(from, to, segment.style);
            self.pacer.wait(delay);
            from = to;
        }
        true
    }

    fn finish(&mut self, message: &str) {
        debug!("{}", message);
        self.messenger.info(message);
        self.rewind();
        self.phase = SimulationPhase::Completed;
    }

    fn stop(&mut self) {
        debug!("Simulation stopped at instruction {}", self.index);
        self.control.end_run();
        if let Some(previous) = self.highlighted.take() {
            self.renderer.unhighlight_instruction(previous);
        }
        self.phase = SimulationPhase::Stopped;
        self.messenger.info("Simulation stopped");
    }

    fn rewind(&mut self) {
        if let Some(previous) = self.highlighted.take() {
            self.renderer.unhighlight_instruction(previous);
        }
        self.control.clear();
        self.index = 0;
        self.position = self.settings.home;
        self.renderer.clear();
        self.renderer.set_marker(self.position);
    }

    fn ensure_not_stopped(&self, operation: &str) -> Result<(), SimulationError> {
        if self.phase == SimulationPhase::Stopped {
            Err(self.invalid_state(operation))
        } else {
            Ok(())
        }
    }

    fn invalid_state(&self, operation: &str) -> SimulationError {
        SimulationError::InvalidState {
            operation: operation.to_string(),
            phase: self.phase.to_string(),
        }
    }
}

/// Sub-segment count for a paced draw: floor(distance × rate), at least one
fn pacing_steps(distance: f64, steps_per_unit: f64) -> usize {
    let steps = (distance * steps_per_unit).floor();
    if steps.is_finite() && steps >= 1.0 {
        (steps as usize).min(MAX_PACING_STEPS)
    } else {
        1
    }
}
