//! Interactive simulation shell
//!
//! A reader thread turns stdin lines into [`ShellCommand`]s. The engine runs
//! on the calling thread; while it is mid-run, [`ChannelPacer`] drains the
//! channel at every wait and yield point so `pause` and `cancel` take effect
//! between sub-segments. Everything else is queued until the run returns.

use std::collections::VecDeque;
use std::io::BufRead;
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::time::Duration;

use tornio_core::{Messenger, SimulationError};
use tornio_visualizer::{Pacer, Renderer, SimulationControl, SimulationEngine};
use tracing::{debug, trace};

const HELP: &str = "Commands: run, step, pause, resume, cancel, reset, status, help, quit";

/// One operator command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShellCommand {
    Run,
    Step,
    Pause,
    Resume,
    Cancel,
    Reset,
    Status,
    Help,
    Quit,
    Unknown(String),
}

impl ShellCommand {
    /// Parse one input line; blank lines yield `None`
    pub fn parse(line: &str) -> Option<Self> {
        let word = line.trim();
        if word.is_empty() {
            return None;
        }
        Some(match word.to_ascii_lowercase().as_str() {
            "run" | "r" => Self::Run,
            "step" | "s" => Self::Step,
            "pause" | "p" => Self::Pause,
            "resume" | "continue" | "c" => Self::Resume,
            "cancel" | "stop" => Self::Cancel,
            "reset" => Self::Reset,
            "status" => Self::Status,
            "help" | "?" => Self::Help,
            "quit" | "exit" | "q" => Self::Quit,
            _ => Self::Unknown(word.to_string()),
        })
    }
}

/// Pacer that applies pause and cancel requests arriving on a channel
pub struct ChannelPacer<P> {
    inner: P,
    commands: Receiver<ShellCommand>,
    pending: VecDeque<ShellCommand>,
    control: Option<SimulationControl>,
}

impl<P: Pacer> ChannelPacer<P> {
    pub fn new(inner: P, commands: Receiver<ShellCommand>) -> Self {
        Self {
            inner,
            commands,
            pending: VecDeque::new(),
            control: None,
        }
    }

    /// Read commands from stdin on a background thread
    pub fn from_stdin(inner: P) -> std::io::Result<Self> {
        let (tx, rx) = mpsc::channel();
        std::thread::Builder::new()
            .name("stdin-shell".to_string())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    if let Some(command) = ShellCommand::parse(&line) {
                        if tx.send(command).is_err() {
                            break;
                        }
                    }
                }
                debug!("stdin closed");
            })?;
        Ok(Self::new(inner, rx))
    }

    /// Control handle of the engine this pacer drives
    pub fn attach(&mut self, control: SimulationControl) {
        self.control = Some(control);
    }

    /// Next command to dispatch; a closed input reads as `Quit`
    pub fn next_command(&mut self) -> ShellCommand {
        if let Some(command) = self.pending.pop_front() {
            return command;
        }
        self.commands.recv().unwrap_or(ShellCommand::Quit)
    }

    fn drain(&mut self) {
        loop {
            match self.commands.try_recv() {
                Ok(command) => self.apply(command),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
    }

    fn apply(&mut self, command: ShellCommand) {
        trace!("Shell command during run: {:?}", command);
        match (&command, &self.control) {
            (ShellCommand::Pause, Some(control)) => {
                control.pause();
            }
            (ShellCommand::Cancel, Some(control)) => control.cancel(),
            (ShellCommand::Quit, Some(control)) => {
                control.cancel();
                self.pending.push_back(command);
            }
            _ => self.pending.push_back(command),
        }
    }
}

impl<P: Pacer> Pacer for ChannelPacer<P> {
    fn wait(&mut self, delay: Duration) {
        self.drain();
        self.inner.wait(delay);
    }

    fn yield_now(&mut self) {
        self.drain();
        self.inner.yield_now();
    }
}

/// Dispatch commands to `engine` until the operator quits
pub fn interact<R, M, P>(engine: &mut SimulationEngine<R, M, ChannelPacer<P>>)
where
    R: Renderer,
    M: Messenger,
    P: Pacer,
{
    let control = engine.control();
    engine.pacer_mut().attach(control);
    engine.messenger().info(HELP);

    loop {
        let command = engine.pacer_mut().next_command();
        debug!("Shell command: {:?}", command);
        match command {
            ShellCommand::Run => {
                let result = engine.run().map(drop);
                report(engine.messenger(), result);
            }
            ShellCommand::Step => {
                let result = engine.step().map(drop);
                report(engine.messenger(), result);
            }
            ShellCommand::Resume => {
                let result = engine.resume().map(drop);
                report(engine.messenger(), result);
            }
            ShellCommand::Pause => {
                if !engine.pause() {
                    engine.messenger().info("Nothing to pause");
                }
            }
            ShellCommand::Cancel => engine.cancel(),
            ShellCommand::Reset => engine.reset(),
            ShellCommand::Status => {
                let position = engine.position();
                let status = format!(
                    "{} at instruction {}/{} (X: {:.2} Y: {:.2})",
                    engine.phase(),
                    engine.index(),
                    engine.instructions().len(),
                    position.x,
                    position.y
                );
                engine.messenger().info(&status);
            }
            ShellCommand::Help => engine.messenger().info(HELP),
            ShellCommand::Quit => break,
            ShellCommand::Unknown(word) => engine
                .messenger()
                .error(&format!("Unknown command '{}'. {}", word, HELP)),
        }
    }
}

fn report<M: Messenger>(messenger: &M, result: Result<(), SimulationError>) {
    if let Err(e) = result {
        messenger.error(&e.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tornio_visualizer::InstantPacer;

    #[test]
    fn test_parse_commands() {
        assert_eq!(ShellCommand::parse("  RUN "), Some(ShellCommand::Run));
        assert_eq!(ShellCommand::parse("s"), Some(ShellCommand::Step));
        assert_eq!(ShellCommand::parse("continue"), Some(ShellCommand::Resume));
        assert_eq!(ShellCommand::parse(""), None);
        assert_eq!(
            ShellCommand::parse("jog"),
            Some(ShellCommand::Unknown("jog".to_string()))
        );
    }

    #[test]
    fn test_cancel_applied_during_wait() {
        let (tx, rx) = mpsc::channel();
        let mut pacer = ChannelPacer::new(InstantPacer::new(), rx);
        let control = SimulationControl::new();
        pacer.attach(control.clone());

        tx.send(ShellCommand::Status).unwrap();
        tx.send(ShellCommand::Cancel).unwrap();
        pacer.wait(Duration::from_millis(5));

        assert!(control.is_stopped());
        assert_eq!(pacer.next_command(), ShellCommand::Status);
    }

    #[test]
    fn test_closed_input_reads_as_quit() {
        let (tx, rx) = mpsc::channel::<ShellCommand>();
        let mut pacer = ChannelPacer::new(InstantPacer::new(), rx);
        drop(tx);
        assert_eq!(pacer.next_command(), ShellCommand::Quit);
    }
}
