//! Command-line shell
//!
//! One subcommand per operator action: list, save, validate, simulate,
//! translate and upload. Results and failures are reported through a
//! [`Messenger`]; logs go to stderr through `tracing`.

mod shell;

pub use shell::{ChannelPacer, ShellCommand};

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand};
use tornio_communication::{lower, ArduinoCliSink, DeploySink, SketchDirectorySink};
use tornio_core::{MessageLevel, Messenger};
use tornio_settings::Config;
use tornio_visualizer::{
    FileProgramRepository, InstantPacer, Instruction, MirroredRenderer, Pacer,
    ProgramLibrary, Renderer, RunOutcome, SimulationEngine, SimulationSettings, SvgPathRenderer,
    ThreadPacer,
};
use tracing::{debug, info};

use crate::LogFormat;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    long_version = concat!(env!("CARGO_PKG_VERSION"), " (built ", env!("TORNIO_BUILD_DATE"), ")"),
    about,
    long_about = None
)]
pub struct Args {
    /// Configuration file (.toml or .json); defaults to the platform config dir
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Programs directory, overriding the configuration
    #[arg(long, global = true)]
    pub programs: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Log as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,

    /// Send operator messages to the log instead of the console
    #[arg(long, global = true)]
    pub log_messages: bool,

    #[command(subcommand)]
    pub command: Command,
}

impl Args {
    /// Level used when RUST_LOG is unset
    pub fn log_level(&self) -> tracing::Level {
        match self.verbose {
            0 if self.log_messages => tracing::Level::INFO,
            0 => tracing::Level::WARN,
            1 => tracing::Level::INFO,
            2 => tracing::Level::DEBUG,
            _ => tracing::Level::TRACE,
        }
    }

    pub fn log_format(&self) -> LogFormat {
        if self.log_json {
            LogFormat::Json
        } else {
            LogFormat::Pretty
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List saved programs
    List,

    /// Validate a program and save it under a name
    Save {
        /// Program name
        name: String,
        /// Source file, or "-" for stdin
        source: String,
    },

    /// Check a saved program
    Validate {
        /// Program name
        name: String,
    },

    /// Simulate a saved program on the 2D plot
    Simulate {
        /// Program name
        name: String,
        /// Write the drawn toolpath to this SVG file
        #[arg(long)]
        svg: Option<PathBuf>,
        /// Show the mirrored piece view
        #[arg(long)]
        mirror: bool,
        /// Pace feed moves in real time
        #[arg(long)]
        realtime: bool,
        /// Playback speed multiplier for real-time pacing
        #[arg(long)]
        speed: Option<f64>,
        /// Drive the simulation with run/step/pause/resume/cancel/reset from stdin
        #[arg(long)]
        interactive: bool,
    },

    /// Translate a saved program into a firmware sketch
    Translate {
        /// Program name
        name: String,
        /// Sketch output directory
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Translate, compile and upload a saved program with arduino-cli
    Upload {
        /// Program name
        name: String,
        /// Serial port of the board
        #[arg(long)]
        port: Option<String>,
    },

    /// Write the effective configuration to the config file
    InitConfig {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

/// Prints operator messages: info on stdout, errors on stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct ConsoleMessenger;

impl Messenger for ConsoleMessenger {
    fn notify(&self, text: &str, level: MessageLevel) {
        match level {
            MessageLevel::Info => println!("{}", text),
            MessageLevel::Error => eprintln!("error: {}", text),
        }
    }
}

/// Run a parsed command, reporting any failure through `messenger`
pub fn run<M: Messenger + Copy>(args: Args, messenger: M) -> anyhow::Result<()> {
    execute(args, messenger).inspect_err(|e| messenger.error(&format!("{:#}", e)))
}

fn execute<M: Messenger + Copy>(args: Args, messenger: M) -> anyhow::Result<()> {
    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => Config::default_path()?,
    };
    let mut config = Config::load_or_default(&config_path)
        .with_context(|| format!("Failed to load configuration {}", config_path.display()))?;
    if let Some(programs) = &args.programs {
        config.storage.programs_dir = programs.clone();
    }
    debug!("Programs directory: {}", config.storage.programs_dir.display());

    let library = ProgramLibrary::new(
        FileProgramRepository::new(&config.storage.programs_dir)
            .with_extension(&config.storage.extension),
    );

    match args.command {
        Command::List => {
            let names = library.list()?;
            if names.is_empty() {
                messenger.info("No saved programs");
            }
            for name in names {
                println!("{}", name);
            }
        }

        Command::Save { name, source } => {
            let text = read_source(&source)?;
            library.save(&name, &text)?;
            messenger.info(&format!("Program '{}' saved", name.trim()));
        }

        Command::Validate { name } => {
            let instructions = library.load_instructions(&name)?;
            messenger.info(&format!(
                "Program '{}' is valid ({} instructions)",
                name,
                instructions.len()
            ));
        }

        Command::Simulate {
            name,
            svg,
            mirror,
            realtime,
            speed,
            interactive,
        } => {
            let instructions = library.load_instructions(&name)?;
            let options = SimulateOptions {
                settings: SimulationSettings {
                    home: config.simulation.home(),
                    steps_per_unit: config.simulation.steps_per_unit,
                },
                realtime: realtime || interactive || config.simulation.realtime,
                speed: speed.unwrap_or(config.simulation.speed),
                interactive,
            };
            if !(options.speed.is_finite() && options.speed > 0.0) {
                bail!("Playback speed must be positive, got {}", options.speed);
            }

            let drawing = if mirror || config.simulation.mirror_piece {
                simulate(
                    MirroredRenderer::new(SvgPathRenderer::new()),
                    instructions,
                    &options,
                    messenger,
                )?
                .into_inner()
            } else {
                simulate(SvgPathRenderer::new(), instructions, &options, messenger)?
            };

            if let Some(path) = svg {
                fs::write(&path, drawing.to_svg_document())
                    .with_context(|| format!("Failed to write {}", path.display()))?;
                messenger.info(&format!("Toolpath written to {}", path.display()));
            }
        }

        Command::Translate { name, out } => {
            let source = lower(&library.load_instructions(&name)?);
            let sink = SketchDirectorySink::new(out.unwrap_or_else(|| config.sketch_dir().into()));
            let path = sink.write(&source, &name)?;
            messenger.info(&format!(
                "Program translated and saved to {}",
                path.display()
            ));
        }

        Command::Upload { name, port } => {
            let source = lower(&library.load_instructions(&name)?);
            let sink = ArduinoCliSink::new(config.sketch_dir(), &config.firmware.cli_path)
                .with_fqbn(&config.firmware.fqbn)
                .with_port(port.unwrap_or_else(|| config.firmware.port.clone()));
            sink.deploy(&source, &name)?;
            match sink.port() {
                Some(port) => messenger.info(&format!("Program uploaded to {}", port)),
                None => messenger.info("Program compiled; no upload port configured"),
            }
        }

        Command::InitConfig { force } => {
            if config_path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    config_path.display()
                );
            }
            config.save_to_file(&config_path)?;
            messenger.info(&format!("Configuration written to {}", config_path.display()));
        }
    }

    Ok(())
}

fn read_source(source: &str) -> anyhow::Result<String> {
    if source == "-" {
        let mut text = String::new();
        std::io::stdin()
            .read_to_string(&mut text)
            .context("Failed to read program from stdin")?;
        Ok(text)
    } else {
        let path = Path::new(source);
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))
    }
}

struct SimulateOptions {
    settings: SimulationSettings,
    realtime: bool,
    speed: f64,
    interactive: bool,
}

/// Real-time or instant playback
enum Playback {
    Realtime(ThreadPacer),
    Instant(InstantPacer),
}

impl Playback {
    fn new(options: &SimulateOptions) -> Self {
        if options.realtime {
            Self::Realtime(ThreadPacer::with_time_scale(1.0 / options.speed))
        } else {
            Self::Instant(InstantPacer::new())
        }
    }
}

impl Pacer for Playback {
    fn wait(&mut self, delay: Duration) {
        match self {
            Self::Realtime(pacer) => pacer.wait(delay),
            Self::Instant(pacer) => pacer.wait(delay),
        }
    }

    fn yield_now(&mut self) {
        match self {
            Self::Realtime(pacer) => pacer.yield_now(),
            Self::Instant(pacer) => pacer.yield_now(),
        }
    }
}

fn simulate<R, M>(
    renderer: R,
    instructions: Vec<Instruction>,
    options: &SimulateOptions,
    messenger: M,
) -> anyhow::Result<R>
where
    R: Renderer,
    M: Messenger + Copy,
{
    let count = instructions.len();
    let playback = Playback::new(options);

    if options.interactive {
        let pacer = ChannelPacer::from_stdin(playback)
            .context("Failed to start the interactive shell")?;
        let mut engine = SimulationEngine::new(renderer, messenger, pacer, options.settings);
        engine.load(instructions);
        shell::interact(&mut engine);
        return Ok(engine.into_renderer());
    }

    let mut engine = SimulationEngine::new(renderer, messenger, playback, options.settings);
    engine.load(instructions);
    info!("Simulating {} instructions", count);
    match engine.run()? {
        RunOutcome::Completed => {}
        outcome => bail!("Simulation ended early: {:?}", outcome),
    }
    Ok(engine.into_renderer())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simulate_flags() {
        let args = Args::try_parse_from([
            "tornio",
            "--programs",
            "/tmp/p",
            "-vv",
            "simulate",
            "part",
            "--mirror",
            "--svg",
            "out.svg",
        ])
        .unwrap();
        assert_eq!(args.programs, Some(PathBuf::from("/tmp/p")));
        assert_eq!(args.log_level(), tracing::Level::DEBUG);
        match args.command {
            Command::Simulate {
                name,
                svg,
                mirror,
                realtime,
                interactive,
                ..
            } => {
                assert_eq!(name, "part");
                assert_eq!(svg, Some(PathBuf::from("out.svg")));
                assert!(mirror);
                assert!(!realtime && !interactive);
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = Args::try_parse_from(["tornio", "list", "--config", "x.toml", "--log-json"])
            .unwrap();
        assert_eq!(args.config, Some(PathBuf::from("x.toml")));
        assert_eq!(args.log_format(), LogFormat::Json);
        assert_eq!(args.log_level(), tracing::Level::WARN);
    }

    #[test]
    fn test_log_messages_raises_default_level() {
        let args = Args::try_parse_from(["tornio", "--log-messages", "list"]).unwrap();
        assert!(args.log_messages);
        assert_eq!(args.log_level(), tracing::Level::INFO);

        let args = Args::try_parse_from(["tornio", "list", "--log-messages", "-vv"]).unwrap();
        assert_eq!(args.log_level(), tracing::Level::DEBUG);
    }

    #[test]
    fn test_save_requires_source() {
        assert!(Args::try_parse_from(["tornio", "save", "part"]).is_err());
    }
}
