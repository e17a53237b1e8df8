//! End-to-end runs of the command-line shell against a scratch directory

use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tempfile::TempDir;
use tornio::cli::{self, Args};
use tornio::{Config, MessageLevel, Messenger, TracingMessenger};

const PROGRAM: &str = "G21\nG90\nG0 X10 Y0\nG1 X20 Y5 F50\nG1 X4 Y0.5 Z0.5\nG2 X13 Y2\nM30\n";

#[derive(Default)]
struct Recorded {
    messages: Mutex<Vec<(MessageLevel, String)>>,
}

impl Messenger for Recorded {
    fn notify(&self, text: &str, level: MessageLevel) {
        self.messages.lock().unwrap().push((level, text.to_string()));
    }
}

impl Recorded {
    fn errors(&self) -> Vec<String> {
        self.with_level(MessageLevel::Error)
    }

    fn infos(&self) -> Vec<String> {
        self.with_level(MessageLevel::Info)
    }

    fn with_level(&self, wanted: MessageLevel) -> Vec<String> {
        self.messages
            .lock()
            .unwrap()
            .iter()
            .filter(|(level, _)| *level == wanted)
            .map(|(_, text)| text.clone())
            .collect()
    }
}

struct Workspace {
    temp: TempDir,
}

impl Workspace {
    fn new() -> Self {
        Self {
            temp: TempDir::new().unwrap(),
        }
    }

    fn path(&self, name: &str) -> PathBuf {
        self.temp.path().join(name)
    }

    fn run<M: Messenger + Copy>(&self, messenger: M, command: &[&str]) -> anyhow::Result<()> {
        let config = self.path("config.toml");
        let programs = self.path("programs");
        let mut argv = vec![
            "tornio",
            "--config",
            config.to_str().unwrap(),
            "--programs",
            programs.to_str().unwrap(),
        ];
        argv.extend_from_slice(command);
        cli::run(Args::try_parse_from(argv).unwrap(), messenger)
    }

    fn save_program(&self, name: &str, text: &str) {
        let source = self.path(&format!("{name}.src"));
        std::fs::write(&source, text).unwrap();
        self.run(&Recorded::default(), &["save", name, source.to_str().unwrap()])
            .unwrap();
    }
}

fn read(path: &Path) -> String {
    std::fs::read_to_string(path).unwrap()
}

#[test]
fn test_save_list_validate() {
    let ws = Workspace::new();
    ws.save_program("shaft", PROGRAM);
    assert_eq!(read(&ws.path("programs/shaft.gcode")), PROGRAM);

    let messenger = Recorded::default();
    ws.run(&messenger, &["validate", "shaft"]).unwrap();
    assert_eq!(
        messenger.infos(),
        vec!["Program 'shaft' is valid (7 instructions)".to_string()]
    );

    ws.run(&messenger, &["list"]).unwrap();
    assert!(messenger.errors().is_empty());
}

#[test]
fn test_invalid_program_is_not_saved() {
    let ws = Workspace::new();
    let source = ws.path("bad.src");
    std::fs::write(&source, "G0 X1\nG99\n").unwrap();

    let messenger = Recorded::default();
    let result = ws.run(&messenger, &["save", "bad", source.to_str().unwrap()]);

    assert!(result.is_err());
    assert_eq!(messenger.errors().len(), 1);
    assert!(messenger.errors()[0].contains("G99"));
    assert!(!ws.path("programs/bad.gcode").exists());
}

#[test]
fn test_missing_program_reports_error() {
    let ws = Workspace::new();
    let messenger = Recorded::default();
    assert!(ws.run(&messenger, &["validate", "ghost"]).is_err());
    assert_eq!(messenger.errors().len(), 1);
}

#[test]
fn test_simulate_writes_svg() {
    let ws = Workspace::new();
    ws.save_program("shaft", PROGRAM);
    let svg = ws.path("shaft.svg");

    let messenger = Recorded::default();
    ws.run(
        &messenger,
        &["simulate", "shaft", "--svg", svg.to_str().unwrap()],
    )
    .unwrap();

    let document = read(&svg);
    assert!(document.starts_with("<svg"));
    assert!(document.contains("L 20.00 -5.00"));
    let infos = messenger.infos();
    assert!(infos.contains(&"Simulation completed".to_string()));
    assert!(infos.last().unwrap().starts_with("Toolpath written to"));
}

#[test]
fn test_simulate_mirrored() {
    let ws = Workspace::new();
    ws.save_program("shaft", PROGRAM);
    let svg = ws.path("mirror.svg");

    let messenger = Recorded::default();
    ws.run(
        &messenger,
        &["simulate", "shaft", "--mirror", "--svg", svg.to_str().unwrap()],
    )
    .unwrap();
    assert!(read(&svg).contains("L 20.00 5.00"));
}

#[test]
fn test_simulate_rejects_bad_speed() {
    let ws = Workspace::new();
    ws.save_program("shaft", PROGRAM);
    let messenger = Recorded::default();
    assert!(ws
        .run(&messenger, &["simulate", "shaft", "--realtime", "--speed", "0"])
        .is_err());
}

#[test]
fn test_translate_writes_sketch() {
    let ws = Workspace::new();
    ws.save_program("shaft", PROGRAM);
    let out = ws.path("sketches");

    let messenger = Recorded::default();
    ws.run(
        &messenger,
        &["translate", "shaft", "--out", out.to_str().unwrap()],
    )
    .unwrap();

    let sketch = read(&out.join("shaft").join("shaft.ino"));
    assert!(sketch.contains("void loop() {"));
    assert!(sketch.contains("  blink(4, 0.5, 0.5);\n"));
    assert!(sketch.contains("  turnOnPin(13, 2);\n"));
}

#[test]
fn test_upload_without_toolchain_fails() {
    let ws = Workspace::new();
    ws.save_program("shaft", PROGRAM);

    let mut config = Config::new();
    config.firmware.cli_path = ws.path("no-such-arduino-cli");
    config.firmware.sketch_dir = Some(ws.path("sketches"));
    config.save_to_file(&ws.path("config.toml")).unwrap();

    let messenger = Recorded::default();
    assert!(ws.run(&messenger, &["upload", "shaft", "--port", "/dev/null"]).is_err());
    assert_eq!(messenger.errors().len(), 1);
    assert!(ws.path("sketches/shaft/shaft.ino").exists());
}

#[test]
fn test_init_config_refuses_overwrite() {
    let ws = Workspace::new();
    let messenger = Recorded::default();
    ws.run(&messenger, &["init-config"]).unwrap();

    let written = Config::load_from_file(&ws.path("config.toml")).unwrap();
    assert_eq!(written.storage.programs_dir, ws.path("programs"));

    assert!(ws.run(&messenger, &["init-config"]).is_err());
    ws.run(&messenger, &["init-config", "--force"]).unwrap();
}

#[test]
fn test_messages_routed_to_log() {
    let ws = Workspace::new();
    ws.save_program("shaft", PROGRAM);
    let svg = ws.path("logged.svg");

    ws.run(
        TracingMessenger,
        &["--log-messages", "simulate", "shaft", "--svg", svg.to_str().unwrap()],
    )
    .unwrap();
    assert!(read(&svg).contains("L 20.00 -5.00"));
    assert!(ws.run(TracingMessenger, &["validate", "ghost"]).is_err());
}
