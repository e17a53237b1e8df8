//! Sketch writing and arduino-cli invocation

use tempfile::TempDir;
use tornio_communication::{lower, ArduinoCliSink, DeploySink, SketchDirectorySink};
use tornio_core::DeployError;
use tornio_visualizer::parse_program;

fn firmware() -> tornio_communication::FirmwareSource {
    lower(&parse_program("G1 X3 Y1 Z2\n").unwrap())
}

#[test]
fn test_sketch_written_in_named_folder() {
    let temp = TempDir::new().unwrap();
    let sink = SketchDirectorySink::new(temp.path());
    let source = firmware();

    sink.deploy(&source, "profile").unwrap();

    let path = temp.path().join("profile").join("profile.ino");
    assert_eq!(std::fs::read_to_string(&path).unwrap(), source.as_str());
    assert_eq!(sink.sketch_path("profile").unwrap(), path);
}

#[test]
fn test_redeploy_overwrites_sketch() {
    let temp = TempDir::new().unwrap();
    let sink = SketchDirectorySink::new(temp.path());
    sink.deploy(&lower(&[]), "part").unwrap();
    sink.deploy(&firmware(), "part").unwrap();

    let text = std::fs::read_to_string(temp.path().join("part/part.ino")).unwrap();
    assert!(text.contains("blink(3, 1, 2);"));
}

#[test]
fn test_invalid_target_rejected() {
    let temp = TempDir::new().unwrap();
    let sink = SketchDirectorySink::new(temp.path());
    for target in ["", "  ", "..", "a/b", "a\\b"] {
        assert!(
            matches!(
                sink.deploy(&firmware(), target),
                Err(DeployError::InvalidTarget { .. })
            ),
            "{target:?}"
        );
    }
}

#[test]
fn test_missing_cli_reports_tool_not_found() {
    let temp = TempDir::new().unwrap();
    let sink = ArduinoCliSink::new(temp.path(), temp.path().join("no-such-arduino-cli"));

    let err = sink.deploy(&firmware(), "profile").unwrap_err();
    assert!(matches!(err, DeployError::ToolNotFound { .. }), "{err}");
    // The sketch is written before the tool is invoked
    assert!(temp.path().join("profile/profile.ino").is_file());
}

#[cfg(unix)]
mod fake_cli {
    use super::*;
    use std::os::unix::fs::PermissionsExt;
    use std::path::{Path, PathBuf};

    fn write_script(dir: &Path, body: &str) -> PathBuf {
        let path = dir.join("arduino-cli");
        std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[test]
    fn test_compile_then_upload_arguments() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("calls.log");
        let cli = write_script(temp.path(), &format!("echo \"$@\" >> {}", log.display()));
        let sketches = temp.path().join("sketches");

        let sink = ArduinoCliSink::new(&sketches, cli).with_port("/dev/ttyACM0");
        sink.deploy(&firmware(), "profile").unwrap();

        let calls = std::fs::read_to_string(&log).unwrap();
        let dir = sketches.join("profile");
        let lines: Vec<&str> = calls.lines().collect();
        assert_eq!(
            lines,
            vec![
                format!("compile --fqbn arduino:avr:uno {}", dir.display()),
                format!(
                    "upload -p /dev/ttyACM0 --fqbn arduino:avr:uno {}",
                    dir.display()
                ),
            ]
        );
    }

    #[test]
    fn test_compile_only_without_port() {
        let temp = TempDir::new().unwrap();
        let log = temp.path().join("calls.log");
        let cli = write_script(temp.path(), &format!("echo \"$1\" >> {}", log.display()));

        ArduinoCliSink::new(temp.path().join("sketches"), cli)
            .deploy(&firmware(), "profile")
            .unwrap();

        assert_eq!(std::fs::read_to_string(&log).unwrap(), "compile\n");
    }

    #[test]
    fn test_compile_failure_carries_stderr() {
        let temp = TempDir::new().unwrap();
        let cli = write_script(temp.path(), "echo 'profile.ino:3: error' >&2\nexit 1");

        let err = ArduinoCliSink::new(temp.path().join("sketches"), cli)
            .with_port("COM3")
            .deploy(&firmware(), "profile")
            .unwrap_err();
        match err {
            DeployError::CompileFailed { stderr } => assert_eq!(stderr, "profile.ino:3: error"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_upload_failure_names_port() {
        let temp = TempDir::new().unwrap();
        let cli = write_script(
            temp.path(),
            "if [ \"$1\" = upload ]; then echo 'port busy' >&2; exit 2; fi",
        );

        let err = ArduinoCliSink::new(temp.path().join("sketches"), cli)
            .with_port("COM3")
            .deploy(&firmware(), "profile")
            .unwrap_err();
        match err {
            DeployError::UploadFailed { target, stderr } => {
                assert_eq!(target, "COM3");
                assert_eq!(stderr, "port busy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
