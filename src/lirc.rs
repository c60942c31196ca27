//! Raw codes remote definitions for lircd, and the shell-outs that get one sent.

use std::path::PathBuf;

use thiserror::Error;
use tokio::process::Command;
use tracing::{debug, info};

use crate::config::Config;
use crate::protocol::frame::Frames;
use crate::protocol::pulse::{self, Pulse};

/// Receiver timing tolerances
const EPS: u32 = 30;
const AEPS: u32 = 100;
const GAP: u32 = 34978;

/// Zero bits sent ahead of the first frame to wake the receiver
const WAKE_PULSES: usize = 5;

const INDENT: &str = "    ";


/// Every pulse of a button press: wake preamble, then the three frames.
pub fn signal(frames: &Frames) -> Vec<Pulse> {
    let mut pulses = vec![Pulse::Zero; WAKE_PULSES];
    pulses.push(Pulse::ShortGap);

    let mut frames = frames.iter().peekable();
    while let Some(frame) = frames.next() {
        pulses.push(Pulse::FrameHeader);
        pulses.extend(pulse::encode(frame));

        if frames.peek().is_some() {
            pulses.push(Pulse::LongGap);
        }
    }

    pulses.push(Pulse::Final);
    pulses
}


/// A lircd remote with a single raw signal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RemoteConfig {
    pub remote_name: String,
    pub signal_name: String,
}

impl RemoteConfig {
    pub fn new(remote_name: impl Into<String>, signal_name: impl Into<String>) -> Self {
        Self {
            remote_name: remote_name.into(),
            signal_name: signal_name.into()
        }
    }

    /// Ordered lines of the remote definition
    pub fn lines(&self, frames: &Frames) -> Vec<String> {
        fn field(name: &str, value: impl std::fmt::Display) -> String {
            format!("{INDENT}{name:<8}{value}")
        }

        let codes = format!("{INDENT}{INDENT}");

        let mut lines = vec![
            "begin remote".to_string(),
            field("name", &self.remote_name),
            field("flags", "RAW_CODES"),
            field("eps", EPS),
            field("aeps", AEPS),
            field("gap", GAP),
            format!("{INDENT}begin raw_codes"),
            format!("{codes}name {}", self.signal_name),
        ];

        lines.extend(signal(frames).into_iter().map(|pulse| format!("{codes}{pulse}")));

        lines.push(format!("{INDENT}end raw_codes"));
        lines.push("end remote".to_string());

        lines
    }

    /// Render the remote definition
    pub fn render(&self, frames: &Frames) -> String {
        let mut config = self.lines(frames).join("\n");
        config.push('\n');
        config
    }
}

impl Default for RemoteConfig {
    fn default() -> Self {
        let config = Config::default();
        Self::new(config.remote_name, config.signal_name)
    }
}

impl From<&Config> for RemoteConfig {
    fn from(config: &Config) -> Self {
        Self::new(config.remote_name.clone(), config.signal_name.clone())
    }
}


#[derive(Error, Debug)]
pub enum TransmitError {
    #[error("failed to write remote definition to {path}")]
    Write {
        path: PathBuf,
        source: std::io::Error
    },
    #[error("empty command")]
    EmptyCommand,
    #[error("failed to run `{command}`")]
    Spawn {
        command: String,
        source: std::io::Error
    },
    #[error("`{command}` failed ({status}): {stderr}")]
    CommandFailed {
        command: String,
        status: std::process::ExitStatus,
        stderr: String
    },
}


/// Hands a rendered remote definition to whatever sends it.
#[allow(async_fn_in_trait)]
pub trait Transmitter {
    async fn transmit(&self, config: &str) -> Result<(), TransmitError>;
}


/// Sends through lircd: install the definition, restart the daemon, send once.
///
/// Steps run in order and stop at the first failure, nothing is rolled back.
#[derive(Clone, Debug)]
pub struct LircTransmitter {
    staging_file: PathBuf,
    install_command: Vec<String>,
    restart_command: Vec<String>,
    send_command: Vec<String>,
}

impl LircTransmitter {
    pub fn new(config: &Config) -> Self {
        Self {
            staging_file: config.staging_file.clone(),
            install_command: config.install_command(),
            restart_command: config.restart_command(),
            send_command: config.send_command(),
        }
    }

    async fn run(command: &[String]) -> Result<(), TransmitError> {
        let [program, args @ ..] = command else {
            return Err(TransmitError::EmptyCommand)
        };

        let line = command.join(" ");
        debug!(command = %line, "running");

        let output = Command::new(program)
            .args(args)
            .output()
            .await
            .map_err(|source| TransmitError::Spawn { command: line.clone(), source })?;

        if !output.status.success() {
            return Err(TransmitError::CommandFailed {
                command: line,
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string()
            });
        }

        Ok(())
    }
}

impl Transmitter for LircTransmitter {
    async fn transmit(&self, config: &str) -> Result<(), TransmitError> {
        tokio::fs::write(&self.staging_file, config).await
            .map_err(|source| TransmitError::Write { path: self.staging_file.clone(), source })?;

        Self::run(&self.install_command).await?;
        Self::run(&self.restart_command).await?;
        Self::run(&self.send_command).await?;

        info!(staging_file = %self.staging_file.display(), "signal sent");

        Ok(())
    }
}


#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{messages::encode, state::{AcMode, ControlState, FanMode}};

    fn default_lines() -> Vec<String> {
        let frames = encode(&ControlState::default()).unwrap();
        RemoteConfig::default().lines(&frames)
    }

    #[test]
    fn test_signal_layout() {
        let frames = encode(&ControlState::default()).unwrap();
        let pulses = signal(&frames);

        // preamble + short gap + 3 headers + bits + 2 long gaps + final
        assert_eq!(pulses.len(), 5 + 1 + 3 + (8 + 8 + 19) * 8 + 2 + 1);

        assert_eq!(&pulses[..6], &[Pulse::Zero, Pulse::Zero, Pulse::Zero, Pulse::Zero, Pulse::Zero, Pulse::ShortGap]);
        assert_eq!(pulses[6], Pulse::FrameHeader);
        assert_eq!(pulses[6 + 64 + 1], Pulse::LongGap);
        assert_eq!(pulses[6 + 64 + 2], Pulse::FrameHeader);
        assert_eq!(pulses[6 + 2 * 66], Pulse::FrameHeader);
        assert_eq!(pulses.last(), Some(&Pulse::Final));
        assert_eq!(pulses.iter().filter(|p| **p == Pulse::LongGap).count(), 2);
    }

    #[test]
    fn test_header_lines() {
        let lines = default_lines();

        assert_eq!(&lines[..8], &[
            "begin remote",
            "    name    daikin-pi",
            "    flags   RAW_CODES",
            "    eps     30",
            "    aeps    100",
            "    gap     34978",
            "    begin raw_codes",
            "        name dynamic-signal",
        ]);
    }

    #[test]
    fn test_body_lines() {
        let lines = default_lines();

        assert_eq!(&lines[8..15], &[
            "        430 430",
            "        430 430",
            "        430 430",
            "        430 430",
            "        430 430",
            "        430 25000",
            "        3440 1720",
        ]);

        // first byte of frame one is 0x11, lsb first: 1 0 0 0 1 0 0 0
        assert_eq!(lines[15], "        430 1320");
        assert_eq!(lines[16], "        430 430");
        assert_eq!(lines[19], "        430 1320");

        assert_eq!(&lines[lines.len() - 3..], &["        430", "    end raw_codes", "end remote"]);
    }

    #[test]
    fn test_render() {
        let frames = encode(&ControlState::default()).unwrap();
        let config = RemoteConfig::new("lounge", "press").render(&frames);

        assert!(config.starts_with("begin remote\n    name    lounge\n"));
        assert!(config.contains("\n        name press\n"));
        assert!(config.ends_with("        430\n    end raw_codes\nend remote\n"));
        assert_eq!(config.lines().count(), 8 + 292 + 2);
    }

    #[test]
    fn test_render_matches_reference() {
        // Captured from a working deployment. It carries indentation after
        // the final newline, which render does not emit.
        let reference = include_str!("../testdata/cool_24_five.lircd.conf");

        let mut state = ControlState::new(true, 24, AcMode::Cool, FanMode::Speed5);
        state.swing_vertical = true;
        state.economy = true;
        state.comfort = true;

        let frames = encode(&state).unwrap();
        let config = RemoteConfig::default().render(&frames);

        assert_eq!(config, reference.trim_end_matches(' '));
    }

    #[tokio::test]
    async fn test_lirc_transmitter() {
        let dir = tempfile::tempdir().unwrap();
        let log = dir.path().join("sent");

        let config = Config {
            staging_file: dir.path().join("staged.conf"),
            include_dir: dir.path().join("include"),
            install_command: "cp".to_string(),
            restart_command: "true".to_string(),
            send_command: Some(format!("touch {}", log.display())),
            ..Config::default()
        };
        std::fs::create_dir(&config.include_dir).unwrap();

        let transmitter = LircTransmitter::new(&config);
        transmitter.transmit("begin remote\nend remote\n").await.unwrap();

        let installed = std::fs::read_to_string(config.include_dir.join("staged.conf")).unwrap();
        assert_eq!(installed, "begin remote\nend remote\n");
        assert!(log.exists());
    }

    #[tokio::test]
    async fn test_lirc_transmitter_failure() {
        let dir = tempfile::tempdir().unwrap();

        let config = Config {
            staging_file: dir.path().join("staged.conf"),
            include_dir: dir.path().join("include"),
            install_command: "true".to_string(),
            restart_command: "false".to_string(),
            send_command: Some("true".to_string()),
            ..Config::default()
        };

        let transmitter = LircTransmitter::new(&config);
        let err = transmitter.transmit("").await.unwrap_err();

        assert!(matches!(err, TransmitError::CommandFailed { ref command, .. } if command == "false"));
    }
}
