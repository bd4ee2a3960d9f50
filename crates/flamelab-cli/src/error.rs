//! CLI error type and exit-code mapping.
//!
//! Library errors are folded into [`CliError`] at the handler boundary so
//! `main` can pick a sysexits-style exit code.

use flamelab_core::{LabError, PortError, SettingsError};
use flamelab_runtime::RuntimeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    /// Anything without a more specific category.
    #[error("{0}")]
    Core(String),

    /// Invalid command-line input.
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    /// An input file exists but its contents are unusable.
    #[error("Invalid input: {0}")]
    Data(String),

    /// An input file or directory is missing or empty.
    #[error("Missing input: {0}")]
    NoInput(String),

    #[error("IO error: {0}")]
    Io(String),

    #[error("Configuration error: {0}")]
    Config(String),

    /// A worker thread could not be started or died.
    #[error("Process error: {0}")]
    Process(String),
}

impl CliError {
    /// Map the error to an exit code.
    ///
    /// Codes follow sysexits.h where a category fits:
    /// - 1: General error
    /// - 2: Invalid arguments
    /// - 65: Bad input data (EX_DATAERR)
    /// - 66: Missing input (EX_NOINPUT)
    /// - 71: OS error (EX_OSERR)
    /// - 74: IO error (EX_IOERR)
    /// - 78: Configuration error (EX_CONFIG)
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Core(_) => 1,
            CliError::Arguments(_) => 2,
            CliError::Data(_) => 65,
            CliError::NoInput(_) => 66,
            CliError::Process(_) => 71,
            CliError::Io(_) => 74,
            CliError::Config(_) => 78,
        }
    }
}

impl From<SettingsError> for CliError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Read { .. } | SettingsError::Write { .. } => CliError::Io(err.to_string()),
            other => CliError::Config(other.to_string()),
        }
    }
}

impl From<LabError> for CliError {
    fn from(err: LabError) -> Self {
        CliError::Arguments(err.to_string())
    }
}

impl From<RuntimeError> for CliError {
    fn from(err: RuntimeError) -> Self {
        match err {
            RuntimeError::Settings(settings_err) => settings_err.into(),
            RuntimeError::Render(render_err) => CliError::Config(render_err.to_string()),
            RuntimeError::EmptySequence(_)
            | RuntimeError::ReadDir { .. }
            | RuntimeError::TraceRead { .. } => CliError::NoInput(err.to_string()),
            RuntimeError::Decode { .. }
            | RuntimeError::TraceParse { .. }
            | RuntimeError::TraceHand { .. }
            | RuntimeError::TraceOrder { .. }
            | RuntimeError::TraceFrameOverflow { .. } => CliError::Data(err.to_string()),
            RuntimeError::Encode { .. } | RuntimeError::Io(_) => CliError::Io(err.to_string()),
            RuntimeError::Spawn(_) | RuntimeError::CaptureThreadDied => {
                CliError::Process(err.to_string())
            }
            RuntimeError::Port(port_err @ (PortError::Decode { .. } | PortError::Lab(_))) => {
                CliError::Data(port_err.to_string())
            }
            RuntimeError::Port(port_err) => CliError::Core(port_err.to_string()),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn runtime_errors_pick_specific_codes() {
        let missing: CliError = RuntimeError::EmptySequence(PathBuf::from("frames")).into();
        assert_eq!(missing.exit_code(), 66);

        let ordering: CliError = RuntimeError::TraceOrder {
            path: PathBuf::from("t.jsonl"),
            line: 3,
            frame: 1,
            previous: 2,
        }
        .into();
        assert_eq!(ordering.exit_code(), 65);

        let overflow: CliError = RuntimeError::TraceFrameOverflow {
            path: PathBuf::from("t.jsonl"),
            line: 2,
            previous: u64::MAX,
        }
        .into();
        assert_eq!(overflow.exit_code(), 65);

        let died: CliError = RuntimeError::CaptureThreadDied.into();
        assert_eq!(died.exit_code(), 71);
    }

    #[test]
    fn unusable_frames_are_data_errors() {
        let bad_landmarks: CliError = RuntimeError::Port(PortError::Lab(LabError::TooFewLandmarks {
            expected: 21,
            actual: 3,
        }))
        .into();
        assert_eq!(bad_landmarks.exit_code(), 65);

        let source: CliError = RuntimeError::Port(PortError::Source("unplugged".into())).into();
        assert_eq!(source.exit_code(), 1);
    }

    #[test]
    fn invalid_settings_are_config_errors() {
        let err: CliError = RuntimeError::Settings(SettingsError::InvalidFps(0)).into();
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains("Target FPS"));
    }

    #[test]
    fn unknown_element_is_an_argument_error() {
        let err: CliError = LabError::UnknownElement("Xx".into()).into();
        assert_eq!(err.exit_code(), 2);
    }
}
