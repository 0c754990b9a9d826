//! Structured demo errors with meaningful exit codes.
//!
//! Exit code scheme:
//! - 0:  success
//! - 2:  clap arg parse error (automatic, before our code runs)
//! - 10: graphics error (GL context, shader compile, mesh upload)
//! - 11: I/O error (shader or config file read)
//! - 12: input error (invalid config values)
//! - 13: event loop error (windowing backend failure)

use std::fmt;

use glimpse_core::{ConfigError, SourceError};

/// Errors produced by the demo binary, each mapped to a distinct exit code.
#[derive(Debug)]
pub enum DemoError {
    /// A graphics-stack error: context creation, shader build, mesh upload.
    Graphics(String),
    /// An I/O error reading a shader or config file.
    Io(String),
    /// A user input error: invalid config values.
    Input(String),
    /// The windowing event loop failed to build or run.
    EventLoop(String),
}

impl DemoError {
    /// Returns the process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            DemoError::Graphics(_) => 10,
            DemoError::Io(_) => 11,
            DemoError::Input(_) => 12,
            DemoError::EventLoop(_) => 13,
        }
    }
}

impl fmt::Display for DemoError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemoError::Graphics(msg) => write!(f, "{msg}"),
            DemoError::Io(msg) => write!(f, "{msg}"),
            DemoError::Input(msg) => write!(f, "{msg}"),
            DemoError::EventLoop(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<SourceError> for DemoError {
    fn from(e: SourceError) -> Self {
        match e {
            SourceError::Io { .. } => DemoError::Io(e.to_string()),
            SourceError::Empty { .. } => DemoError::Input(e.to_string()),
        }
    }
}

impl From<ConfigError> for DemoError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::Io { .. } => DemoError::Io(e.to_string()),
            ConfigError::Parse(_) | ConfigError::Invalid(_) => DemoError::Input(e.to_string()),
        }
    }
}

impl From<winit::error::EventLoopError> for DemoError {
    fn from(e: winit::error::EventLoopError) -> Self {
        DemoError::EventLoop(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn graphics_error_exit_code_is_10() {
        let err = DemoError::Graphics("no context".into());
        assert_eq!(err.exit_code(), 10);
    }

    #[test]
    fn io_error_exit_code_is_11() {
        let err = DemoError::Io("read failed".into());
        assert_eq!(err.exit_code(), 11);
    }

    #[test]
    fn input_error_exit_code_is_12() {
        let err = DemoError::Input("bad fov".into());
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn event_loop_error_exit_code_is_13() {
        let err = DemoError::EventLoop("no display".into());
        assert_eq!(err.exit_code(), 13);
    }

    #[test]
    fn source_io_routes_to_io() {
        let err = DemoError::from(SourceError::Io {
            path: PathBuf::from("tri.vert"),
            message: "gone".into(),
        });
        assert_eq!(err.exit_code(), 11);
        assert!(err.to_string().contains("tri.vert"));
    }

    #[test]
    fn empty_source_routes_to_input() {
        let err = DemoError::from(SourceError::Empty {
            path: PathBuf::from("tri.vert"),
        });
        assert_eq!(err.exit_code(), 12);
    }

    #[test]
    fn config_parse_routes_to_input() {
        let err = DemoError::from(ConfigError::Parse("bad json".into()));
        assert_eq!(err.exit_code(), 12);
        assert!(err.to_string().contains("bad json"));
    }

    #[test]
    fn config_io_routes_to_io() {
        let err = DemoError::from(ConfigError::Io {
            path: "demo.json".into(),
            message: "denied".into(),
        });
        assert_eq!(err.exit_code(), 11);
    }
}
