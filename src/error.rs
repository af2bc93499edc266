//! Error Types

use std::path::PathBuf;
use thiserror::Error;

/// Main error type
#[derive(Debug, Error)]
pub enum AtmosDecodeError {
    #[error("Input file {} is not a file", .0.display())]
    InputNotFound(PathBuf),

    #[error("No Dolby Atmos (E-AC3 or TrueHD) track found in {}", .0.display())]
    NoSupportedTrack(PathBuf),

    #[error("Source file {} must be in E-AC3 or TrueHD format", .0.display())]
    UnrecognizedFormat(PathBuf),

    #[error("{tool} failed to probe {}: {message}", .path.display())]
    ProbeFailed { tool: String, path: PathBuf, message: String },

    #[error("{tool} failed to extract stream {stream_index}: {message}")]
    ExtractFailed { tool: String, stream_index: u32, message: String },

    #[error("{failed} of {total} decode processes failed")]
    DecodeFailed { failed: usize, total: usize },

    #[error("Failed to launch {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Config error: {message}")]
    Config { message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl AtmosDecodeError {
    pub fn config<S: Into<String>>(msg: S) -> Self { Self::Config { message: msg.into() } }

    pub fn probe<S: Into<String>>(tool: &str, path: impl Into<PathBuf>, msg: S) -> Self {
        Self::ProbeFailed { tool: tool.to_string(), path: path.into(), message: msg.into() }
    }

    pub fn extract<S: Into<String>>(tool: &str, stream_index: u32, msg: S) -> Self {
        Self::ExtractFailed { tool: tool.to_string(), stream_index, message: msg.into() }
    }
}

pub type Result<T> = std::result::Result<T, AtmosDecodeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let e = AtmosDecodeError::config("bad layout");
        assert!(e.to_string().contains("Config"));

        let e = AtmosDecodeError::UnrecognizedFormat(PathBuf::from("a.bin"));
        assert_eq!(e.to_string(), "Source file a.bin must be in E-AC3 or TrueHD format");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let e: AtmosDecodeError = io.into();
        assert!(matches!(e, AtmosDecodeError::Io(_)));
    }
}
