/// Core error types for Reel.
use std::path::PathBuf;

/// A specialized Result type for Reel operations.
pub type ReelResult<T> = Result<T, ReelError>;

/// Top-level error type covering staging, encoding and configuration.
#[derive(Debug, thiserror::Error)]
pub enum ReelError {
    #[error(
        "frame is {actual_width}x{actual_height}, movie expects {expected_width}x{expected_height}"
    )]
    DimensionMismatch {
        expected_width: u32,
        expected_height: u32,
        actual_width: u32,
        actual_height: u32,
    },

    #[error("failed to stage frame {index} at {path:?}: {source}")]
    StageIo {
        index: usize,
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("encoder process {program:?} failed: {source}")]
    Encode {
        program: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("encoder exited with {}: {output}", exit_code_label(.status))]
    EncodeFailed { status: Option<i32>, output: String },

    #[error("no frames to encode")]
    NoFrames,

    #[error("movie session is closed; create a new one")]
    SessionClosed,

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("config error: {0}")]
    Config(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn exit_code_label(status: &Option<i32>) -> String {
    match status {
        Some(code) => format!("status {}", code),
        None => "no status (terminated by signal)".to_string(),
    }
}

impl ReelError {
    /// Create a dimension mismatch error.
    pub fn dimension_mismatch(expected: (u32, u32), actual: (u32, u32)) -> Self {
        ReelError::DimensionMismatch {
            expected_width: expected.0,
            expected_height: expected.1,
            actual_width: actual.0,
            actual_height: actual.1,
        }
    }

    /// Create an encode error for a process-level IO failure.
    pub fn encode(program: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReelError::Encode {
            program: program.into(),
            source,
        }
    }
}
