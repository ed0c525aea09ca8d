use std::path::PathBuf;

use gridspace_core::LayoutValidationError;
use gridspace_layout::ConfigError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, DoctorError>;

/// Exit code used when the engine reports a failed separation.
pub const SEPARATION_FAILED_EXIT_CODE: i32 = 2;

#[derive(Debug, Error)]
pub enum DoctorError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("invalid layout: {0}")]
    Layout(#[from] LayoutValidationError),

    #[error("layout file not found: {path}")]
    MissingLayout { path: PathBuf },

    #[error("widget not found: {id}")]
    WidgetNotFound { id: String },

    #[error("invalid argument: {message}")]
    InvalidArgument { message: String },

    #[error("{message}")]
    Exit { code: i32, message: String },
}

impl DoctorError {
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Exit { code, .. } => *code,
            Self::InvalidArgument { .. } => 64,
            _ => 1,
        }
    }

    #[must_use]
    pub fn exit(code: i32, message: impl Into<String>) -> Self {
        Self::Exit {
            code,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn separation_failed(message: impl Into<String>) -> Self {
        Self::exit(SEPARATION_FAILED_EXIT_CODE, message)
    }
}
