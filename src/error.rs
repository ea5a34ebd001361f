//! Error types for daggers
//!
//! All modules use `DaggersResult<T>` as their return type. Library code
//! returns errors to its caller unchanged and never logs them itself.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for daggers operations
pub type DaggersResult<T> = Result<T, DaggersError>;

/// All errors that can occur in daggers
#[derive(Error, Debug)]
pub enum DaggersError {
    // Configuration errors
    #[error("Invalid option {option}: {reason}")]
    InvalidOption { option: String, reason: String },

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    // Cache key errors
    #[error("Failed to read {path} for cache key: {source}")]
    CacheKeyRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Customization errors
    #[error("Container customization {step} failed: {reason}")]
    Customize { step: String, reason: String },

    #[error("Download failed: {url}: {reason}")]
    Download { url: String, reason: String },

    // Engine / execution errors
    #[error("Container engine not found: {engine}")]
    EngineNotFound { engine: String },

    #[error("Container command failed: {command}, exit code: {code}")]
    ContainerCommand {
        command: String,
        code: i32,
        output: String,
    },

    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Execution cancelled")]
    Cancelled,

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DaggersError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Create an option validation error
    pub fn invalid_option(option: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidOption {
            option: option.into(),
            reason: reason.into(),
        }
    }

    /// Create a customization step error
    pub fn customize(step: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Customize {
            step: step.into(),
            reason: reason.into(),
        }
    }

    /// Captured tool output attached to a failed execution
    pub fn output(&self) -> Option<&str> {
        match self {
            Self::ContainerCommand { output, .. } => Some(output.as_str()),
            _ => None,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::EngineNotFound { .. } => {
                Some("Install podman, or select another engine with --engine docker")
            }
            Self::CacheKeyRead { .. } => {
                Some("Run from the repository root, or pass --workdir pointing at it")
            }
            Self::Cancelled => Some("The run was interrupted before the container finished"),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = DaggersError::EngineNotFound {
            engine: "podman".to_string(),
        };
        assert!(err.to_string().contains("podman"));
    }

    #[test]
    fn container_command_display() {
        let err = DaggersError::ContainerCommand {
            command: "svu next".to_string(),
            code: 2,
            output: "no tags".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("svu next"));
        assert!(msg.contains("exit code: 2"));
        assert_eq!(err.output(), Some("no tags"));
    }

    #[test]
    fn cache_key_read_keeps_source() {
        use std::error::Error as _;

        let err = DaggersError::CacheKeyRead {
            path: PathBuf::from("/src/.pre-commit-config.yaml"),
            source: std::io::Error::new(std::io::ErrorKind::NotFound, "missing"),
        };
        assert!(err.to_string().contains(".pre-commit-config.yaml"));
        assert!(err.source().is_some());
    }

    #[test]
    fn error_hint() {
        let err = DaggersError::EngineNotFound {
            engine: "podman".to_string(),
        };
        assert!(err.hint().unwrap().contains("--engine"));
        assert_eq!(DaggersError::Internal("x".to_string()).hint(), None);
    }
}
