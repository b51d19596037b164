//! Error types for the settings loader

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for settings operations
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Settings file errors
#[derive(Error, Debug)]
pub enum ConfigError {
    /// File not found. Callers usually fall back to built-in defaults.
    #[error("Configuration file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    /// Malformed line; the whole load fails
    #[error("Configuration parse error at line {line}: {reason}: `{content}`")]
    Parse {
        line: usize,
        content: String,
        reason: String,
    },

    /// Any other I/O failure while reading or writing the file
    #[error("Configuration I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value that cannot be interpreted
    #[error("Invalid configuration value for {field}: {value}")]
    InvalidValue { field: String, value: String },

    /// Refused to overwrite an existing file
    #[error("Configuration file already exists: {}", path.display())]
    AlreadyExists { path: PathBuf },
}

impl ConfigError {
    /// Build a parse error for a 1-based line number
    pub fn parse(line: usize, content: impl Into<String>, reason: impl Into<String>) -> Self {
        ConfigError::Parse {
            line,
            content: content.into(),
            reason: reason.into(),
        }
    }

    /// Map a read error, turning `NotFound` into [`ConfigError::FileNotFound`]
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::NotFound {
            ConfigError::FileNotFound { path }
        } else {
            ConfigError::Io { path, source }
        }
    }

    /// Map a write error. A missing parent directory is a plain I/O failure,
    /// never [`ConfigError::FileNotFound`].
    pub fn write_failed(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ConfigError::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the file is simply absent
    pub fn is_not_found(&self) -> bool {
        matches!(self, ConfigError::FileNotFound { .. })
    }

    /// True for syntax errors in the file
    pub fn is_parse(&self) -> bool {
        matches!(self, ConfigError::Parse { .. })
    }
}
