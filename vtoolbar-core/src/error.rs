//! Error taxonomy shared by every toolbar operation.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ToolbarError {
    #[error("Shortcut not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("A file named {} already exists", .0.display())]
    Conflict(PathBuf),

    #[error("Could not create shortcut at {}: {message}", .path.display())]
    Creation {
        path: PathBuf,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    #[error("Invalid shortcut name: {0:?}")]
    InvalidName(String),

    #[error("Could not read {}: {message}", .path.display())]
    Deserialization { path: PathBuf, message: String },

    #[error("{message} ({})", .path.display())]
    Io {
        message: String,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ToolbarError {
    pub(crate) fn io(
        message: impl Into<String>,
        path: impl Into<PathBuf>,
        source: std::io::Error,
    ) -> Self {
        Self::Io {
            message: message.into(),
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, ToolbarError>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn io_error_keeps_source() {
        let err = ToolbarError::io(
            "Failed to copy",
            "C:\\Toolbar\\a.lnk",
            io::Error::new(io::ErrorKind::PermissionDenied, "denied"),
        );
        let source = std::error::Error::source(&err).expect("source");
        assert_eq!(source.to_string(), "denied");
        assert!(err.to_string().starts_with("Failed to copy"));
    }

    #[test]
    fn not_found_message_names_path() {
        let err = ToolbarError::NotFound(PathBuf::from("missing.lnk"));
        assert_eq!(err.to_string(), "Shortcut not found: missing.lnk");
    }
}
