//! Infrastructure-level errors (wraps application errors)

use std::path::Path;

use thiserror::Error;

use crate::application::ApplicationError;

/// Application errors plus failures at the process boundary.
#[derive(Error, Debug)]
pub enum InfraError {
    #[error("{0}")]
    Application(#[from] ApplicationError),

    #[error("I/O error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

impl InfraError {
    /// Create an I/O error with context.
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Failed to write a report, snapshot or config file.
    pub fn write(path: &Path, source: std::io::Error) -> Self {
        Self::io(format!("cannot write {}", path.display()), source)
    }
}

/// Result type for infrastructure layer operations.
pub type InfraResult<T> = Result<T, InfraError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn given_write_failure_when_displayed_then_names_path() {
        let err = InfraError::write(
            Path::new("out/tree.json"),
            std::io::Error::from(std::io::ErrorKind::PermissionDenied),
        );
        assert_eq!(err.to_string(), "I/O error: cannot write out/tree.json");
    }
}
