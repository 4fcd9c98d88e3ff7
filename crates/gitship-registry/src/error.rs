//! Registry error types

use thiserror::Error;

/// Registry control plane errors
///
/// `RepositoryNotFound` is the only recoverable kind: the provisioner reacts
/// to it by creating the repository. Everything else is fatal.
#[derive(Error, Debug)]
pub enum RegistryError {
    #[error("Repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("Registry API error in {operation}: {message}")]
    Api { operation: String, message: String },

    #[error("Registry response of {operation} is missing {field}")]
    MissingField {
        operation: &'static str,
        field: &'static str,
    },
}

impl RegistryError {
    pub fn api(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            operation: operation.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::RepositoryNotFound(_))
    }
}

pub type Result<T> = std::result::Result<T, RegistryError>;
