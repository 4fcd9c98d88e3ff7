//! Registry provider trait definition

use crate::error::Result;
use async_trait::async_trait;

/// Control plane of a container registry
///
/// Implemented for Amazon ECR Public; tests implement it in memory.
#[async_trait]
pub trait RegistryApi: Send + Sync {
    /// Returns the provider name (e.g., "ecr-public")
    fn name(&self) -> &str;

    /// Look up a repository by name and return its URI
    ///
    /// Must fail with `RegistryError::RepositoryNotFound` when the repository
    /// does not exist.
    async fn describe_repository(&self, name: &str) -> Result<String>;

    /// Create a repository and return the URI the provider assigned to it
    async fn create_repository(&self, name: &str) -> Result<String>;

    /// Request a short-lived, Base64 encoded `user:password` token for the
    /// registry endpoint.
    async fn authorization_token(&self) -> Result<String>;
}
