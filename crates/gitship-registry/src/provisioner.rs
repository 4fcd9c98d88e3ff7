//! Create-if-absent repository provisioning

use crate::error::Result;
use crate::provider::RegistryApi;

/// Make sure the repository `name` exists and return its URI
///
/// An existing repository is returned untouched. A `RepositoryNotFound`
/// lookup triggers creation; any other lookup error is returned as-is.
pub async fn ensure_repository<R>(registry: &R, name: &str) -> Result<String>
where
    R: RegistryApi + ?Sized,
{
    match registry.describe_repository(name).await {
        Ok(uri) => {
            tracing::info!("Repository already exists: {}", uri);
            Ok(uri)
        }
        Err(e) if e.is_not_found() => {
            tracing::info!("Creating repository {} on {}", name, registry.name());
            let uri = registry.create_repository(name).await?;
            tracing::info!("Repository created: {}", uri);
            Ok(uri)
        }
        Err(e) => Err(e),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::RegistryError;
    use crate::memory::InMemoryRegistry;

    #[tokio::test]
    async fn test_creates_missing_repository() {
        let registry = InMemoryRegistry::new("alias");

        let uri = ensure_repository(&registry, "demo-app").await.unwrap();
        assert_eq!(uri, "public.ecr.aws/alias/demo-app");
        assert_eq!(registry.create_calls(), 1);
    }

    #[tokio::test]
    async fn test_is_idempotent() {
        let registry = InMemoryRegistry::new("alias");

        let first = ensure_repository(&registry, "demo-app").await.unwrap();
        let second = ensure_repository(&registry, "demo-app").await.unwrap();
        assert_eq!(first, second);
        assert_eq!(registry.create_calls(), 1);
        assert_eq!(registry.repositories(), vec!["demo-app".to_string()]);
    }

    #[tokio::test]
    async fn test_reuses_existing_repository() {
        let registry = InMemoryRegistry::new("alias")
            .with_repository("demo-app", "public.ecr.aws/other/demo-app");

        let uri = ensure_repository(&registry, "demo-app").await.unwrap();
        assert_eq!(uri, "public.ecr.aws/other/demo-app");
        assert_eq!(registry.create_calls(), 0);
    }

    #[tokio::test]
    async fn test_propagates_other_errors() {
        let registry = InMemoryRegistry::new("alias")
            .fail_describe_with(RegistryError::api("DescribeRepositories", "AccessDenied"));

        let err = ensure_repository(&registry, "demo-app").await.unwrap_err();
        match err {
            RegistryError::Api { operation, message } => {
                assert_eq!(operation, "DescribeRepositories");
                assert_eq!(message, "AccessDenied");
            }
            other => panic!("Expected Api error, got {other:?}"),
        }
        assert_eq!(registry.create_calls(), 0);
    }
}
