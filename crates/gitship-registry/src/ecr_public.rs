//! Amazon ECR Public provider
//!
//! Uses the AWS SDK with credentials from the default provider chain
//! (environment, shared config, instance profile, ...).

use crate::error::{RegistryError, Result};
use crate::provider::RegistryApi;
use async_trait::async_trait;
use aws_sdk_ecrpublic::Client;
use aws_sdk_ecrpublic::config::Region;
use aws_sdk_ecrpublic::error::DisplayErrorContext;

/// The ECR Public control plane is only served from this region
pub const DEFAULT_REGION: &str = "us-east-1";

pub struct EcrPublicRegistry {
    client: Client,
}

impl EcrPublicRegistry {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client for `region` from the ambient AWS configuration
    pub async fn from_env(region: &str) -> Self {
        let config = aws_config::defaults(aws_config::BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .load()
            .await;
        tracing::debug!("ECR Public client configured for region {}", region);
        Self::new(Client::new(&config))
    }
}

#[async_trait]
impl RegistryApi for EcrPublicRegistry {
    fn name(&self) -> &str {
        "ecr-public"
    }

    async fn describe_repository(&self, name: &str) -> Result<String> {
        const OPERATION: &str = "DescribeRepositories";

        let output = self
            .client
            .describe_repositories()
            .repository_names(name)
            .send()
            .await
            .map_err(|e| {
                let not_found = e
                    .as_service_error()
                    .is_some_and(|se| se.is_repository_not_found_exception());
                if not_found {
                    RegistryError::RepositoryNotFound(name.to_string())
                } else {
                    RegistryError::api(OPERATION, DisplayErrorContext(&e).to_string())
                }
            })?;

        let repository = output
            .repositories()
            .iter()
            .find(|repo| repo.repository_name() == Some(name))
            .or_else(|| output.repositories().first())
            .ok_or_else(|| RegistryError::RepositoryNotFound(name.to_string()))?;

        repository
            .repository_uri()
            .map(str::to_string)
            .ok_or(RegistryError::MissingField {
                operation: OPERATION,
                field: "repositoryUri",
            })
    }

    async fn create_repository(&self, name: &str) -> Result<String> {
        const OPERATION: &str = "CreateRepository";

        let output = self
            .client
            .create_repository()
            .repository_name(name)
            .send()
            .await
            .map_err(|e| RegistryError::api(OPERATION, DisplayErrorContext(&e).to_string()))?;

        output
            .repository()
            .and_then(|repo| repo.repository_uri())
            .map(str::to_string)
            .ok_or(RegistryError::MissingField {
                operation: OPERATION,
                field: "repository.repositoryUri",
            })
    }

    async fn authorization_token(&self) -> Result<String> {
        const OPERATION: &str = "GetAuthorizationToken";

        let output = self
            .client
            .get_authorization_token()
            .send()
            .await
            .map_err(|e| RegistryError::api(OPERATION, DisplayErrorContext(&e).to_string()))?;

        output
            .authorization_data()
            .and_then(|data| data.authorization_token())
            .map(str::to_string)
            .ok_or(RegistryError::MissingField {
                operation: OPERATION,
                field: "authorizationData.authorizationToken",
            })
    }
}
