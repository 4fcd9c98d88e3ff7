//! Registry authentication
//!
//! Turns the short-lived authorization token issued by the registry into the
//! credentials the Docker engine expects on a push.

use crate::error::{BuildError, BuildResult};
use base64::Engine;
use bollard::auth::DockerCredentials;

/// Endpoint used to log in to Amazon ECR Public.
pub const ECR_PUBLIC_ENDPOINT: &str = "public.ecr.aws";

/// Username/password pair for a single registry endpoint
#[derive(Clone, PartialEq, Eq)]
pub struct RegistryCredentials {
    pub username: String,
    pub password: String,
    pub registry: String,
}

impl std::fmt::Debug for RegistryCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegistryCredentials")
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("registry", &self.registry)
            .finish()
    }
}

impl RegistryCredentials {
    /// Decode a Base64 encoded `username:password` token
    ///
    /// The pair is split on the first `:`, so the password itself may contain
    /// colons. A token without a colon is rejected.
    pub fn from_token(token: &str, registry: &str) -> BuildResult<Self> {
        let auth_failed = |message: String| BuildError::AuthFailed {
            registry: registry.to_string(),
            message,
        };

        let decoded = base64::engine::general_purpose::STANDARD
            .decode(token.trim())
            .map_err(|e| auth_failed(format!("Failed to decode authorization token: {}", e)))?;

        let auth_str = String::from_utf8(decoded)
            .map_err(|e| auth_failed(format!("Invalid UTF-8 in authorization token: {}", e)))?;

        let (username, password) = auth_str.split_once(':').ok_or_else(|| {
            auth_failed("Authorization token is not a `user:password` pair".to_string())
        })?;

        if username.is_empty() {
            return Err(auth_failed(
                "Authorization token has an empty user name".to_string(),
            ));
        }

        Ok(Self {
            username: username.to_string(),
            password: password.to_string(),
            registry: registry.to_string(),
        })
    }

    pub fn to_docker_credentials(&self) -> DockerCredentials {
        DockerCredentials {
            username: Some(self.username.clone()),
            password: Some(self.password.clone()),
            serveraddress: Some(self.registry.clone()),
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn encode(raw: &str) -> String {
        base64::engine::general_purpose::STANDARD.encode(raw)
    }

    #[test]
    fn test_from_token() {
        let creds = RegistryCredentials::from_token(&encode("AWS:secret"), ECR_PUBLIC_ENDPOINT)
            .unwrap();
        assert_eq!(creds.username, "AWS");
        assert_eq!(creds.password, "secret");
        assert_eq!(creds.registry, "public.ecr.aws");
    }

    #[test]
    fn test_from_token_splits_on_first_colon() {
        let creds =
            RegistryCredentials::from_token(&encode("AWS:pa:ss:word"), ECR_PUBLIC_ENDPOINT)
                .unwrap();
        assert_eq!(creds.username, "AWS");
        assert_eq!(creds.password, "pa:ss:word");
    }

    #[test]
    fn test_from_token_without_colon() {
        let result = RegistryCredentials::from_token(&encode("AWSsecret"), ECR_PUBLIC_ENDPOINT);
        assert!(matches!(result, Err(BuildError::AuthFailed { .. })));
    }

    #[test]
    fn test_from_token_not_base64() {
        let result = RegistryCredentials::from_token("not base64!!", ECR_PUBLIC_ENDPOINT);
        assert!(matches!(result, Err(BuildError::AuthFailed { .. })));
    }

    #[test]
    fn test_from_token_empty_user() {
        let result = RegistryCredentials::from_token(&encode(":secret"), ECR_PUBLIC_ENDPOINT);
        assert!(matches!(result, Err(BuildError::AuthFailed { .. })));
    }

    #[test]
    fn test_to_docker_credentials() {
        let creds = RegistryCredentials::from_token(&encode("AWS:secret"), "registry.example")
            .unwrap()
            .to_docker_credentials();
        assert_eq!(creds.username.as_deref(), Some("AWS"));
        assert_eq!(creds.password.as_deref(), Some("secret"));
        assert_eq!(creds.serveraddress.as_deref(), Some("registry.example"));
    }

    #[test]
    fn test_debug_redacts_password() {
        let creds = RegistryCredentials::from_token(&encode("AWS:secret"), ECR_PUBLIC_ENDPOINT)
            .unwrap();
        let debug = format!("{:?}", creds);
        assert!(!debug.contains("secret"));
    }
}
