//! In-memory registry
//!
//! Behaves like ECR Public (`public.ecr.aws/<alias>/<name>` URIs) without any
//! network access. Only compiled for tests or with the `testing` feature.

use crate::error::{RegistryError, Result};
use crate::provider::RegistryApi;
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Base64 of `AWS:secret`
pub const DEFAULT_TOKEN: &str = "QVdTOnNlY3JldA==";

pub struct InMemoryRegistry {
    alias: String,
    repositories: Mutex<BTreeMap<String, String>>,
    token: String,
    describe_error: Mutex<Option<RegistryError>>,
    token_error: Mutex<Option<RegistryError>>,
    create_calls: AtomicUsize,
    token_calls: AtomicUsize,
}

impl InMemoryRegistry {
    pub fn new(alias: impl Into<String>) -> Self {
        Self {
            alias: alias.into(),
            repositories: Mutex::new(BTreeMap::new()),
            token: DEFAULT_TOKEN.to_string(),
            describe_error: Mutex::new(None),
            token_error: Mutex::new(None),
            create_calls: AtomicUsize::new(0),
            token_calls: AtomicUsize::new(0),
        }
    }

    /// Pre-register a repository with an explicit URI
    pub fn with_repository(self, name: &str, uri: &str) -> Self {
        lock(&self.repositories).insert(name.to_string(), uri.to_string());
        self
    }

    /// Token returned by `authorization_token`
    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = token.into();
        self
    }

    /// Make the next `describe_repository` call fail with `error`
    pub fn fail_describe_with(self, error: RegistryError) -> Self {
        *lock(&self.describe_error) = Some(error);
        self
    }

    /// Make the next `authorization_token` call fail with `error`
    pub fn fail_token_with(self, error: RegistryError) -> Self {
        *lock(&self.token_error) = Some(error);
        self
    }

    pub fn create_calls(&self) -> usize {
        self.create_calls.load(Ordering::SeqCst)
    }

    pub fn token_calls(&self) -> usize {
        self.token_calls.load(Ordering::SeqCst)
    }

    /// Names of all repositories, sorted
    pub fn repositories(&self) -> Vec<String> {
        lock(&self.repositories).keys().cloned().collect()
    }

    fn uri_for(&self, name: &str) -> String {
        format!("public.ecr.aws/{}/{}", self.alias, name)
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl RegistryApi for InMemoryRegistry {
    fn name(&self) -> &str {
        "in-memory"
    }

    async fn describe_repository(&self, name: &str) -> Result<String> {
        if let Some(error) = lock(&self.describe_error).take() {
            return Err(error);
        }

        lock(&self.repositories)
            .get(name)
            .cloned()
            .ok_or_else(|| RegistryError::RepositoryNotFound(name.to_string()))
    }

    async fn create_repository(&self, name: &str) -> Result<String> {
        self.create_calls.fetch_add(1, Ordering::SeqCst);

        let mut repositories = lock(&self.repositories);
        if repositories.contains_key(name) {
            return Err(RegistryError::api(
                "CreateRepository",
                format!("RepositoryAlreadyExistsException: {}", name),
            ));
        }

        let uri = self.uri_for(name);
        repositories.insert(name.to_string(), uri.clone());
        Ok(uri)
    }

    async fn authorization_token(&self) -> Result<String> {
        self.token_calls.fetch_add(1, Ordering::SeqCst);

        if let Some(error) = lock(&self.token_error).take() {
            return Err(error);
        }
        Ok(self.token.clone())
    }
}
