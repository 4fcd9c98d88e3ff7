//! gitship container registry provisioning
//!
//! Abstracts the control plane of a public container registry behind
//! [`RegistryApi`] and implements it for Amazon ECR Public.
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │               gitship workflow              │
//! └─────────────────────┬──────────────────────┘
//!                       │ ensure_repository / authorization_token
//! ┌─────────────────────▼──────────────────────┐
//! │              gitship-registry               │
//! │   trait RegistryApi { describe, create,    │
//! │                       authorization_token } │
//! └──────────┬──────────────────────┬──────────┘
//!            │                      │
//!   ┌────────▼────────┐    ┌────────▼────────┐
//!   │   ECR Public    │    │    in-memory    │
//!   │  (aws-sdk)      │    │   (tests only)  │
//!   └─────────────────┘    └─────────────────┘
//! ```

pub mod ecr_public;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod memory;
pub mod provider;
pub mod provisioner;

// Re-exports
pub use ecr_public::{DEFAULT_REGION, EcrPublicRegistry};
pub use error::{RegistryError, Result};
pub use provider::RegistryApi;
pub use provisioner::ensure_repository;
