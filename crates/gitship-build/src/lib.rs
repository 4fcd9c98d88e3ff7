//! gitship image build functionality
//!
//! This crate locates the Dockerfile of a cloned repository, builds the image
//! through the Docker Engine API and pushes it to a registry with short-lived
//! credentials.

pub mod auth;
pub mod builder;
pub mod context;
pub mod engine;
pub mod error;
pub mod locator;
pub mod progress;
pub mod pusher;
pub mod reference;

pub use auth::{ECR_PUBLIC_ENDPOINT, RegistryCredentials};
pub use builder::{BuildSpec, BuiltImage, ImageBuilder};
pub use context::ContextBuilder;
pub use engine::{ContainerEngine, DockerEngine};
pub use error::{BuildError, BuildResult};
pub use locator::DockerfileLocator;
pub use progress::BuildProgress;
pub use pusher::{ImagePusher, push_target};
pub use reference::{ImageReference, validate_tag};
