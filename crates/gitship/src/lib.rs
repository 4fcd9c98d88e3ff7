//! gitship
//!
//! Clones a git repository, builds the first Dockerfile found in it, makes
//! sure the destination ECR Public repository exists, pushes the image and
//! records the pushed reference in a JSON file.

pub mod cli;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod logging;
pub mod output;
pub mod workdir;
pub mod workflow;

pub use config::Config;
pub use error::{Result, WorkflowError};
pub use output::ImageRecord;
pub use workflow::Workflow;
