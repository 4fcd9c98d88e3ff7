use gitship_build::{BuildResult, validate_tag};
use std::path::PathBuf;

pub const DEFAULT_TAG: &str = "latest";
pub const DEFAULT_OUTPUT: &str = "output.json";

/// Settings of a single run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Source repository, passed to `git clone` unchanged
    pub git_url: String,
    /// Destination repository name in the registry
    pub repo_name: String,
    pub tag: String,
    /// Where the `{"image": ...}` record is written
    pub output: PathBuf,
    /// Region of the registry control plane API
    pub region: String,
    /// Endpoint the pushed image is authenticated against
    pub registry: String,
    /// Parent of the ephemeral working directory (system temp dir if unset)
    pub workdir_root: Option<PathBuf>,
}

impl Config {
    pub fn new(git_url: impl Into<String>, repo_name: impl Into<String>) -> Self {
        Self {
            git_url: git_url.into(),
            repo_name: repo_name.into(),
            tag: DEFAULT_TAG.to_string(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            region: gitship_registry::DEFAULT_REGION.to_string(),
            registry: gitship_build::ECR_PUBLIC_ENDPOINT.to_string(),
            workdir_root: None,
        }
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = tag.into();
        self
    }

    pub fn with_output(mut self, output: impl Into<PathBuf>) -> Self {
        self.output = output.into();
        self
    }

    pub fn with_workdir_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.workdir_root = Some(root.into());
        self
    }

    /// Checks that need no external system; run before anything is cloned
    pub fn validate(&self) -> BuildResult<()> {
        validate_tag(&self.tag)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::new("https://example.com/sample.git", "demo-app");
        assert_eq!(config.tag, "latest");
        assert_eq!(config.output, PathBuf::from("output.json"));
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.registry, "public.ecr.aws");
        assert!(config.workdir_root.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_tag() {
        let config = Config::new("https://example.com/sample.git", "demo-app").with_tag("v 1");
        assert!(config.validate().is_err());
    }
}
