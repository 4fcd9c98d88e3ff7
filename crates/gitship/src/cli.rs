use crate::config::{Config, DEFAULT_OUTPUT, DEFAULT_TAG};
use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "gitship")]
#[command(version)]
#[command(
    about = "Clone a git repository, build its Dockerfile and push the image to ECR Public",
    long_about = None
)]
pub struct Cli {
    /// Source repository URL
    #[arg(long, env = "GITSHIP_GIT_URL")]
    pub git_url: String,

    /// Name of the public registry repository
    #[arg(long, env = "GITSHIP_REPO_NAME")]
    pub repo_name: String,

    /// Image tag
    #[arg(long, env = "GITSHIP_TAG", default_value = DEFAULT_TAG)]
    pub tag: String,

    /// File the resulting image reference is written to
    #[arg(long, env = "GITSHIP_OUTPUT", default_value = DEFAULT_OUTPUT)]
    pub output: PathBuf,

    /// Region of the ECR Public API
    #[arg(long, env = "GITSHIP_REGION", default_value = gitship_registry::DEFAULT_REGION)]
    pub region: String,

    /// Registry endpoint to authenticate the push against
    #[arg(long, env = "GITSHIP_REGISTRY", default_value = gitship_build::ECR_PUBLIC_ENDPOINT)]
    pub registry: String,

    /// Directory the temporary clone is created in
    #[arg(long, env = "GITSHIP_WORKDIR_ROOT")]
    pub workdir_root: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long)]
    pub verbose: bool,
}

impl Cli {
    pub fn into_config(self) -> Config {
        Config {
            git_url: self.git_url,
            repo_name: self.repo_name,
            tag: self.tag,
            output: self.output,
            region: self.region,
            registry: self.registry,
            workdir_root: self.workdir_root,
        }
    }
}
