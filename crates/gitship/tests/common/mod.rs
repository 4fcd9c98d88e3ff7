use async_trait::async_trait;
use gitship_build::{
    BuildError, BuildResult, BuildSpec, BuiltImage, ContainerEngine, ImageReference,
    RegistryCredentials, push_target,
};
use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use tempfile::TempDir;

/// A local git repository used as clone source
pub struct FixtureRepo {
    pub root: TempDir,
}

impl FixtureRepo {
    pub fn new(files: &[(&str, &str)]) -> Self {
        Self::with_symlinks(files, &[])
    }

    /// Like `new`, plus `(link, target)` symlinks committed as such
    pub fn with_symlinks(files: &[(&str, &str)], links: &[(&str, &str)]) -> Self {
        let root = tempfile::tempdir().unwrap();
        for (path, content) in files {
            let path = root.path().join(path);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }
        for (link, target) in links {
            let link = root.path().join(link);
            fs::create_dir_all(link.parent().unwrap()).unwrap();
            std::os::unix::fs::symlink(target, link).unwrap();
        }

        git(root.path(), &["init", "-q"]);
        git(root.path(), &["add", "-A"]);
        git(
            root.path(),
            &[
                "-c",
                "user.name=gitship",
                "-c",
                "user.email=gitship@example.com",
                "-c",
                "commit.gpgsign=false",
                "commit",
                "-q",
                "--allow-empty",
                "-m",
                "fixture",
            ],
        );

        Self { root }
    }

    pub fn url(&self) -> String {
        format!("file://{}", self.root.path().display())
    }
}

fn git(dir: &Path, args: &[&str]) {
    let status = Command::new("git")
        .args(args)
        .current_dir(dir)
        .status()
        .expect("git must be installed to run these tests");
    assert!(status.success(), "git {:?} failed", args);
}

#[derive(Debug, Clone)]
pub struct RecordedBuild {
    pub dockerfile: String,
    pub full_tag: String,
    pub dockerfile_content: String,
}

#[derive(Debug, Clone)]
pub struct RecordedPush {
    pub repository: String,
    pub tag: String,
    pub credentials: RegistryCredentials,
}

/// Container engine that records calls instead of talking to Docker
#[derive(Default)]
pub struct FakeEngine {
    pub builds: Mutex<Vec<RecordedBuild>>,
    pub pushes: Mutex<Vec<RecordedPush>>,
    pub fail_ping: Option<String>,
    pub fail_build: Option<String>,
    pub fail_push: Option<String>,
}

impl FakeEngine {
    pub fn new() -> Self {
        Self::default()
    }

    #[allow(dead_code)]
    pub fn unreachable(message: &str) -> Self {
        Self {
            fail_ping: Some(message.to_string()),
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn failing_build(message: &str) -> Self {
        Self {
            fail_build: Some(message.to_string()),
            ..Self::default()
        }
    }

    #[allow(dead_code)]
    pub fn failing_push(message: &str) -> Self {
        Self {
            fail_push: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn builds(&self) -> Vec<RecordedBuild> {
        self.builds.lock().unwrap().clone()
    }

    pub fn pushes(&self) -> Vec<RecordedPush> {
        self.pushes.lock().unwrap().clone()
    }
}

#[async_trait]
impl ContainerEngine for FakeEngine {
    async fn ping(&self) -> BuildResult<()> {
        match &self.fail_ping {
            Some(message) => Err(BuildError::InvalidConfig(message.clone())),
            None => Ok(()),
        }
    }

    async fn build(&self, spec: &BuildSpec) -> BuildResult<BuiltImage> {
        let dockerfile_path = spec.context().join(spec.dockerfile());
        let dockerfile_content = fs::read_to_string(&dockerfile_path)
            .map_err(|_| BuildError::DockerfileNotFound(dockerfile_path.clone()))?;

        self.builds.lock().unwrap().push(RecordedBuild {
            dockerfile: spec.dockerfile().to_string(),
            full_tag: spec.image().full_tag(),
            dockerfile_content,
        });

        if let Some(message) = &self.fail_build {
            return Err(BuildError::BuildFailed(message.clone()));
        }

        Ok(BuiltImage {
            reference: spec.image().clone(),
            id: Some("sha256:fixture".to_string()),
        })
    }

    async fn push(
        &self,
        image: &ImageReference,
        credentials: &RegistryCredentials,
    ) -> BuildResult<()> {
        let (repository, tag) = push_target(image);
        self.pushes.lock().unwrap().push(RecordedPush {
            repository,
            tag,
            credentials: credentials.clone(),
        });

        if let Some(message) = &self.fail_push {
            return Err(BuildError::PushFailed {
                message: message.clone(),
            });
        }

        Ok(())
    }
}

/// Entries left in `dir`
pub fn entries(dir: &Path) -> Vec<PathBuf> {
    fs::read_dir(dir)
        .unwrap()
        .map(|entry| entry.unwrap().path())
        .collect()
}
