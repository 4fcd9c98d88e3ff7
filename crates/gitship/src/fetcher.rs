//! Repository fetcher
//!
//! Shallow clones the source repository with the `git` command line tool.

use std::path::Path;
use std::process::Stdio;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to run `git`: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("`git clone` of {url} failed ({status})\nOutput:\n{output}")]
    CloneFailed {
        url: String,
        status: String,
        output: String,
    },
}

/// Clone the latest commit of `git_url` into the empty directory `dest`
///
/// The URL is handed to git as-is. On failure the captured stdout and stderr
/// of git are part of the error.
pub async fn shallow_clone(git_url: &str, dest: &Path) -> Result<(), FetchError> {
    tracing::info!("Cloning repository {}", git_url);

    let output = tokio::process::Command::new("git")
        .args(["clone", "--depth", "1", git_url])
        .arg(dest)
        .env("GIT_TERMINAL_PROMPT", "0")
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .output()
        .await
        .map_err(FetchError::Spawn)?;

    let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(&output.stderr));
    tracing::debug!("{}", combined.trim_end());

    if !output.status.success() {
        let status = match output.status.code() {
            Some(code) => format!("exit code {code}"),
            None => "terminated by signal".to_string(),
        };
        return Err(FetchError::CloneFailed {
            url: git_url.to_string(),
            status,
            output: combined,
        });
    }

    Ok(())
}
