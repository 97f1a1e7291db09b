use std::path::{Path, PathBuf};
use tokio::process::Command;
use tracing::{info, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::upload::{GitOutcome, StoredImage};
use crate::infrastructure::config::GitConfig;

/// Stages and commits stored images in the repository at `repo_dir`.
#[derive(Debug, Clone)]
pub struct GitCommitter {
    repo_dir: PathBuf,
    config: GitConfig,
}

impl GitCommitter {
    pub fn new(repo_dir: PathBuf, config: GitConfig) -> Self {
        Self { repo_dir, config }
    }

    pub async fn commit_image(&self, image: &StoredImage) -> GitOutcome {
        if !self.config.enable_commit {
            return GitOutcome::Disabled;
        }

        let message = format!("{}: {}", self.config.commit_message, image.file_name);
        let path = image.path.to_string_lossy().to_string();

        if let Err(err) = self.add_and_commit(&path, &message).await {
            warn!(error = %err, file = %image.file_name, "Git commit failed");
            return GitOutcome::CommitFailed(err.to_string());
        }
        info!(file = %image.file_name, "Committed uploaded image");

        if !self.config.enable_push {
            return GitOutcome::Committed;
        }

        match run_git(&self.repo_dir, &["push"]).await {
            Ok(_) => GitOutcome::CommittedAndPushed,
            Err(err) => {
                warn!(error = %err, "Git push failed");
                GitOutcome::PushFailed(err.to_string())
            }
        }
    }

    async fn add_and_commit(&self, path: &str, message: &str) -> Result<()> {
        run_git(&self.repo_dir, &["add", "--", path]).await?;
        run_git(&self.repo_dir, &["commit", "-m", message, "--", path]).await?;
        Ok(())
    }
}

async fn run_git(dir: &Path, args: &[&str]) -> Result<String> {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .await
        .map_err(|e| AppError::GitError(format!("failed to run git {}: {}", args[0], e)))?;

    if output.status.success() {
        return Ok(String::from_utf8_lossy(&output.stdout).trim().to_string());
    }

    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    let detail = if stderr.is_empty() {
        output.status.to_string()
    } else {
        stderr
    };
    Err(AppError::GitError(format!("git {} failed: {}", args[0], detail)))
}
