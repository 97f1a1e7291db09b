use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, PartialEq)]
pub struct StoredImage {
    pub file_name: String,
    pub path: PathBuf,
    /// Public path under which the image is served.
    pub url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum GitOutcome {
    Disabled,
    Committed,
    CommittedAndPushed,
    CommitFailed(String),
    PushFailed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UploadReceipt {
    pub url: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub git: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warn: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl UploadReceipt {
    pub fn new(image: &StoredImage, outcome: GitOutcome) -> Self {
        let (git, warn, message) = match outcome {
            GitOutcome::Disabled => (None, None, None),
            GitOutcome::Committed => (Some("committed"), None, None),
            GitOutcome::CommittedAndPushed => (Some("committed-and-pushed"), None, None),
            GitOutcome::CommitFailed(msg) => (None, Some("git-commit-failed"), Some(msg)),
            GitOutcome::PushFailed(msg) => (Some("committed"), Some("git-push-failed"), Some(msg)),
        };
        Self {
            url: image.url.clone(),
            git,
            warn,
            message,
        }
    }
}
