use crate::domain::error::Result;
use crate::domain::upload::UploadReceipt;
use crate::infrastructure::git::GitCommitter;
use crate::infrastructure::storage::store_image;
use crate::interfaces::http::{add_log, LogEntry};

use std::path::PathBuf;
use std::sync::{Arc, Mutex};

const DEFAULT_IMAGE_NAME: &str = "image";

pub struct ImageUploadUseCase {
    images_dir: PathBuf,
    committer: GitCommitter,
    logs: Arc<Mutex<Vec<LogEntry>>>,
}

impl ImageUploadUseCase {
    pub fn new(images_dir: PathBuf, committer: GitCommitter, logs: Arc<Mutex<Vec<LogEntry>>>) -> Self {
        Self {
            images_dir,
            committer,
            logs,
        }
    }

    pub fn images_dir(&self) -> &PathBuf {
        &self.images_dir
    }

    /// Stores the image, then commits it when git commits are enabled. A git
    /// failure is reported in the receipt; the stored file is kept.
    pub async fn execute(&self, original_name: Option<&str>, bytes: &[u8]) -> Result<UploadReceipt> {
        let name = original_name
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(DEFAULT_IMAGE_NAME);

        let image = store_image(&self.images_dir, name, bytes).await?;
        add_log(
            &self.logs,
            "INFO",
            "Upload",
            &format!("Stored {} ({} bytes)", image.file_name, bytes.len()),
        );

        let outcome = self.committer.commit_image(&image).await;
        let receipt = UploadReceipt::new(&image, outcome);
        if let (Some(warn), Some(message)) = (receipt.warn, receipt.message.as_deref()) {
            add_log(&self.logs, "WARN", "Git", &format!("{}: {}", warn, message));
        }

        Ok(receipt)
    }
}
