use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use crate::domain::error::{AppError, Result};
use crate::domain::upload::StoredImage;

pub const IMAGES_ROUTE: &str = "/images";

static UNSAFE_NAME_CHARS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^a-zA-Z0-9._-]").unwrap());

pub fn ensure_images_dir(images_dir: &Path) -> std::io::Result<()> {
    if !images_dir.exists() {
        fs::create_dir_all(images_dir)?;
    }
    Ok(())
}

/// `<unix-millis>-<original name with unsafe characters replaced by _>`.
pub fn stored_file_name(original_name: &str, timestamp_millis: i64) -> String {
    let safe = UNSAFE_NAME_CHARS.replace_all(original_name, "_");
    format!("{}-{}", timestamp_millis, safe)
}

pub async fn store_image(images_dir: &Path, original_name: &str, bytes: &[u8]) -> Result<StoredImage> {
    let file_name = stored_file_name(original_name, chrono::Utc::now().timestamp_millis());
    let path = images_dir.join(&file_name);
    tokio::fs::write(&path, bytes).await?;
    Ok(StoredImage {
        url: format!("{}/{}", IMAGES_ROUTE, file_name),
        file_name,
        path,
    })
}

/// Resolves a served image name to its path, refusing anything that could
/// leave the images directory.
pub fn resolve_image_path(images_dir: &Path, name: &str) -> Result<PathBuf> {
    if name.is_empty()
        || name.contains('/')
        || name.contains('\\')
        || name.contains("..")
        || name.starts_with('.')
    {
        return Err(AppError::NotFound(format!("image {}", name)));
    }
    let path = images_dir.join(name);
    if !path.is_file() {
        return Err(AppError::NotFound(format!("image {}", name)));
    }
    Ok(path)
}

pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        "bmp" => "image/bmp",
        "ico" => "image/x-icon",
        "avif" => "image/avif",
        _ => "application/octet-stream",
    }
}
