use actix_multipart::Multipart;
use futures::TryStreamExt;
use std::collections::HashMap;

use crate::domain::error::{AppError, Result};

#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub field: String,
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Vec<u8>,
}

/// A fully buffered multipart body: file parts plus plain text fields.
#[derive(Debug, Default)]
pub struct MultipartForm {
    pub files: Vec<UploadedFile>,
    pub texts: HashMap<String, String>,
}

impl MultipartForm {
    pub fn take_file(&mut self, field: &str) -> Option<UploadedFile> {
        let index = self.files.iter().position(|file| file.field == field)?;
        Some(self.files.remove(index))
    }

    pub fn text(&self, field: &str) -> Option<&str> {
        self.texts
            .get(field)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }
}

/// Buffers every part, failing once the body passes `max_bytes` in total.
pub async fn read_multipart(mut payload: Multipart, max_bytes: usize) -> Result<MultipartForm> {
    let mut form = MultipartForm::default();
    let mut total = 0usize;

    while let Some(mut field) = payload
        .try_next()
        .await
        .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let file_name = field
            .content_disposition()
            .and_then(|cd| cd.get_filename())
            .map(str::to_string);
        let content_type = field.content_type().map(|mime| mime.to_string());

        let mut bytes = Vec::new();
        while let Some(chunk) = field
            .try_next()
            .await
            .map_err(|e| AppError::ValidationError(format!("Invalid multipart body: {}", e)))?
        {
            total += chunk.len();
            if total > max_bytes {
                return Err(AppError::ValidationError(format!(
                    "Upload exceeds {} bytes",
                    max_bytes
                )));
            }
            bytes.extend_from_slice(&chunk);
        }

        match file_name {
            // An untouched file input: no name, no content.
            Some(file_name) if file_name.trim().is_empty() && bytes.is_empty() => {}
            Some(file_name) => form.files.push(UploadedFile {
                field: name,
                file_name,
                content_type,
                bytes,
            }),
            None => {
                form.texts
                    .insert(name, String::from_utf8_lossy(&bytes).into_owned());
            }
        }
    }

    Ok(form)
}
