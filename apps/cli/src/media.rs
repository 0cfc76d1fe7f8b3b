use std::path::Path;

use anyhow::{Context, Result};
use smart_content_core::UploadedFile;
use tokio::fs;

/// Guess a MIME type from the file extension
pub fn guess_content_type(path: &Path) -> String {
    mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string()
}

/// Read a file from disk into an upload
pub async fn load_upload(path: &Path, content_type: Option<&str>) -> Result<UploadedFile> {
    let bytes = fs::read(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;

    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string());

    let content_type = content_type
        .map(str::to_string)
        .unwrap_or_else(|| guess_content_type(path));

    Ok(UploadedFile::new(name, content_type, bytes))
}
