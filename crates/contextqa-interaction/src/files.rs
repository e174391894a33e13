//! Reading documents from disk for upload.

use contextqa_core::backend::UploadFile;
use contextqa_core::{ClientError, Result};
use std::path::Path;

/// Reads `path` into an [`UploadFile`], guessing its MIME type from the
/// extension. Unreadable paths are validation errors: nothing was sent.
pub async fn read_upload_file(path: &Path) -> Result<UploadFile> {
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .ok_or_else(|| ClientError::validation(format!("Not a file: {}", path.display())))?;

    let bytes = tokio::fs::read(path).await.map_err(|e| {
        ClientError::validation(format!("Cannot read {}: {}", path.display(), e))
    })?;

    let content_type = mime_guess::from_path(path)
        .first_or_octet_stream()
        .essence_str()
        .to_string();

    Ok(UploadFile::new(name, content_type, bytes))
}

/// Reads every path, stopping at the first unreadable one.
pub async fn read_upload_files<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<UploadFile>> {
    let mut files = Vec::with_capacity(paths.len());
    for path in paths {
        files.push(read_upload_file(path.as_ref()).await?);
    }
    Ok(files)
}
