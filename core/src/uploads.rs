//! On-disk store for uploaded zip archives

use std::path::{Path, PathBuf};

use crate::proxy::error::UploadError;

/// Directory that receives `POST /upload_zip` payloads.
///
/// Writes land in a uniquely named temporary file first and are renamed into
/// place, so two uploads of the same name never interleave. The last upload
/// to finish wins.
#[derive(Debug, Clone)]
pub struct ZipStore {
    dir: PathBuf,
}

impl ZipStore {
    /// Open the store, creating the directory if it is missing
    pub fn create(dir: impl Into<PathBuf>) -> std::io::Result<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Save `bytes` under the client-supplied name and return the final path
    pub async fn save(&self, file_name: &str, bytes: &[u8]) -> Result<PathBuf, UploadError> {
        let name = sanitize_file_name(file_name)?;
        let dest = self.dir.join(name);
        // Fixed-length temp name: the client name may already be near NAME_MAX
        let tmp = self
            .dir
            .join(format!(".{}.part", uuid::Uuid::new_v4().simple()));

        if let Err(e) = tokio::fs::write(&tmp, bytes).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &dest).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }

        tracing::info!("ZIP file saved to {}", dest.display());
        Ok(dest)
    }
}

/// Reduce a client filename to its final path component.
/// Both separators are stripped since browsers on Windows may send `C:\..\a.zip`.
pub fn sanitize_file_name(file_name: &str) -> Result<&str, UploadError> {
    let name = file_name
        .rsplit(|c| c == '/' || c == '\\')
        .next()
        .unwrap_or("")
        .trim();

    if name.is_empty() || name == "." || name == ".." {
        return Err(UploadError::InvalidFilename(file_name.to_string()));
    }
    Ok(name)
}
