use std::io;
use std::path::{Path, PathBuf};

use chrono::Utc;
use futures_util::{Stream, StreamExt};
use tokio::fs as async_fs;
use tokio::io::AsyncWriteExt;

use crate::config::StorageConfig;
use crate::error::{AppError, Result};
use super::models::{sort_newest_first, stored_filename, StoredVideo};
use super::validation::{sanitize_requested_name, VideoValidator};

/// How many consecutive millisecond slots are tried before giving up on a
/// name that keeps colliding.
const MAX_NAME_ATTEMPTS: u32 = 16;

#[derive(Debug, Clone)]
pub struct VideoStoreConfig {
    pub upload_dir: PathBuf,
    pub accepted_content_type: String,
    pub video_extension: String,
}

impl Default for VideoStoreConfig {
    fn default() -> Self {
        Self {
            upload_dir: PathBuf::from("public/uploads"),
            accepted_content_type: "video/mp4".to_string(),
            video_extension: ".mp4".to_string(),
        }
    }
}

impl From<&StorageConfig> for VideoStoreConfig {
    fn from(storage: &StorageConfig) -> Self {
        Self {
            upload_dir: storage.upload_dir.clone(),
            accepted_content_type: storage.accepted_content_type.clone(),
            video_extension: storage.video_extension.clone(),
        }
    }
}

/// Owns the upload directory. The directory listing is the only record of
/// what has been stored.
#[derive(Debug, Clone)]
pub struct VideoStore {
    config: VideoStoreConfig,
    validator: VideoValidator,
}

impl VideoStore {
    pub fn new(config: VideoStoreConfig) -> Self {
        let validator = VideoValidator::new(&config.accepted_content_type);

        Self { config, validator }
    }

    pub fn with_upload_dir(upload_dir: impl Into<PathBuf>) -> Self {
        Self::new(VideoStoreConfig {
            upload_dir: upload_dir.into(),
            ..VideoStoreConfig::default()
        })
    }

    pub fn upload_dir(&self) -> &Path {
        &self.config.upload_dir
    }

    /// Creates the upload directory if it is missing. Safe to call repeatedly.
    pub async fn initialize(&self) -> Result<()> {
        async_fs::create_dir_all(&self.config.upload_dir).await?;
        tracing::debug!("Upload directory ready: {}", self.config.upload_dir.display());
        Ok(())
    }

    /// Streams an upload to disk under a fresh `{millis}-{original}` name.
    ///
    /// Nothing touches the disk unless the declared type is accepted and the
    /// original name is usable. A failed write removes its partial file; a
    /// broken client stream is a `BadRequest`, a disk error a `WriteFailure`.
    pub async fn accept_upload<S, B, E>(
        &self,
        original_filename: &str,
        content_type: &str,
        content: S,
    ) -> Result<StoredVideo>
    where
        S: Stream<Item = std::result::Result<B, E>>,
        B: AsRef<[u8]>,
        E: std::fmt::Display,
    {
        let original = self.validator.validate_upload(original_filename, content_type)?;

        let (filename, path, mut file) = self.create_unique(original).await?;

        match write_stream(&mut file, content).await {
            Ok(size) => {
                tracing::info!(filename = %filename, size, "Stored uploaded video");
                Ok(StoredVideo {
                    filename,
                    original_filename: original.to_string(),
                    size,
                })
            }
            Err(err) => {
                drop(file);
                if let Err(cleanup_err) = async_fs::remove_file(&path).await {
                    tracing::warn!(
                        "Failed to remove partial upload {}: {}",
                        path.display(),
                        cleanup_err
                    );
                }
                Err(err)
            }
        }
    }

    /// Stored video names, newest first. Read errors yield an empty list.
    pub async fn list_videos(&self) -> Vec<String> {
        match self.read_video_names().await {
            Ok(mut names) => {
                sort_newest_first(&mut names);
                names
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                tracing::debug!(
                    "Upload directory {} does not exist yet",
                    self.config.upload_dir.display()
                );
                Vec::new()
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to read upload directory {}: {}",
                    self.config.upload_dir.display(),
                    e
                );
                Vec::new()
            }
        }
    }

    /// Deletes a stored video. Only the final path component of
    /// `requested_name` is used, so the target is always inside the upload
    /// directory. Returns the name that was removed.
    pub async fn delete_video(&self, requested_name: &str) -> Result<String> {
        let name = sanitize_requested_name(requested_name)
            .ok_or_else(|| AppError::NotFound("Video not found".to_string()))?;
        let path = self.config.upload_dir.join(name);

        match async_fs::symlink_metadata(&path).await {
            Ok(metadata) if metadata.is_dir() => {
                return Err(AppError::NotFound("Video not found".to_string()));
            }
            Ok(_) => {}
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(AppError::NotFound("Video not found".to_string()));
            }
            Err(e) => return Err(AppError::DeletionFailure(e)),
        }

        match async_fs::remove_file(&path).await {
            Ok(()) => {
                tracing::info!(filename = %name, "Deleted video");
                Ok(name.to_string())
            }
            // Lost a race with another delete.
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(AppError::NotFound("Video not found".to_string()))
            }
            Err(e) => Err(AppError::DeletionFailure(e)),
        }
    }

    async fn read_video_names(&self) -> io::Result<Vec<String>> {
        let mut dir = async_fs::read_dir(&self.config.upload_dir).await?;
        let mut names = Vec::new();

        while let Some(entry) = dir.next_entry().await? {
            let Ok(name) = entry.file_name().into_string() else {
                continue;
            };
            if name.ends_with(&self.config.video_extension) {
                names.push(name);
            }
        }

        Ok(names)
    }

    async fn create_unique(&self, original: &str) -> Result<(String, PathBuf, async_fs::File)> {
        let mut millis = Utc::now().timestamp_millis();

        for _ in 0..MAX_NAME_ATTEMPTS {
            let filename = stored_filename(millis, original);
            let path = self.config.upload_dir.join(&filename);

            match async_fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((filename, path, file)),
                Err(e) if e.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::debug!("Stored name {} already taken, retrying", filename);
                    millis += 1;
                }
                Err(e) => return Err(AppError::WriteFailure(e)),
            }
        }

        Err(AppError::WriteFailure(io::Error::new(
            io::ErrorKind::AlreadyExists,
            format!("no free stored name for {}", original),
        )))
    }
}

async fn write_stream<S, B, E>(file: &mut async_fs::File, content: S) -> Result<u64>
where
    S: Stream<Item = std::result::Result<B, E>>,
    B: AsRef<[u8]>,
    E: std::fmt::Display,
{
    let mut content = std::pin::pin!(content);
    let mut size = 0u64;

    while let Some(chunk) = content.next().await {
        let chunk = chunk.map_err(|e| AppError::BadRequest(format!("Upload interrupted: {}", e)))?;
        let bytes = chunk.as_ref();
        file.write_all(bytes).await.map_err(AppError::WriteFailure)?;
        size += bytes.len() as u64;
    }

    file.flush().await.map_err(AppError::WriteFailure)?;
    file.sync_all().await.map_err(AppError::WriteFailure)?;

    Ok(size)
}
