use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::fs;
use tokio::io::{AsyncWriteExt, BufReader};
use tracing::{debug, warn};

use super::error::StorageError;
use super::names::{random_suffix, validate_relative_path, with_suffix};
use super::traits::{BoxReader, FileStore};

/// How many suffixed names to try before giving up on a taken name.
const MAX_NAME_ATTEMPTS: usize = 100;

/// Filesystem-backed file store.
///
/// Files live at `{base_path}/{relative path}`; the relative path is what gets
/// persisted in the database and what the media route serves.
pub struct FilesystemFileStore {
    base_path: PathBuf,
    max_size: u64,
}

impl FilesystemFileStore {
    /// Create a new filesystem file store.
    pub async fn new(base_path: PathBuf, max_size: u64) -> Result<Self, StorageError> {
        fs::create_dir_all(&base_path).await?;
        Ok(Self {
            base_path,
            max_size,
        })
    }

    /// Compute the filesystem path for a stored relative path.
    fn file_path(&self, path: &str) -> Result<PathBuf, StorageError> {
        validate_relative_path(path)?;
        Ok(self.base_path.join(path))
    }

    /// Create `dir/name` exclusively, falling back to suffixed names when taken.
    async fn create_unique(
        &self,
        dir: &str,
        name: &str,
    ) -> Result<(String, PathBuf, fs::File), StorageError> {
        let mut candidate = name.to_string();

        for _ in 0..MAX_NAME_ATTEMPTS {
            let relative = format!("{dir}/{candidate}");
            let path = self.file_path(&relative)?;

            match fs::OpenOptions::new()
                .write(true)
                .create_new(true)
                .open(&path)
                .await
            {
                Ok(file) => return Ok((relative, path, file)),
                Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                    debug!(name = %candidate, "Storage name taken, retrying with suffix");
                    candidate = with_suffix(name, &random_suffix());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Err(StorageError::InvalidName(format!(
            "no free name found for '{name}' in '{dir}'"
        )))
    }
}

/// Remove a partially written file. Returns whether it was removed.
async fn discard_partial(path: &Path) -> bool {
    match fs::remove_file(path).await {
        Ok(()) => true,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "Failed to remove partial file");
            false
        }
    }
}

#[async_trait]
impl FileStore for FilesystemFileStore {
    async fn save(&self, dir: &str, name: &str, data: &[u8]) -> Result<String, StorageError> {
        if data.len() as u64 > self.max_size {
            return Err(StorageError::SizeLimitExceeded {
                actual: data.len() as u64,
                limit: self.max_size,
            });
        }

        validate_relative_path(dir)?;
        if name.contains('/') {
            return Err(StorageError::InvalidName(format!(
                "name must not contain '/': '{name}'"
            )));
        }
        fs::create_dir_all(self.base_path.join(dir)).await?;

        let (relative, path, mut file) = self.create_unique(dir, name).await?;

        let written = async {
            file.write_all(data).await?;
            file.flush().await
        }
        .await;

        if let Err(e) = written {
            drop(file);
            discard_partial(&path).await;
            return Err(e.into());
        }

        Ok(relative)
    }

    async fn open(&self, path: &str) -> Result<BoxReader, StorageError> {
        let file_path = self.file_path(path)?;
        match fs::File::open(&file_path).await {
            Ok(file) => Ok(Box::new(BufReader::new(file))),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(path.into())),
            Err(e) => Err(e.into()),
        }
    }

    async fn size(&self, path: &str) -> Result<u64, StorageError> {
        let file_path = self.file_path(path)?;
        match fs::metadata(&file_path).await {
            Ok(meta) => Ok(meta.len()),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(StorageError::NotFound(path.into())),
            Err(e) => Err(e.into()),
        }
    }

    async fn delete(&self, path: &str) -> Result<bool, StorageError> {
        let file_path = self.file_path(path)?;
        match fs::remove_file(&file_path).await {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
