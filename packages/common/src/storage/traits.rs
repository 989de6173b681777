use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncReadExt};

use super::error::StorageError;

/// Type alias for a boxed async reader.
pub type BoxReader = Box<dyn AsyncRead + Unpin + Send>;

/// Named file storage addressed by relative paths such as `part_files/manual.txt`.
#[async_trait]
pub trait FileStore: Send + Sync {
    /// Store `data` as `name` inside `dir` and return the stored relative path.
    ///
    /// `name` must already be a valid storage name (see [`super::valid_name`]).
    /// When it is taken, a random suffix is inserted before the extension.
    async fn save(&self, dir: &str, name: &str, data: &[u8]) -> Result<String, StorageError>;

    /// Open a stored file as a streaming async reader.
    async fn open(&self, path: &str) -> Result<BoxReader, StorageError>;

    /// Read all bytes of a stored file.
    async fn read(&self, path: &str) -> Result<Vec<u8>, StorageError> {
        let mut reader = self.open(path).await?;
        let mut buf = Vec::new();
        reader.read_to_end(&mut buf).await?;
        Ok(buf)
    }

    /// Get the size of a stored file in bytes.
    async fn size(&self, path: &str) -> Result<u64, StorageError>;

    /// Delete a stored file.
    ///
    /// Returns `true` if the file was deleted, `false` if it did not exist.
    async fn delete(&self, path: &str) -> Result<bool, StorageError>;
}
