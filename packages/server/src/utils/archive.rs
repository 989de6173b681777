//! In-memory ZIP archives of stored files.
//!
//! Entries are stored uncompressed under their base file name. Files that
//! share a base name are written as separate entries with the same name;
//! the `zip` crate's writer refuses duplicate names, so the container is
//! assembled here directly.

use common::storage::{FileStore, StorageError, base_name};
use flate2::Crc;
use thiserror::Error;

const LOCAL_HEADER_SIGNATURE: u32 = 0x0403_4b50;
const CENTRAL_HEADER_SIGNATURE: u32 = 0x0201_4b50;
const END_OF_CENTRAL_DIR_SIGNATURE: u32 = 0x0605_4b50;

/// Version 2.0: plain stored entries.
const VERSION_NEEDED: u16 = 20;
/// Upper byte 3 = Unix, so the external attributes carry a file mode.
const VERSION_MADE_BY: u16 = (3 << 8) | VERSION_NEEDED;
/// General purpose flag bit 11: name is UTF-8.
const FLAG_UTF8_NAME: u16 = 1 << 11;
const METHOD_STORED: u16 = 0;
/// 1980-01-01 00:00:00, the MS-DOS epoch.
const DOS_TIME: u16 = 0;
const DOS_DATE: u16 = (1 << 5) | 1;
/// Regular file, mode 0644.
const EXTERNAL_ATTRIBUTES: u32 = 0o100644 << 16;

#[derive(Debug, Error)]
pub enum ArchiveError {
    #[error("Failed to read archive entry: {0}")]
    Storage(#[from] StorageError),

    #[error("Archive too large: {0}")]
    TooLarge(String),
}

/// Read every stored file in `paths`, in order, and zip them.
pub async fn create_zip(store: &dyn FileStore, paths: &[String]) -> Result<Vec<u8>, ArchiveError> {
    let mut builder = ZipBuilder::new();
    for path in paths {
        let data = store.read(path).await?;
        builder.add_file(base_name(path), &data)?;
    }
    builder.finish()
}

struct CentralEntry {
    name: String,
    crc: u32,
    size: u32,
    offset: u32,
}

/// Writes a ZIP container of stored (uncompressed) entries into memory.
pub struct ZipBuilder {
    buf: Vec<u8>,
    entries: Vec<CentralEntry>,
}

impl ZipBuilder {
    pub fn new() -> Self {
        Self {
            buf: Vec::new(),
            entries: Vec::new(),
        }
    }

    /// Append a file entry. Names are not deduplicated.
    pub fn add_file(&mut self, name: &str, data: &[u8]) -> Result<(), ArchiveError> {
        if self.entries.len() >= u16::MAX as usize {
            return Err(ArchiveError::TooLarge("more than 65535 entries".into()));
        }
        let name_len = u16::try_from(name.len())
            .map_err(|_| ArchiveError::TooLarge(format!("entry name too long: {name}")))?;
        let size = u32::try_from(data.len())
            .map_err(|_| ArchiveError::TooLarge(format!("entry '{name}' exceeds 4 GiB")))?;
        let offset = u32::try_from(self.buf.len())
            .map_err(|_| ArchiveError::TooLarge("archive exceeds 4 GiB".into()))?;

        let mut crc = Crc::new();
        crc.update(data);
        let crc = crc.sum();

        self.put_u32(LOCAL_HEADER_SIGNATURE);
        self.put_u16(VERSION_NEEDED);
        self.put_u16(name_flags(name));
        self.put_u16(METHOD_STORED);
        self.put_u16(DOS_TIME);
        self.put_u16(DOS_DATE);
        self.put_u32(crc);
        self.put_u32(size); // compressed size
        self.put_u32(size); // uncompressed size
        self.put_u16(name_len);
        self.put_u16(0); // extra field length
        self.buf.extend_from_slice(name.as_bytes());
        self.buf.extend_from_slice(data);

        self.entries.push(CentralEntry {
            name: name.to_string(),
            crc,
            size,
            offset,
        });
        Ok(())
    }

    /// Write the central directory and return the archive bytes.
    pub fn finish(mut self) -> Result<Vec<u8>, ArchiveError> {
        let central_offset = u32::try_from(self.buf.len())
            .map_err(|_| ArchiveError::TooLarge("archive exceeds 4 GiB".into()))?;

        let entries = std::mem::take(&mut self.entries);
        for entry in &entries {
            self.put_u32(CENTRAL_HEADER_SIGNATURE);
            self.put_u16(VERSION_MADE_BY);
            self.put_u16(VERSION_NEEDED);
            self.put_u16(name_flags(&entry.name));
            self.put_u16(METHOD_STORED);
            self.put_u16(DOS_TIME);
            self.put_u16(DOS_DATE);
            self.put_u32(entry.crc);
            self.put_u32(entry.size);
            self.put_u32(entry.size);
            // Length was checked in add_file.
            self.put_u16(entry.name.len() as u16);
            self.put_u16(0); // extra field length
            self.put_u16(0); // comment length
            self.put_u16(0); // disk number start
            self.put_u16(0); // internal attributes
            self.put_u32(EXTERNAL_ATTRIBUTES);
            self.put_u32(entry.offset);
            self.buf.extend_from_slice(entry.name.as_bytes());
        }

        let central_size = u32::try_from(self.buf.len() - central_offset as usize)
            .map_err(|_| ArchiveError::TooLarge("central directory exceeds 4 GiB".into()))?;
        let count = entries.len() as u16;

        self.put_u32(END_OF_CENTRAL_DIR_SIGNATURE);
        self.put_u16(0); // this disk
        self.put_u16(0); // disk with central directory
        self.put_u16(count);
        self.put_u16(count);
        self.put_u32(central_size);
        self.put_u32(central_offset);
        self.put_u16(0); // comment length

        Ok(self.buf)
    }

    fn put_u16(&mut self, value: u16) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }

    fn put_u32(&mut self, value: u32) {
        self.buf.extend_from_slice(&value.to_le_bytes());
    }
}

impl Default for ZipBuilder {
    fn default() -> Self {
        Self::new()
    }
}

fn name_flags(name: &str) -> u16 {
    if name.is_ascii() { 0 } else { FLAG_UTF8_NAME }
}
