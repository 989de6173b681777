mod error;
mod names;
mod traits;

pub mod filesystem;

pub use error::StorageError;
pub use names::{base_name, valid_name};
pub use traits::{BoxReader, FileStore};
