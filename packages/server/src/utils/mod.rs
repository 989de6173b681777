pub mod archive;
pub mod filename;
pub mod payload;
pub mod urls;
