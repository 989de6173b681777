pub mod automobile;
pub mod download;
pub mod upload;

mod lookup;
