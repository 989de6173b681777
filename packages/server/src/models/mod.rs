pub mod automobile;
pub mod upload;
