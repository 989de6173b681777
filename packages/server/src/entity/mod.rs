pub mod automobile;
pub mod part;
pub mod part_file;
