mod automobile;
mod upload;
