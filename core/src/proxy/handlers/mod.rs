pub mod assets;
pub mod relay;
pub mod upload;
