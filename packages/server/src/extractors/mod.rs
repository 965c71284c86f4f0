pub mod json;
pub mod upload;
