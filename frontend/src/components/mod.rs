pub mod header;
pub mod image_upload;
pub mod processing;
pub mod results;
pub mod select_model;
pub mod utils;
