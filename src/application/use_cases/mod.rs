pub mod image_upload;
pub mod test_generation;
pub mod text_extraction;
