pub mod use_cases;

pub use use_cases::image_upload::ImageUploadUseCase;
pub use use_cases::test_generation::TestGenerationUseCase;
pub use use_cases::text_extraction::TextExtractionUseCase;
