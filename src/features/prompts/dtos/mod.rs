pub mod prompt_dto;

pub use prompt_dto::{
    is_image_content_type, CreatePromptDto, CreatePromptFormDto, Modality, PreviewImage,
    PromptResponseDto, MAX_PREVIEW_IMAGE_BYTES,
};
