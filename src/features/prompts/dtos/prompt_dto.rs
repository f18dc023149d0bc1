use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use std::sync::LazyLock;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::prompts::models::Prompt;

/// Regex for the modality field. Kept in sync with [`Modality`]:
/// the write boundary rejects anything outside the fixed set.
static MODALITY_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(visual|cinematic|logic|autonomous)$").unwrap());

/// At least one non-whitespace character. Catches values that would
/// trim to nothing at insert time, which a plain length check lets
/// through.
static NON_BLANK_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\S").unwrap());

/// Fixed prompt modalities recognized by the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modality {
    Visual,
    Cinematic,
    Logic,
    Autonomous,
}

impl Modality {
    pub const ALL: [Modality; 4] = [
        Modality::Visual,
        Modality::Cinematic,
        Modality::Logic,
        Modality::Autonomous,
    ];

    /// Stored form, as written to the `modality` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Modality::Visual => "visual",
            Modality::Cinematic => "cinematic",
            Modality::Logic => "logic",
            Modality::Autonomous => "autonomous",
        }
    }

    /// Display label shown on badges and in the category select.
    pub fn label(&self) -> &'static str {
        match self {
            Modality::Visual => "Visual",
            Modality::Cinematic => "Cinematic",
            Modality::Logic => "Logic",
            Modality::Autonomous => "Autonomous",
        }
    }

    /// Parse a stored modality value. Returns `None` for values outside
    /// the fixed set so callers can pick their own fallback.
    pub fn parse(value: &str) -> Option<Modality> {
        match value {
            "visual" => Some(Modality::Visual),
            "cinematic" => Some(Modality::Cinematic),
            "logic" => Some(Modality::Logic),
            "autonomous" => Some(Modality::Autonomous),
            _ => None,
        }
    }
}

// Create request, collected from the multipart form
#[derive(Debug, Clone, Validate)]
pub struct CreatePromptDto {
    #[validate(
        length(max = 200, message = "Title must be 1-200 characters"),
        regex(path = *NON_BLANK_REGEX, message = "Title is required")
    )]
    pub title: String,

    #[validate(regex(
        path = *MODALITY_REGEX,
        message = "Modality must be one of: visual, cinematic, logic, autonomous"
    ))]
    pub modality: String,

    #[validate(regex(path = *NON_BLANK_REGEX, message = "Prompt text is required"))]
    pub user_prompt_template: String,

    pub expected_output_description: Option<String>,
}

/// An uploaded preview image, carried from the multipart form to the
/// storage client. Dropped when the submission flow ends.
#[derive(Debug, Clone)]
pub struct PreviewImage {
    pub file_name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

/// Multipart form schema for OpenAPI documentation.
/// Note: This struct is for Swagger UI documentation only.
/// The actual handler uses axum's Multipart extractor directly.
#[derive(Debug, ToSchema)]
#[allow(dead_code)]
pub struct CreatePromptFormDto {
    /// Display title; the URL slug is derived from it
    #[schema(example = "Cinematic fire sequence for Kling")]
    pub title: String,
    /// Modality: "visual", "cinematic", "logic" or "autonomous"
    #[schema(example = "cinematic")]
    pub category: String,
    /// Prompt template text, may contain {{variable}} markers
    pub prompt: String,
    /// Optional expected-output description
    pub output: Option<String>,
    /// Optional preview image (image/* content types only)
    #[schema(format = Binary, content_media_type = "application/octet-stream")]
    pub preview_image: Option<String>,
}

// Response DTO
#[derive(Debug, Serialize, ToSchema)]
pub struct PromptResponseDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub modality: String,
    pub user_prompt_template: String,
    pub expected_output_description: Option<String>,
    pub preview_url: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Prompt> for PromptResponseDto {
    fn from(p: Prompt) -> Self {
        Self {
            id: p.id,
            title: p.title,
            slug: p.slug,
            modality: p.modality,
            user_prompt_template: p.user_prompt_template,
            expected_output_description: p.expected_output_description,
            preview_url: p.preview_url,
            created_at: p.created_at,
        }
    }
}

/// Maximum preview image size in bytes (10MB)
pub const MAX_PREVIEW_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Preview uploads are restricted to image content types
pub fn is_image_content_type(content_type: &str) -> bool {
    content_type.starts_with("image/")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_dto() -> CreatePromptDto {
        CreatePromptDto {
            title: "Cinematic fire sequence for Kling".to_string(),
            modality: "cinematic".to_string(),
            user_prompt_template: "A slow-motion {{subject}} engulfed in fire".to_string(),
            expected_output_description: None,
        }
    }

    #[test]
    fn test_valid_dto_passes() {
        assert!(valid_dto().validate().is_ok());
    }

    #[test]
    fn test_empty_title_rejected() {
        let mut dto = valid_dto();
        dto.title = String::new();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_title_rejected() {
        let mut dto = valid_dto();
        dto.title = "   ".to_string();
        assert!(dto.validate().is_err(), "spaces-only title must not pass");
    }

    #[test]
    fn test_overlong_title_rejected() {
        let mut dto = valid_dto();
        dto.title = "x".repeat(201);
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_unknown_modality_rejected() {
        let mut dto = valid_dto();
        dto.modality = "sculpture".to_string();
        assert!(dto.validate().is_err());

        dto.modality = "Visual".to_string();
        assert!(dto.validate().is_err(), "stored form is lowercase");
    }

    #[test]
    fn test_every_modality_accepted() {
        for modality in Modality::ALL {
            let mut dto = valid_dto();
            dto.modality = modality.as_str().to_string();
            assert!(dto.validate().is_ok(), "{:?} rejected", modality);
        }
    }

    #[test]
    fn test_empty_template_rejected() {
        let mut dto = valid_dto();
        dto.user_prompt_template = String::new();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_blank_template_rejected() {
        let mut dto = valid_dto();
        dto.user_prompt_template = " \n\t ".to_string();
        assert!(dto.validate().is_err());
    }

    #[test]
    fn test_modality_parse_round_trip() {
        for modality in Modality::ALL {
            assert_eq!(Modality::parse(modality.as_str()), Some(modality));
        }
        assert_eq!(Modality::parse("unknown"), None);
    }

    #[test]
    fn test_image_content_types() {
        assert!(is_image_content_type("image/png"));
        assert!(is_image_content_type("image/webp"));
        assert!(!is_image_content_type("application/pdf"));
        assert!(!is_image_content_type("text/html"));
    }
}
