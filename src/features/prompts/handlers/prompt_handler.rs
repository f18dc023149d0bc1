use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use std::sync::Arc;
use tracing::debug;
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::prompts::dtos::{
    is_image_content_type, CreatePromptDto, CreatePromptFormDto, PreviewImage, PromptResponseDto,
    MAX_PREVIEW_IMAGE_BYTES,
};
use crate::features::prompts::services::PromptService;
use crate::shared::types::{ApiResponse, Meta};

/// Collect the submission form from a multipart body.
///
/// Text fields: `title`, `category`, `prompt`, `output`. File field:
/// `preview_image`. Unknown fields are ignored; an empty file part (the
/// browser sends one when no file was chosen) counts as no image. Missing
/// text fields surface through DTO validation rather than here.
pub(crate) async fn read_prompt_form(
    mut multipart: Multipart,
) -> Result<(CreatePromptDto, Option<PreviewImage>)> {
    let mut title = String::new();
    let mut modality = String::new();
    let mut user_prompt_template = String::new();
    let mut expected_output_description: Option<String> = None;
    let mut preview: Option<PreviewImage> = None;

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read multipart data: {}", e))
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "title" => {
                title = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read title field: {}", e))
                })?;
            }
            "category" => {
                modality = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read category field: {}", e))
                })?;
            }
            "prompt" => {
                user_prompt_template = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read prompt field: {}", e))
                })?;
            }
            "output" => {
                let text = field.text().await.map_err(|e| {
                    AppError::BadRequest(format!("Failed to read output field: {}", e))
                })?;
                if !text.is_empty() {
                    expected_output_description = Some(text);
                }
            }
            "preview_image" => {
                let content_type = field
                    .content_type()
                    .map(|s| s.to_string())
                    .unwrap_or_else(|| "application/octet-stream".to_string());
                let file_name = field.file_name().unwrap_or("").to_string();

                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read preview image bytes: {}", e);
                    AppError::BadRequest(format!("Failed to read preview image: {}", e))
                })?;

                // No file selected
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }

                if !is_image_content_type(&content_type) {
                    return Err(AppError::BadRequest(format!(
                        "Preview must be an image file, got '{}'",
                        content_type
                    )));
                }

                if data.len() > MAX_PREVIEW_IMAGE_BYTES {
                    return Err(AppError::BadRequest(format!(
                        "Preview image too large. Maximum size is {} bytes ({} MB)",
                        MAX_PREVIEW_IMAGE_BYTES,
                        MAX_PREVIEW_IMAGE_BYTES / 1024 / 1024
                    )));
                }

                preview = Some(PreviewImage {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    Ok((
        CreatePromptDto {
            title,
            modality,
            user_prompt_template,
            expected_output_description,
        },
        preview,
    ))
}

/// Submit a new prompt asset
///
/// Accepts multipart/form-data. When `preview_image` is present it is
/// uploaded to object storage first; an upload failure aborts the
/// submission before anything is written to the database.
#[utoipa::path(
    post,
    path = "/api/prompts",
    tag = "prompts",
    request_body(
        content = CreatePromptFormDto,
        content_type = "multipart/form-data",
        description = "Prompt submission form with an optional preview image",
    ),
    responses(
        (status = 201, description = "Prompt created successfully", body = ApiResponse<PromptResponseDto>),
        (status = 400, description = "Validation error or invalid upload"),
        (status = 409, description = "Preview image key already exists"),
        (status = 502, description = "Object storage unavailable")
    )
)]
pub async fn create_prompt(
    State(service): State<Arc<PromptService>>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<PromptResponseDto>>)> {
    let (dto, preview) = read_prompt_form(multipart).await?;

    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let prompt = service.submit(dto, preview).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(Some(prompt), None, None)),
    ))
}

/// List all prompts, newest first
#[utoipa::path(
    get,
    path = "/api/prompts",
    tag = "prompts",
    responses(
        (status = 200, description = "Prompts retrieved successfully", body = ApiResponse<Vec<PromptResponseDto>>)
    )
)]
pub async fn list_prompts(
    State(service): State<Arc<PromptService>>,
) -> Result<Json<ApiResponse<Vec<PromptResponseDto>>>> {
    let prompts = service.list_all().await?;
    let total = prompts.len() as i64;

    Ok(Json(ApiResponse::success(
        Some(prompts),
        None,
        Some(Meta { total }),
    )))
}

/// Get a prompt by slug
///
/// Slugs are not unique; the newest matching record is returned.
#[utoipa::path(
    get,
    path = "/api/prompts/{slug}",
    tag = "prompts",
    params(
        ("slug" = String, Path, description = "URL slug derived from the prompt title")
    ),
    responses(
        (status = 200, description = "Prompt retrieved successfully", body = ApiResponse<PromptResponseDto>),
        (status = 404, description = "Prompt not found")
    )
)]
pub async fn get_prompt_by_slug(
    State(service): State<Arc<PromptService>>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<PromptResponseDto>>> {
    let prompt = service
        .find_by_slug(&slug)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Prompt '{}' not found", slug)))?;

    Ok(Json(ApiResponse::success(Some(prompt), None, None)))
}
