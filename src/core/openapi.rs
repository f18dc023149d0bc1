use utoipa::{Modify, OpenApi};

use crate::features::prompts::{dtos as prompts_dtos, handlers as prompts_handlers};
use crate::shared::types::{ApiResponse, Meta};

#[derive(OpenApi)]
#[openapi(
    paths(
        prompts_handlers::prompt_handler::create_prompt,
        prompts_handlers::prompt_handler::list_prompts,
        prompts_handlers::prompt_handler::get_prompt_by_slug,
    ),
    components(
        schemas(
            Meta,
            prompts_dtos::CreatePromptFormDto,
            prompts_dtos::PromptResponseDto,
            ApiResponse<prompts_dtos::PromptResponseDto>,
            ApiResponse<Vec<prompts_dtos::PromptResponseDto>>,
        )
    ),
    tags(
        (name = "prompts", description = "Prompt asset catalog (public)"),
    ),
    info(
        title = "Prompty API",
        version = "0.1.0",
        description = "API documentation for the Prompty catalog",
    )
)]
pub struct ApiDoc;

/// Modifier to override OpenAPI info from config
pub struct SwaggerInfoModifier {
    pub title: String,
    pub version: String,
    pub description: String,
}

impl Modify for SwaggerInfoModifier {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        openapi.info.title = self.title.clone();
        openapi.info.version = self.version.clone();
        openapi.info.description = Some(self.description.clone());
    }
}
