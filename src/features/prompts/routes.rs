use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::prompts::dtos::MAX_PREVIEW_IMAGE_BYTES;
use crate::features::prompts::handlers::{create_prompt, get_prompt_by_slug, list_prompts};
use crate::features::prompts::services::PromptService;

/// Create the public JSON API routes for the prompt catalog
pub fn routes(service: Arc<PromptService>) -> Router {
    Router::new()
        .route(
            "/api/prompts",
            // Allow body size up to the preview image cap + buffer for multipart overhead
            get(list_prompts)
                .post(create_prompt)
                .layer(DefaultBodyLimit::max(MAX_PREVIEW_IMAGE_BYTES + 1024 * 1024)),
        )
        .route("/api/prompts/{slug}", get(get_prompt_by_slug))
        .with_state(service)
}
