use axum::{extract::DefaultBodyLimit, routing::get, Router};
use std::sync::Arc;

use crate::features::pages::handlers::{
    dashboard_page, home_page, prompt_detail_page, submit_dashboard, PageState,
};
use crate::features::prompts::dtos::MAX_PREVIEW_IMAGE_BYTES;
use crate::features::prompts::services::PromptService;

/// Create the server-rendered page routes
pub fn routes(prompts: Arc<PromptService>, allowed_image_host: Option<String>) -> Router {
    let state = Arc::new(PageState {
        prompts,
        allowed_image_host,
    });

    Router::new()
        .route("/", get(home_page))
        .route("/prompts/{slug}", get(prompt_detail_page))
        .route(
            "/dashboard",
            // The dashboard form carries the same preview upload as the API
            get(dashboard_page)
                .post(submit_dashboard)
                .layer(DefaultBodyLimit::max(MAX_PREVIEW_IMAGE_BYTES + 1024 * 1024)),
        )
        .with_state(state)
}
