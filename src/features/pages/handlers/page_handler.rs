use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::sync::Arc;
use tracing::{error, warn};
use validator::Validate;

use crate::core::error::{AppError, Result};
use crate::features::pages::templates::render_page;
use crate::features::pages::views::{CardView, DashboardView, DetailView, FormView, HomeView};
use crate::features::prompts::dtos::{CreatePromptDto, PreviewImage};
use crate::features::prompts::handlers::prompt_handler::read_prompt_form;
use crate::features::prompts::services::PromptService;

/// Shared state for the page handlers
pub struct PageState {
    pub prompts: Arc<PromptService>,
    /// Host of the public storage endpoint. Preview images from any other
    /// host are not embedded.
    pub allowed_image_host: Option<String>,
}

/// Public catalog page.
///
/// A failing listing degrades to the empty catalog instead of an error
/// page; the failure is only logged.
pub async fn home_page(State(state): State<Arc<PageState>>) -> Result<Html<String>> {
    let prompts = match state.prompts.list_all().await {
        Ok(prompts) => prompts,
        Err(e) => {
            error!("Failed to load prompts for catalog page: {:?}", e);
            Vec::new()
        }
    };

    let view = HomeView {
        prompts: prompts
            .iter()
            .map(|dto| CardView::from_dto(dto, state.allowed_image_host.as_deref()))
            .collect(),
    };

    let html = render_page("home.html.jinja", view)?;
    Ok(Html(html))
}

/// Prompt detail page.
///
/// Unknown slugs and database failures both render the not-found page;
/// a failure is logged but never surfaced as a 500 here.
pub async fn prompt_detail_page(
    State(state): State<Arc<PageState>>,
    Path(slug): Path<String>,
) -> Result<Response> {
    match state.prompts.find_by_slug(&slug).await {
        Ok(Some(prompt)) => {
            let view = DetailView::from_dto(&prompt, state.allowed_image_host.as_deref());
            let html = render_page("prompt_detail.html.jinja", view)?;
            Ok(Html(html).into_response())
        }
        Ok(None) => not_found_page(),
        Err(e) => {
            error!("Failed to load prompt '{}' for detail page: {:?}", slug, e);
            not_found_page()
        }
    }
}

fn not_found_page() -> Result<Response> {
    let html = render_page("not_found.html.jinja", minijinja::context! {})?;
    Ok((StatusCode::NOT_FOUND, Html(html)).into_response())
}

/// Creator dashboard with a blank submission form
pub async fn dashboard_page() -> Result<Html<String>> {
    let html = render_page("dashboard.html.jinja", DashboardView::blank())?;
    Ok(Html(html))
}

/// Handle a dashboard form submission.
///
/// Always answers 200 with the dashboard re-rendered: a success clears the
/// form and shows a confirmation banner, any failure keeps the entered
/// values and shows an `Error:` banner with the failing call's message.
pub async fn submit_dashboard(
    State(state): State<Arc<PageState>>,
    multipart: Multipart,
) -> Result<Html<String>> {
    let view = match read_prompt_form(multipart).await {
        Ok((dto, preview)) => {
            let form = FormView::from_dto(&dto);
            match submit(&state.prompts, dto, preview).await {
                Ok(()) => DashboardView::submitted(),
                Err(e) => {
                    warn!("Dashboard submission failed: {:?}", e);
                    DashboardView::rejected(form, format!("Error: {}", flow_error_message(&e)))
                }
            }
        }
        Err(e) => {
            warn!("Dashboard form rejected: {:?}", e);
            DashboardView::rejected(
                FormView::default(),
                format!("Error: {}", flow_error_message(&e)),
            )
        }
    };

    let html = render_page("dashboard.html.jinja", view)?;
    Ok(Html(html))
}

async fn submit(
    service: &PromptService,
    dto: CreatePromptDto,
    preview: Option<PreviewImage>,
) -> Result<()> {
    dto.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    service.submit(dto, preview).await?;
    Ok(())
}

/// Message for the dashboard banner.
///
/// Unlike the JSON API, which sanitizes database errors, the banner shows
/// the failing call's own message so creators can tell what went wrong.
fn flow_error_message(err: &AppError) -> String {
    match err {
        AppError::Database(e) => e.to_string(),
        AppError::NotFound(msg)
        | AppError::Validation(msg)
        | AppError::BadRequest(msg)
        | AppError::Internal(msg)
        | AppError::Conflict(msg)
        | AppError::ExternalServiceError(msg) => msg.clone(),
    }
}

#[cfg(test)]
mod tests {
    use crate::shared::test_helpers::page_router;
    use axum::http::StatusCode;
    use axum_test::multipart::{MultipartForm, Part};
    use axum_test::TestServer;

    fn server() -> TestServer {
        TestServer::new(page_router()).expect("test server")
    }

    fn filled_form() -> MultipartForm {
        MultipartForm::new()
            .add_text("title", "Neon skyline generator")
            .add_text("category", "visual")
            .add_text("prompt", "Render a {{city}} skyline at night, wet asphalt reflections")
    }

    #[tokio::test]
    async fn test_home_page_degrades_to_empty_catalog_when_database_down() {
        let response = server().get("/").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("The Global Prompt Architecture"));
        assert!(html.contains("No prompts verified yet"));
        assert!(html.contains("Be the first to add a verified prompt from the Creator Dashboard."));
        assert!(html.contains("Go to Dashboard"));
    }

    #[tokio::test]
    async fn test_dashboard_page_renders_blank_form() {
        let response = server().get("/dashboard").await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Creator Dashboard"));
        assert!(html.contains("Quick Add"));
        assert!(html.contains("Select modality"));
        assert!(html.contains("Add prompt"));
        assert!(!html.contains("Error:"));
    }

    #[tokio::test]
    async fn test_submit_database_failure_keeps_entered_values() {
        let response = server().post("/dashboard").multipart(filled_form()).await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Error:"));
        assert!(html.contains("Neon skyline generator"));
        assert!(html.contains("skyline at night"));
    }

    #[tokio::test]
    async fn test_submit_storage_failure_shows_storage_error() {
        let form = filled_form().add_part(
            "preview_image",
            Part::bytes(vec![0x89, 0x50, 0x4e, 0x47])
                .file_name("skyline.png")
                .mime_type("image/png"),
        );

        let response = server().post("/dashboard").multipart(form).await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Error: Failed to check preview"));
    }

    #[tokio::test]
    async fn test_submit_unknown_modality_shows_validation_banner() {
        let form = MultipartForm::new()
            .add_text("title", "A title")
            .add_text("category", "sculpture")
            .add_text("prompt", "some template");

        let response = server().post("/dashboard").multipart(form).await;

        response.assert_status_ok();
        let html = response.text();
        assert!(html.contains("Error:"));
        assert!(html.contains("Modality must be one of"));
    }

    #[tokio::test]
    async fn test_detail_page_unknown_slug_renders_not_found() {
        let response = server().get("/prompts/some-unknown-slug").await;

        response.assert_status(StatusCode::NOT_FOUND);
        assert!(response.text().contains("Prompt not found"));
    }
}
