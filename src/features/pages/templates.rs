//! Page templates rendered with minijinja.
//!
//! Templates are embedded at compile time so the binary serves pages
//! without a templates directory on disk. All of them share the
//! `layout.html.jinja` base via template inheritance.

use minijinja::{AutoEscape, Environment};
use serde::Serialize;
use std::sync::OnceLock;
use thiserror::Error;

use crate::core::error::AppError;

/// Global template environment
static TEMPLATE_ENV: OnceLock<Environment<'static>> = OnceLock::new();

/// Errors that can occur during page rendering
#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("Template '{0}' not found")]
    NotFound(String),

    #[error("Failed to render template: {0}")]
    RenderError(String),
}

impl From<TemplateError> for AppError {
    fn from(err: TemplateError) -> Self {
        AppError::Internal(err.to_string())
    }
}

fn init_environment() -> Environment<'static> {
    let mut env = Environment::new();

    // Template names end in .html.jinja, which the default callback does
    // not treat as HTML. Escaping must stay on for user-entered values.
    env.set_auto_escape_callback(|name| {
        if name.ends_with(".html.jinja") {
            AutoEscape::Html
        } else {
            AutoEscape::None
        }
    });

    let templates: [(&'static str, &'static str); 6] = [
        (
            "layout.html.jinja",
            include_str!("../../../templates/pages/layout.html.jinja"),
        ),
        (
            "icons.html.jinja",
            include_str!("../../../templates/pages/icons.html.jinja"),
        ),
        (
            "home.html.jinja",
            include_str!("../../../templates/pages/home.html.jinja"),
        ),
        (
            "prompt_detail.html.jinja",
            include_str!("../../../templates/pages/prompt_detail.html.jinja"),
        ),
        (
            "dashboard.html.jinja",
            include_str!("../../../templates/pages/dashboard.html.jinja"),
        ),
        (
            "not_found.html.jinja",
            include_str!("../../../templates/pages/not_found.html.jinja"),
        ),
    ];

    for (name, source) in templates {
        if let Err(e) = env.add_template(name, source) {
            tracing::warn!("Failed to load template {}: {}", name, e);
        }
    }

    env
}

/// Get the global template environment
fn get_environment() -> &'static Environment<'static> {
    TEMPLATE_ENV.get_or_init(init_environment)
}

/// Render a page template with the given context
pub fn render_page<S: Serialize>(template_name: &str, ctx: S) -> Result<String, TemplateError> {
    let env = get_environment();

    let template = env
        .get_template(template_name)
        .map_err(|_| TemplateError::NotFound(template_name.to_string()))?;

    template
        .render(ctx)
        .map_err(|e| TemplateError::RenderError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::features::pages::views::{
        CardView, DashboardView, DetailView, FormView, HomeView, ModalityBadge,
        SUBMIT_SUCCESS_MESSAGE,
    };

    #[test]
    fn test_render_home_with_no_prompts_shows_empty_state() {
        let html = render_page("home.html.jinja", HomeView { prompts: vec![] })
            .expect("home template renders");

        assert!(html.contains("The Global Prompt Architecture"));
        assert!(html.contains("No prompts verified yet"));
        assert!(html.contains("Go to Dashboard"));
    }

    #[test]
    fn test_render_home_with_cards() {
        let view = HomeView {
            prompts: vec![CardView {
                title: "Cinematic fire sequence".to_string(),
                slug: "cinematic-fire-sequence".to_string(),
                badge: ModalityBadge::for_modality("cinematic"),
                preview_text: "A slow-motion shot".to_string(),
                preview_image: Some(
                    "http://cdn.prompty.test/prompt-outputs/fire.png".to_string(),
                ),
            }],
        };

        let html = render_page("home.html.jinja", view).expect("home template renders");

        assert!(html.contains("Cinematic fire sequence"));
        assert!(html.contains("Cinematic"));
        assert!(html.contains("View Details"));
        assert!(html.contains("/prompts/cinematic-fire-sequence"));
        assert!(html.contains("http://cdn.prompty.test/prompt-outputs/fire.png"));
        assert!(!html.contains("No prompts verified yet"));
    }

    #[test]
    fn test_render_detail_with_description() {
        let view = DetailView {
            title: "Agent planner".to_string(),
            badge: ModalityBadge::for_modality("autonomous"),
            user_prompt_template: "Plan the steps for {{goal}}".to_string(),
            expected_output_description: Some("A numbered step list".to_string()),
            preview_image: None,
        };

        let html = render_page("prompt_detail.html.jinja", view).expect("detail renders");

        assert!(html.contains("Agent planner"));
        assert!(html.contains("Prompt template"));
        assert!(html.contains("Expected output"));
        assert!(html.contains("A numbered step list"));
    }

    #[test]
    fn test_user_content_is_escaped() {
        let view = DetailView {
            title: "<script>alert(1)</script>".to_string(),
            badge: ModalityBadge::for_modality("visual"),
            user_prompt_template: "safe text".to_string(),
            expected_output_description: None,
            preview_image: None,
        };

        let html = render_page("prompt_detail.html.jinja", view).expect("detail renders");

        assert!(!html.contains("<script>alert"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_render_dashboard_banners() {
        let html = render_page("dashboard.html.jinja", DashboardView::submitted())
            .expect("dashboard renders");
        assert!(html.contains("banner banner-ok"));
        assert!(html.contains(SUBMIT_SUCCESS_MESSAGE));

        let form = FormView {
            title: "My title".to_string(),
            ..FormView::default()
        };
        let html = render_page(
            "dashboard.html.jinja",
            DashboardView::rejected(form, "Error: something failed".to_string()),
        )
        .expect("dashboard renders");
        assert!(html.contains("banner banner-error"));
        assert!(html.contains("Error: something failed"));
        assert!(html.contains("My title"));
    }

    #[test]
    fn test_render_unknown_template_fails() {
        let result = render_page("missing.html.jinja", minijinja::context! {});
        assert!(matches!(result, Err(TemplateError::NotFound(_))));
    }
}
