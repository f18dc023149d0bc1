//! View models handed to the page templates.
//!
//! Everything here is plain data: handlers build these structs from service
//! results and the templates render them. Display rules that need logic
//! (prompt truncation, badge lookup, preview host filtering) live here so
//! the templates stay declarative.

use reqwest::Url;
use serde::Serialize;

use crate::features::prompts::dtos::{CreatePromptDto, Modality, PromptResponseDto};
use crate::shared::constants::{PREVIEW_ELLIPSIS, PROMPT_PREVIEW_LENGTH};

/// Banner text shown after a successful dashboard submission
pub const SUBMIT_SUCCESS_MESSAGE: &str = "Prompt added successfully.";

/// Badge shown next to a prompt's modality.
///
/// Unknown stored values fall back to the raw value with the generic
/// sparkles icon instead of failing the page.
#[derive(Debug, Clone, Serialize)]
pub struct ModalityBadge {
    pub label: String,
    pub icon: &'static str,
}

impl ModalityBadge {
    pub fn for_modality(raw: &str) -> Self {
        match Modality::parse(raw) {
            Some(modality) => Self {
                label: modality.label().to_string(),
                icon: icon_name(modality),
            },
            None => Self {
                label: raw.to_string(),
                icon: "sparkles",
            },
        }
    }
}

fn icon_name(modality: Modality) -> &'static str {
    match modality {
        Modality::Visual => "image",
        Modality::Cinematic => "film",
        Modality::Logic => "code",
        Modality::Autonomous => "sparkles",
    }
}

/// Shorten a prompt template for the catalog card.
///
/// Trims surrounding whitespace, keeps texts up to
/// [`PROMPT_PREVIEW_LENGTH`] characters unchanged, otherwise cuts at that
/// length, drops trailing whitespace and appends an ellipsis.
pub fn shorten_prompt(text: &str) -> String {
    let trimmed = text.trim();
    if trimmed.chars().count() <= PROMPT_PREVIEW_LENGTH {
        return trimmed.to_string();
    }

    let cut: String = trimmed.chars().take(PROMPT_PREVIEW_LENGTH).collect();
    format!("{}{}", cut.trim_end(), PREVIEW_ELLIPSIS)
}

/// Decide whether a stored preview URL may be embedded in a page.
///
/// Only URLs whose host matches the public storage endpoint's host are
/// rendered. Anything else (foreign hosts, relative paths, unparseable
/// values) is silently dropped and the page renders without an image.
pub fn preview_url_for_display(url: Option<&str>, allowed_host: Option<&str>) -> Option<String> {
    let url = url?.trim();
    if url.is_empty() {
        return None;
    }
    let allowed_host = allowed_host?;
    let parsed = Url::parse(url).ok()?;

    if parsed.host_str() == Some(allowed_host) {
        Some(url.to_string())
    } else {
        None
    }
}

/// One prompt card on the catalog page
#[derive(Debug, Clone, Serialize)]
pub struct CardView {
    pub title: String,
    pub slug: String,
    pub badge: ModalityBadge,
    pub preview_text: String,
    pub preview_image: Option<String>,
}

impl CardView {
    pub fn from_dto(dto: &PromptResponseDto, allowed_host: Option<&str>) -> Self {
        Self {
            title: dto.title.clone(),
            slug: dto.slug.clone(),
            badge: ModalityBadge::for_modality(&dto.modality),
            preview_text: shorten_prompt(&dto.user_prompt_template),
            preview_image: preview_url_for_display(dto.preview_url.as_deref(), allowed_host),
        }
    }
}

/// Catalog page context
#[derive(Debug, Serialize)]
pub struct HomeView {
    pub prompts: Vec<CardView>,
}

/// Prompt detail page context
#[derive(Debug, Serialize)]
pub struct DetailView {
    pub title: String,
    pub badge: ModalityBadge,
    pub user_prompt_template: String,
    pub expected_output_description: Option<String>,
    pub preview_image: Option<String>,
}

impl DetailView {
    pub fn from_dto(dto: &PromptResponseDto, allowed_host: Option<&str>) -> Self {
        Self {
            title: dto.title.clone(),
            badge: ModalityBadge::for_modality(&dto.modality),
            user_prompt_template: dto.user_prompt_template.clone(),
            expected_output_description: dto.expected_output_description.clone(),
            preview_image: preview_url_for_display(dto.preview_url.as_deref(), allowed_host),
        }
    }
}

/// Status banner above the dashboard form
#[derive(Debug, Clone, Serialize)]
pub struct BannerView {
    pub text: String,
    pub is_error: bool,
}

impl BannerView {
    /// Error banners carry an `Error` prefix; anything else renders as
    /// a success message.
    pub fn new(text: String) -> Self {
        let is_error = text.starts_with("Error");
        Self { text, is_error }
    }
}

/// Form field values echoed back into the dashboard form
#[derive(Debug, Clone, Default, Serialize)]
pub struct FormView {
    pub title: String,
    pub modality: String,
    pub user_prompt_template: String,
    pub expected_output_description: String,
}

impl FormView {
    pub fn from_dto(dto: &CreatePromptDto) -> Self {
        Self {
            title: dto.title.clone(),
            modality: dto.modality.clone(),
            user_prompt_template: dto.user_prompt_template.clone(),
            expected_output_description: dto
                .expected_output_description
                .clone()
                .unwrap_or_default(),
        }
    }
}

/// One `<option>` in the category select
#[derive(Debug, Clone, Serialize)]
pub struct ModalityOption {
    pub value: &'static str,
    pub label: &'static str,
    pub selected: bool,
}

pub fn modality_options(selected: &str) -> Vec<ModalityOption> {
    Modality::ALL
        .iter()
        .map(|modality| ModalityOption {
            value: modality.as_str(),
            label: modality.label(),
            selected: modality.as_str() == selected,
        })
        .collect()
}

/// Dashboard page context
#[derive(Debug, Serialize)]
pub struct DashboardView {
    pub banner: Option<BannerView>,
    pub form: FormView,
    pub modalities: Vec<ModalityOption>,
}

impl DashboardView {
    /// Fresh form with no banner
    pub fn blank() -> Self {
        Self::with_form(FormView::default(), None)
    }

    /// Cleared form after a successful submission
    pub fn submitted() -> Self {
        Self::with_form(
            FormView::default(),
            Some(BannerView::new(SUBMIT_SUCCESS_MESSAGE.to_string())),
        )
    }

    /// Failed submission: entered values stay in the form
    pub fn rejected(form: FormView, banner_text: String) -> Self {
        Self::with_form(form, Some(BannerView::new(banner_text)))
    }

    fn with_form(form: FormView, banner: Option<BannerView>) -> Self {
        let modalities = modality_options(&form.modality);
        Self {
            banner,
            form,
            modalities,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shorten_prompt_keeps_short_text() {
        assert_eq!(shorten_prompt("  a short prompt  "), "a short prompt");
    }

    #[test]
    fn test_shorten_prompt_keeps_exact_limit() {
        let text = "x".repeat(PROMPT_PREVIEW_LENGTH);
        assert_eq!(shorten_prompt(&text), text);
    }

    #[test]
    fn test_shorten_prompt_truncates_long_text() {
        let text = "y".repeat(PROMPT_PREVIEW_LENGTH + 30);
        let shortened = shorten_prompt(&text);

        assert_eq!(
            shortened,
            format!("{}{}", "y".repeat(PROMPT_PREVIEW_LENGTH), PREVIEW_ELLIPSIS)
        );
    }

    #[test]
    fn test_shorten_prompt_drops_whitespace_before_ellipsis() {
        let mut text = "z".repeat(PROMPT_PREVIEW_LENGTH - 1);
        text.push(' ');
        text.push_str(&"z".repeat(50));

        let shortened = shorten_prompt(&text);
        assert!(!shortened.contains(' '));
        assert!(shortened.ends_with(PREVIEW_ELLIPSIS));
    }

    #[test]
    fn test_badge_for_known_modality() {
        let badge = ModalityBadge::for_modality("cinematic");
        assert_eq!(badge.label, "Cinematic");
        assert_eq!(badge.icon, "film");
    }

    #[test]
    fn test_badge_falls_back_for_unknown_modality() {
        let badge = ModalityBadge::for_modality("sculpture");
        assert_eq!(badge.label, "sculpture");
        assert_eq!(badge.icon, "sparkles");
    }

    #[test]
    fn test_preview_url_allowed_host_passes() {
        let url = preview_url_for_display(
            Some("http://cdn.prompty.test:9000/prompt-outputs/a.png"),
            Some("cdn.prompty.test"),
        );
        assert_eq!(
            url.as_deref(),
            Some("http://cdn.prompty.test:9000/prompt-outputs/a.png")
        );
    }

    #[test]
    fn test_preview_url_foreign_host_dropped() {
        let url = preview_url_for_display(
            Some("http://evil.example.com/a.png"),
            Some("cdn.prompty.test"),
        );
        assert_eq!(url, None);
    }

    #[test]
    fn test_preview_url_unparseable_dropped() {
        assert_eq!(
            preview_url_for_display(Some("not a url"), Some("cdn.prompty.test")),
            None
        );
        assert_eq!(preview_url_for_display(Some(""), Some("cdn.prompty.test")), None);
        assert_eq!(preview_url_for_display(None, Some("cdn.prompty.test")), None);
    }

    #[test]
    fn test_preview_url_requires_allowed_host() {
        assert_eq!(
            preview_url_for_display(Some("http://cdn.prompty.test/a.png"), None),
            None
        );
    }

    #[test]
    fn test_modality_options_mark_selection() {
        let options = modality_options("logic");
        assert_eq!(options.len(), 4);

        let selected: Vec<&str> = options
            .iter()
            .filter(|o| o.selected)
            .map(|o| o.value)
            .collect();
        assert_eq!(selected, vec!["logic"]);
    }

    #[test]
    fn test_banner_error_detection() {
        assert!(BannerView::new("Error: Database error".to_string()).is_error);
        assert!(!BannerView::new(SUBMIT_SUCCESS_MESSAGE.to_string()).is_error);
    }
}
