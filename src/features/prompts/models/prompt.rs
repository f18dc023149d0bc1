use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a catalog prompt record.
///
/// `modality` is stored as text: the write boundary only accepts the fixed
/// set of modalities, but the read side tolerates values it does not
/// recognize (the listing badge falls back to a generic icon).
#[derive(Debug, Clone, FromRow)]
pub struct Prompt {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub modality: String,
    pub user_prompt_template: String,
    pub expected_output_description: Option<String>,
    pub preview_url: Option<String>,
    pub created_at: DateTime<Utc>,
}
