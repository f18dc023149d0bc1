use chrono::Utc;
use sqlx::PgPool;
use std::sync::Arc;

use crate::core::error::{AppError, Result};
use crate::features::prompts::dtos::{CreatePromptDto, PreviewImage, PromptResponseDto};
use crate::features::prompts::models::Prompt;
use crate::modules::storage::ObjectStore;
use crate::shared::slug::slug_from_title;

/// Storage file extension taken from the uploaded file name.
/// Lowercased, stripped to ASCII alphanumerics, `jpg` when nothing usable
/// remains.
fn storage_extension(file_name: &str) -> String {
    let ext: String = file_name
        .rsplit('.')
        .next()
        .unwrap_or("")
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_lowercase();

    if ext.is_empty() {
        "jpg".to_string()
    } else {
        ext
    }
}

/// Object key for a preview image: `{slug}-{unix_millis}.{ext}`.
/// The timestamp keeps keys from repeat submissions of the same title apart;
/// collisions are rejected at upload time rather than overwritten.
fn preview_object_key(slug: &str, file_name: &str) -> String {
    format!(
        "{}-{}.{}",
        slug,
        Utc::now().timestamp_millis(),
        storage_extension(file_name)
    )
}

/// Required text columns store the trimmed value.
fn stored_text(value: &str) -> &str {
    value.trim()
}

/// The nullable description column stores NULL for empty or
/// whitespace-only input, never an empty string.
fn stored_description(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|text| !text.is_empty())
}

/// Service for the prompt catalog: one write path (submit) and two read
/// paths (listing and slug lookup). No update or delete exists.
pub struct PromptService {
    pool: PgPool,
    store: Arc<ObjectStore>,
}

impl PromptService {
    pub fn new(pool: PgPool, store: Arc<ObjectStore>) -> Self {
        Self { pool, store }
    }

    /// Submit a new prompt asset.
    ///
    /// Performs at most two sequential calls: an optional preview upload,
    /// then exactly one insert. An upload failure aborts the flow before
    /// any insert is issued.
    pub async fn submit(
        &self,
        dto: CreatePromptDto,
        preview: Option<PreviewImage>,
    ) -> Result<PromptResponseDto> {
        let slug = slug_from_title(&dto.title);

        let preview_url = match preview {
            Some(image) => {
                let key = preview_object_key(&slug, &image.file_name);
                self.store
                    .upload_new(&key, image.data, &image.content_type)
                    .await?;
                Some(self.store.public_url(&key))
            }
            None => None,
        };

        let description = stored_description(dto.expected_output_description.as_deref());

        let prompt = sqlx::query_as::<_, Prompt>(
            r#"
            INSERT INTO prompts
                (title, slug, modality, user_prompt_template, expected_output_description, preview_url)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, title, slug, modality, user_prompt_template,
                      expected_output_description, preview_url, created_at
            "#,
        )
        .bind(stored_text(&dto.title))
        .bind(&slug)
        .bind(&dto.modality)
        .bind(stored_text(&dto.user_prompt_template))
        .bind(description)
        .bind(&preview_url)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to insert prompt: {:?}", e);
            AppError::Database(e)
        })?;

        tracing::info!(
            "Prompt created: id={}, slug={}, modality={}, preview={}",
            prompt.id,
            prompt.slug,
            prompt.modality,
            prompt.preview_url.is_some()
        );

        Ok(prompt.into())
    }

    /// All prompt records, newest first.
    pub async fn list_all(&self) -> Result<Vec<PromptResponseDto>> {
        let prompts = sqlx::query_as::<_, Prompt>(
            r#"
            SELECT id, title, slug, modality, user_prompt_template,
                   expected_output_description, preview_url, created_at
            FROM prompts
            ORDER BY created_at DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to list prompts: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(prompts.into_iter().map(|p| p.into()).collect())
    }

    /// Newest record with the given slug, or `None`.
    ///
    /// Slugs are not unique; when a title collision produced duplicates the
    /// most recent record wins.
    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<PromptResponseDto>> {
        let prompt = sqlx::query_as::<_, Prompt>(
            r#"
            SELECT id, title, slug, modality, user_prompt_template,
                   expected_output_description, preview_url, created_at
            FROM prompts
            WHERE slug = $1
            ORDER BY created_at DESC
            LIMIT 1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            tracing::error!("Failed to find prompt by slug: {:?}", e);
            AppError::Database(e)
        })?;

        Ok(prompt.map(|p| p.into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_extension_from_file_name() {
        assert_eq!(storage_extension("fire.png"), "png");
        assert_eq!(storage_extension("scene.final.JPEG"), "jpeg");
        assert_eq!(storage_extension("noext"), "noext");
    }

    #[test]
    fn test_storage_extension_falls_back_to_jpg() {
        assert_eq!(storage_extension(""), "jpg");
        assert_eq!(storage_extension("trailing."), "jpg");
        assert_eq!(storage_extension("weird.!!!"), "jpg");
    }

    #[test]
    fn test_preview_object_key_shape() {
        let key = preview_object_key("cinematic-fire", "fire.png");
        assert!(key.starts_with("cinematic-fire-"));
        assert!(key.ends_with(".png"));

        let millis: &str = key
            .strip_prefix("cinematic-fire-")
            .and_then(|rest| rest.strip_suffix(".png"))
            .unwrap();
        assert!(millis.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_stored_text_trims_surrounding_whitespace() {
        assert_eq!(stored_text("  x  "), "x");
        assert_eq!(stored_text("already clean"), "already clean");
    }

    #[test]
    fn test_stored_description_nulls_out_blank_input() {
        assert_eq!(stored_description(None), None);
        assert_eq!(stored_description(Some("")), None);
        assert_eq!(stored_description(Some("   ")), None);
        assert_eq!(stored_description(Some(" \n\t ")), None);
    }

    #[test]
    fn test_stored_description_trims_kept_text() {
        assert_eq!(
            stored_description(Some("  A 5s clip with ember detail  ")),
            Some("A 5s clip with ember detail")
        );
    }
}
