use foodgram_domain::tag::{MAX_TAG_NAME_LEN, is_valid_slug, normalize_color};

use crate::domain::repository::TagRepository;
use crate::domain::types::Tag;
use crate::error::FoodgramError;

// ── ListTags / GetTag ────────────────────────────────────────────────────────

pub struct ListTagsUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> ListTagsUseCase<R> {
    pub async fn execute(&self) -> Result<Vec<Tag>, FoodgramError> {
        self.repo.list().await
    }
}

pub struct GetTagUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> GetTagUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Tag, FoodgramError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(FoodgramError::TagNotFound)
    }
}

// ── CreateTag ────────────────────────────────────────────────────────────────

pub struct CreateTagInput {
    pub name: String,
    pub color: String,
    pub slug: String,
}

pub struct CreateTagUseCase<R: TagRepository> {
    pub repo: R,
}

impl<R: TagRepository> CreateTagUseCase<R> {
    pub async fn execute(&self, input: CreateTagInput) -> Result<Tag, FoodgramError> {
        let name = input.name.trim();
        if name.is_empty() || name.chars().count() > MAX_TAG_NAME_LEN {
            return Err(FoodgramError::validation(format!(
                "tag name must be 1 to {MAX_TAG_NAME_LEN} characters"
            )));
        }
        if !is_valid_slug(&input.slug) {
            return Err(FoodgramError::validation("invalid tag slug"));
        }
        let color =
            normalize_color(&input.color).map_err(|e| FoodgramError::validation(e.to_string()))?;
        if self.repo.name_or_slug_taken(name, &input.slug).await? {
            return Err(FoodgramError::validation(
                "tag with this name or slug already exists",
            ));
        }
        self.repo.create(name, &color, &input.slug).await
    }
}
