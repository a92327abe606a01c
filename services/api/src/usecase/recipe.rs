use std::collections::HashSet;

use uuid::Uuid;

use foodgram_domain::pagination::{PageRequest, Paginated};
use foodgram_domain::recipe::{
    COOKING_TIME_RANGE, INGREDIENT_AMOUNT_RANGE, MAX_INGREDIENTS_PER_RECIPE, MAX_RECIPE_NAME_LEN,
    MAX_RECIPE_TEXT_LEN,
};
use foodgram_domain::user::UserRole;

use crate::domain::repository::RecipeRepository;
use crate::domain::types::{Recipe, RecipeDraft, RecipeFilter};
use crate::error::FoodgramError;

/// Check field limits and association shape of a recipe write.
///
/// Existence of the referenced tags and ingredients is checked by the
/// repository inside the write transaction.
pub fn validate_draft(draft: &RecipeDraft, require_image: bool) -> Result<(), FoodgramError> {
    let name_len = draft.name.trim().chars().count();
    if name_len == 0 || name_len > MAX_RECIPE_NAME_LEN {
        return Err(FoodgramError::validation(format!(
            "recipe name must be 1 to {MAX_RECIPE_NAME_LEN} characters"
        )));
    }
    let text_len = draft.text.trim().chars().count();
    if text_len == 0 || text_len > MAX_RECIPE_TEXT_LEN {
        return Err(FoodgramError::validation(format!(
            "recipe text must be 1 to {MAX_RECIPE_TEXT_LEN} characters"
        )));
    }
    match draft.image.as_deref().map(str::trim) {
        Some("") => return Err(FoodgramError::validation("image must not be empty")),
        None if require_image => return Err(FoodgramError::validation("image is required")),
        _ => {}
    }
    if !COOKING_TIME_RANGE.contains(&draft.cooking_time) {
        return Err(FoodgramError::validation(format!(
            "cooking time must be between {} and {} minutes",
            COOKING_TIME_RANGE.start(),
            COOKING_TIME_RANGE.end()
        )));
    }

    if draft.tag_ids.is_empty() {
        return Err(FoodgramError::validation("at least one tag is required"));
    }
    let mut seen_tags = HashSet::new();
    if !draft.tag_ids.iter().all(|id| seen_tags.insert(*id)) {
        return Err(FoodgramError::validation("tags must not repeat"));
    }

    if draft.ingredients.is_empty() {
        return Err(FoodgramError::validation("at least one ingredient is required"));
    }
    if draft.ingredients.len() > MAX_INGREDIENTS_PER_RECIPE {
        return Err(FoodgramError::validation(format!(
            "a recipe may use at most {MAX_INGREDIENTS_PER_RECIPE} ingredients"
        )));
    }
    let mut seen_ingredients = HashSet::new();
    for line in &draft.ingredients {
        if !seen_ingredients.insert(line.id) {
            return Err(FoodgramError::validation("ingredients must not repeat"));
        }
        if !INGREDIENT_AMOUNT_RANGE.contains(&line.amount) {
            return Err(FoodgramError::validation(format!(
                "ingredient amount must be between {} and {}",
                INGREDIENT_AMOUNT_RANGE.start(),
                INGREDIENT_AMOUNT_RANGE.end()
            )));
        }
    }
    Ok(())
}

fn ensure_can_modify(
    author_id: Uuid,
    user_id: Uuid,
    user_role: UserRole,
) -> Result<(), FoodgramError> {
    if author_id == user_id || user_role.is_staff() {
        Ok(())
    } else {
        Err(FoodgramError::Forbidden)
    }
}

// ── ListRecipes ──────────────────────────────────────────────────────────────

pub struct ListRecipesUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> ListRecipesUseCase<R> {
    pub async fn execute(
        &self,
        viewer: Option<Uuid>,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Paginated<Recipe>, FoodgramError> {
        let filter = filter.for_viewer(viewer);
        self.repo.list(viewer, &filter, page.clamped()).await
    }
}

// ── GetRecipe ────────────────────────────────────────────────────────────────

pub struct GetRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> GetRecipeUseCase<R> {
    pub async fn execute(&self, id: i32, viewer: Option<Uuid>) -> Result<Recipe, FoodgramError> {
        self.repo
            .find(id, viewer)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)
    }
}

// ── CreateRecipe ─────────────────────────────────────────────────────────────

pub struct CreateRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> CreateRecipeUseCase<R> {
    pub async fn execute(&self, author_id: Uuid, draft: RecipeDraft) -> Result<Recipe, FoodgramError> {
        validate_draft(&draft, true)?;
        let id = self.repo.create(author_id, &draft).await?;
        tracing::info!(recipe_id = id, %author_id, "recipe created");
        self.repo
            .find(id, Some(author_id))
            .await?
            .ok_or(FoodgramError::RecipeNotFound)
    }
}

// ── UpdateRecipe ─────────────────────────────────────────────────────────────

pub struct UpdateRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> UpdateRecipeUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        user_role: UserRole,
        id: i32,
        draft: RecipeDraft,
    ) -> Result<Recipe, FoodgramError> {
        let author_id = self
            .repo
            .find_author_id(id)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)?;
        ensure_can_modify(author_id, user_id, user_role)?;
        validate_draft(&draft, false)?;
        self.repo.update(id, &draft).await?;
        self.repo
            .find(id, Some(user_id))
            .await?
            .ok_or(FoodgramError::RecipeNotFound)
    }
}

// ── DeleteRecipe ─────────────────────────────────────────────────────────────

pub struct DeleteRecipeUseCase<R: RecipeRepository> {
    pub repo: R,
}

impl<R: RecipeRepository> DeleteRecipeUseCase<R> {
    pub async fn execute(
        &self,
        user_id: Uuid,
        user_role: UserRole,
        id: i32,
    ) -> Result<(), FoodgramError> {
        let author_id = self
            .repo
            .find_author_id(id)
            .await?
            .ok_or(FoodgramError::RecipeNotFound)?;
        ensure_can_modify(author_id, user_id, user_role)?;
        if !self.repo.delete(id).await? {
            return Err(FoodgramError::RecipeNotFound);
        }
        tracing::info!(recipe_id = id, %user_id, "recipe deleted");
        Ok(())
    }
}
