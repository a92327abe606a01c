use foodgram_domain::layout::swap_keyboard_layout;
use foodgram_domain::recipe::{MAX_INGREDIENT_NAME_LEN, MAX_MEASUREMENT_UNIT_LEN};

use crate::domain::repository::IngredientRepository;
use crate::domain::types::Ingredient;
use crate::error::FoodgramError;

/// Lowercased search needles: the query as typed and re-typed on the other layout.
fn search_needles(name: Option<&str>) -> Vec<String> {
    let Some(name) = name.map(str::trim).filter(|n| !n.is_empty()) else {
        return Vec::new();
    };
    let typed = name.to_lowercase();
    let swapped = swap_keyboard_layout(name);
    if swapped == typed {
        vec![typed]
    } else {
        vec![typed, swapped]
    }
}

// ── SearchIngredients ────────────────────────────────────────────────────────

pub struct SearchIngredientsUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> SearchIngredientsUseCase<R> {
    pub async fn execute(&self, name: Option<&str>) -> Result<Vec<Ingredient>, FoodgramError> {
        self.repo.search(&search_needles(name)).await
    }
}

// ── GetIngredient ────────────────────────────────────────────────────────────

pub struct GetIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> GetIngredientUseCase<R> {
    pub async fn execute(&self, id: i32) -> Result<Ingredient, FoodgramError> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or(FoodgramError::IngredientNotFound)
    }
}

// ── CreateIngredient ─────────────────────────────────────────────────────────

pub struct CreateIngredientInput {
    pub name: String,
    pub measurement_unit: String,
}

pub struct CreateIngredientUseCase<R: IngredientRepository> {
    pub repo: R,
}

impl<R: IngredientRepository> CreateIngredientUseCase<R> {
    pub async fn execute(&self, input: CreateIngredientInput) -> Result<Ingredient, FoodgramError> {
        let name = input.name.trim();
        let unit = input.measurement_unit.trim();
        if name.is_empty() || name.chars().count() > MAX_INGREDIENT_NAME_LEN {
            return Err(FoodgramError::validation(format!(
                "ingredient name must be 1 to {MAX_INGREDIENT_NAME_LEN} characters"
            )));
        }
        if unit.is_empty() || unit.chars().count() > MAX_MEASUREMENT_UNIT_LEN {
            return Err(FoodgramError::validation(format!(
                "measurement unit must be 1 to {MAX_MEASUREMENT_UNIT_LEN} characters"
            )));
        }
        if self.repo.exists(name, unit).await? {
            return Err(FoodgramError::validation(
                "ingredient with this measurement unit already exists",
            ));
        }
        self.repo.create(name, unit).await
    }
}
