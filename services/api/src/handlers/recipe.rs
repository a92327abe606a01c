use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};

use foodgram_auth_types::identity::{IdentityHeaders, OptionalIdentity};
use foodgram_domain::pagination::{PageRequest, Paginated};

use crate::domain::types::{
    IngredientAmount, IngredientLine, Recipe, RecipeDraft, RecipeFilter, ShortRecipe,
};
use crate::error::FoodgramError;
use crate::handlers::PageQuery;
use crate::handlers::tag::TagResponse;
use crate::handlers::user::UserResponse;
use crate::state::AppState;
use crate::usecase::recipe::{
    CreateRecipeUseCase, DeleteRecipeUseCase, GetRecipeUseCase, ListRecipesUseCase,
    UpdateRecipeUseCase,
};

// ── Response types ───────────────────────────────────────────────────────────

#[derive(Serialize)]
pub struct RecipeIngredientResponse {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i32,
}

impl From<IngredientAmount> for RecipeIngredientResponse {
    fn from(line: IngredientAmount) -> Self {
        Self {
            id: line.ingredient.id,
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount,
        }
    }
}

#[derive(Serialize)]
pub struct RecipeResponse {
    pub id: i32,
    pub author: UserResponse,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub tags: Vec<TagResponse>,
    pub ingredients: Vec<RecipeIngredientResponse>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    #[serde(serialize_with = "foodgram_core::serde::to_rfc3339_ms")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl From<Recipe> for RecipeResponse {
    fn from(recipe: Recipe) -> Self {
        Self {
            id: recipe.id,
            author: recipe.author.into(),
            name: recipe.name,
            text: recipe.text,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
            tags: recipe.tags.into_iter().map(Into::into).collect(),
            ingredients: recipe.ingredients.into_iter().map(Into::into).collect(),
            is_favorited: recipe.is_favorited,
            is_in_shopping_cart: recipe.is_in_shopping_cart,
            created_at: recipe.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct ShortRecipeResponse {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

impl From<ShortRecipe> for ShortRecipeResponse {
    fn from(recipe: ShortRecipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
        }
    }
}

// ── Request body ─────────────────────────────────────────────────────────────

#[derive(Deserialize)]
pub struct IngredientLineRequest {
    pub id: i32,
    pub amount: i32,
}

/// Body of `POST /recipes/` and `PATCH /recipes/{id}/`.
///
/// Tags and ingredients always replace the stored sets. Missing lists reach
/// validation as empty. A missing `image` keeps the stored one on update.
#[derive(Deserialize)]
pub struct RecipeRequest {
    pub name: String,
    pub text: String,
    pub image: Option<String>,
    pub cooking_time: i32,
    #[serde(default)]
    pub tags: Vec<i32>,
    #[serde(default)]
    pub ingredients: Vec<IngredientLineRequest>,
}

impl From<RecipeRequest> for RecipeDraft {
    fn from(body: RecipeRequest) -> Self {
        Self {
            name: body.name,
            text: body.text,
            image: body.image,
            cooking_time: body.cooking_time,
            tag_ids: body.tags,
            ingredients: body
                .ingredients
                .into_iter()
                .map(|line| IngredientLine {
                    id: line.id,
                    amount: line.amount,
                })
                .collect(),
        }
    }
}

/// Split raw list query pairs into pagination and filter. Unparsable
/// `page` / `limit` values fall back to their defaults.
fn parse_list_query(pairs: &[(String, String)]) -> (PageRequest, RecipeFilter) {
    let mut page = PageQuery::default();
    for (key, value) in pairs {
        match key.as_str() {
            "page" => page.page = value.parse().ok(),
            "limit" => page.limit = value.parse().ok(),
            _ => {}
        }
    }
    let filter = RecipeFilter::from_pairs(pairs.iter().map(|(k, v)| (k.as_str(), v.as_str())));
    (page.page_request(), filter)
}

// ── GET /recipes/ ────────────────────────────────────────────────────────────

pub async fn list_recipes(
    identity: OptionalIdentity,
    State(state): State<AppState>,
    Query(pairs): Query<Vec<(String, String)>>,
) -> Result<Json<Paginated<RecipeResponse>>, FoodgramError> {
    let (page, filter) = parse_list_query(&pairs);
    let usecase = ListRecipesUseCase {
        repo: state.recipe_repo(),
    };
    let recipes = usecase.execute(identity.user_id(), filter, page).await?;
    Ok(Json(recipes.map(RecipeResponse::from)))
}

// ── GET /recipes/{id}/ ───────────────────────────────────────────────────────

pub async fn get_recipe(
    identity: OptionalIdentity,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<Json<RecipeResponse>, FoodgramError> {
    let usecase = GetRecipeUseCase {
        repo: state.recipe_repo(),
    };
    Ok(Json(usecase.execute(id, identity.user_id()).await?.into()))
}

// ── POST /recipes/ ───────────────────────────────────────────────────────────

pub async fn create_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Json(body): Json<RecipeRequest>,
) -> Result<(StatusCode, Json<RecipeResponse>), FoodgramError> {
    let usecase = CreateRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase.execute(identity.user_id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(recipe.into())))
}

// ── PATCH /recipes/{id}/ ─────────────────────────────────────────────────────

pub async fn update_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
    Json(body): Json<RecipeRequest>,
) -> Result<Json<RecipeResponse>, FoodgramError> {
    let usecase = UpdateRecipeUseCase {
        repo: state.recipe_repo(),
    };
    let recipe = usecase
        .execute(identity.user_id, identity.user_role, id, body.into())
        .await?;
    Ok(Json(recipe.into()))
}

// ── DELETE /recipes/{id}/ ────────────────────────────────────────────────────

pub async fn delete_recipe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> Result<StatusCode, FoodgramError> {
    let usecase = DeleteRecipeUseCase {
        repo: state.recipe_repo(),
    };
    usecase
        .execute(identity.user_id, identity.user_role, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
