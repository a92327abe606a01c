//! Favorite, shopping cart and subscription toggles.
//!
//! Each resource exposes `POST` (create, 201) and `DELETE` (remove, 204) on
//! the same path. Both sides go through the shared relation usecases.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use foodgram_auth_types::identity::IdentityHeaders;

use crate::domain::types::{Relation, RelationView};
use crate::error::FoodgramError;
use crate::handlers::recipe::ShortRecipeResponse;
use crate::handlers::user::SubscribedAuthorResponse;
use crate::state::AppState;
use crate::usecase::relation::{CreateRelationUseCase, DeleteRelationUseCase};

#[derive(Serialize)]
#[serde(untagged)]
pub enum RelationResponse {
    Recipe(ShortRecipeResponse),
    Author(SubscribedAuthorResponse),
}

impl From<RelationView> for RelationResponse {
    fn from(view: RelationView) -> Self {
        match view {
            RelationView::Recipe(recipe) => Self::Recipe(recipe.into()),
            RelationView::Author(author) => Self::Author(author.into()),
        }
    }
}

#[derive(Deserialize, Default)]
pub struct RecipesLimitQuery {
    pub recipes_limit: Option<u64>,
}

async fn create(
    state: AppState,
    user_id: Uuid,
    relation: Relation,
    recipes_limit: Option<u64>,
) -> Result<(StatusCode, Json<RelationResponse>), FoodgramError> {
    let usecase = CreateRelationUseCase {
        repo: state.relation_repo(),
    };
    let view = usecase.execute(user_id, relation, recipes_limit).await?;
    Ok((StatusCode::CREATED, Json(view.into())))
}

async fn delete(
    state: AppState,
    user_id: Uuid,
    relation: Relation,
) -> Result<StatusCode, FoodgramError> {
    let usecase = DeleteRelationUseCase {
        repo: state.relation_repo(),
    };
    usecase.execute(user_id, relation).await?;
    Ok(StatusCode::NO_CONTENT)
}

// ── /recipes/{id}/favorite/ ──────────────────────────────────────────────────

pub async fn add_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RelationResponse>), FoodgramError> {
    create(
        state,
        identity.user_id,
        Relation::Favorite { recipe_id },
        None,
    )
    .await
}

pub async fn remove_favorite(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, FoodgramError> {
    delete(state, identity.user_id, Relation::Favorite { recipe_id }).await
}

// ── /recipes/{id}/shopping_cart/ ─────────────────────────────────────────────

pub async fn add_to_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<(StatusCode, Json<RelationResponse>), FoodgramError> {
    create(
        state,
        identity.user_id,
        Relation::CartItem { recipe_id },
        None,
    )
    .await
}

pub async fn remove_from_cart(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(recipe_id): Path<i32>,
) -> Result<StatusCode, FoodgramError> {
    delete(state, identity.user_id, Relation::CartItem { recipe_id }).await
}

// ── /users/{id}/subscribe/ ───────────────────────────────────────────────────

pub async fn subscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
    Query(query): Query<RecipesLimitQuery>,
) -> Result<(StatusCode, Json<RelationResponse>), FoodgramError> {
    create(
        state,
        identity.user_id,
        Relation::Subscription { author_id },
        query.recipes_limit,
    )
    .await
}

pub async fn unsubscribe(
    identity: IdentityHeaders,
    State(state): State<AppState>,
    Path(author_id): Path<Uuid>,
) -> Result<StatusCode, FoodgramError> {
    delete(
        state,
        identity.user_id,
        Relation::Subscription { author_id },
    )
    .await
}
