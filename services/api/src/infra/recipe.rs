use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, ConnectionTrait,
    DatabaseConnection, EntityTrait, IntoActiveModel, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Select, TransactionError, TransactionTrait,
    sea_query::{Expr, Query, SelectStatement},
};
use uuid::Uuid;

use foodgram_api_schema::{
    carts, favorites, ingredients, recipe_ingredients, recipe_tags, recipes, tags, users,
};
use foodgram_domain::pagination::{PageRequest, Paginated};
use foodgram_domain::query::TriState;

use crate::domain::repository::RecipeRepository;
use crate::domain::types::{AuthorFilter, IngredientAmount, Recipe, RecipeDraft, RecipeFilter};
use crate::error::FoodgramError;
use crate::infra::db::{ingredient_from_model, profiles_for, tag_from_model};

#[derive(Clone)]
pub struct DbRecipeRepository {
    pub db: DatabaseConnection,
}

// ── Filtering ────────────────────────────────────────────────────────────────

/// `SELECT recipe_id FROM favorites WHERE user_id = ?`
fn favorited_by(user_id: Uuid) -> SelectStatement {
    Query::select()
        .column(favorites::Column::RecipeId)
        .from(favorites::Entity)
        .and_where(Expr::col(favorites::Column::UserId).eq(user_id))
        .to_owned()
}

/// `SELECT recipe_id FROM carts WHERE user_id = ?`
fn in_cart_of(user_id: Uuid) -> SelectStatement {
    Query::select()
        .column(carts::Column::RecipeId)
        .from(carts::Entity)
        .and_where(Expr::col(carts::Column::UserId).eq(user_id))
        .to_owned()
}

fn apply_membership(
    query: Select<recipes::Entity>,
    state: TriState,
    members: SelectStatement,
) -> Select<recipes::Entity> {
    match state.as_membership() {
        Some(true) => query.filter(recipes::Column::Id.in_subquery(members)),
        Some(false) => query.filter(recipes::Column::Id.not_in_subquery(members)),
        None => query,
    }
}

fn filtered(viewer: Option<Uuid>, filter: &RecipeFilter) -> Select<recipes::Entity> {
    let mut query = recipes::Entity::find();
    if !filter.tags.is_empty() {
        // Any listed slug matches. IN over a subquery never duplicates rows.
        query = query.filter(
            recipes::Column::Id.in_subquery(
                Query::select()
                    .column((recipe_tags::Entity, recipe_tags::Column::RecipeId))
                    .from(recipe_tags::Entity)
                    .inner_join(
                        tags::Entity,
                        Expr::col((tags::Entity, tags::Column::Id))
                            .equals((recipe_tags::Entity, recipe_tags::Column::TagId)),
                    )
                    .and_where(
                        Expr::col((tags::Entity, tags::Column::Slug))
                            .is_in(filter.tags.iter().cloned()),
                    )
                    .to_owned(),
            ),
        );
    }
    match filter.author {
        AuthorFilter::Any => {}
        AuthorFilter::Id(author) => query = query.filter(recipes::Column::AuthorId.eq(author)),
        AuthorFilter::Invalid => query = query.filter(Expr::value(false)),
    }
    if let Some(viewer) = viewer {
        query = apply_membership(query, filter.is_favorited, favorited_by(viewer));
        query = apply_membership(query, filter.is_in_shopping_cart, in_cart_of(viewer));
    }
    query
}

// ── Hydration ────────────────────────────────────────────────────────────────

/// Load authors, tags, ingredients and viewer flags for `models`, keeping order.
async fn hydrate<C: ConnectionTrait>(
    db: &C,
    viewer: Option<Uuid>,
    models: Vec<recipes::Model>,
) -> Result<Vec<Recipe>, FoodgramError> {
    if models.is_empty() {
        return Ok(Vec::new());
    }
    let ids: Vec<i32> = models.iter().map(|m| m.id).collect();

    let author_ids: HashSet<Uuid> = models.iter().map(|m| m.author_id).collect();
    let author_models = users::Entity::find()
        .filter(users::Column::Id.is_in(author_ids))
        .all(db)
        .await
        .context("load recipe authors")?;
    let authors: HashMap<Uuid, _> = profiles_for(db, viewer, author_models)
        .await?
        .into_iter()
        .map(|profile| (profile.user.id, profile))
        .collect();

    let mut tags_by_recipe: HashMap<i32, Vec<_>> = HashMap::new();
    for (link, tag) in recipe_tags::Entity::find()
        .filter(recipe_tags::Column::RecipeId.is_in(ids.iter().copied()))
        .find_also_related(tags::Entity)
        .all(db)
        .await
        .context("load recipe tags")?
    {
        if let Some(tag) = tag {
            tags_by_recipe
                .entry(link.recipe_id)
                .or_default()
                .push(tag_from_model(tag));
        }
    }

    let mut ingredients_by_recipe: HashMap<i32, Vec<IngredientAmount>> = HashMap::new();
    for (line, ingredient) in recipe_ingredients::Entity::find()
        .filter(recipe_ingredients::Column::RecipeId.is_in(ids.iter().copied()))
        .find_also_related(ingredients::Entity)
        .all(db)
        .await
        .context("load recipe ingredients")?
    {
        if let Some(ingredient) = ingredient {
            ingredients_by_recipe
                .entry(line.recipe_id)
                .or_default()
                .push(IngredientAmount {
                    ingredient: ingredient_from_model(ingredient),
                    amount: line.amount,
                });
        }
    }

    let (favorited, in_cart): (HashSet<i32>, HashSet<i32>) = match viewer {
        Some(viewer) => {
            let favorited = favorites::Entity::find()
                .filter(favorites::Column::UserId.eq(viewer))
                .filter(favorites::Column::RecipeId.is_in(ids.iter().copied()))
                .all(db)
                .await
                .context("load viewer favorites")?
                .into_iter()
                .map(|row| row.recipe_id)
                .collect();
            let in_cart = carts::Entity::find()
                .filter(carts::Column::UserId.eq(viewer))
                .filter(carts::Column::RecipeId.is_in(ids.iter().copied()))
                .all(db)
                .await
                .context("load viewer cart")?
                .into_iter()
                .map(|row| row.recipe_id)
                .collect();
            (favorited, in_cart)
        }
        None => (HashSet::new(), HashSet::new()),
    };

    let mut recipes = Vec::with_capacity(models.len());
    for model in models {
        let author = authors
            .get(&model.author_id)
            .cloned()
            .with_context(|| format!("author of recipe {} is missing", model.id))?;
        let mut tags = tags_by_recipe.remove(&model.id).unwrap_or_default();
        tags.sort_by_key(|tag| tag.id);
        let mut ingredients = ingredients_by_recipe.remove(&model.id).unwrap_or_default();
        ingredients.sort_by(|a, b| a.ingredient.name.cmp(&b.ingredient.name));
        recipes.push(Recipe {
            id: model.id,
            author,
            is_favorited: favorited.contains(&model.id),
            is_in_shopping_cart: in_cart.contains(&model.id),
            name: model.name,
            text: model.text,
            image: model.image,
            cooking_time: model.cooking_time,
            tags,
            ingredients,
            created_at: model.created_at,
        });
    }
    Ok(recipes)
}

// ── Writes ───────────────────────────────────────────────────────────────────

/// Reject drafts that reference tags or ingredients that do not exist.
async fn ensure_references_exist<C: ConnectionTrait>(
    db: &C,
    draft: &RecipeDraft,
) -> Result<(), FoodgramError> {
    let known_tags = tags::Entity::find()
        .filter(tags::Column::Id.is_in(draft.tag_ids.iter().copied()))
        .count(db)
        .await
        .context("count referenced tags")?;
    if known_tags != draft.tag_ids.len() as u64 {
        return Err(FoodgramError::validation("unknown tag id"));
    }
    let known_ingredients = ingredients::Entity::find()
        .filter(ingredients::Column::Id.is_in(draft.ingredients.iter().map(|line| line.id)))
        .count(db)
        .await
        .context("count referenced ingredients")?;
    if known_ingredients != draft.ingredients.len() as u64 {
        return Err(FoodgramError::validation("unknown ingredient id"));
    }
    Ok(())
}

async fn write_associations<C: ConnectionTrait>(
    db: &C,
    recipe_id: i32,
    draft: &RecipeDraft,
) -> Result<(), FoodgramError> {
    recipe_tags::Entity::insert_many(draft.tag_ids.iter().map(|tag_id| {
        recipe_tags::ActiveModel {
            recipe_id: Set(recipe_id),
            tag_id: Set(*tag_id),
        }
    }))
    .exec_without_returning(db)
    .await
    .context("insert recipe tags")?;

    recipe_ingredients::Entity::insert_many(draft.ingredients.iter().map(|line| {
        recipe_ingredients::ActiveModel {
            recipe_id: Set(recipe_id),
            ingredient_id: Set(line.id),
            amount: Set(line.amount),
        }
    }))
    .exec_without_returning(db)
    .await
    .context("insert recipe ingredients")?;
    Ok(())
}

fn from_txn_error(err: TransactionError<FoodgramError>) -> FoodgramError {
    match err {
        TransactionError::Connection(e) => anyhow::Error::new(e).context("recipe transaction").into(),
        TransactionError::Transaction(e) => e,
    }
}

impl RecipeRepository for DbRecipeRepository {
    async fn list(
        &self,
        viewer: Option<Uuid>,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Paginated<Recipe>, FoodgramError> {
        let query = filtered(viewer, filter);
        let count = query
            .clone()
            .count(&self.db)
            .await
            .context("count recipes")?;
        let models = query
            .order_by_desc(recipes::Column::CreatedAt)
            .order_by_desc(recipes::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list recipes")?;
        Ok(Paginated {
            count,
            results: hydrate(&self.db, viewer, models).await?,
        })
    }

    async fn find(&self, id: i32, viewer: Option<Uuid>) -> Result<Option<Recipe>, FoodgramError> {
        let Some(model) = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe")?
        else {
            return Ok(None);
        };
        Ok(hydrate(&self.db, viewer, vec![model]).await?.pop())
    }

    async fn find_author_id(&self, id: i32) -> Result<Option<Uuid>, FoodgramError> {
        let model = recipes::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find recipe author")?;
        Ok(model.map(|m| m.author_id))
    }

    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, FoodgramError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, i32, FoodgramError>(|txn| {
                Box::pin(async move {
                    ensure_references_exist(txn, &draft).await?;
                    let recipe = recipes::ActiveModel {
                        id: NotSet,
                        author_id: Set(author_id),
                        name: Set(draft.name.trim().to_owned()),
                        text: Set(draft.text.trim().to_owned()),
                        image: Set(draft.image.clone().unwrap_or_default()),
                        cooking_time: Set(draft.cooking_time),
                        created_at: Set(Utc::now()),
                    }
                    .insert(txn)
                    .await
                    .context("insert recipe")?;
                    write_associations(txn, recipe.id, &draft).await?;
                    Ok(recipe.id)
                })
            })
            .await
            .map_err(from_txn_error)
    }

    async fn update(&self, id: i32, draft: &RecipeDraft) -> Result<(), FoodgramError> {
        let draft = draft.clone();
        self.db
            .transaction::<_, (), FoodgramError>(|txn| {
                Box::pin(async move {
                    let existing = recipes::Entity::find_by_id(id)
                        .one(txn)
                        .await
                        .context("load recipe for update")?
                        .ok_or(FoodgramError::RecipeNotFound)?;
                    ensure_references_exist(txn, &draft).await?;

                    let mut recipe = existing.into_active_model();
                    recipe.name = Set(draft.name.trim().to_owned());
                    recipe.text = Set(draft.text.trim().to_owned());
                    recipe.cooking_time = Set(draft.cooking_time);
                    if let Some(image) = &draft.image {
                        recipe.image = Set(image.clone());
                    }
                    recipe.update(txn).await.context("update recipe")?;

                    recipe_tags::Entity::delete_many()
                        .filter(recipe_tags::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await
                        .context("clear recipe tags")?;
                    recipe_ingredients::Entity::delete_many()
                        .filter(recipe_ingredients::Column::RecipeId.eq(id))
                        .exec(txn)
                        .await
                        .context("clear recipe ingredients")?;
                    write_associations(txn, id, &draft).await
                })
            })
            .await
            .map_err(from_txn_error)
    }

    async fn delete(&self, id: i32) -> Result<bool, FoodgramError> {
        let result = recipes::Entity::delete_by_id(id)
            .exec(&self.db)
            .await
            .context("delete recipe")?;
        Ok(result.rows_affected > 0)
    }
}
