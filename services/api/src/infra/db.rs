use std::collections::{HashMap, HashSet};

use anyhow::Context as _;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, Condition,
    ConnectionTrait, DatabaseConnection, DbErr, EntityTrait, FromQueryResult, JoinType,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, RelationTrait, SqlErr,
    sea_query::{Expr, Func, LikeExpr, Query},
};
use uuid::Uuid;

use foodgram_api_schema::{
    carts, favorites, ingredients, recipe_ingredients, recipes, subscriptions, tags, users,
};
use foodgram_domain::pagination::{PageRequest, Paginated};
use foodgram_domain::user::UserRole;

use crate::domain::repository::{
    IngredientRepository, RelationRepository, ShoppingCartRepository, TagRepository,
    UserRepository,
};
use crate::domain::types::{
    Ingredient, Profile, Relation, RelationView, ShoppingLine, ShortRecipe, SubscribedAuthor,
    Tag, User,
};
use crate::error::FoodgramError;

// ── Shared loaders ───────────────────────────────────────────────────────────

pub(crate) fn user_from_model(model: users::Model) -> User {
    let role = u8::try_from(model.role)
        .ok()
        .and_then(UserRole::from_u8)
        .unwrap_or(UserRole::Normal);
    User {
        id: model.id,
        email: model.email,
        username: model.username,
        first_name: model.first_name,
        last_name: model.last_name,
        password_hash: model.password_hash,
        is_active: model.is_active,
        role,
        created_at: model.created_at,
    }
}

pub(crate) fn short_recipe_from_model(model: recipes::Model) -> ShortRecipe {
    ShortRecipe {
        id: model.id,
        name: model.name,
        image: model.image,
        cooking_time: model.cooking_time,
    }
}

/// Attach the viewer's subscription flag to each user, keeping input order.
pub(crate) async fn profiles_for<C: ConnectionTrait>(
    db: &C,
    viewer: Option<Uuid>,
    models: Vec<users::Model>,
) -> Result<Vec<Profile>, FoodgramError> {
    let followed: HashSet<Uuid> = match viewer {
        Some(viewer) if !models.is_empty() => subscriptions::Entity::find()
            .filter(subscriptions::Column::UserId.eq(viewer))
            .filter(subscriptions::Column::AuthorId.is_in(models.iter().map(|m| m.id)))
            .all(db)
            .await
            .context("load viewer subscriptions")?
            .into_iter()
            .map(|row| row.author_id)
            .collect(),
        _ => HashSet::new(),
    };
    Ok(models
        .into_iter()
        .map(|model| Profile {
            is_subscribed: followed.contains(&model.id),
            user: user_from_model(model),
        })
        .collect())
}

/// Newest recipes per author, truncated to `limit`, plus each author's total.
async fn recipe_previews<C: ConnectionTrait>(
    db: &C,
    author_ids: &[Uuid],
    limit: Option<u64>,
) -> Result<HashMap<Uuid, (Vec<ShortRecipe>, u64)>, FoodgramError> {
    let mut previews: HashMap<Uuid, (Vec<ShortRecipe>, u64)> = HashMap::new();
    if author_ids.is_empty() {
        return Ok(previews);
    }
    let models = recipes::Entity::find()
        .filter(recipes::Column::AuthorId.is_in(author_ids.iter().copied()))
        .order_by_desc(recipes::Column::CreatedAt)
        .order_by_desc(recipes::Column::Id)
        .all(db)
        .await
        .context("load author recipes")?;
    for model in models {
        let (recipes, count) = previews.entry(model.author_id).or_default();
        *count += 1;
        if limit.is_none_or(|limit| (recipes.len() as u64) < limit) {
            recipes.push(short_recipe_from_model(model));
        }
    }
    Ok(previews)
}

/// Build subscription views for `authors`, keeping input order.
async fn subscribed_authors<C: ConnectionTrait>(
    db: &C,
    viewer: Uuid,
    authors: Vec<users::Model>,
    recipes_limit: Option<u64>,
) -> Result<Vec<SubscribedAuthor>, FoodgramError> {
    let ids: Vec<Uuid> = authors.iter().map(|a| a.id).collect();
    let mut previews = recipe_previews(db, &ids, recipes_limit).await?;
    let profiles = profiles_for(db, Some(viewer), authors).await?;
    Ok(profiles
        .into_iter()
        .map(|author| {
            let (recipes, recipes_count) = previews.remove(&author.user.id).unwrap_or_default();
            SubscribedAuthor {
                author,
                recipes,
                recipes_count,
            }
        })
        .collect())
}

// ── User repository ──────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbUserRepository {
    pub db: DatabaseConnection,
}

/// Postgres names the violated constraint (`users_email_key`), SQLite the
/// column (`users.email`).
fn taken_error(violation: &str) -> FoodgramError {
    if violation.contains("email") {
        FoodgramError::EmailTaken
    } else {
        FoodgramError::UsernameTaken
    }
}

impl UserRepository for DbUserRepository {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, FoodgramError> {
        let model = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user by id")?;
        Ok(model.map(user_from_model))
    }

    async fn find_profile(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<Profile>, FoodgramError> {
        let Some(model) = users::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find user profile")?
        else {
            return Ok(None);
        };
        Ok(profiles_for(&self.db, viewer, vec![model]).await?.pop())
    }

    async fn list_profiles(
        &self,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Paginated<Profile>, FoodgramError> {
        let count = users::Entity::find()
            .count(&self.db)
            .await
            .context("count users")?;
        let models = users::Entity::find()
            .order_by_asc(users::Column::CreatedAt)
            .order_by_asc(users::Column::Id)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list users")?;
        Ok(Paginated {
            count,
            results: profiles_for(&self.db, viewer, models).await?,
        })
    }

    async fn username_exists(&self, username: &str) -> Result<bool, FoodgramError> {
        let count = users::Entity::find()
            .filter(users::Column::Username.eq(username))
            .count(&self.db)
            .await
            .context("check username")?;
        Ok(count > 0)
    }

    async fn email_exists(&self, email: &str) -> Result<bool, FoodgramError> {
        let count = users::Entity::find()
            .filter(users::Column::Email.eq(email))
            .count(&self.db)
            .await
            .context("check email")?;
        Ok(count > 0)
    }

    async fn create(&self, user: &User) -> Result<(), FoodgramError> {
        let model = users::ActiveModel {
            id: Set(user.id),
            email: Set(user.email.clone()),
            username: Set(user.username.clone()),
            first_name: Set(user.first_name.clone()),
            last_name: Set(user.last_name.clone()),
            password_hash: Set(user.password_hash.clone()),
            is_active: Set(user.is_active),
            role: Set(i16::from(user.role.as_u8())),
            created_at: Set(user.created_at),
        };
        match users::Entity::insert(model).exec_without_returning(&self.db).await {
            Ok(_) => Ok(()),
            // Lost a race against a concurrent registration.
            Err(e) => match e.sql_err() {
                Some(SqlErr::UniqueConstraintViolation(msg)) => Err(taken_error(&msg)),
                _ => Err(anyhow::Error::new(e).context("create user").into()),
            },
        }
    }

    async fn update_password_hash(&self, id: Uuid, hash: &str) -> Result<(), FoodgramError> {
        users::Entity::update_many()
            .col_expr(users::Column::PasswordHash, Expr::value(hash))
            .filter(users::Column::Id.eq(id))
            .exec(&self.db)
            .await
            .context("update password hash")?;
        Ok(())
    }
}

// ── Tag repository ───────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbTagRepository {
    pub db: DatabaseConnection,
}

pub(crate) fn tag_from_model(model: tags::Model) -> Tag {
    Tag {
        id: model.id,
        name: model.name,
        color: model.color,
        slug: model.slug,
    }
}

impl TagRepository for DbTagRepository {
    async fn list(&self) -> Result<Vec<Tag>, FoodgramError> {
        let models = tags::Entity::find()
            .order_by_asc(tags::Column::Name)
            .all(&self.db)
            .await
            .context("list tags")?;
        Ok(models.into_iter().map(tag_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, FoodgramError> {
        let model = tags::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find tag by id")?;
        Ok(model.map(tag_from_model))
    }

    async fn name_or_slug_taken(&self, name: &str, slug: &str) -> Result<bool, FoodgramError> {
        let count = tags::Entity::find()
            .filter(
                Condition::any()
                    .add(tags::Column::Name.eq(name))
                    .add(tags::Column::Slug.eq(slug)),
            )
            .count(&self.db)
            .await
            .context("check tag name/slug")?;
        Ok(count > 0)
    }

    async fn create(&self, name: &str, color: &str, slug: &str) -> Result<Tag, FoodgramError> {
        let model = tags::ActiveModel {
            id: NotSet,
            name: Set(name.to_owned()),
            color: Set(color.to_owned()),
            slug: Set(slug.to_owned()),
        }
        .insert(&self.db)
        .await
        .context("create tag")?;
        Ok(tag_from_model(model))
    }
}

// ── Ingredient repository ────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbIngredientRepository {
    pub db: DatabaseConnection,
}

pub(crate) fn ingredient_from_model(model: ingredients::Model) -> Ingredient {
    Ingredient {
        id: model.id,
        name: model.name,
        measurement_unit: model.measurement_unit,
    }
}

/// `LIKE` pattern matching `needle` literally anywhere in the value.
fn contains_pattern(needle: &str) -> LikeExpr {
    let mut pattern = String::with_capacity(needle.len() + 2);
    pattern.push('%');
    for c in needle.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    LikeExpr::new(pattern).escape('\\')
}

impl IngredientRepository for DbIngredientRepository {
    async fn search(&self, needles: &[String]) -> Result<Vec<Ingredient>, FoodgramError> {
        let mut query = ingredients::Entity::find();
        if !needles.is_empty() {
            let condition = needles.iter().fold(Condition::any(), |cond, needle| {
                cond.add(
                    Expr::expr(Func::lower(Expr::col(ingredients::Column::Name)))
                        .like(contains_pattern(needle)),
                )
            });
            query = query.filter(condition);
        }
        let models = query
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::MeasurementUnit)
            .all(&self.db)
            .await
            .context("search ingredients")?;
        Ok(models.into_iter().map(ingredient_from_model).collect())
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, FoodgramError> {
        let model = ingredients::Entity::find_by_id(id)
            .one(&self.db)
            .await
            .context("find ingredient by id")?;
        Ok(model.map(ingredient_from_model))
    }

    async fn exists(&self, name: &str, measurement_unit: &str) -> Result<bool, FoodgramError> {
        let count = ingredients::Entity::find()
            .filter(ingredients::Column::Name.eq(name))
            .filter(ingredients::Column::MeasurementUnit.eq(measurement_unit))
            .count(&self.db)
            .await
            .context("check ingredient")?;
        Ok(count > 0)
    }

    async fn create(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<Ingredient, FoodgramError> {
        let model = ingredients::ActiveModel {
            id: NotSet,
            name: Set(name.to_owned()),
            measurement_unit: Set(measurement_unit.to_owned()),
        }
        .insert(&self.db)
        .await
        .context("create ingredient")?;
        Ok(ingredient_from_model(model))
    }
}

// ── Relation repository ──────────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbRelationRepository {
    pub db: DatabaseConnection,
}

/// Interpret the result of a relation insert.
///
/// A unique violation means a concurrent writer created the pair first. A
/// foreign key violation means the target vanished after the existence check.
fn insert_outcome(result: Result<u64, DbErr>, relation: Relation) -> Result<bool, FoodgramError> {
    let err = match result {
        Ok(_) => return Ok(true),
        Err(err) => err,
    };
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => Ok(false),
        Some(SqlErr::ForeignKeyConstraintViolation(_)) => Err(match relation {
            Relation::Subscription { .. } => FoodgramError::UserNotFound,
            _ => FoodgramError::RecipeNotFound,
        }),
        _ => Err(anyhow::Error::new(err)
            .context(format!("insert {}", relation.kind()))
            .into()),
    }
}

impl RelationRepository for DbRelationRepository {
    async fn target_exists(&self, relation: Relation) -> Result<bool, FoodgramError> {
        let count = match relation {
            Relation::Favorite { recipe_id } | Relation::CartItem { recipe_id } => {
                recipes::Entity::find_by_id(recipe_id)
                    .count(&self.db)
                    .await
                    .context("check recipe exists")?
            }
            Relation::Subscription { author_id } => users::Entity::find_by_id(author_id)
                .count(&self.db)
                .await
                .context("check author exists")?,
        };
        Ok(count > 0)
    }

    async fn insert(&self, user_id: Uuid, relation: Relation) -> Result<bool, FoodgramError> {
        let now = chrono::Utc::now();
        match relation {
            Relation::Favorite { recipe_id } => {
                let existing = favorites::Entity::find_by_id((user_id, recipe_id))
                    .one(&self.db)
                    .await
                    .context("find favorite")?;
                if existing.is_some() {
                    return Ok(false);
                }
                let row = favorites::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    created_at: Set(now),
                };
                insert_outcome(
                    favorites::Entity::insert(row)
                        .exec_without_returning(&self.db)
                        .await,
                    relation,
                )
            }
            Relation::CartItem { recipe_id } => {
                let existing = carts::Entity::find_by_id((user_id, recipe_id))
                    .one(&self.db)
                    .await
                    .context("find cart item")?;
                if existing.is_some() {
                    return Ok(false);
                }
                let row = carts::ActiveModel {
                    user_id: Set(user_id),
                    recipe_id: Set(recipe_id),
                    created_at: Set(now),
                };
                insert_outcome(
                    carts::Entity::insert(row)
                        .exec_without_returning(&self.db)
                        .await,
                    relation,
                )
            }
            Relation::Subscription { author_id } => {
                let existing = subscriptions::Entity::find_by_id((user_id, author_id))
                    .one(&self.db)
                    .await
                    .context("find subscription")?;
                if existing.is_some() {
                    return Ok(false);
                }
                let row = subscriptions::ActiveModel {
                    user_id: Set(user_id),
                    author_id: Set(author_id),
                    created_at: Set(now),
                };
                insert_outcome(
                    subscriptions::Entity::insert(row)
                        .exec_without_returning(&self.db)
                        .await,
                    relation,
                )
            }
        }
    }

    async fn delete(&self, user_id: Uuid, relation: Relation) -> Result<bool, FoodgramError> {
        let result = match relation {
            Relation::Favorite { recipe_id } => {
                favorites::Entity::delete_by_id((user_id, recipe_id))
                    .exec(&self.db)
                    .await
            }
            Relation::CartItem { recipe_id } => {
                carts::Entity::delete_by_id((user_id, recipe_id))
                    .exec(&self.db)
                    .await
            }
            Relation::Subscription { author_id } => {
                subscriptions::Entity::delete_by_id((user_id, author_id))
                    .exec(&self.db)
                    .await
            }
        }
        .with_context(|| format!("delete {}", relation.kind()))?;
        Ok(result.rows_affected > 0)
    }

    async fn view(
        &self,
        user_id: Uuid,
        relation: Relation,
        recipes_limit: Option<u64>,
    ) -> Result<RelationView, FoodgramError> {
        match relation {
            Relation::Favorite { recipe_id } | Relation::CartItem { recipe_id } => {
                let model = recipes::Entity::find_by_id(recipe_id)
                    .one(&self.db)
                    .await
                    .context("load relation recipe")?
                    .ok_or(FoodgramError::RecipeNotFound)?;
                Ok(RelationView::Recipe(short_recipe_from_model(model)))
            }
            Relation::Subscription { author_id } => {
                let model = users::Entity::find_by_id(author_id)
                    .one(&self.db)
                    .await
                    .context("load relation author")?
                    .ok_or(FoodgramError::UserNotFound)?;
                let author = subscribed_authors(&self.db, user_id, vec![model], recipes_limit)
                    .await?
                    .pop()
                    .ok_or(FoodgramError::UserNotFound)?;
                Ok(RelationView::Author(author))
            }
        }
    }

    async fn list_subscriptions(
        &self,
        user_id: Uuid,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Paginated<SubscribedAuthor>, FoodgramError> {
        let base = subscriptions::Entity::find().filter(subscriptions::Column::UserId.eq(user_id));
        let count = base
            .clone()
            .count(&self.db)
            .await
            .context("count subscriptions")?;
        let rows = base
            .order_by_desc(subscriptions::Column::CreatedAt)
            .order_by_asc(subscriptions::Column::AuthorId)
            .offset(page.offset())
            .limit(u64::from(page.limit))
            .all(&self.db)
            .await
            .context("list subscriptions")?;

        let ids: Vec<Uuid> = rows.iter().map(|row| row.author_id).collect();
        let mut by_id: HashMap<Uuid, users::Model> = users::Entity::find()
            .filter(users::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .context("load subscribed authors")?
            .into_iter()
            .map(|model| (model.id, model))
            .collect();
        let authors = ids.iter().filter_map(|id| by_id.remove(id)).collect();

        Ok(Paginated {
            count,
            results: subscribed_authors(&self.db, user_id, authors, recipes_limit).await?,
        })
    }
}

// ── Shopping cart repository ─────────────────────────────────────────────────

#[derive(Clone)]
pub struct DbShoppingCartRepository {
    pub db: DatabaseConnection,
}

#[derive(Debug, FromQueryResult)]
struct ShoppingLineRow {
    name: String,
    measurement_unit: String,
    amount: i64,
}

impl ShoppingCartRepository for DbShoppingCartRepository {
    async fn count_items(&self, user_id: Uuid) -> Result<u64, FoodgramError> {
        let count = carts::Entity::find()
            .filter(carts::Column::UserId.eq(user_id))
            .count(&self.db)
            .await
            .context("count cart items")?;
        Ok(count)
    }

    async fn aggregate(&self, user_id: Uuid) -> Result<Vec<ShoppingLine>, FoodgramError> {
        let rows = recipe_ingredients::Entity::find()
            .select_only()
            .column(ingredients::Column::Name)
            .column(ingredients::Column::MeasurementUnit)
            .column_as(
                Expr::col((
                    recipe_ingredients::Entity,
                    recipe_ingredients::Column::Amount,
                ))
                .sum(),
                "amount",
            )
            .join(
                JoinType::InnerJoin,
                recipe_ingredients::Relation::Ingredient.def(),
            )
            .filter(
                recipe_ingredients::Column::RecipeId.in_subquery(
                    Query::select()
                        .column(carts::Column::RecipeId)
                        .from(carts::Entity)
                        .and_where(Expr::col(carts::Column::UserId).eq(user_id))
                        .to_owned(),
                ),
            )
            .group_by(ingredients::Column::Name)
            .group_by(ingredients::Column::MeasurementUnit)
            .order_by_asc(ingredients::Column::Name)
            .order_by_asc(ingredients::Column::MeasurementUnit)
            .into_model::<ShoppingLineRow>()
            .all(&self.db)
            .await
            .context("aggregate cart ingredients")?;
        Ok(rows
            .into_iter()
            .map(|row| ShoppingLine {
                name: row.name,
                measurement_unit: row.measurement_unit,
                amount: row.amount,
            })
            .collect())
    }
}
