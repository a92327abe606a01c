#![allow(async_fn_in_trait)]

use uuid::Uuid;

use foodgram_domain::pagination::{PageRequest, Paginated};

use crate::domain::types::{
    Ingredient, Profile, Recipe, RecipeDraft, RecipeFilter, Relation, RelationView,
    ShoppingLine, SubscribedAuthor, Tag, User,
};
use crate::error::FoodgramError;

/// Repository for user accounts.
pub trait UserRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, FoodgramError>;

    /// User plus the viewer's subscription flag.
    async fn find_profile(
        &self,
        id: Uuid,
        viewer: Option<Uuid>,
    ) -> Result<Option<Profile>, FoodgramError>;

    async fn list_profiles(
        &self,
        viewer: Option<Uuid>,
        page: PageRequest,
    ) -> Result<Paginated<Profile>, FoodgramError>;

    async fn username_exists(&self, username: &str) -> Result<bool, FoodgramError>;
    async fn email_exists(&self, email: &str) -> Result<bool, FoodgramError>;
    async fn create(&self, user: &User) -> Result<(), FoodgramError>;
    async fn update_password_hash(&self, id: Uuid, hash: &str) -> Result<(), FoodgramError>;
}

/// Repository for recipe tags.
pub trait TagRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Tag>, FoodgramError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Tag>, FoodgramError>;
    /// `true` when another tag already uses `name` or `slug`.
    async fn name_or_slug_taken(&self, name: &str, slug: &str) -> Result<bool, FoodgramError>;
    async fn create(&self, name: &str, color: &str, slug: &str) -> Result<Tag, FoodgramError>;
}

/// Repository for ingredients.
pub trait IngredientRepository: Send + Sync {
    /// Ingredients whose lowercased name contains any of `needles`, ordered by name.
    /// Empty `needles` lists everything.
    async fn search(&self, needles: &[String]) -> Result<Vec<Ingredient>, FoodgramError>;
    async fn find_by_id(&self, id: i32) -> Result<Option<Ingredient>, FoodgramError>;
    async fn exists(&self, name: &str, measurement_unit: &str) -> Result<bool, FoodgramError>;
    async fn create(
        &self,
        name: &str,
        measurement_unit: &str,
    ) -> Result<Ingredient, FoodgramError>;
}

/// Repository for recipes and their tag / ingredient associations.
pub trait RecipeRepository: Send + Sync {
    /// Newest first. Membership flags in `filter` must already be resolved for the viewer.
    async fn list(
        &self,
        viewer: Option<Uuid>,
        filter: &RecipeFilter,
        page: PageRequest,
    ) -> Result<Paginated<Recipe>, FoodgramError>;

    async fn find(&self, id: i32, viewer: Option<Uuid>) -> Result<Option<Recipe>, FoodgramError>;

    async fn find_author_id(&self, id: i32) -> Result<Option<Uuid>, FoodgramError>;

    /// Insert the recipe row and its associations atomically. Returns the new id.
    ///
    /// Unknown tag or ingredient ids fail the whole write.
    async fn create(&self, author_id: Uuid, draft: &RecipeDraft) -> Result<i32, FoodgramError>;

    /// Rewrite the recipe row and replace its associations atomically.
    async fn update(&self, id: i32, draft: &RecipeDraft) -> Result<(), FoodgramError>;

    /// Delete a recipe. Returns `true` if a row was deleted.
    async fn delete(&self, id: i32) -> Result<bool, FoodgramError>;
}

/// Store for favorites, cart items and subscriptions.
pub trait RelationRepository: Send + Sync {
    /// Whether the relation's target (recipe or author) exists.
    async fn target_exists(&self, relation: Relation) -> Result<bool, FoodgramError>;

    /// Insert `(user, target)`. Returns `false` if the pair already exists.
    async fn insert(&self, user_id: Uuid, relation: Relation) -> Result<bool, FoodgramError>;

    /// Delete `(user, target)`. Returns `true` if a row was deleted.
    async fn delete(&self, user_id: Uuid, relation: Relation) -> Result<bool, FoodgramError>;

    /// Compact view of the relation's target as seen by `user_id`.
    async fn view(
        &self,
        user_id: Uuid,
        relation: Relation,
        recipes_limit: Option<u64>,
    ) -> Result<RelationView, FoodgramError>;

    /// Authors followed by `user_id`, most recent subscription first.
    async fn list_subscriptions(
        &self,
        user_id: Uuid,
        page: PageRequest,
        recipes_limit: Option<u64>,
    ) -> Result<Paginated<SubscribedAuthor>, FoodgramError>;
}

/// Read side of the shopping cart.
pub trait ShoppingCartRepository: Send + Sync {
    async fn count_items(&self, user_id: Uuid) -> Result<u64, FoodgramError>;

    /// Ingredient amounts summed over every recipe in the cart, grouped by
    /// `(name, measurement_unit)` and ordered by name, then unit.
    async fn aggregate(&self, user_id: Uuid) -> Result<Vec<ShoppingLine>, FoodgramError>;
}
