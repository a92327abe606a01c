use chrono::{DateTime, Utc};
use uuid::Uuid;

use foodgram_domain::query::TriState;
use foodgram_domain::relation::RelationKind;
use foodgram_domain::user::UserRole;

// ── Users ────────────────────────────────────────────────────────────────────

/// Registered account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub password_hash: String,
    pub is_active: bool,
    pub role: UserRole,
    pub created_at: DateTime<Utc>,
}

/// A user as seen by a (possibly anonymous) viewer.
#[derive(Debug, Clone)]
pub struct Profile {
    pub user: User,
    /// Whether the viewer follows this user. Always `false` for anonymous viewers.
    pub is_subscribed: bool,
}

/// An author the viewer follows, with a preview of their recipes.
#[derive(Debug, Clone)]
pub struct SubscribedAuthor {
    pub author: Profile,
    pub recipes: Vec<ShortRecipe>,
    pub recipes_count: u64,
}

// ── Catalogue ────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub color: String,
    pub slug: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: i32,
    pub name: String,
    pub measurement_unit: String,
}

// ── Recipes ──────────────────────────────────────────────────────────────────

/// Ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient: Ingredient,
    pub amount: i32,
}

/// Full recipe as seen by a (possibly anonymous) viewer.
#[derive(Debug, Clone)]
pub struct Recipe {
    pub id: i32,
    pub author: Profile,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i32,
    pub tags: Vec<Tag>,
    pub ingredients: Vec<IngredientAmount>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub created_at: DateTime<Utc>,
}

/// Compact recipe view used by relation responses and subscription previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortRecipe {
    pub id: i32,
    pub name: String,
    pub image: String,
    pub cooking_time: i32,
}

/// Requested ingredient line in a recipe write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientLine {
    pub id: i32,
    pub amount: i32,
}

/// Validated recipe write. Tags and ingredients replace the stored sets.
#[derive(Debug, Clone)]
pub struct RecipeDraft {
    pub name: String,
    pub text: String,
    /// `None` keeps the stored image on update.
    pub image: Option<String>,
    pub cooking_time: i32,
    pub tag_ids: Vec<i32>,
    pub ingredients: Vec<IngredientLine>,
}

/// `author` dimension of the recipe list filter.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthorFilter {
    #[default]
    Any,
    Id(Uuid),
    /// Present but not a user id. Matches nothing.
    Invalid,
}

impl AuthorFilter {
    pub fn from_query(value: &str) -> Self {
        value.trim().parse().map_or(Self::Invalid, Self::Id)
    }
}

/// Recipe list filter.
///
/// All present dimensions AND together. Membership flags only apply when the
/// viewer is authenticated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    /// Tag slugs. A recipe matches when it has at least one of them.
    pub tags: Vec<String>,
    pub author: AuthorFilter,
    pub is_favorited: TriState,
    pub is_in_shopping_cart: TriState,
}

impl RecipeFilter {
    /// Build from raw `(key, value)` query pairs.
    ///
    /// `tags` may repeat and each value may hold a comma separated list.
    /// An `author` that is not a user id matches no recipe.
    pub fn from_pairs<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        let mut filter = Self::default();
        for (key, value) in pairs {
            match key {
                "tags" => {
                    for slug in value.split(',').map(str::trim).filter(|s| !s.is_empty()) {
                        if !filter.tags.iter().any(|t| t == slug) {
                            filter.tags.push(slug.to_owned());
                        }
                    }
                }
                "author" => filter.author = AuthorFilter::from_query(value),
                "is_favorited" => filter.is_favorited = TriState::from_query(Some(value)),
                "is_in_shopping_cart" => {
                    filter.is_in_shopping_cart = TriState::from_query(Some(value))
                }
                _ => {}
            }
        }
        filter
    }

    /// Drop membership dimensions for anonymous viewers.
    pub fn for_viewer(mut self, viewer: Option<Uuid>) -> Self {
        if viewer.is_none() {
            self.is_favorited = TriState::Any;
            self.is_in_shopping_cart = TriState::Any;
        }
        self
    }
}

// ── Relations ────────────────────────────────────────────────────────────────

/// A user → target association, tagged by kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Relation {
    Favorite { recipe_id: i32 },
    CartItem { recipe_id: i32 },
    Subscription { author_id: Uuid },
}

impl Relation {
    pub fn kind(&self) -> RelationKind {
        match self {
            Self::Favorite { .. } => RelationKind::Favorite,
            Self::CartItem { .. } => RelationKind::CartItem,
            Self::Subscription { .. } => RelationKind::Subscription,
        }
    }
}

/// Response payload of a created relation.
#[derive(Debug, Clone)]
pub enum RelationView {
    Recipe(ShortRecipe),
    Author(SubscribedAuthor),
}

// ── Shopping list ────────────────────────────────────────────────────────────

/// One aggregated shopping list line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingLine {
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}

/// Rendered shopping list file.
#[derive(Debug, Clone)]
pub struct ShoppingList {
    pub filename: String,
    pub content: String,
}
