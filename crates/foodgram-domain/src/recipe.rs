//! Recipe field limits.

use std::ops::RangeInclusive;

/// Maximum recipe name length in characters.
pub const MAX_RECIPE_NAME_LEN: usize = 64;

/// Maximum recipe text length in characters.
pub const MAX_RECIPE_TEXT_LEN: usize = 5000;

/// Allowed cooking time in minutes.
pub const COOKING_TIME_RANGE: RangeInclusive<i32> = 1..=300;

/// Allowed per-recipe amount of a single ingredient.
pub const INGREDIENT_AMOUNT_RANGE: RangeInclusive<i32> = 1..=10_000;

/// Maximum number of distinct ingredients in one recipe.
pub const MAX_INGREDIENTS_PER_RECIPE: usize = 32;

/// Maximum ingredient name length in characters.
pub const MAX_INGREDIENT_NAME_LEN: usize = 100;

/// Maximum measurement unit length in characters.
pub const MAX_MEASUREMENT_UNIT_LEN: usize = 25;
