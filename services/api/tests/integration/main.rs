mod catalogue_test;
mod helpers;
mod recipe_test;
mod relation_test;
mod shopping_cart_test;
mod user_test;
