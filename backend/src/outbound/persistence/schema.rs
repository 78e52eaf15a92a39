//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        /// Argon2 PHC string.
        password_hash -> Text,
        /// Media-relative avatar path.
        avatar -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    tags (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    /// Ingredients; `(name, measurement_unit)` is unique.
    ingredients (id) {
        id -> Int8,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    recipes (id) {
        id -> Int8,
        author_id -> Uuid,
        name -> Varchar,
        /// Media-relative image path.
        image -> Varchar,
        text -> Text,
        /// Minutes, constrained to `1..=32000`.
        cooking_time -> Int4,
        /// Assigned once by the short-link resolver.
        short_code -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    recipe_tags (recipe_id, tag_id) {
        recipe_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Int8,
        ingredient_id -> Int8,
        amount -> Int4,
    }
}

diesel::table! {
    favorites (user_id, recipe_id) {
        user_id -> Uuid,
        recipe_id -> Int8,
    }
}

diesel::table! {
    cart_items (user_id, recipe_id) {
        user_id -> Uuid,
        recipe_id -> Int8,
    }
}

diesel::table! {
    /// Follow edges; a CHECK constraint rejects `user_id = author_id`.
    subscriptions (user_id, author_id) {
        user_id -> Uuid,
        author_id -> Uuid,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_tags -> recipes (recipe_id));
diesel::joinable!(recipe_tags -> tags (tag_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(cart_items -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    tags,
    ingredients,
    recipes,
    recipe_tags,
    recipe_ingredients,
    favorites,
    cart_items,
    subscriptions,
);
