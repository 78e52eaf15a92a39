//! Reference data: tags and ingredients.
//!
//! Both tables are read-only to clients. Identifiers are database-assigned
//! integers wrapped in newtypes so they cannot be mixed up with recipe ids.

macro_rules! integer_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
        pub struct $name(i64);

        impl $name {
            pub const fn new(value: i64) -> Self {
                Self(value)
            }

            pub const fn get(self) -> i64 {
                self.0
            }
        }

        impl ::std::fmt::Display for $name {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

pub(crate) use integer_id;

integer_id!(
    /// Tag primary key.
    TagId
);
integer_id!(
    /// Ingredient primary key.
    IngredientId
);

/// A label attached to recipes, addressed in filters by its slug.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tag {
    pub id: TagId,
    pub name: String,
    pub slug: String,
}

/// An ingredient with its measurement unit.
///
/// `(name, measurement_unit)` is unique so aggregation can group on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ingredient {
    pub id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
}

/// Case-insensitive prefix used to search ingredients by name.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct IngredientSearch(Option<String>);

impl IngredientSearch {
    /// Build a search; blank input means "no filter".
    pub fn new(prefix: Option<&str>) -> Self {
        Self(
            prefix
                .map(str::trim)
                .filter(|value| !value.is_empty())
                .map(str::to_lowercase),
        )
    }

    /// The normalised prefix, if any.
    pub fn prefix(&self) -> Option<&str> {
        self.0.as_deref()
    }

    /// Whether `ingredient` matches this search.
    pub fn matches(&self, ingredient: &Ingredient) -> bool {
        self.prefix()
            .is_none_or(|prefix| ingredient.name.to_lowercase().starts_with(prefix))
    }
}
