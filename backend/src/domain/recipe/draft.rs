//! Validated recipe write payloads.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::{Value, json};

use super::{
    AMOUNT_MAX, AMOUNT_MIN, COOKING_TIME_MAX, COOKING_TIME_MIN, RECIPE_NAME_MAX, RECIPE_TEXT_MAX,
};
use crate::domain::Error;
use crate::domain::catalogue::{IngredientId, TagId};
use crate::domain::image::ImageUpload;

/// One failing field and the reason it was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub message: String,
}

/// Every field failure found while validating a payload.
///
/// Serialises into the `details` of an `invalid_request` error as
/// `{"code": "validation_failed", "fields": {"<field>": ["<message>", ...]}}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, message: impl fmt::Display) {
        self.0.push(FieldError {
            field,
            message: message.to_string(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Whether any failure was recorded for `field`.
    pub fn contains(&self, field: &str) -> bool {
        self.0.iter().any(|error| error.field == field)
    }

    fn details(&self) -> Value {
        let mut fields: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for error in &self.0 {
            fields
                .entry(error.field)
                .or_default()
                .push(error.message.as_str());
        }
        json!({ "code": "validation_failed", "fields": fields })
    }

    /// `invalid_request` error for one failing field.
    pub fn single_error(field: &'static str, message: &str) -> Error {
        let mut errors = Self::new();
        errors.push(field, message);
        errors.into_error(message)
    }

    /// Convert into an `invalid_request` error carrying the field map.
    pub fn into_error(self, message: &str) -> Error {
        let details = self.details();
        Error::invalid_request(message).with_details(details)
    }
}

/// Recipe name: trimmed, non-empty, at most [`RECIPE_NAME_MAX`] characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeName(String);

impl RecipeName {
    pub fn new(candidate: &str) -> Result<Self, String> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err("name must not be empty".to_owned());
        }
        if trimmed.chars().count() > RECIPE_NAME_MAX {
            return Err(format!("name must be at most {RECIPE_NAME_MAX} characters"));
        }
        Ok(Self(trimmed.to_owned()))
    }
}

impl AsRef<str> for RecipeName {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Recipe description.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeText(String);

impl RecipeText {
    pub fn new(candidate: &str) -> Result<Self, String> {
        if candidate.trim().is_empty() {
            return Err("text must not be empty".to_owned());
        }
        if candidate.chars().count() > RECIPE_TEXT_MAX {
            return Err(format!("text must be at most {RECIPE_TEXT_MAX} characters"));
        }
        Ok(Self(candidate.to_owned()))
    }
}

impl AsRef<str> for RecipeText {
    fn as_ref(&self) -> &str {
        self.0.as_str()
    }
}

/// Cooking time in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CookingTime(i32);

impl CookingTime {
    pub fn new(minutes: i64) -> Result<Self, String> {
        i32::try_from(minutes)
            .ok()
            .filter(|value| (COOKING_TIME_MIN..=COOKING_TIME_MAX).contains(value))
            .map(Self)
            .ok_or_else(|| {
                format!("cooking time must be between {COOKING_TIME_MIN} and {COOKING_TIME_MAX} minutes")
            })
    }

    pub fn minutes(self) -> i32 {
        self.0
    }
}

/// Positive amount of one ingredient line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Amount(i32);

impl Amount {
    pub fn new(value: i64) -> Result<Self, String> {
        i32::try_from(value)
            .ok()
            .filter(|value| (AMOUNT_MIN..=AMOUNT_MAX).contains(value))
            .map(Self)
            .ok_or_else(|| format!("amount must be between {AMOUNT_MIN} and {AMOUNT_MAX}"))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

/// Ingredient reference with its amount, as written by a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientAmount {
    pub ingredient: IngredientId,
    pub amount: Amount,
}

/// Whether a draft creates a recipe or replaces an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipeDraftMode {
    /// Every field including the image is required.
    Create,
    /// The image may be omitted to keep the stored one.
    Update,
}

/// Raw write payload before validation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeDraftInput {
    pub name: Option<String>,
    pub text: Option<String>,
    pub cooking_time: Option<i64>,
    /// Base64 data URL.
    pub image: Option<String>,
    pub tags: Option<Vec<i64>>,
    /// `(ingredient id, amount)` pairs.
    pub ingredients: Option<Vec<(i64, i64)>>,
}

/// Fully validated recipe write.
///
/// ## Invariants
/// - `tags` is non-empty and free of duplicates.
/// - `ingredients` is non-empty, has one line per ingredient id and every
///   amount is positive.
/// - `image` is present for [`RecipeDraftMode::Create`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeDraft {
    name: RecipeName,
    text: RecipeText,
    cooking_time: CookingTime,
    image: Option<ImageUpload>,
    tags: Vec<TagId>,
    ingredients: Vec<IngredientAmount>,
}

fn required<T>(errors: &mut FieldErrors, field: &'static str, value: Option<T>) -> Option<T> {
    if value.is_none() {
        errors.push(field, "this field is required");
    }
    value
}

fn record<T>(
    errors: &mut FieldErrors,
    field: &'static str,
    result: Result<T, impl fmt::Display>,
) -> Option<T> {
    result.map_err(|err| errors.push(field, err)).ok()
}

fn validate_tags(errors: &mut FieldErrors, raw: Vec<i64>) -> Option<Vec<TagId>> {
    if raw.is_empty() {
        errors.push("tags", "at least one tag is required");
        return None;
    }
    let mut seen = BTreeSet::new();
    let duplicates: BTreeSet<i64> = raw.iter().copied().filter(|id| !seen.insert(*id)).collect();
    if !duplicates.is_empty() {
        for id in duplicates {
            errors.push("tags", format!("tag {id} is listed more than once"));
        }
        return None;
    }
    Some(raw.into_iter().map(TagId::new).collect())
}

fn validate_ingredients(
    errors: &mut FieldErrors,
    raw: Vec<(i64, i64)>,
) -> Option<Vec<IngredientAmount>> {
    if raw.is_empty() {
        errors.push("ingredients", "at least one ingredient is required");
        return None;
    }
    let before = errors.iter().count();
    let mut seen = BTreeSet::new();
    let mut lines = Vec::with_capacity(raw.len());
    for (id, amount) in raw {
        if !seen.insert(id) {
            errors.push(
                "ingredients",
                format!("ingredient {id} is listed more than once"),
            );
            continue;
        }
        if let Some(amount) = record(errors, "ingredients", Amount::new(amount)) {
            lines.push(IngredientAmount {
                ingredient: IngredientId::new(id),
                amount,
            });
        }
    }
    (errors.iter().count() == before).then_some(lines)
}

impl RecipeDraft {
    /// [`Self::try_from_input`] with the field errors folded into one
    /// `invalid_request`.
    pub fn validate(input: RecipeDraftInput, mode: RecipeDraftMode) -> Result<Self, Error> {
        Self::try_from_input(input, mode)
            .map_err(|errors| errors.into_error("recipe payload is invalid"))
    }

    /// Validate a raw payload, collecting every failing field.
    ///
    /// # Examples
    /// ```
    /// use foodgram::domain::{RecipeDraft, RecipeDraftInput, RecipeDraftMode};
    ///
    /// let input = RecipeDraftInput {
    ///     name: Some("Pancakes".into()),
    ///     text: Some("Mix and fry.".into()),
    ///     cooking_time: Some(20),
    ///     image: None,
    ///     tags: Some(vec![1]),
    ///     ingredients: Some(vec![(1, 200), (1, 100)]),
    /// };
    /// let errors = RecipeDraft::try_from_input(input, RecipeDraftMode::Update).unwrap_err();
    /// assert!(errors.contains("ingredients"));
    /// ```
    pub fn try_from_input(
        input: RecipeDraftInput,
        mode: RecipeDraftMode,
    ) -> Result<Self, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = required(&mut errors, "name", input.name)
            .and_then(|raw| record(&mut errors, "name", RecipeName::new(&raw)));
        let text = required(&mut errors, "text", input.text)
            .and_then(|raw| record(&mut errors, "text", RecipeText::new(&raw)));
        let cooking_time = required(&mut errors, "cooking_time", input.cooking_time)
            .and_then(|raw| record(&mut errors, "cooking_time", CookingTime::new(raw)));
        let image = match (mode, input.image) {
            (_, Some(raw)) => {
                record(&mut errors, "image", ImageUpload::from_data_url(&raw)).map(Some)
            }
            (RecipeDraftMode::Create, None) => {
                errors.push("image", "this field is required");
                None
            }
            (RecipeDraftMode::Update, None) => Some(None),
        };
        let tags = required(&mut errors, "tags", input.tags)
            .and_then(|raw| validate_tags(&mut errors, raw));
        let ingredients = required(&mut errors, "ingredients", input.ingredients)
            .and_then(|raw| validate_ingredients(&mut errors, raw));

        match (name, text, cooking_time, image, tags, ingredients) {
            (
                Some(name),
                Some(text),
                Some(cooking_time),
                Some(image),
                Some(tags),
                Some(ingredients),
            ) if errors.is_empty() => {
                Ok(Self {
                    name,
                    text,
                    cooking_time,
                    image,
                    tags,
                    ingredients,
                })
            }
            _ => Err(errors),
        }
    }

    pub fn name(&self) -> &RecipeName {
        &self.name
    }

    pub fn text(&self) -> &RecipeText {
        &self.text
    }

    pub fn cooking_time(&self) -> CookingTime {
        self.cooking_time
    }

    /// New image, absent when an update keeps the stored one.
    pub fn image(&self) -> Option<&ImageUpload> {
        self.image.as_ref()
    }

    pub fn tags(&self) -> &[TagId] {
        &self.tags
    }

    pub fn ingredients(&self) -> &[IngredientAmount] {
        &self.ingredients
    }
}
