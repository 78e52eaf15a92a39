//! Tests for recipe drafts and list filters.

use super::*;
use crate::domain::catalogue::{IngredientId, TagId};
use rstest::{fixture, rstest};

const PNG: &str = "data:image/png;base64,iVBORw0KGgo=";

fn base_input() -> RecipeDraftInput {
    RecipeDraftInput {
        name: Some("  Pancakes ".to_owned()),
        text: Some("Mix and fry.".to_owned()),
        cooking_time: Some(20),
        image: Some(PNG.to_owned()),
        tags: Some(vec![1, 2]),
        ingredients: Some(vec![(10, 200), (11, 2)]),
    }
}

#[fixture]
fn input() -> RecipeDraftInput {
    base_input()
}

#[rstest]
fn valid_draft_exposes_normalised_values(input: RecipeDraftInput) {
    let draft = RecipeDraft::try_from_input(input, RecipeDraftMode::Create).expect("valid draft");

    assert_eq!(draft.name().as_ref(), "Pancakes");
    assert_eq!(draft.cooking_time().minutes(), 20);
    assert_eq!(draft.tags(), &[TagId::new(1), TagId::new(2)]);
    assert_eq!(draft.ingredients()[0].ingredient, IngredientId::new(10));
    assert_eq!(draft.ingredients()[1].amount.get(), 2);
    assert!(draft.image().is_some());
}

#[rstest]
fn duplicate_ingredient_ids_fail_validation(mut input: RecipeDraftInput) {
    input.ingredients = Some(vec![(10, 200), (10, 100)]);

    let errors = RecipeDraft::try_from_input(input, RecipeDraftMode::Create)
        .expect_err("duplicates rejected");

    assert!(errors.contains("ingredients"));
    assert_eq!(errors.iter().count(), 1);
}

#[rstest]
fn duplicate_tags_fail_validation(mut input: RecipeDraftInput) {
    input.tags = Some(vec![3, 3, 4]);

    let errors =
        RecipeDraft::try_from_input(input, RecipeDraftMode::Create).expect_err("rejected");

    assert!(errors.contains("tags"));
}

#[rstest]
#[case::empty_tags(RecipeDraftInput { tags: Some(vec![]), ..base_input() }, "tags")]
#[case::empty_ingredients(RecipeDraftInput { ingredients: Some(vec![]), ..base_input() }, "ingredients")]
#[case::zero_amount(RecipeDraftInput { ingredients: Some(vec![(1, 0)]), ..base_input() }, "ingredients")]
#[case::zero_cooking_time(RecipeDraftInput { cooking_time: Some(0), ..base_input() }, "cooking_time")]
#[case::blank_name(RecipeDraftInput { name: Some("  ".to_owned()), ..base_input() }, "name")]
#[case::empty_image(RecipeDraftInput { image: Some(String::new()), ..base_input() }, "image")]
#[case::missing_image(RecipeDraftInput { image: None, ..base_input() }, "image")]
fn rejects_invalid_fields(#[case] input: RecipeDraftInput, #[case] field: &str) {
    let errors =
        RecipeDraft::try_from_input(input, RecipeDraftMode::Create).expect_err("rejected");
    assert!(errors.contains(field), "expected failure on {field}: {errors:?}");
}

#[rstest]
fn update_may_omit_image(mut input: RecipeDraftInput) {
    input.image = None;
    let draft = RecipeDraft::try_from_input(input, RecipeDraftMode::Update).expect("valid update");
    assert!(draft.image().is_none());
}

#[rstest]
fn reports_every_failing_field() {
    let errors = RecipeDraft::try_from_input(RecipeDraftInput::default(), RecipeDraftMode::Create)
        .expect_err("empty payload");

    for field in ["name", "text", "cooking_time", "image", "tags", "ingredients"] {
        assert!(errors.contains(field), "missing failure for {field}");
    }
}

#[rstest]
fn field_errors_render_details() {
    let mut errors = FieldErrors::new();
    errors.push("tags", "first");
    errors.push("tags", "second");
    errors.push("name", "third");

    let error = errors.into_error("recipe is invalid");

    assert_eq!(error.code(), crate::domain::ErrorCode::InvalidRequest);
    let details = error.details().expect("details present");
    assert_eq!(details["code"], "validation_failed");
    assert_eq!(details["fields"]["tags"][1], "second");
    assert_eq!(details["fields"]["name"][0], "third");
}

#[rstest]
fn list_query_normalises_tags_and_drops_anonymous_flags() {
    let query = RecipeListQuery {
        author: None,
        tags: vec![" lunch".to_owned(), "breakfast".to_owned(), "lunch".to_owned(), String::new()],
        is_favorited: true,
        is_in_shopping_cart: true,
    };

    let anonymous = query.clone().into_filter(None);
    assert_eq!(anonymous.tag_slugs, vec!["breakfast", "lunch"]);
    assert!(anonymous.favorited_by.is_none());
    assert!(anonymous.in_cart_of.is_none());

    let viewer = crate::domain::user::UserId::random();
    let bound = query.into_filter(Some(&viewer));
    assert_eq!(bound.in_cart_of, Some(viewer));
}
