//! Recipe domain service.
//!
//! Implements the recipe read and write ports. Writes store the uploaded
//! image first and hand the repository a complete [`RecipeWrite`]; if the
//! database write fails the freshly stored image is removed again.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use mockable::Clock;
use tracing::warn;

use crate::domain::ports::{
    ImageCategory, ImageStore, ImageStoreError, MembershipRepository, MembershipRepositoryError,
    RecipeOwnership, RecipePersistenceError, RecipeRepository, RecipeWrite, RecipesCommand,
    RecipesQuery, SubscriptionRepository, SubscriptionRepositoryError,
};
use crate::domain::{
    Error, FieldErrors, MembershipKind, Recipe, RecipeDraft, RecipeDraftInput, RecipeDraftMode,
    RecipeId, RecipeListQuery, RecipeView, UserId, ViewerFlags,
};

/// Recipe service implementing [`RecipesQuery`] and [`RecipesCommand`].
#[derive(Clone)]
pub struct RecipeService<R, M, S, I> {
    recipes: Arc<R>,
    memberships: Arc<M>,
    subscriptions: Arc<S>,
    images: Arc<I>,
    clock: Arc<dyn Clock>,
}

impl<R, M, S, I> RecipeService<R, M, S, I> {
    pub fn new(
        recipes: Arc<R>,
        memberships: Arc<M>,
        subscriptions: Arc<S>,
        images: Arc<I>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            recipes,
            memberships,
            subscriptions,
            images,
            clock,
        }
    }
}

fn map_recipe_error(error: RecipePersistenceError) -> Error {
    match error {
        RecipePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipePersistenceError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
        RecipePersistenceError::UnknownTag => {
            FieldErrors::single_error("tags", "recipe references an unknown tag")
        }
        RecipePersistenceError::UnknownIngredient => {
            FieldErrors::single_error("ingredients", "recipe references an unknown ingredient")
        }
    }
}

fn map_membership_error(error: MembershipRepositoryError) -> Error {
    match error {
        MembershipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("membership repository unavailable: {message}"))
        }
        other => Error::internal(format!("membership repository error: {other}")),
    }
}

fn map_subscription_error(error: SubscriptionRepositoryError) -> Error {
    match error {
        SubscriptionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subscription repository unavailable: {message}"))
        }
        other => Error::internal(format!("subscription repository error: {other}")),
    }
}

fn map_image_error(error: ImageStoreError) -> Error {
    Error::internal(error.to_string())
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

fn write_from_draft(draft: &RecipeDraft, image: Option<String>) -> RecipeWrite {
    RecipeWrite {
        name: draft.name().as_ref().to_owned(),
        text: draft.text().as_ref().to_owned(),
        cooking_time: draft.cooking_time().minutes(),
        image,
        tags: draft.tags().to_vec(),
        ingredients: draft
            .ingredients()
            .iter()
            .map(|line| (line.ingredient, line.amount.get()))
            .collect(),
    }
}

impl<R, M, S, I> RecipeService<R, M, S, I>
where
    R: RecipeRepository,
    M: MembershipRepository,
    S: SubscriptionRepository,
    I: ImageStore,
{
    async fn members(
        &self,
        kind: MembershipKind,
        viewer: &UserId,
        ids: &[RecipeId],
    ) -> Result<HashSet<RecipeId>, Error> {
        let members = self
            .memberships
            .members_among(kind, viewer, ids)
            .await
            .map_err(map_membership_error)?;
        Ok(members.into_iter().collect())
    }

    async fn views(
        &self,
        viewer: Option<&UserId>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, Error> {
        let Some(viewer) = viewer.filter(|_| !recipes.is_empty()) else {
            return Ok(recipes
                .into_iter()
                .map(|recipe| RecipeView::new(recipe, ViewerFlags::default()))
                .collect());
        };

        let ids: Vec<RecipeId> = recipes.iter().map(|recipe| recipe.id).collect();
        let mut authors: Vec<UserId> = recipes
            .iter()
            .map(|recipe| recipe.author.id().clone())
            .collect();
        authors.sort_by(|a, b| a.as_ref().cmp(b.as_ref()));
        authors.dedup();

        let favorites = self.members(MembershipKind::Favorite, viewer, &ids).await?;
        let cart = self.members(MembershipKind::Cart, viewer, &ids).await?;
        let followed: HashSet<UserId> = self
            .subscriptions
            .followed_among(viewer, &authors)
            .await
            .map_err(map_subscription_error)?
            .into_iter()
            .collect();

        Ok(recipes
            .into_iter()
            .map(|recipe| {
                let flags = ViewerFlags {
                    author_subscribed: followed.contains(recipe.author.id()),
                    is_favorited: favorites.contains(&recipe.id),
                    is_in_shopping_cart: cart.contains(&recipe.id),
                };
                RecipeView::new(recipe, flags)
            })
            .collect())
    }

    async fn view_of(&self, viewer: Option<&UserId>, id: RecipeId) -> Result<RecipeView, Error> {
        let recipe = self
            .recipes
            .find(id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))?;
        self.views(viewer, vec![recipe])
            .await?
            .pop()
            .ok_or_else(|| Error::internal("recipe view missing after load"))
    }

    async fn owned(&self, actor: &UserId, id: RecipeId) -> Result<RecipeOwnership, Error> {
        let ownership = self
            .recipes
            .find_ownership(id)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(id))?;
        if &ownership.author != actor {
            return Err(Error::forbidden("only the author may change this recipe"));
        }
        Ok(ownership)
    }

    async fn store_image(&self, draft: &RecipeDraft) -> Result<Option<String>, Error> {
        match draft.image() {
            Some(image) => self
                .images
                .store(ImageCategory::RecipeImage, image)
                .await
                .map(Some)
                .map_err(map_image_error),
            None => Ok(None),
        }
    }

    async fn discard_image(&self, path: &str) {
        if let Err(err) = self.images.remove(path).await {
            warn!(path, error = %err, "failed to remove recipe image");
        }
    }
}

#[async_trait]
impl<R, M, S, I> RecipesQuery for RecipeService<R, M, S, I>
where
    R: RecipeRepository,
    M: MembershipRepository,
    S: SubscriptionRepository,
    I: ImageStore,
{
    async fn list<'a>(
        &self,
        viewer: Option<&'a UserId>,
        query: RecipeListQuery,
    ) -> Result<Vec<RecipeView>, Error> {
        let filter = query.into_filter(viewer);
        let recipes = self
            .recipes
            .list(&filter)
            .await
            .map_err(map_recipe_error)?;
        self.views(viewer, recipes).await
    }

    async fn get<'a>(
        &self,
        viewer: Option<&'a UserId>,
        id: RecipeId,
    ) -> Result<RecipeView, Error> {
        self.view_of(viewer, id).await
    }
}

#[async_trait]
impl<R, M, S, I> RecipesCommand for RecipeService<R, M, S, I>
where
    R: RecipeRepository,
    M: MembershipRepository,
    S: SubscriptionRepository,
    I: ImageStore,
{
    async fn create(&self, author: &UserId, draft: RecipeDraft) -> Result<RecipeView, Error> {
        let Some(image) = self.store_image(&draft).await? else {
            return Err(FieldErrors::single_error("image", "this field is required"));
        };
        let write = write_from_draft(&draft, Some(image.clone()));
        let id = match self.recipes.create(author, &write, self.clock.utc()).await {
            Ok(id) => id,
            Err(err) => {
                self.discard_image(&image).await;
                return Err(map_recipe_error(err));
            }
        };
        self.view_of(Some(author), id).await
    }

    async fn update(
        &self,
        actor: &UserId,
        id: RecipeId,
        input: RecipeDraftInput,
    ) -> Result<RecipeView, Error> {
        let ownership = self.owned(actor, id).await?;
        let draft = RecipeDraft::validate(input, RecipeDraftMode::Update)?;
        let image = self.store_image(&draft).await?;
        let write = write_from_draft(&draft, image.clone());
        let outcome = self.recipes.update(id, &write).await;
        match (outcome, image) {
            (Ok(true), Some(_)) => self.discard_image(&ownership.image).await,
            (Ok(true), None) => {}
            (Ok(false), image) => {
                if let Some(image) = image {
                    self.discard_image(&image).await;
                }
                return Err(recipe_not_found(id));
            }
            (Err(err), image) => {
                if let Some(image) = image {
                    self.discard_image(&image).await;
                }
                return Err(map_recipe_error(err));
            }
        }
        self.view_of(Some(actor), id).await
    }

    async fn delete(&self, actor: &UserId, id: RecipeId) -> Result<(), Error> {
        let ownership = self.owned(actor, id).await?;
        let deleted = self.recipes.delete(id).await.map_err(map_recipe_error)?;
        if !deleted {
            return Err(recipe_not_found(id));
        }
        self.discard_image(&ownership.image).await;
        Ok(())
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
