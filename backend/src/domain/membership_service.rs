//! Favourite and shopping-cart membership service.
//!
//! Duplicate detection is left to storage: the repository inserts with
//! `ON CONFLICT DO NOTHING` and reports whether a row was written, so two
//! concurrent adds for the same pair resolve to one success and one
//! conflict.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::ports::{
    MembershipCommand, MembershipRepository, MembershipRepositoryError, RecipePersistenceError,
    RecipeRepository,
};
use crate::domain::{Error, MembershipKind, RecipeId, RecipeSummary, UserId};

/// Membership service implementing [`MembershipCommand`].
#[derive(Clone)]
pub struct MembershipService<R, M> {
    recipes: Arc<R>,
    memberships: Arc<M>,
}

impl<R, M> MembershipService<R, M> {
    pub fn new(recipes: Arc<R>, memberships: Arc<M>) -> Self {
        Self {
            recipes,
            memberships,
        }
    }
}

fn map_membership_error(error: MembershipRepositoryError, recipe: RecipeId) -> Error {
    match error {
        MembershipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("membership repository unavailable: {message}"))
        }
        MembershipRepositoryError::Query { message } => {
            Error::internal(format!("membership repository error: {message}"))
        }
        MembershipRepositoryError::UnknownRecipe => recipe_not_found(recipe),
    }
}

fn map_recipe_error(error: RecipePersistenceError) -> Error {
    match error {
        RecipePersistenceError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        other => Error::internal(format!("recipe repository error: {other}")),
    }
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

#[async_trait]
impl<R, M> MembershipCommand for MembershipService<R, M>
where
    R: RecipeRepository,
    M: MembershipRepository,
{
    async fn add(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let summary = self
            .recipes
            .find_summary(recipe)
            .await
            .map_err(map_recipe_error)?
            .ok_or_else(|| recipe_not_found(recipe))?;
        let inserted = self
            .memberships
            .add(kind, user, recipe)
            .await
            .map_err(|err| map_membership_error(err, recipe))?;
        if !inserted {
            return Err(Error::conflict(format!("recipe is already in {kind}")));
        }
        Ok(summary)
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<(), Error> {
        let removed = self
            .memberships
            .remove(kind, user, recipe)
            .await
            .map_err(|err| map_membership_error(err, recipe))?;
        if removed {
            Ok(())
        } else {
            Err(Error::relation_absent(format!("recipe is not in {kind}")))
        }
    }
}

#[cfg(test)]
#[path = "membership_service_tests.rs"]
mod tests;
