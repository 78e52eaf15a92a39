//! Short-link service: lazy code assignment and resolution.
//!
//! Codes are drawn at random, checked against storage and then written with
//! get-or-set semantics. The unique index on the code column decides races;
//! a lost race is retried with a fresh code up to [`SHORT_CODE_ATTEMPTS`]
//! times.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::SmallRng;
use tracing::debug;

use crate::domain::ports::{
    ShortCodeLookup, ShortLinkRepository, ShortLinkRepositoryError, ShortLinks,
};
use crate::domain::{Error, RecipeId, ShortCode};

/// Number of candidate codes tried before giving up.
pub const SHORT_CODE_ATTEMPTS: usize = 10;

/// Short-link service implementing [`ShortLinks`].
pub struct ShortLinkService<L> {
    repository: Arc<L>,
    rng: Mutex<SmallRng>,
}

impl<L> ShortLinkService<L> {
    /// Create a service drawing codes from an entropy-seeded generator.
    pub fn new(repository: Arc<L>) -> Self {
        Self {
            repository,
            rng: Mutex::new(SmallRng::from_entropy()),
        }
    }

    /// Create a service with a deterministic generator.
    pub fn with_seed(repository: Arc<L>, seed: u64) -> Self {
        Self {
            repository,
            rng: Mutex::new(SmallRng::seed_from_u64(seed)),
        }
    }

    fn next_code(&self) -> Result<ShortCode, Error> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| Error::internal("short code generator lock poisoned"))?;
        Ok(ShortCode::generate(&mut *rng))
    }
}

fn map_short_link_error(error: ShortLinkRepositoryError) -> Error {
    match error {
        ShortLinkRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("short link repository unavailable: {message}"))
        }
        other => Error::internal(format!("short link repository error: {other}")),
    }
}

fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found"))
}

#[async_trait]
impl<L> ShortLinks for ShortLinkService<L>
where
    L: ShortLinkRepository,
{
    async fn ensure_short_link(&self, recipe: RecipeId) -> Result<ShortCode, Error> {
        match self
            .repository
            .lookup(recipe)
            .await
            .map_err(map_short_link_error)?
        {
            ShortCodeLookup::Assigned(code) => return Ok(code),
            ShortCodeLookup::MissingRecipe => return Err(recipe_not_found(recipe)),
            ShortCodeLookup::Unassigned => {}
        }

        for attempt in 1..=SHORT_CODE_ATTEMPTS {
            let candidate = self.next_code()?;
            if self
                .repository
                .code_in_use(&candidate)
                .await
                .map_err(map_short_link_error)?
            {
                debug!(attempt, code = %candidate, "short code already in use");
                continue;
            }
            match self.repository.assign_if_absent(recipe, &candidate).await {
                Ok(ShortCodeLookup::Assigned(code)) => return Ok(code),
                Ok(ShortCodeLookup::MissingRecipe) => return Err(recipe_not_found(recipe)),
                Ok(ShortCodeLookup::Unassigned) => {
                    return Err(Error::internal("short code was not stored"));
                }
                Err(ShortLinkRepositoryError::CodeTaken) => {
                    debug!(attempt, code = %candidate, "short code taken concurrently");
                }
                Err(err) => return Err(map_short_link_error(err)),
            }
        }
        Err(Error::internal(format!(
            "no free short code after {SHORT_CODE_ATTEMPTS} attempts"
        )))
    }

    async fn resolve_short_link(&self, code: &str) -> Result<RecipeId, Error> {
        let not_found = || Error::not_found(format!("short link {code} not found"));
        let code = ShortCode::new(code).map_err(|_| not_found())?;
        self.repository
            .resolve(&code)
            .await
            .map_err(map_short_link_error)?
            .ok_or_else(not_found)
    }
}

#[cfg(test)]
#[path = "short_link_service_tests.rs"]
mod tests;
