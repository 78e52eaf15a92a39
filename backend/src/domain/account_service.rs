//! Account domain service.
//!
//! Implements login, registration, password changes, avatars and the user
//! listing on top of the user and subscription repositories.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::warn;

use crate::domain::ports::{
    AccountCommand, ImageCategory, ImageStore, LoginService, PasswordHasher, PasswordHasherError,
    SubscriptionRepository, SubscriptionRepositoryError, UserPersistenceError, UserRepository,
    UsersQuery,
};
use crate::domain::{
    Error, FieldErrors, ImageUpload, LoginCredentials, NewPassword, Registration, User, UserId,
    UserProfile,
};

/// Account service implementing the login, account and user query ports.
#[derive(Clone)]
pub struct AccountService<U, S, H, I> {
    users: Arc<U>,
    subscriptions: Arc<S>,
    hasher: Arc<H>,
    images: Arc<I>,
}

impl<U, S, H, I> AccountService<U, S, H, I> {
    /// Create a new service with the given adapters.
    pub fn new(users: Arc<U>, subscriptions: Arc<S>, hasher: Arc<H>, images: Arc<I>) -> Self {
        Self {
            users,
            subscriptions,
            hasher,
            images,
        }
    }
}

fn map_user_error(error: UserPersistenceError) -> Error {
    match error {
        UserPersistenceError::Connection { message } => {
            Error::service_unavailable(format!("user repository unavailable: {message}"))
        }
        UserPersistenceError::Query { message } => {
            Error::internal(format!("user repository error: {message}"))
        }
        UserPersistenceError::DuplicateEmail => {
            FieldErrors::single_error("email", "email is already registered")
        }
        UserPersistenceError::DuplicateUsername => {
            FieldErrors::single_error("username", "username is already taken")
        }
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

fn map_hasher_error(error: PasswordHasherError) -> Error {
    Error::internal(error.to_string())
}

fn invalid_credentials() -> Error {
    Error::unauthorized("invalid credentials")
}

impl<U, S, H, I> AccountService<U, S, H, I>
where
    U: UserRepository,
    S: SubscriptionRepository,
    H: PasswordHasher,
    I: ImageStore,
{
    async fn followed(
        &self,
        viewer: Option<&UserId>,
        users: &[User],
    ) -> Result<HashSet<UserId>, Error> {
        let Some(viewer) = viewer else {
            return Ok(HashSet::new());
        };
        let ids: Vec<UserId> = users.iter().map(|user| user.id().clone()).collect();
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let followed = self
            .subscriptions
            .followed_among(viewer, &ids)
            .await
            .map_err(map_subscription_error)?;
        Ok(followed.into_iter().collect())
    }

    async fn discard_image(&self, path: &str) {
        if let Err(err) = self.images.remove(path).await {
            warn!(path, error = %err, "failed to remove replaced avatar");
        }
    }
}

#[async_trait]
impl<U, S, H, I> LoginService for AccountService<U, S, H, I>
where
    U: UserRepository,
    S: SubscriptionRepository,
    H: PasswordHasher,
    I: ImageStore,
{
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<UserId, Error> {
        let stored = self
            .users
            .find_credentials_by_email(credentials.email())
            .await
            .map_err(map_user_error)?
            .ok_or_else(invalid_credentials)?;
        let matches = self
            .hasher
            .verify(credentials.password(), &stored.password_hash)
            .map_err(map_hasher_error)?;
        if matches {
            Ok(stored.user_id)
        } else {
            Err(invalid_credentials())
        }
    }
}

#[async_trait]
impl<U, S, H, I> AccountCommand for AccountService<U, S, H, I>
where
    U: UserRepository,
    S: SubscriptionRepository,
    H: PasswordHasher,
    I: ImageStore,
{
    async fn register(&self, registration: Registration) -> Result<User, Error> {
        let hash = self
            .hasher
            .hash(registration.password.expose())
            .map_err(map_hasher_error)?;
        let user = User::new(
            UserId::random(),
            registration.email,
            registration.username,
            registration.first_name,
            registration.last_name,
        );
        self.users
            .create(&user, &hash)
            .await
            .map_err(map_user_error)?;
        Ok(user)
    }

    async fn set_password(
        &self,
        user: &UserId,
        current_password: &str,
        new_password: NewPassword,
    ) -> Result<(), Error> {
        let stored = self
            .users
            .find_password_hash(user)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::unauthorized("account no longer exists"))?;
        let matches = self
            .hasher
            .verify(current_password, &stored)
            .map_err(map_hasher_error)?;
        if !matches {
            return Err(FieldErrors::single_error(
                "current_password",
                "current password is incorrect",
            ));
        }
        let hash = self
            .hasher
            .hash(new_password.expose())
            .map_err(map_hasher_error)?;
        self.users
            .update_password(user, &hash)
            .await
            .map_err(map_user_error)
    }

    async fn update_avatar(&self, user: &UserId, image: ImageUpload) -> Result<String, Error> {
        let path = self
            .images
            .store(ImageCategory::Avatar, &image)
            .await
            .map_err(|err| Error::internal(err.to_string()))?;
        let previous = match self.users.replace_avatar(user, Some(path.clone())).await {
            Ok(previous) => previous,
            Err(err) => {
                self.discard_image(&path).await;
                return Err(map_user_error(err));
            }
        };
        if let Some(previous) = previous {
            self.discard_image(&previous).await;
        }
        Ok(path)
    }

    async fn clear_avatar(&self, user: &UserId) -> Result<(), Error> {
        let previous = self
            .users
            .replace_avatar(user, None)
            .await
            .map_err(map_user_error)?;
        if let Some(previous) = previous {
            self.discard_image(&previous).await;
        }
        Ok(())
    }
}

#[async_trait]
impl<U, S, H, I> UsersQuery for AccountService<U, S, H, I>
where
    U: UserRepository,
    S: SubscriptionRepository,
    H: PasswordHasher,
    I: ImageStore,
{
    async fn list_users<'a>(
        &self,
        viewer: Option<&'a UserId>,
    ) -> Result<Vec<UserProfile>, Error> {
        let users = self.users.list().await.map_err(map_user_error)?;
        let followed = self.followed(viewer, &users).await?;
        Ok(users
            .into_iter()
            .map(|user| UserProfile {
                is_subscribed: followed.contains(user.id()),
                user,
            })
            .collect())
    }

    async fn get_user<'a>(
        &self,
        viewer: Option<&'a UserId>,
        id: &UserId,
    ) -> Result<UserProfile, Error> {
        let user = self
            .users
            .find_by_id(id)
            .await
            .map_err(map_user_error)?
            .ok_or_else(|| Error::not_found(format!("user {id} not found")))?;
        let followed = self.followed(viewer, std::slice::from_ref(&user)).await?;
        Ok(UserProfile {
            is_subscribed: followed.contains(user.id()),
            user,
        })
    }
}

#[cfg(test)]
#[path = "account_service_tests.rs"]
mod tests;
