//! PostgreSQL-backed `UserRepository` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::scoped_futures::ScopedFutureExt as _;
use diesel_async::{AsyncConnection as _, RunQueryDsl};

use crate::domain::ports::{StoredCredentials, UserPersistenceError, UserRepository};
use crate::domain::{PasswordHash, User, UserId};

use super::diesel_helpers::{
    collect_rows, constraint_violation, map_basic_diesel_error, map_basic_pool_error,
    warn_unrecognised_violation,
};
use super::models::{NewUserRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed implementation of the user repository port.
#[derive(Clone)]
pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    /// Create a new repository with the given connection pool.
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserPersistenceError {
    map_basic_pool_error(error, UserPersistenceError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> UserPersistenceError {
    if let Some(violation) = constraint_violation(&error) {
        if violation.is("users_email_key") {
            return UserPersistenceError::duplicate_email();
        }
        if violation.is("users_username_key") {
            return UserPersistenceError::duplicate_username();
        }
        warn_unrecognised_violation(&violation, "user write");
    }
    map_basic_diesel_error(
        error,
        UserPersistenceError::query,
        UserPersistenceError::connection,
    )
}

fn row_to_user(row: UserRow) -> Result<User, UserPersistenceError> {
    row.into_user().map_err(UserPersistenceError::query)
}

#[async_trait]
impl UserRepository for DieselUserRepository {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewUserRow {
            id: *user.id().as_uuid(),
            email: user.email().as_ref(),
            username: user.username().as_ref(),
            first_name: user.first_name().as_ref(),
            last_name: user.last_name().as_ref(),
            password_hash: password_hash.as_str(),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        row.map(row_to_user).transpose()
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .select(UserRow::as_select())
            .order_by(users::username.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(rows.into_iter().map(UserRow::into_user), UserPersistenceError::query)
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<(uuid::Uuid, String)> = users::table
            .filter(users::email.eq(email))
            .select((users::id, users::password_hash))
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(|(id, hash)| StoredCredentials {
            user_id: UserId::from_uuid(id),
            password_hash: PasswordHash::new(hash),
        }))
    }

    async fn find_password_hash(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let hash: Option<String> = users::table
            .filter(users::id.eq(id.as_uuid()))
            .select(users::password_hash)
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(hash.map(PasswordHash::new))
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::update(users::table.filter(users::id.eq(id.as_uuid())))
            .set(users::password_hash.eq(password_hash.as_str()))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(map_diesel_error)
    }

    async fn replace_avatar(
        &self,
        id: &UserId,
        avatar: Option<String>,
    ) -> Result<Option<String>, UserPersistenceError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *id.as_uuid();
        conn.transaction(|conn| {
            async move {
                // Lock the row so the returned path is the one replaced.
                let previous: Option<String> = users::table
                    .filter(users::id.eq(user_id))
                    .select(users::avatar)
                    .for_update()
                    .first(conn)
                    .await?;
                diesel::update(users::table.filter(users::id.eq(user_id)))
                    .set(users::avatar.eq(avatar))
                    .execute(conn)
                    .await?;
                Ok(previous)
            }
            .scope_boxed()
        })
        .await
        .map_err(map_diesel_error)
    }
}
