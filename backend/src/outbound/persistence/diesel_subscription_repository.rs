//! PostgreSQL-backed follow relationships.
//!
//! The composite primary key and the `subscriptions_not_self_check` CHECK
//! constraint are the arbiters for duplicate and reflexive follows.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{User, UserId};

use super::diesel_helpers::{
    ViolationKind, collect_rows, constraint_violation, map_basic_diesel_error,
    map_basic_pool_error, warn_unrecognised_violation,
};
use super::models::{SubscriptionRow, UserRow};
use super::pool::{DbPool, PoolError};
use super::schema::{subscriptions, users};

/// Diesel-backed implementation of the subscription repository port.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubscriptionRepositoryError {
    map_basic_pool_error(error, SubscriptionRepositoryError::connection)
}

fn map_diesel_error(error: diesel::result::Error) -> SubscriptionRepositoryError {
    if let Some(violation) = constraint_violation(&error) {
        match violation.kind {
            ViolationKind::Check if violation.is("subscriptions_not_self_check") => {
                return SubscriptionRepositoryError::self_subscription();
            }
            ViolationKind::ForeignKey if violation.is("subscriptions_author_id_fkey") => {
                return SubscriptionRepositoryError::unknown_author();
            }
            _ => warn_unrecognised_violation(&violation, "subscription write"),
        }
    }
    map_basic_diesel_error(
        error,
        SubscriptionRepositoryError::query,
        SubscriptionRepositoryError::connection,
    )
}

fn uuids(ids: &[UserId]) -> Vec<Uuid> {
    ids.iter().map(|id| *id.as_uuid()).collect()
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn subscribe(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = SubscriptionRow {
            user_id: *user.as_uuid(),
            author_id: *author.as_uuid(),
        };
        let inserted = diesel::insert_into(subscriptions::table)
            .values(&row)
            .on_conflict((subscriptions::user_id, subscriptions::author_id))
            .do_nothing()
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(inserted > 0)
    }

    async fn unsubscribe(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(
            subscriptions::table
                .filter(subscriptions::user_id.eq(user.as_uuid()))
                .filter(subscriptions::author_id.eq(author.as_uuid())),
        )
        .execute(&mut conn)
        .await
        .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn followed_among(
        &self,
        user: &UserId,
        authors: &[UserId],
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError> {
        if authors.is_empty() {
            return Ok(Vec::new());
        }
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let followed: Vec<Uuid> = subscriptions::table
            .filter(subscriptions::user_id.eq(user.as_uuid()))
            .filter(subscriptions::author_id.eq_any(uuids(authors)))
            .select(subscriptions::author_id)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(followed.into_iter().map(UserId::from_uuid).collect())
    }

    async fn followed_authors(
        &self,
        user: &UserId,
    ) -> Result<Vec<User>, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = subscriptions::table
            .inner_join(users::table.on(users::id.eq(subscriptions::author_id)))
            .filter(subscriptions::user_id.eq(user.as_uuid()))
            .select(UserRow::as_select())
            .order_by(users::username.asc())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        collect_rows(
            rows.into_iter().map(UserRow::into_user),
            SubscriptionRepositoryError::query,
        )
    }
}
