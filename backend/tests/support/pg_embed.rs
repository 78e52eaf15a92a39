//! Embedded PostgreSQL harness for the Diesel adapter suites.
//!
//! Every test gets a fresh temporary database on a process-wide cluster, with
//! the embedded migrations applied through the production pool. Set
//! `SKIP_TEST_CLUSTER=1` where the cluster cannot start; otherwise a failed
//! bootstrap fails the test so CI breakage is not masked.

use std::time::Duration;

use diesel_async::RunQueryDsl;
use foodgram::domain::ports::{RecipeRepository, RecipeWrite, UserRepository};
use foodgram::domain::{
    Email, IngredientId, PasswordHash, PersonName, RecipeId, TagId, User, UserId, Username,
};
use foodgram::outbound::persistence::{
    DbPool, DieselRecipeRepository, DieselUserRepository, PoolConfig, run_migrations,
};
use pg_embedded_setup_unpriv::{BootstrapResult, ClusterHandle, TemporaryDatabase};
use tokio::runtime::Runtime;

const SHARED_CLUSTER_RETRIES: usize = 5;
const SHARED_CLUSTER_RETRY_DELAY: Duration = Duration::from_millis(500);

/// Ingredient ids seeded by [`TestDatabase::seed_catalogue`].
pub const FLOUR: IngredientId = IngredientId::new(1);
pub const EGG: IngredientId = IngredientId::new(2);
pub const SUGAR: IngredientId = IngredientId::new(3);
pub const BREAKFAST: TagId = TagId::new(1);

/// Returns true when `SKIP_TEST_CLUSTER` is "1", "true" or "yes".
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip with a marker when allowed, panic otherwise.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}

fn ensure_stable_password() {
    if std::env::var_os("PG_PASSWORD").is_none() {
        // SAFETY: runs before the library spawns any threads; the shared
        // cluster is created once per process.
        unsafe {
            std::env::set_var("PG_PASSWORD", "foodgram_embedded_test");
        }
    }
}

/// The process-wide cluster, retried while a parallel bootstrap settles.
pub fn shared_cluster_handle() -> BootstrapResult<&'static ClusterHandle> {
    ensure_stable_password();
    let mut attempt = 1;
    loop {
        match pg_embedded_setup_unpriv::test_support::shared_cluster_handle() {
            Ok(handle) => return Ok(handle),
            Err(error) => {
                if attempt >= SHARED_CLUSTER_RETRIES {
                    return Err(error);
                }
                std::thread::sleep(SHARED_CLUSTER_RETRY_DELAY);
                attempt += 1;
            }
        }
    }
}

/// A migrated temporary database plus the runtime that drives it.
///
/// Tests stay synchronous and `block_on` each call; never use this from
/// inside a Tokio runtime.
pub struct TestDatabase {
    pub runtime: Runtime,
    pub pool: DbPool,
    _database: TemporaryDatabase,
}

impl TestDatabase {
    pub fn new() -> Result<Self, String> {
        let runtime = Runtime::new().map_err(|err| err.to_string())?;
        let cluster = shared_cluster_handle().map_err(|err| format!("{err:?}"))?;
        let database = cluster
            .temporary_database(format!("foodgram_test_{}", uuid::Uuid::new_v4().simple()))
            .map_err(|err| format!("create database: {err:?}"))?;

        let config = PoolConfig::new(database.url().to_string())
            .with_max_size(2)
            .with_min_idle(Some(1));
        let pool = runtime
            .block_on(async {
                let pool = DbPool::new(config).await.map_err(|err| err.to_string())?;
                run_migrations(&pool).await.map_err(|err| err.to_string())?;
                Ok::<_, String>(pool)
            })?;

        Ok(Self {
            runtime,
            pool,
            _database: database,
        })
    }

    /// Insert the breakfast tag and the flour, egg and sugar ingredients.
    pub fn seed_catalogue(&self) {
        self.runtime.block_on(async {
            let mut conn = self.pool.get().await.expect("connection");
            diesel::sql_query(
                "INSERT INTO tags (id, name, slug) VALUES (1, 'Breakfast', 'breakfast')",
            )
            .execute(&mut conn)
            .await
            .expect("seed tags");
            diesel::sql_query(
                "INSERT INTO ingredients (id, name, measurement_unit) VALUES \
                 (1, 'flour', 'g'), (2, 'egg', 'pcs'), (3, 'sugar', 'g')",
            )
            .execute(&mut conn)
            .await
            .expect("seed ingredients");
        });
    }

    pub fn create_user(&self, username: &str) -> UserId {
        let user = User::new(
            UserId::random(),
            Email::new(format!("{username}@example.com")).expect("email"),
            Username::new(username).expect("username"),
            PersonName::new("Test", "first_name").expect("first name"),
            PersonName::new("Cook", "last_name").expect("last name"),
        );
        let users = DieselUserRepository::new(self.pool.clone());
        self.runtime
            .block_on(users.create(&user, &PasswordHash::new("$argon2id$stub")))
            .expect("create user");
        user.id().clone()
    }

    pub fn create_recipe(
        &self,
        author: &UserId,
        name: &str,
        ingredients: Vec<(IngredientId, i32)>,
    ) -> RecipeId {
        let recipes = DieselRecipeRepository::new(self.pool.clone());
        let write = RecipeWrite {
            name: name.to_owned(),
            text: format!("Make {name}."),
            cooking_time: 10,
            image: Some("recipes/images/test.png".to_owned()),
            tags: vec![BREAKFAST],
            ingredients,
        };
        self.runtime
            .block_on(recipes.create(author, &write, chrono::Utc::now()))
            .expect("create recipe")
    }

    /// Put `recipe` in `user`'s cart with a plain insert.
    pub fn add_to_cart(&self, user: &UserId, recipe: RecipeId) {
        self.runtime.block_on(async {
            let mut conn = self.pool.get().await.expect("connection");
            diesel::sql_query("INSERT INTO cart_items (user_id, recipe_id) VALUES ($1, $2)")
                .bind::<diesel::sql_types::Uuid, _>(*user.as_uuid())
                .bind::<diesel::sql_types::BigInt, _>(recipe.get())
                .execute(&mut conn)
                .await
                .expect("add to cart");
        });
    }
}

/// Fixture body shared by the suites.
pub fn test_database() -> Option<TestDatabase> {
    match TestDatabase::new() {
        Ok(database) => Some(database),
        Err(reason) => handle_cluster_setup_failure(reason),
    }
}
