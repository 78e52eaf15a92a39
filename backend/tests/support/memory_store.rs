//! In-memory implementation of every repository port.
//!
//! One `MemoryStore` stands in for the database: all repositories share its
//! state, so writes through one port are visible through the others.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use foodgram::domain::ports::{
    CatalogueRepository, CatalogueRepositoryError, MembershipRepository,
    MembershipRepositoryError, RecipeOwnership, RecipePersistenceError, RecipeRepository,
    RecipeWrite, ShoppingListRepository, ShoppingListRepositoryError, ShortCodeLookup,
    ShortLinkRepository, ShortLinkRepositoryError, StoredCredentials, SubscriptionRepository,
    SubscriptionRepositoryError, UserPersistenceError, UserRepository,
};
use foodgram::domain::{
    Ingredient, IngredientId, IngredientSearch, MembershipKind, PasswordHash, Recipe,
    RecipeFilter, RecipeId, RecipeIngredientLine, RecipeSummary, ShoppingItem, ShortCode, Tag,
    TagId, User, UserId,
};

struct StoredRecipe {
    id: RecipeId,
    author: UserId,
    write: RecipeWrite,
    image: String,
    created_at: DateTime<Utc>,
    short_code: Option<ShortCode>,
}

#[derive(Default)]
struct State {
    users: Vec<(User, PasswordHash)>,
    tags: Vec<Tag>,
    ingredients: Vec<Ingredient>,
    recipes: Vec<StoredRecipe>,
    next_recipe_id: i64,
    favorites: BTreeSet<(String, i64)>,
    cart: BTreeSet<(String, i64)>,
    follows: BTreeSet<(String, String)>,
}

impl State {
    fn user(&self, id: &UserId) -> Option<&User> {
        self.users
            .iter()
            .map(|(user, _)| user)
            .find(|user| user.id() == id)
    }

    fn set(&mut self, kind: MembershipKind) -> &mut BTreeSet<(String, i64)> {
        match kind {
            MembershipKind::Favorite => &mut self.favorites,
            MembershipKind::Cart => &mut self.cart,
        }
    }

    fn hydrate(&self, stored: &StoredRecipe) -> Option<Recipe> {
        let author = self.user(&stored.author)?.clone();
        let tags = stored
            .write
            .tags
            .iter()
            .filter_map(|id| self.tags.iter().find(|tag| tag.id == *id).cloned())
            .collect();
        let ingredients = stored
            .write
            .ingredients
            .iter()
            .filter_map(|(id, amount)| {
                self.ingredients
                    .iter()
                    .find(|ingredient| ingredient.id == *id)
                    .map(|ingredient| RecipeIngredientLine {
                        ingredient: ingredient.clone(),
                        amount: *amount,
                    })
            })
            .collect();
        Some(Recipe {
            id: stored.id,
            author,
            name: stored.write.name.clone(),
            image: stored.image.clone(),
            text: stored.write.text.clone(),
            cooking_time: stored.write.cooking_time,
            created_at: stored.created_at,
            tags,
            ingredients,
            short_code: stored.short_code.clone(),
        })
    }

    fn check_references(&self, write: &RecipeWrite) -> Result<(), RecipePersistenceError> {
        if !write
            .tags
            .iter()
            .all(|id| self.tags.iter().any(|tag| tag.id == *id))
        {
            return Err(RecipePersistenceError::unknown_tag());
        }
        if !write.ingredients.iter().all(|(id, _)| {
            self.ingredients
                .iter()
                .any(|ingredient| ingredient.id == *id)
        }) {
            return Err(RecipePersistenceError::unknown_ingredient());
        }
        Ok(())
    }

    fn newest_first(&self) -> Vec<&StoredRecipe> {
        let mut recipes: Vec<&StoredRecipe> = self.recipes.iter().collect();
        recipes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then(b.id.get().cmp(&a.id.get()))
        });
        recipes
    }

    fn lookup(&self, recipe: RecipeId) -> ShortCodeLookup {
        match self.recipes.iter().find(|stored| stored.id == recipe) {
            None => ShortCodeLookup::MissingRecipe,
            Some(StoredRecipe {
                short_code: None, ..
            }) => ShortCodeLookup::Unassigned,
            Some(StoredRecipe {
                short_code: Some(code),
                ..
            }) => ShortCodeLookup::Assigned(code.clone()),
        }
    }
}

/// Shared in-memory database.
#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    /// Store seeded with the given catalogue.
    pub fn with_catalogue(tags: Vec<Tag>, ingredients: Vec<Ingredient>) -> Self {
        Self {
            state: Mutex::new(State {
                tags,
                ingredients,
                next_recipe_id: 1,
                ..State::default()
            }),
        }
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl UserRepository for MemoryStore {
    async fn create(
        &self,
        user: &User,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock();
        if state
            .users
            .iter()
            .any(|(existing, _)| existing.email() == user.email())
        {
            return Err(UserPersistenceError::duplicate_email());
        }
        if state
            .users
            .iter()
            .any(|(existing, _)| existing.username() == user.username())
        {
            return Err(UserPersistenceError::duplicate_username());
        }
        state.users.push((user.clone(), password_hash.clone()));
        Ok(())
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        Ok(self.lock().user(id).cloned())
    }

    async fn list(&self) -> Result<Vec<User>, UserPersistenceError> {
        Ok(self.lock().users.iter().map(|(user, _)| user.clone()).collect())
    }

    async fn find_credentials_by_email(
        &self,
        email: &str,
    ) -> Result<Option<StoredCredentials>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| user.email().as_ref() == email)
            .map(|(user, hash)| StoredCredentials {
                user_id: user.id().clone(),
                password_hash: hash.clone(),
            }))
    }

    async fn find_password_hash(
        &self,
        id: &UserId,
    ) -> Result<Option<PasswordHash>, UserPersistenceError> {
        Ok(self
            .lock()
            .users
            .iter()
            .find(|(user, _)| user.id() == id)
            .map(|(_, hash)| hash.clone()))
    }

    async fn update_password(
        &self,
        id: &UserId,
        password_hash: &PasswordHash,
    ) -> Result<(), UserPersistenceError> {
        let mut state = self.lock();
        if let Some((_, hash)) = state.users.iter_mut().find(|(user, _)| user.id() == id) {
            *hash = password_hash.clone();
        }
        Ok(())
    }

    async fn replace_avatar(
        &self,
        id: &UserId,
        avatar: Option<String>,
    ) -> Result<Option<String>, UserPersistenceError> {
        let mut state = self.lock();
        let Some((user, _)) = state.users.iter_mut().find(|(user, _)| user.id() == id) else {
            return Err(UserPersistenceError::query("user vanished"));
        };
        let previous = user.avatar().map(str::to_owned);
        *user = user.clone().with_avatar(avatar);
        Ok(previous)
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn subscribe(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut state = self.lock();
        if user == author {
            return Err(SubscriptionRepositoryError::self_subscription());
        }
        if state.user(author).is_none() {
            return Err(SubscriptionRepositoryError::unknown_author());
        }
        Ok(state.follows.insert((user.to_string(), author.to_string())))
    }

    async fn unsubscribe(
        &self,
        user: &UserId,
        author: &UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        Ok(self
            .lock()
            .follows
            .remove(&(user.to_string(), author.to_string())))
    }

    async fn followed_among(
        &self,
        user: &UserId,
        authors: &[UserId],
    ) -> Result<Vec<UserId>, SubscriptionRepositoryError> {
        let state = self.lock();
        Ok(authors
            .iter()
            .filter(|author| {
                state
                    .follows
                    .contains(&(user.to_string(), author.to_string()))
            })
            .cloned()
            .collect())
    }

    async fn followed_authors(
        &self,
        user: &UserId,
    ) -> Result<Vec<User>, SubscriptionRepositoryError> {
        let state = self.lock();
        let follower = user.to_string();
        Ok(state
            .users
            .iter()
            .map(|(author, _)| author)
            .filter(|author| {
                state
                    .follows
                    .contains(&(follower.clone(), author.id().to_string()))
            })
            .cloned()
            .collect())
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn create(
        &self,
        author: &UserId,
        recipe: &RecipeWrite,
        created_at: DateTime<Utc>,
    ) -> Result<RecipeId, RecipePersistenceError> {
        let mut state = self.lock();
        state.check_references(recipe)?;
        let image = recipe
            .image
            .clone()
            .ok_or_else(|| RecipePersistenceError::query("image is required on create"))?;
        let id = RecipeId::new(state.next_recipe_id);
        state.next_recipe_id += 1;
        state.recipes.push(StoredRecipe {
            id,
            author: author.clone(),
            write: recipe.clone(),
            image,
            created_at,
            short_code: None,
        });
        Ok(id)
    }

    async fn update(
        &self,
        id: RecipeId,
        recipe: &RecipeWrite,
    ) -> Result<bool, RecipePersistenceError> {
        let mut state = self.lock();
        state.check_references(recipe)?;
        let Some(stored) = state.recipes.iter_mut().find(|stored| stored.id == id) else {
            return Ok(false);
        };
        if let Some(image) = &recipe.image {
            stored.image = image.clone();
        }
        stored.write = recipe.clone();
        Ok(true)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipePersistenceError> {
        let mut state = self.lock();
        let before = state.recipes.len();
        state.recipes.retain(|stored| stored.id != id);
        let deleted = state.recipes.len() < before;
        if deleted {
            state.favorites.retain(|(_, recipe)| *recipe != id.get());
            state.cart.retain(|(_, recipe)| *recipe != id.get());
        }
        Ok(deleted)
    }

    async fn find(&self, id: RecipeId) -> Result<Option<Recipe>, RecipePersistenceError> {
        let state = self.lock();
        Ok(state
            .recipes
            .iter()
            .find(|stored| stored.id == id)
            .and_then(|stored| state.hydrate(stored)))
    }

    async fn find_ownership(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeOwnership>, RecipePersistenceError> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| RecipeOwnership {
                author: stored.author.clone(),
                image: stored.image.clone(),
            }))
    }

    async fn find_summary(
        &self,
        id: RecipeId,
    ) -> Result<Option<RecipeSummary>, RecipePersistenceError> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .find(|stored| stored.id == id)
            .map(|stored| RecipeSummary {
                id: stored.id,
                name: stored.write.name.clone(),
                image: stored.image.clone(),
                cooking_time: stored.write.cooking_time,
            }))
    }

    async fn list(&self, filter: &RecipeFilter) -> Result<Vec<Recipe>, RecipePersistenceError> {
        let state = self.lock();
        let in_set = |set: &BTreeSet<(String, i64)>, user: &Option<UserId>, id: RecipeId| {
            user.as_ref()
                .is_none_or(|user| set.contains(&(user.to_string(), id.get())))
        };
        Ok(state
            .newest_first()
            .into_iter()
            .filter(|stored| filter.author.as_ref().is_none_or(|author| &stored.author == author))
            .filter(|stored| in_set(&state.favorites, &filter.favorited_by, stored.id))
            .filter(|stored| in_set(&state.cart, &filter.in_cart_of, stored.id))
            .filter_map(|stored| state.hydrate(stored))
            .filter(|recipe| {
                filter.tag_slugs.is_empty()
                    || recipe
                        .tags
                        .iter()
                        .any(|tag| filter.tag_slugs.contains(&tag.slug))
            })
            .collect())
    }

    async fn author_summaries(
        &self,
        author: &UserId,
        limit: Option<i64>,
    ) -> Result<(Vec<RecipeSummary>, i64), RecipePersistenceError> {
        let state = self.lock();
        let by_author: Vec<RecipeSummary> = state
            .newest_first()
            .into_iter()
            .filter(|stored| &stored.author == author)
            .map(|stored| RecipeSummary {
                id: stored.id,
                name: stored.write.name.clone(),
                image: stored.image.clone(),
                cooking_time: stored.write.cooking_time,
            })
            .collect();
        let count = i64::try_from(by_author.len()).unwrap_or(i64::MAX);
        let take = limit
            .and_then(|limit| usize::try_from(limit).ok())
            .unwrap_or(by_author.len());
        Ok((by_author.into_iter().take(take).collect(), count))
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn add(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut state = self.lock();
        if !state.recipes.iter().any(|stored| stored.id == recipe) {
            return Err(MembershipRepositoryError::unknown_recipe());
        }
        Ok(state.set(kind).insert((user.to_string(), recipe.get())))
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        Ok(self
            .lock()
            .set(kind)
            .remove(&(user.to_string(), recipe.get())))
    }

    async fn members_among(
        &self,
        kind: MembershipKind,
        user: &UserId,
        recipes: &[RecipeId],
    ) -> Result<Vec<RecipeId>, MembershipRepositoryError> {
        let mut state = self.lock();
        let set = state.set(kind);
        Ok(recipes
            .iter()
            .filter(|recipe| set.contains(&(user.to_string(), recipe.get())))
            .copied()
            .collect())
    }
}

#[async_trait]
impl CatalogueRepository for MemoryStore {
    async fn list_tags(&self) -> Result<Vec<Tag>, CatalogueRepositoryError> {
        Ok(self.lock().tags.clone())
    }

    async fn find_tag(&self, id: TagId) -> Result<Option<Tag>, CatalogueRepositoryError> {
        Ok(self.lock().tags.iter().find(|tag| tag.id == id).cloned())
    }

    async fn list_ingredients(
        &self,
        search: &IngredientSearch,
    ) -> Result<Vec<Ingredient>, CatalogueRepositoryError> {
        Ok(self
            .lock()
            .ingredients
            .iter()
            .filter(|ingredient| search.matches(ingredient))
            .cloned()
            .collect())
    }

    async fn find_ingredient(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, CatalogueRepositoryError> {
        Ok(self
            .lock()
            .ingredients
            .iter()
            .find(|ingredient| ingredient.id == id)
            .cloned())
    }
}

#[async_trait]
impl ShoppingListRepository for MemoryStore {
    async fn cart_totals(
        &self,
        user: &UserId,
    ) -> Result<Vec<ShoppingItem>, ShoppingListRepositoryError> {
        let state = self.lock();
        let owner = user.to_string();
        let mut totals: BTreeMap<(String, String), i64> = BTreeMap::new();
        for stored in &state.recipes {
            if !state.cart.contains(&(owner.clone(), stored.id.get())) {
                continue;
            }
            for (id, amount) in &stored.write.ingredients {
                if let Some(ingredient) = state.ingredients.iter().find(|i| i.id == *id) {
                    *totals
                        .entry((ingredient.name.clone(), ingredient.measurement_unit.clone()))
                        .or_default() += i64::from(*amount);
                }
            }
        }
        Ok(totals
            .into_iter()
            .map(|((name, unit), total)| ShoppingItem::new(name, unit, total))
            .collect())
    }
}

#[async_trait]
impl ShortLinkRepository for MemoryStore {
    async fn lookup(&self, recipe: RecipeId) -> Result<ShortCodeLookup, ShortLinkRepositoryError> {
        Ok(self.lock().lookup(recipe))
    }

    async fn code_in_use(&self, code: &ShortCode) -> Result<bool, ShortLinkRepositoryError> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .any(|stored| stored.short_code.as_ref() == Some(code)))
    }

    async fn assign_if_absent(
        &self,
        recipe: RecipeId,
        code: &ShortCode,
    ) -> Result<ShortCodeLookup, ShortLinkRepositoryError> {
        let mut state = self.lock();
        if state
            .recipes
            .iter()
            .any(|stored| stored.short_code.as_ref() == Some(code))
        {
            return Err(ShortLinkRepositoryError::code_taken());
        }
        if let Some(stored) = state
            .recipes
            .iter_mut()
            .find(|stored| stored.id == recipe && stored.short_code.is_none())
        {
            stored.short_code = Some(code.clone());
        }
        Ok(state.lookup(recipe))
    }

    async fn resolve(
        &self,
        code: &ShortCode,
    ) -> Result<Option<RecipeId>, ShortLinkRepositoryError> {
        Ok(self
            .lock()
            .recipes
            .iter()
            .find(|stored| stored.short_code.as_ref() == Some(code))
            .map(|stored| stored.id))
    }
}
