//! Test helpers for inbound HTTP components.

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, Resource, test, web};
use std::sync::Arc;
use url::Url;

use crate::domain::ports::{
    MockAccountCommand, MockCatalogueQuery, MockLoginService, MockMembershipCommand,
    MockRecipesCommand, MockRecipesQuery, MockShoppingListExport, MockShortLinks,
    MockSubscriptionsCommand, MockSubscriptionsQuery, MockUsersQuery,
};
use crate::domain::{Error, UserId};

use super::session::SessionContext;
use super::state::{HttpState, HttpStatePorts};

/// Public origin used by handler tests.
pub const TEST_BASE_URL: &str = "http://foodgram.test/";

const TEST_LOGIN_PATH: &str = "/__test/session/{id}";

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// Route that signs in the user named in the path, so tests can obtain a
/// session cookie without going through password login.
pub fn test_login_resource() -> Resource {
    web::resource(TEST_LOGIN_PATH).route(web::post().to(
        |session: SessionContext, id: web::Path<String>| async move {
            let user = UserId::new(id.into_inner())
                .map_err(|err| Error::invalid_request(err.to_string()))?;
            session.persist_user(&user)?;
            Ok::<_, Error>(HttpResponse::NoContent().finish())
        },
    ))
}

/// Session cookie for `user`, issued by [`test_login_resource`].
pub async fn session_cookie<S>(app: &S, user: &UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = test::TestRequest::post()
        .uri(&format!("/__test/session/{user}"))
        .to_request();
    let response = test::call_service(app, request).await;
    assert!(response.status().is_success(), "test login failed");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .expect("session cookie set")
        .into_owned()
}

/// Every driving port as a fresh mock. Set expectations on the fields a test
/// needs, then call [`MockPorts::into_state`].
#[derive(Default)]
pub struct MockPorts {
    pub login: MockLoginService,
    pub accounts: MockAccountCommand,
    pub users: MockUsersQuery,
    pub catalogue: MockCatalogueQuery,
    pub recipes: MockRecipesCommand,
    pub recipes_query: MockRecipesQuery,
    pub memberships: MockMembershipCommand,
    pub subscriptions: MockSubscriptionsCommand,
    pub subscriptions_query: MockSubscriptionsQuery,
    pub shopping_list: MockShoppingListExport,
    pub short_links: MockShortLinks,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        let base_url = Url::parse(TEST_BASE_URL).expect("test base url");
        web::Data::new(HttpState::new(
            HttpStatePorts {
                login: Arc::new(self.login),
                accounts: Arc::new(self.accounts),
                users: Arc::new(self.users),
                catalogue: Arc::new(self.catalogue),
                recipes: Arc::new(self.recipes),
                recipes_query: Arc::new(self.recipes_query),
                memberships: Arc::new(self.memberships),
                subscriptions: Arc::new(self.subscriptions),
                subscriptions_query: Arc::new(self.subscriptions_query),
                shopping_list: Arc::new(self.shopping_list),
                short_links: Arc::new(self.short_links),
            },
            base_url,
        ))
    }
}

/// A valid user named `username`, with an `@example.com` address.
pub fn sample_user(username: &str) -> crate::domain::User {
    use crate::domain::{Email, PersonName, User, Username};

    User::new(
        UserId::random(),
        Email::new(format!("{username}@example.com")).expect("fixture email"),
        Username::new(username).expect("fixture username"),
        PersonName::new("Julia", "first_name").expect("fixture first name"),
        PersonName::new("Child", "last_name").expect("fixture last name"),
    )
}

/// A recipe by `author` with one tag and one ingredient line.
pub fn sample_recipe(id: i64, author: crate::domain::User) -> crate::domain::Recipe {
    use crate::domain::{
        Ingredient, IngredientId, Recipe, RecipeId, RecipeIngredientLine, Tag, TagId,
    };
    use chrono::{TimeZone, Utc};

    Recipe {
        id: RecipeId::new(id),
        author,
        name: "Pancakes".to_owned(),
        image: "recipes/images/pancakes.png".to_owned(),
        text: "Mix and fry.".to_owned(),
        cooking_time: 20,
        created_at: Utc.with_ymd_and_hms(2026, 1, 5, 12, 0, 0).single().expect("fixture time"),
        tags: vec![Tag {
            id: TagId::new(1),
            name: "Breakfast".to_owned(),
            slug: "breakfast".to_owned(),
        }],
        ingredients: vec![RecipeIngredientLine {
            ingredient: Ingredient {
                id: IngredientId::new(7),
                name: "flour".to_owned(),
                measurement_unit: "g".to_owned(),
            },
            amount: 200,
        }],
        short_code: None,
    }
}
