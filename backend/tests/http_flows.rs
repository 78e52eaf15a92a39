//! End-to-end HTTP flows over the real services and an in-memory store.

mod support;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use serde_json::{Value, json};
use tempfile::TempDir;

use support::{PASSWORD, PIXEL, create_pancakes, init_app, login_as, register_user, seeded_store};

#[actix_web::test]
async fn account_lifecycle() {
    let media = TempDir::new().expect("tempdir");
    let app = init_app(seeded_store(), &media).await;

    let id = register_user(&app, "alice").await;
    let cookie = login_as(&app, "alice", PASSWORD).await;

    let me = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/users/me")
            .cookie(cookie.clone())
            .to_request(),
    )
    .await;
    assert_eq!(me.status(), StatusCode::OK);
    let body: Value = test::read_body_json(me).await;
    assert_eq!(body["id"], id.as_str());
    assert_eq!(body["isSubscribed"], false);

    let avatar = test::call_service(
        &app,
        test::TestRequest::put()
            .uri("/api/users/me/avatar")
            .cookie(cookie.clone())
            .set_json(json!({ "avatar": PIXEL }))
            .to_request(),
    )
    .await;
    assert_eq!(avatar.status(), StatusCode::OK);
    let body: Value = test::read_body_json(avatar).await;
    let url = body["avatar"].as_str().expect("avatar url");
    assert!(url.starts_with("http://foodgram.test/media/"), "{url}");

    let changed = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users/set_password")
            .cookie(cookie.clone())
            .set_json(json!({
                "current_password": PASSWORD,
                "new_password": "battery-staple",
            }))
            .to_request(),
    )
    .await;
    assert_eq!(changed.status(), StatusCode::NO_CONTENT);

    let stale = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({ "email": "alice@example.com", "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(stale.status(), StatusCode::UNAUTHORIZED);
    login_as(&app, "alice", "battery-staple").await;
}

#[actix_web::test]
async fn duplicate_registration_is_rejected() {
    let media = TempDir::new().expect("tempdir");
    let app = init_app(seeded_store(), &media).await;
    register_user(&app, "alice").await;

    let response = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/users")
            .set_json(json!({
                "email": "alice@example.com",
                "username": "alice2",
                "first_name": "A",
                "last_name": "B",
                "password": PASSWORD,
            }))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn cart_feeds_the_shopping_list() {
    let media = TempDir::new().expect("tempdir");
    let app = init_app(seeded_store(), &media).await;
    register_user(&app, "chef").await;
    register_user(&app, "diner").await;
    let chef = login_as(&app, "chef", PASSWORD).await;
    let diner = login_as(&app, "diner", PASSWORD).await;
    let recipe = create_pancakes(&app, &chef).await;
    create_pancakes(&app, &chef).await;

    for path in ["favorite", "shopping_cart"] {
        let added = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/recipes/{recipe}/{path}"))
                .cookie(diner.clone())
                .to_request(),
        )
        .await;
        assert_eq!(added.status(), StatusCode::CREATED, "{path}");
    }

    let again = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/recipes/{recipe}/shopping_cart"))
            .cookie(diner.clone())
            .to_request(),
    )
    .await;
    assert_eq!(again.status(), StatusCode::BAD_REQUEST);

    let listed = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/recipes?is_in_shopping_cart=1")
            .cookie(diner.clone())
            .to_request(),
    )
    .await;
    assert_eq!(listed.status(), StatusCode::OK);
    let body: Value = test::read_body_json(listed).await;
    let recipes = body.as_array().expect("array");
    assert_eq!(recipes.len(), 1);
    assert_eq!(recipes[0]["id"], recipe);
    assert_eq!(recipes[0]["isFavorited"], true);
    assert_eq!(recipes[0]["isInShoppingCart"], true);

    let download = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/api/recipes/download_shopping_cart")
            .cookie(diner.clone())
            .to_request(),
    )
    .await;
    assert_eq!(download.status(), StatusCode::OK);
    let disposition = download
        .headers()
        .get(header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .expect("disposition")
        .to_owned();
    assert!(disposition.contains("shopping_list.txt"), "{disposition}");
    let text = String::from_utf8(test::read_body(download).await.to_vec()).expect("utf-8");
    assert!(text.contains("flour (g)"), "{text}");
    assert!(text.contains("200"), "{text}");

    let removed = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/recipes/{recipe}/shopping_cart"))
            .cookie(diner.clone())
            .to_request(),
    )
    .await;
    assert_eq!(removed.status(), StatusCode::NO_CONTENT);

    let absent = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/recipes/{recipe}/shopping_cart"))
            .cookie(diner)
            .to_request(),
    )
    .await;
    assert_eq!(absent.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn only_the_author_may_delete() {
    let media = TempDir::new().expect("tempdir");
    let app = init_app(seeded_store(), &media).await;
    register_user(&app, "chef").await;
    register_user(&app, "critic").await;
    let chef = login_as(&app, "chef", PASSWORD).await;
    let critic = login_as(&app, "critic", PASSWORD).await;
    let recipe = create_pancakes(&app, &chef).await;

    let forbidden = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/recipes/{recipe}"))
            .cookie(critic)
            .to_request(),
    )
    .await;
    assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);

    let deleted = test::call_service(
        &app,
        test::TestRequest::delete()
            .uri(&format!("/api/recipes/{recipe}"))
            .cookie(chef)
            .to_request(),
    )
    .await;
    assert_eq!(deleted.status(), StatusCode::NO_CONTENT);

    let gone = test::call_service(
        &app,
        test::TestRequest::get()
            .uri(&format!("/api/recipes/{recipe}"))
            .to_request(),
    )
    .await;
    assert_eq!(gone.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn authorship_is_checked_before_the_body() {
    let media = TempDir::new().expect("tempdir");
    let app = init_app(seeded_store(), &media).await;
    register_user(&app, "chef").await;
    register_user(&app, "critic").await;
    let chef = login_as(&app, "chef", PASSWORD).await;
    let critic = login_as(&app, "critic", PASSWORD).await;
    let recipe = create_pancakes(&app, &chef).await;

    let by_critic = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/recipes/{recipe}"))
            .cookie(critic)
            .set_json(json!({"name": ""}))
            .to_request(),
    )
    .await;
    assert_eq!(by_critic.status(), StatusCode::FORBIDDEN);

    let by_chef = test::call_service(
        &app,
        test::TestRequest::patch()
            .uri(&format!("/api/recipes/{recipe}"))
            .cookie(chef)
            .set_json(json!({"name": ""}))
            .to_request(),
    )
    .await;
    assert_eq!(by_chef.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(by_chef).await;
    assert!(body["details"]["fields"]["name"].is_array());
}

#[actix_web::test]
async fn short_link_redirects_to_the_recipe() {
    let media = TempDir::new().expect("tempdir");
    let app = init_app(seeded_store(), &media).await;
    register_user(&app, "chef").await;
    let chef = login_as(&app, "chef", PASSWORD).await;
    let recipe = create_pancakes(&app, &chef).await;

    let link_of = |app_uri: String| test::TestRequest::get().uri(&app_uri).to_request();
    let first: Value = test::read_body_json(
        test::call_service(&app, link_of(format!("/api/recipes/{recipe}/get-link"))).await,
    )
    .await;
    let second: Value = test::read_body_json(
        test::call_service(&app, link_of(format!("/api/recipes/{recipe}/get-link"))).await,
    )
    .await;
    let link = first["shortLink"].as_str().expect("short link").to_owned();
    assert_eq!(first, second);

    let path = link
        .strip_prefix("http://foodgram.test")
        .expect("absolute link")
        .to_owned();
    let redirect = test::call_service(&app, link_of(path)).await;
    assert_eq!(redirect.status(), StatusCode::FOUND);
    assert_eq!(
        redirect
            .headers()
            .get(header::LOCATION)
            .and_then(|value| value.to_str().ok()),
        Some(format!("http://foodgram.test/recipes/{recipe}").as_str())
    );
}

#[actix_web::test]
async fn following_an_author() {
    let media = TempDir::new().expect("tempdir");
    let app = init_app(seeded_store(), &media).await;
    let chef_id = register_user(&app, "chef").await;
    register_user(&app, "fan").await;
    let chef = login_as(&app, "chef", PASSWORD).await;
    let fan = login_as(&app, "fan", PASSWORD).await;
    for _ in 0..3 {
        create_pancakes(&app, &chef).await;
    }

    let subscribe_uri = format!("/api/users/{chef_id}/subscribe?recipes_limit=2");
    let followed = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&subscribe_uri)
            .cookie(fan.clone())
            .to_request(),
    )
    .await;
    assert_eq!(followed.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(followed).await;
    assert_eq!(body["isSubscribed"], true);
    assert_eq!(body["recipesCount"], 3);
    assert_eq!(body["recipes"].as_array().map(Vec::len), Some(2));

    let repeat = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&subscribe_uri)
            .cookie(fan.clone())
            .to_request(),
    )
    .await;
    assert_eq!(repeat.status(), StatusCode::BAD_REQUEST);

    let listed: Value = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/users/subscriptions")
                .cookie(fan.clone())
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(listed[0]["username"], "chef");

    let self_follow = test::call_service(
        &app,
        test::TestRequest::post()
            .uri(&format!("/api/users/{chef_id}/subscribe"))
            .cookie(chef)
            .to_request(),
    )
    .await;
    assert_eq!(self_follow.status(), StatusCode::BAD_REQUEST);

    for expected in [StatusCode::NO_CONTENT, StatusCode::BAD_REQUEST] {
        let response = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/users/{chef_id}/subscribe"))
                .cookie(fan.clone())
                .to_request(),
        )
        .await;
        assert_eq!(response.status(), expected);
    }
}

#[actix_web::test]
async fn catalogue_is_public() {
    let media = TempDir::new().expect("tempdir");
    let app = init_app(seeded_store(), &media).await;

    let tags: Value = test::read_body_json(
        test::call_service(&app, test::TestRequest::get().uri("/api/tags").to_request()).await,
    )
    .await;
    assert_eq!(tags[0]["slug"], "breakfast");

    let ingredients: Value = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/ingredients?name=FL")
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(ingredients[0]["measurementUnit"], "g");

    let none: Value = test::read_body_json(
        test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/ingredients?name=sugar")
                .to_request(),
        )
        .await,
    )
    .await;
    assert_eq!(none, json!([]));
}
