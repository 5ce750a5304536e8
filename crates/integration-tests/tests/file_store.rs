#![allow(clippy::unwrap_used)]
// Persistence across process restarts: a fresh `AppState` over the same
// data directory picks up the cart and the session.

use std::num::NonZeroU32;

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use vitrina_core::ProductId;
use vitrina_integration_tests::{
    ACCESS_TOKEN, USER_ID, app_state, favorite_json, product_json, token_json,
};
use vitrina_storefront::models::keys;
use vitrina_storefront::storage::{FileStore, KeyValueStore};

#[tokio::test]
async fn test_cart_survives_restart() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json("p1", "Camisa", 19.99, "ropa", true),
            product_json("p2", "Botas", 850.0, "calzado", false),
        ])))
        .mount(&server)
        .await;

    {
        let (state, _log) = app_state(&server, dir.path());
        let botas = state.product(&ProductId::new("p2")).await.unwrap();
        let camisa = state.product(&ProductId::new("p1")).await.unwrap();
        state.cart().add_item(&botas, NonZeroU32::new(1).unwrap());
        state.cart().add_item(&camisa, NonZeroU32::new(3).unwrap());
    }

    let (state, _log) = app_state(&server, dir.path());
    let lines = state.cart().lines();
    let ids: Vec<_> = lines.iter().map(|l| l.id.as_str()).collect();
    assert_eq!(ids, vec!["p2", "p1"]);
    assert_eq!(state.cart().total_item_count(), 4);
    assert_eq!(state.cart().total_price().to_fixed(), "909.97");
}

#[tokio::test]
async fn test_corrupt_cart_file_starts_empty() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    FileStore::open(dir.path())
        .unwrap()
        .set(keys::CART, "[{\"id\": \"p1\", \"quantity\": 0}]")
        .unwrap();

    let (state, _log) = app_state(&server, dir.path());
    assert!(state.cart().lines().is_empty());
}

#[tokio::test]
async fn test_session_restored_on_startup() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let camisa = product_json("p1", "Camisa", 19.99, "ropa", true);

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(3600)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/favorites"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([favorite_json("f1", &camisa)])),
        )
        .mount(&server)
        .await;

    {
        let (state, _log) = app_state(&server, dir.path());
        state.sign_in("maria@tienda.mx", "cafe-de-olla").await.unwrap();
    }

    let (state, _log) = app_state(&server, dir.path());
    let identity = state.initialize().await.unwrap().unwrap();

    assert_eq!(identity.user_id().as_str(), USER_ID);
    assert!(state.favorites().is_favorite(&ProductId::new("p1")));
}

#[tokio::test]
async fn test_expired_session_is_refreshed_on_startup() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    // Tokens that are already expired when issued
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(-60)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(3600)))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    {
        let (state, _log) = app_state(&server, dir.path());
        state.sign_in("maria@tienda.mx", "cafe-de-olla").await.unwrap();
    }

    let (state, _log) = app_state(&server, dir.path());
    assert!(state.initialize().await.unwrap().is_some());
}

#[tokio::test]
async fn test_revoked_session_is_discarded_on_startup() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(-60)))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid Refresh Token: Refresh Token Not Found"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/rest/v1/favorites"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    {
        let (state, _log) = app_state(&server, dir.path());
        state.sign_in("maria@tienda.mx", "cafe-de-olla").await.unwrap();
    }

    let (state, _log) = app_state(&server, dir.path());
    assert!(state.initialize().await.unwrap().is_none());
    assert!(
        FileStore::open(dir.path())
            .unwrap()
            .get(keys::SESSION)
            .unwrap()
            .is_none()
    );
}
