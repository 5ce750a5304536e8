#![allow(clippy::unwrap_used)]
// HTTP contract tests for `SupabaseClient` using wiremock.

use chrono::Utc;
use secrecy::SecretString;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use vitrina_core::{Email, Price, ProductId, User, UserId};
use vitrina_integration_tests::{
    ACCESS_TOKEN, ANON_KEY, USER_ID, favorite_json, mock_supabase, product_json, token_json,
};
use vitrina_storefront::gateway::{AuthGateway, FavoritesGateway, GatewayError, ProductGateway};
use vitrina_storefront::models::Identity;

fn identity() -> Identity {
    Identity::new(
        User {
            id: UserId::new(USER_ID),
            email: Email::parse("maria@tienda.mx").unwrap(),
            name: None,
            created_at: Utc::now(),
        },
        SecretString::from(ACCESS_TOKEN),
    )
}

// ── Products ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_products() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .and(query_param("select", "*"))
        .and(query_param("order", "created_at.desc"))
        .and(header("apikey", ANON_KEY))
        .and(header("authorization", format!("Bearer {ANON_KEY}").as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            product_json("p1", "Camisa", 19.99, "ropa", true),
            product_json("p2", "Botas", 850.0, "calzado", false),
        ])))
        .expect(1)
        .mount(&server)
        .await;

    let products = client.list_products().await.unwrap();

    assert_eq!(products.len(), 2);
    assert_eq!(products[0].name, "Camisa");
    assert_eq!(products[0].price, Price::from_cents(1999));
    assert!(products[0].featured);
}

#[tokio::test]
async fn test_list_products_server_error() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(500).set_body_json(json!({
            "code": "XX000",
            "message": "internal error"
        })))
        .mount(&server)
        .await;

    let result = client.list_products().await;

    assert!(
        matches!(&result, Err(GatewayError::Api { status: 500, message }) if message == "internal error"),
        "expected Api error, got: {result:?}"
    );
}

#[tokio::test]
async fn test_rate_limited() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/products"))
        .respond_with(ResponseTemplate::new(429).insert_header("Retry-After", "12"))
        .mount(&server)
        .await;

    let result = client.list_products().await;
    assert!(matches!(result, Err(GatewayError::RateLimited(12))));
}

// ── Favorites ───────────────────────────────────────────────────────

#[tokio::test]
async fn test_list_favorites_scoped_to_user() {
    let (server, client) = mock_supabase().await;
    let camisa = product_json("p1", "Camisa", 19.99, "ropa", false);

    Mock::given(method("GET"))
        .and(path("/rest/v1/favorites"))
        .and(query_param(
            "select",
            "id,user_id,product_id,created_at,product:products(*)",
        ))
        .and(query_param("user_id", format!("eq.{USER_ID}").as_str()))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!([favorite_json("f1", &camisa)])),
        )
        .expect(1)
        .mount(&server)
        .await;

    let favorites = client.list_favorites(&identity()).await.unwrap();

    assert_eq!(favorites.len(), 1);
    assert_eq!(favorites[0].product_id, ProductId::new("p1"));
    assert_eq!(favorites[0].product.name, "Camisa");
}

#[tokio::test]
async fn test_insert_favorite() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/favorites"))
        .and(body_json(json!({ "user_id": USER_ID, "product_id": "p1" })))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;

    client
        .insert_favorite(&identity(), &ProductId::new("p1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_insert_duplicate_favorite_is_conflict() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("POST"))
        .and(path("/rest/v1/favorites"))
        .respond_with(ResponseTemplate::new(409).set_body_json(json!({
            "code": "23505",
            "message": "duplicate key value violates unique constraint \"favorites_user_id_product_id_key\""
        })))
        .mount(&server)
        .await;

    let result = client
        .insert_favorite(&identity(), &ProductId::new("p1"))
        .await;

    assert!(
        matches!(&result, Err(GatewayError::Conflict(msg)) if msg.contains("duplicate key")),
        "expected Conflict, got: {result:?}"
    );
}

#[tokio::test]
async fn test_delete_favorite_filters() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("DELETE"))
        .and(path("/rest/v1/favorites"))
        .and(query_param("user_id", format!("eq.{USER_ID}").as_str()))
        .and(query_param("product_id", "eq.p1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client
        .delete_favorite(&identity(), &ProductId::new("p1"))
        .await
        .unwrap();
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("GET"))
        .and(path("/rest/v1/favorites"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "code": "PGRST301",
            "message": "JWT expired"
        })))
        .mount(&server)
        .await;

    let result = client.list_favorites(&identity()).await;
    assert!(matches!(result, Err(GatewayError::Unauthorized(msg)) if msg == "JWT expired"));
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_sign_in_with_password() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "password"))
        .and(body_json(json!({ "email": "maria@tienda.mx", "password": "cafe-de-olla" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(3600)))
        .expect(1)
        .mount(&server)
        .await;

    let email = Email::parse("maria@tienda.mx").unwrap();
    let session = client
        .sign_in_with_password(&email, "cafe-de-olla")
        .await
        .unwrap();

    assert_eq!(session.user.id.as_str(), USER_ID);
    assert_eq!(session.user.name.as_deref(), Some("María"));
    assert_eq!(session.access_token, ACCESS_TOKEN);
    assert!(!session.is_expired(Utc::now()));
}

#[tokio::test]
async fn test_sign_in_wrong_password() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": "invalid_grant",
            "error_description": "Invalid login credentials"
        })))
        .mount(&server)
        .await;

    let email = Email::parse("maria@tienda.mx").unwrap();
    let result = client.sign_in_with_password(&email, "incorrecta").await;

    assert!(
        matches!(&result, Err(GatewayError::Api { status: 400, message }) if message == "Invalid login credentials"),
        "expected Api 400, got: {result:?}"
    );
}

#[tokio::test]
async fn test_sign_up_sends_name_metadata() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .and(body_json(json!({
            "email": "maria@tienda.mx",
            "password": "cafe-de-olla",
            "data": { "name": "María" }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(3600)))
        .expect(1)
        .mount(&server)
        .await;

    let email = Email::parse("maria@tienda.mx").unwrap();
    let session = client
        .sign_up(&email, "cafe-de-olla", Some("María"))
        .await
        .unwrap();
    assert!(session.is_some());
}

#[tokio::test]
async fn test_sign_up_requiring_confirmation() {
    let (server, client) = mock_supabase().await;

    // Bare user object, no tokens
    Mock::given(method("POST"))
        .and(path("/auth/v1/signup"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": USER_ID,
            "email": "maria@tienda.mx",
            "confirmation_sent_at": "2024-04-01T12:00:00Z",
            "created_at": "2024-04-01T12:00:00Z"
        })))
        .mount(&server)
        .await;

    let email = Email::parse("maria@tienda.mx").unwrap();
    let session = client.sign_up(&email, "cafe-de-olla", None).await.unwrap();
    assert!(session.is_none());
}

#[tokio::test]
async fn test_refresh_session() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/token"))
        .and(query_param("grant_type", "refresh_token"))
        .and(body_json(json!({ "refresh_token": "refresh-token-u1" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(token_json(3600)))
        .expect(1)
        .mount(&server)
        .await;

    let session = client.refresh_session("refresh-token-u1").await.unwrap();
    assert_eq!(session.user.id.as_str(), USER_ID);
}

#[tokio::test]
async fn test_sign_out_uses_user_token() {
    let (server, client) = mock_supabase().await;

    Mock::given(method("POST"))
        .and(path("/auth/v1/logout"))
        .and(header("authorization", format!("Bearer {ACCESS_TOKEN}").as_str()))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.sign_out(ACCESS_TOKEN).await.unwrap();
}
