#![allow(dead_code)]

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Method, Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

use portal_api::auth::jwt::{generate_access_token, JwtConfig};
use portal_api::config::ServerConfig;
use portal_api::router::build_app_router;
use portal_api::state::AppState;
use portal_db::models::user::{CreateUser, User};
use portal_db::repositories::UserRepo;

const TEST_JWT_SECRET: &str = "portal-test-secret-do-not-use-in-production";

/// Build a test `ServerConfig` with safe defaults.
///
/// Uses `http://localhost:5173` as CORS origin (matching the dev default)
/// and short assignment deadlines.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        shutdown_timeout_secs: 30,
        assign_next_timeout_secs: 5,
        rebalance_timeout_secs: 10,
        jwt: JwtConfig {
            secret: TEST_JWT_SECRET.to_string(),
            access_token_expiry_mins: 15,
        },
    }
}

/// Build the production router around the given pool.
pub fn build_test_app(pool: PgPool) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
    };
    build_app_router(state, &config)
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// Insert a user with the given role. The email doubles as the external id.
pub async fn create_user(pool: &PgPool, email: &str, role: &str) -> User {
    UserRepo::create(
        pool,
        &CreateUser {
            external_id: format!("ext|{email}"),
            email: email.to_string(),
            role: Some(role.to_string()),
        },
    )
    .await
    .expect("user creation should succeed")
}

/// Mint a bearer token for a user.
pub fn token_for(user: &User) -> String {
    token_for_subject(&user.external_id, &user.email)
}

/// Mint a bearer token for an identity-provider subject that may not have
/// an account yet.
pub fn token_for_subject(subject: &str, email: &str) -> String {
    generate_access_token(subject, email, &test_config().jwt)
        .expect("token generation should succeed")
}

/// A profile payload that satisfies every required field.
pub fn complete_profile() -> serde_json::Value {
    serde_json::json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "phone_e164": "+15555550100",
        "age": 21,
        "country_of_residence": "US",
        "gender": "female",
        "race": "prefer_not_to_say",
        "ethnicity": "prefer_not_to_say",
        "university": "State University",
        "major": "Computer Science",
        "level_of_study": "undergraduate",
        "hackathons_attended_count": 2,
        "software_experience_level": "intermediate",
        "heard_about": "friend",
        "shirt_size": "M",
        "ack_application": true,
        "ack_mlh_coc": true,
        "ack_mlh_privacy": true
    })
}

/// Create a hacker, fill in their application and submit it.
pub async fn submitted_application(app: &Router, pool: &PgPool, email: &str) -> (User, i64) {
    let hacker = create_user(pool, email, "hacker").await;
    let token = token_for(&hacker);

    let response = patch_json_auth(
        app.clone(),
        "/api/v1/applications/me",
        complete_profile(),
        &token,
    )
    .await;
    assert_eq!(response.status(), 200);

    let response = post_auth(app.clone(), "/api/v1/applications/me/submit", &token).await;
    assert_eq!(response.status(), 200);
    let json = body_json(response).await;
    let id = json["data"]["id"].as_i64().expect("application id");
    (hacker, id)
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

async fn send(
    app: Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<serde_json::Value>,
) -> Response<Body> {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header("Authorization", format!("Bearer {token}"));
    }
    let request = match body {
        Some(json) => builder
            .header("Content-Type", "application/json")
            .body(Body::from(json.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Method::GET, uri, None, None).await
}

pub async fn get_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::GET, uri, Some(token), None).await
}

pub async fn post_auth(app: Router, uri: &str, token: &str) -> Response<Body> {
    send(app, Method::POST, uri, Some(token), None).await
}

pub async fn put_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PUT, uri, Some(token), Some(body)).await
}

pub async fn patch_json_auth(
    app: Router,
    uri: &str,
    body: serde_json::Value,
    token: &str,
) -> Response<Body> {
    send(app, Method::PATCH, uri, Some(token), Some(body)).await
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("failed to read body")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body is not valid JSON")
}
