//! Scenario tests for the auth crate
//!
//! Use cases run against `InMemoryAuthRepository`; HTTP scenarios drive the
//! real router with `tower::ServiceExt::oneshot`. No database required.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use platform::password::HashCost;
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::{
    AuthConfig, SignInInput, SignInUseCase, SignUpInput, SignUpUseCase, TokenService,
};
use crate::domain::repository::CredentialRepository;
use crate::domain::value_object::{email::Email, role::Role, subject_id::SubjectId};
use crate::error::AuthError;
use crate::infra::memory::InMemoryAuthRepository;
use crate::presentation::router::auth_router;

const BASE64URL: &[u8; 64] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-_";

/// Change one character of the signature segment to a different base64url
/// character (top bit of its 6-bit value flipped)
pub(crate) fn tamper_signature(token: &str, index: usize) -> String {
    let (head, signature) = token.rsplit_once('.').expect("token has a signature segment");
    let mut bytes = signature.as_bytes().to_vec();
    let position = BASE64URL
        .iter()
        .position(|&b| b == bytes[index])
        .expect("signature is base64url");
    bytes[index] = BASE64URL[position ^ 32];
    format!("{head}.{}", String::from_utf8(bytes).expect("ascii"))
}

// ============================================================================
// Harness
// ============================================================================

struct Harness {
    repo: Arc<InMemoryAuthRepository>,
    config: Arc<AuthConfig>,
    tokens: Arc<TokenService>,
}

impl Harness {
    fn new() -> Self {
        let config = AuthConfig {
            hash_cost: HashCost::MINIMAL,
            ..AuthConfig::default()
        };
        let tokens = Arc::new(TokenService::new(&config));

        Self {
            repo: Arc::new(InMemoryAuthRepository::new()),
            config: Arc::new(config),
            tokens,
        }
    }

    fn sign_up(&self) -> SignUpUseCase<InMemoryAuthRepository> {
        SignUpUseCase::new(self.repo.clone(), self.tokens.clone(), self.config.clone())
    }

    fn sign_in(&self) -> SignInUseCase<InMemoryAuthRepository> {
        SignInUseCase::new(self.repo.clone(), self.tokens.clone(), self.config.clone())
    }

    fn app(&self) -> Router {
        Router::new().nest(
            "/api",
            auth_router(self.repo.clone(), (*self.config).clone()),
        )
    }
}

fn sign_up_input(email: &str, password: &str, role: &str) -> SignUpInput {
    SignUpInput {
        name: String::new(),
        email: email.to_string(),
        password: password.to_string(),
        phone: None,
        role: role.to_string(),
    }
}

fn sign_in_input(email: &str, password: &str) -> SignInInput {
    SignInInput {
        email: email.to_string(),
        password: password.to_string(),
    }
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, body)
}

fn post_json(uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_with_auth(uri: &str, authorization: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header(header::AUTHORIZATION, authorization)
        .body(Body::empty())
        .unwrap()
}

fn put_json_with_token(uri: &str, token: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method("PUT")
        .uri(uri)
        .header(header::AUTHORIZATION, format!("Bearer {token}"))
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

// ============================================================================
// Authenticator
// ============================================================================

#[tokio::test]
async fn test_register_then_login_yields_matching_identity() {
    let h = Harness::new();

    for (email, role) in [("client@x.com", Role::Client), ("master@x.com", Role::Master)] {
        let registered = h
            .sign_up()
            .execute(sign_up_input(email, "pw123456", role.code()))
            .await
            .unwrap();
        assert_eq!(registered.role, role);
        assert!(!registered.token.is_empty());

        let signed_in = h
            .sign_in()
            .execute(sign_in_input(email, "pw123456"))
            .await
            .unwrap();
        assert_eq!(signed_in.subject_id, registered.subject_id);

        let identity = h.tokens.validate(&signed_in.token).unwrap();
        assert_eq!(identity.subject_id, registered.subject_id);
        assert_eq!(identity.role, role);
    }
}

#[tokio::test]
async fn test_duplicate_email_is_rejected_without_partial_rows() {
    let h = Harness::new();
    h.sign_up()
        .execute(sign_up_input("a@x.com", "pw123456", "client"))
        .await
        .unwrap();

    let err = h
        .sign_up()
        .execute(sign_up_input("A@X.com", "another-pw", "master"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::DuplicateEmail));
    assert_eq!(h.repo.credential_count().await, 1);
    assert_eq!(h.repo.profile_count().await, 1);
}

#[tokio::test]
async fn test_concurrent_registration_has_one_winner() {
    let h = Harness::new();
    let first = h.sign_up();
    let second = h.sign_up();

    let (a, b) = tokio::join!(
        first.execute(sign_up_input("race@x.com", "pw123456", "client")),
        second.execute(sign_up_input("race@x.com", "pw123456", "client")),
    );

    let outcomes = [a, b];
    assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(
        outcomes
            .iter()
            .any(|r| matches!(r, Err(AuthError::DuplicateEmail)))
    );
    assert_eq!(h.repo.credential_count().await, 1);
}

#[tokio::test]
async fn test_failed_profile_write_rolls_back_credential() {
    let h = Harness::new();
    h.repo.fail_profile_writes(true);

    let err = h
        .sign_up()
        .execute(sign_up_input("a@x.com", "pw123456", "master"))
        .await
        .unwrap_err();

    assert!(matches!(err, AuthError::Persistence(_)));
    assert_eq!(h.repo.credential_count().await, 0);
    assert_eq!(h.repo.profile_count().await, 0);

    h.repo.fail_profile_writes(false);
    assert!(
        h.sign_up()
            .execute(sign_up_input("a@x.com", "pw123456", "master"))
            .await
            .is_ok()
    );
}

#[tokio::test]
async fn test_wrong_password_is_bad_credentials_and_changes_nothing() {
    let h = Harness::new();
    h.sign_up()
        .execute(sign_up_input("a@x.com", "pw123456", "client"))
        .await
        .unwrap();

    let email = Email::new("a@x.com").unwrap();
    let before = h.repo.find_by_email(&email).await.unwrap().unwrap();

    let err = h
        .sign_in()
        .execute(sign_in_input("a@x.com", "pw1234567"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::BadCredentials));

    let after = h.repo.find_by_email(&email).await.unwrap().unwrap();
    assert_eq!(after.subject_id, before.subject_id);
    assert_eq!(after.password.as_phc_string(), before.password.as_phc_string());
    assert_eq!(after.updated_at, before.updated_at);
}

#[tokio::test]
async fn test_unknown_email_is_user_not_found() {
    let h = Harness::new();

    for email in ["nobody@x.com", "not-an-email"] {
        let err = h
            .sign_in()
            .execute(sign_in_input(email, "pw123456"))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UserNotFound));
    }
}

#[tokio::test]
async fn test_sign_in_requires_both_fields() {
    let h = Harness::new();

    for (email, password) in [("", "pw123456"), ("a@x.com", "")] {
        let err = h
            .sign_in()
            .execute(sign_in_input(email, password))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)));
    }
}

#[tokio::test]
async fn test_register_rejects_invalid_input() {
    let h = Harness::new();
    let cases = [
        sign_up_input("", "pw123456", "client"),
        sign_up_input("a@x.com", "", "client"),
        sign_up_input("a@x.com", "pw1", "client"),
        sign_up_input("a@x.com", "pw123456", ""),
        sign_up_input("a@x.com", "pw123456", "admin"),
    ];

    for input in cases {
        let err = h.sign_up().execute(input).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidInput(_)), "got {err:?}");
    }
    assert_eq!(h.repo.credential_count().await, 0);
}

#[tokio::test]
async fn test_soft_deleted_email_can_register_again() {
    let h = Harness::new();
    let first = h
        .sign_up()
        .execute(sign_up_input("a@x.com", "pw123456", "client"))
        .await
        .unwrap();
    h.repo.soft_delete(&first.subject_id).await;

    let err = h
        .sign_in()
        .execute(sign_in_input("a@x.com", "pw123456"))
        .await
        .unwrap_err();
    assert!(matches!(err, AuthError::UserNotFound));

    let second = h
        .sign_up()
        .execute(sign_up_input("a@x.com", "pw123456", "master"))
        .await
        .unwrap();
    assert_ne!(second.subject_id, first.subject_id);
}

// ============================================================================
// HTTP
// ============================================================================

#[tokio::test]
async fn test_register_then_get_profile_resolves_same_subject() {
    let h = Harness::new();
    let app = h.app();

    let (status, registered) = send(
        &app,
        post_json(
            "/api/auth/register",
            json!({ "email": "a@x.com", "password": "pw123456", "role": "client" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(registered["status"], "ok");
    assert_eq!(registered["role"], "client");
    assert_eq!(registered["email"], "a@x.com");
    let token = registered["token"].as_str().unwrap();
    assert!(!token.is_empty());
    let subject_id = registered["subject_id"].as_str().unwrap();

    let (status, profile) = send(
        &app,
        get_with_auth("/api/client/profile", &format!("Bearer {token}")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["subject_id"], subject_id);
    assert_eq!(profile["email"], "a@x.com");
    assert_eq!(profile["name"], "a");

    let (status, me) = send(&app, get_with_auth("/api/auth/me", &format!("Bearer {token}"))).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me, json!({ "subject_id": subject_id, "role": "client" }));
}

#[tokio::test]
async fn test_login_over_http() {
    let h = Harness::new();
    let app = h.app();
    send(
        &app,
        post_json(
            "/api/auth/register",
            json!({ "name": "Ivan", "email": "m@x.com", "password": "pw123456", "role": "master" }),
        ),
    )
    .await;

    let (status, body) = send(
        &app,
        post_json("/api/auth/login", json!({ "email": "m@x.com", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["role"], "master");
    assert!(body["subject_id"].as_str().unwrap().parse::<SubjectId>().is_ok());
    assert!(!body["token"].as_str().unwrap().is_empty());

    let (status, body) = send(
        &app,
        post_json("/api/auth/login", json!({ "email": "m@x.com", "password": "nope-nope" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["status"], "error");
    assert_eq!(body["error"], "UNAUTHORIZED");

    let (status, _) = send(
        &app,
        post_json("/api/auth/login", json!({ "email": "x@x.com", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_register_error_statuses() {
    let h = Harness::new();
    let app = h.app();
    let body = json!({ "email": "a@x.com", "password": "pw123456", "role": "client" });

    let (status, _) = send(&app, post_json("/api/auth/register", body.clone())).await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = send(&app, post_json("/api/auth/register", body)).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "CONFLICT");

    let (status, err) = send(
        &app,
        post_json("/api/auth/register", json!({ "email": "b@x.com", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["message"], "Role is required");

    let malformed = Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{\"email\":"))
        .unwrap();
    let (status, err) = send(&app, malformed).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "BAD_REQUEST");
}

#[tokio::test]
async fn test_persistence_failure_hides_details() {
    let h = Harness::new();
    let app = h.app();
    h.repo.fail_profile_writes(true);

    let (status, err) = send(
        &app,
        post_json(
            "/api/auth/register",
            json!({ "email": "a@x.com", "password": "pw123456", "role": "client" }),
        ),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(!err["message"].as_str().unwrap().contains("injected"));
    assert_eq!(h.repo.credential_count().await, 0);
}

#[tokio::test]
async fn test_gate_rejects_every_bad_authorization_uniformly() {
    let h = Harness::new();
    let app = h.app();

    let valid = h.tokens.issue(SubjectId::new(), Role::Client).unwrap();
    let expired = h
        .tokens
        .issue_at(SubjectId::new(), Role::Client, Duration::from_secs(60), 1_000_000)
        .unwrap();
    let tampered = tamper_signature(&valid, 0);

    let headers = [
        String::new(),
        "Bearer".to_string(),
        "Bearer ".to_string(),
        format!("Basic {valid}"),
        format!("bearer {valid}"),
        format!("Bearer {valid} extra"),
        "Bearer not.a.token".to_string(),
        format!("Bearer {expired}"),
        format!("Bearer {tampered}"),
    ];

    let mut bodies = Vec::new();
    for value in headers {
        let request = if value.is_empty() {
            Request::builder()
                .uri("/api/auth/me")
                .body(Body::empty())
                .unwrap()
        } else {
            get_with_auth("/api/auth/me", &value)
        };
        let (status, body) = send(&app, request).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "header {value:?} was admitted");
        bodies.push(body);
    }

    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert_eq!(bodies[0]["error"], "UNAUTHORIZED");
}

#[tokio::test]
async fn test_profile_routes_are_role_scoped() {
    let h = Harness::new();
    let app = h.app();
    let client = h
        .sign_up()
        .execute(sign_up_input("c@x.com", "pw123456", "client"))
        .await
        .unwrap();

    let (status, err) = send(
        &app,
        get_with_auth("/api/master/profile", &format!("Bearer {}", client.token)),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["error"], "FORBIDDEN");

    let (status, _) = send(
        &app,
        put_json_with_token(
            "/api/master/profile",
            &client.token,
            json!({ "name": "Not a master" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_master_updates_own_profile() {
    let h = Harness::new();
    let app = h.app();
    let master = h
        .sign_up()
        .execute(SignUpInput {
            name: "Ivan".to_string(),
            phone: Some("+7 900 000-00-00".to_string()),
            ..sign_up_input("m@x.com", "pw123456", "master")
        })
        .await
        .unwrap();

    let (status, updated) = send(
        &app,
        put_json_with_token(
            "/api/master/profile",
            &master.token,
            json!({
                "name": "Ivan Petrov",
                "description": "Restoring Soviet-era furniture",
                "city": "Saint Petersburg",
                "specializations": ["upholstery", " veneer ", "upholstery"],
                "priceFrom": 2500
            }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["price_from"], 2500);
    assert_eq!(updated["specializations"], json!(["upholstery", "veneer"]));

    let (status, profile) = send(
        &app,
        get_with_auth("/api/master/profile", &format!("Bearer {}", master.token)),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(profile["name"], "Ivan Petrov");
    assert_eq!(profile["city"], "Saint Petersburg");
    assert_eq!(profile["phone"], "+7 900 000-00-00");
    assert_eq!(profile["rating"], json!(0.0));
    assert_eq!(profile["subject_id"], master.subject_id.to_string());

    let (status, _) = send(
        &app,
        put_json_with_token(
            "/api/master/profile",
            &master.token,
            json!({ "name": "Ivan", "priceFrom": -5 }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_client_updates_own_profile() {
    let h = Harness::new();
    let app = h.app();
    let client = h
        .sign_up()
        .execute(sign_up_input("c@x.com", "pw123456", "client"))
        .await
        .unwrap();

    let (status, updated) = send(
        &app,
        put_json_with_token(
            "/api/client/profile",
            &client.token,
            json!({ "name": "Anna", "phone": "8 (812) 555-01-01" }),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], "Anna");
    assert_eq!(updated["phone"], "8 (812) 555-01-01");

    let (status, _) = send(
        &app,
        put_json_with_token("/api/client/profile", &client.token, json!({ "name": " " })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_token_for_deleted_subject_finds_no_profile() {
    let h = Harness::new();
    let app = h.app();
    let client = h
        .sign_up()
        .execute(sign_up_input("c@x.com", "pw123456", "client"))
        .await
        .unwrap();
    h.repo.soft_delete(&client.subject_id).await;

    let (status, err) = send(
        &app,
        get_with_auth("/api/client/profile", &format!("Bearer {}", client.token)),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "NOT_FOUND");
}

#[tokio::test]
async fn test_me_rejects_token_for_deleted_subject() {
    let h = Harness::new();
    let app = h.app();
    let client = h
        .sign_up()
        .execute(sign_up_input("c@x.com", "pw123456", "client"))
        .await
        .unwrap();
    let authorization = format!("Bearer {}", client.token);

    let (status, _) = send(&app, get_with_auth("/api/auth/me", &authorization)).await;
    assert_eq!(status, StatusCode::OK);

    h.repo.soft_delete(&client.subject_id).await;

    let (status, err) = send(&app, get_with_auth("/api/auth/me", &authorization)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["error"], "UNAUTHORIZED");
}
