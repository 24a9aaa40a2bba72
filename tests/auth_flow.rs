mod common;

use axum::http::StatusCode;
use jsonwebtoken::{DecodingKey, Validation, decode};
use sea_orm::{DatabaseBackend, MockDatabase};
use shopfront_api::{
    dto::auth::{LoginRequest, ProfileRequest, RegisterRequest},
    entity::users,
    error::AppError,
    middleware::auth::{AuthUser, Claims},
    models::Role,
    services::auth_service::{self, compare_password, hash_password},
};

use common::{FakeGateway, SECRET, logged_sql, state_with, user_model};

fn login_request(email: &str, password: &str) -> LoginRequest {
    LoginRequest {
        email: Some(email.into()),
        password: Some(password.into()),
    }
}

#[test]
fn hashed_password_only_matches_itself() {
    let hash = hash_password("secret1").expect("hashed");
    assert_ne!(hash, "secret1");
    assert!(compare_password("secret1", &hash));
    assert!(!compare_password("secret2", &hash));
    assert!(!compare_password("secret1", "not-a-hash"));
}

#[tokio::test]
async fn login_succeeds_with_token_for_the_user() {
    let mut user = user_model(Role::Customer);
    user.password = hash_password("secret1").expect("hashed");
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user.clone()]])
        .into_connection();
    let state = state_with(orm, FakeGateway::approving());

    let resp = auth_service::login(&state, login_request(&user.email, "secret1"))
        .await
        .expect("logged in");

    assert_eq!(resp.message, "Login successfully");
    assert_eq!(resp.data.user.id, user.id);

    let claims = decode::<Claims>(
        &resp.data.token,
        &DecodingKey::from_secret(SECRET.as_bytes()),
        &Validation::default(),
    )
    .expect("token verifies")
    .claims;
    assert_eq!(claims.sub, user.id.to_string());

    let body = serde_json::to_value(&resp).expect("serializable");
    assert!(body["user"].get("password").is_none());
    assert!(body["user"].get("answer").is_none());
}

#[tokio::test]
async fn login_outcomes_for_bad_credentials() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .into_connection();
    let state = state_with(orm, FakeGateway::approving());
    let err = auth_service::login(&state, login_request("ghost@example.com", "secret1"))
        .await
        .expect_err("unknown email");
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Email is not registered"));

    let mut user = user_model(Role::Customer);
    user.password = hash_password("secret1").expect("hashed");
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![user.clone()]])
        .into_connection();
    let state = state_with(orm, FakeGateway::approving());
    let err = auth_service::login(&state, login_request(&user.email, "wrong-password"))
        .await
        .expect_err("wrong password");
    assert!(matches!(err, AppError::Declined(ref m) if m == "Invalid Password"));

    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = state_with(orm, FakeGateway::approving());
    let err = auth_service::login(&state, LoginRequest::default())
        .await
        .expect_err("nothing supplied");
    assert!(matches!(err, AppError::NotFound(ref m) if m == "Invalid email or password"));
}

#[tokio::test]
async fn register_validates_and_refuses_known_email() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = state_with(orm, FakeGateway::approving());
    let incomplete = RegisterRequest {
        name: Some("Jane".into()),
        email: Some("jane@example.com".into()),
        password: Some("secret1".into()),
        ..RegisterRequest::default()
    };
    let err = auth_service::register(&state, incomplete)
        .await
        .expect_err("phone missing");
    assert!(matches!(err, AppError::Validation(ref m) if m == "Phone is Required"));

    let existing = user_model(Role::Customer);
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![existing.clone()]])
        .into_connection();
    let state = state_with(orm, FakeGateway::approving());
    let err = auth_service::register(
        &state,
        RegisterRequest {
            name: Some("Jane".into()),
            email: Some(existing.email.clone()),
            password: Some("secret1".into()),
            phone: Some("555-0100".into()),
            address: Some("1 Main Street".into()),
            answer: Some("blue".into()),
        },
    )
    .await
    .expect_err("already registered");
    assert!(matches!(err, AppError::Declined(ref m) if m == "Already registered, please login"));
    assert!(!logged_sql(state).contains("INSERT"));
}

#[tokio::test]
async fn register_creates_customer() {
    let created = user_model(Role::Customer);
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([Vec::<users::Model>::new()])
        .append_query_results([vec![created.clone()]])
        .into_connection();
    let state = state_with(orm, FakeGateway::approving());

    let resp = auth_service::register(
        &state,
        RegisterRequest {
            name: Some(created.name.clone()),
            email: Some(created.email.clone()),
            password: Some("secret1".into()),
            phone: Some(created.phone.clone()),
            address: Some(created.address.clone()),
            answer: Some(created.answer.clone()),
        },
    )
    .await
    .expect("registered");

    assert_eq!(resp.status, StatusCode::CREATED);
    assert_eq!(resp.message, "User Register Successfully");
    assert_eq!(resp.data.user.role, Role::Customer);

    let sql = logged_sql(state);
    assert!(sql.contains(r#"INSERT INTO \"users\""#));
    assert!(!sql.contains("\"secret1\""), "plain password must not be stored");
}

#[tokio::test]
async fn short_profile_password_is_rejected_without_update() {
    let orm = MockDatabase::new(DatabaseBackend::Postgres).into_connection();
    let state = state_with(orm, FakeGateway::approving());
    let caller = AuthUser {
        user_id: uuid::Uuid::new_v4(),
    };

    let err = auth_service::update_profile(
        &state,
        &caller,
        ProfileRequest {
            password: Some("abc".into()),
            ..ProfileRequest::default()
        },
    )
    .await
    .expect_err("password too short");

    assert!(matches!(
        err,
        AppError::BadRequest(ref m) if m == "Password needs to be at least 6 characters long."
    ));
    assert_eq!(logged_sql(state), "[]");
}

#[tokio::test]
async fn profile_update_keeps_email_and_absent_fields() {
    let stored = user_model(Role::Customer);
    let mut updated = stored.clone();
    updated.name = "Jane Doe".into();
    let orm = MockDatabase::new(DatabaseBackend::Postgres)
        .append_query_results([vec![stored.clone()]])
        .append_query_results([vec![updated.clone()]])
        .into_connection();
    let state = state_with(orm, FakeGateway::approving());
    let caller = AuthUser {
        user_id: stored.id,
    };

    let resp = auth_service::update_profile(
        &state,
        &caller,
        ProfileRequest {
            name: Some("Jane Doe".into()),
            email: Some("other@example.com".into()),
            ..ProfileRequest::default()
        },
    )
    .await
    .expect("profile updated");

    assert_eq!(resp.message, "Profile updated successfully.");
    assert_eq!(resp.data.updated_user.name, "Jane Doe");

    let sql = logged_sql(state);
    assert!(sql.contains("Jane Doe"));
    assert!(!sql.contains("other@example.com"));
    assert!(!sql.contains(r#"\"password\" ="#));
}
