//! Tests for login and current-user handlers.

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test as actix_test, web};
use rstest::rstest;
use std::sync::Arc;

use serde_json::{Value, json};

use super::*;
use crate::domain::ACCOUNT_EXISTS;
use crate::domain::auth::INVALID_LOGIN;
use crate::domain::ports::MockIdentityStore;
use crate::inbound::http::routes::configure;
use crate::inbound::http::test_utils::TestHarness;

#[derive(Debug)]
struct ValidationExpectation<'a> {
    message: &'a str,
    field: &'a str,
    code: &'a str,
}

macro_rules! init_app {
    ($harness:expr) => {{
        let pipeline = $harness.state.pipeline.clone();
        actix_test::init_service(
            App::new()
                .app_data(web::Data::new($harness.state.clone()))
                .configure(move |cfg| configure(cfg, &pipeline)),
        )
        .await
    }};
}

async fn post_login(harness: &TestHarness, email: &str, password: &str) -> (StatusCode, Value) {
    let app = init_app!(harness);
    let request = actix_test::TestRequest::post()
        .uri("/users/login")
        .set_json(&LoginRequest {
            email: email.into(),
            password: password.into(),
        })
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn login_issues_a_working_credential() {
    let harness = TestHarness::seeded();
    let (status, body) = post_login(&harness, "  Ada@Example.com ", "ada-password").await;
    assert_eq!(status, StatusCode::OK);
    let token = body
        .get("token")
        .and_then(Value::as_str)
        .expect("token present")
        .to_owned();

    let app = init_app!(harness);
    let request = actix_test::TestRequest::get()
        .uri("/users/me")
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    let me: CurrentUserResponse = actix_test::read_body_json(response).await;
    assert_eq!(me.id, 7);
    assert_eq!(me.username, "ada");
    assert_eq!(me.role, Some(Role::Member));
}

#[rstest]
#[case("ada@example.com", "wrong-password")]
#[case("nobody@example.com", "ada-password")]
#[actix_web::test]
async fn bad_logins_share_one_message(#[case] email: &str, #[case] password: &str) {
    let harness = TestHarness::seeded();
    let (status, body) = post_login(&harness, email, password).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.get("message").and_then(Value::as_str), Some(INVALID_LOGIN));
    assert!(body.get("details").is_none());
}

#[rstest]
#[case(
    "   ",
    "pw",
    ValidationExpectation { message: "email must not be empty", field: "email", code: "empty_email" }
)]
#[case(
    "ada.example.com",
    "pw",
    ValidationExpectation { message: "email must contain '@'", field: "email", code: "malformed_email" }
)]
#[case(
    "ada@example.com",
    "",
    ValidationExpectation { message: "password must not be empty", field: "password", code: "empty_password" }
)]
#[actix_web::test]
async fn invalid_payloads_report_field_details(
    #[case] email: &str,
    #[case] password: &str,
    #[case] expected: ValidationExpectation<'_>,
) {
    let harness = TestHarness::seeded();
    let (status, body) = post_login(&harness, email, password).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.get("message").and_then(Value::as_str), Some(expected.message));
    assert_eq!(body.get("status_code").and_then(Value::as_u64), Some(400));
    let details = body.get("details").expect("details present");
    assert_eq!(details.get("field").and_then(Value::as_str), Some(expected.field));
    assert_eq!(details.get("code").and_then(Value::as_str), Some(expected.code));
}

#[rstest]
#[actix_web::test]
async fn malformed_login_body_is_unprocessable() {
    let harness = TestHarness::seeded();
    let app = init_app!(harness);
    let request = actix_test::TestRequest::post()
        .uri("/users/login")
        .insert_header(("content-type", "application/json"))
        .set_payload(r#"{"email": "ada@example.com""#)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[rstest]
#[actix_web::test]
async fn current_user_requires_a_credential() {
    let harness = TestHarness::seeded();
    let app = init_app!(harness);
    let request = actix_test::TestRequest::get().uri("/users/me").to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

async fn post_register(harness: &TestHarness, body: Value) -> (StatusCode, Value) {
    let app = init_app!(harness);
    let request = actix_test::TestRequest::post()
        .uri("/users/register")
        .set_json(&body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    let status = response.status();
    let body: Value = actix_test::read_body_json(response).await;
    (status, body)
}

#[rstest]
#[actix_web::test]
async fn registered_members_can_log_in() {
    let harness = TestHarness::seeded();
    let (status, body) = post_register(
        &harness,
        json!({"email": "Eve@Example.com", "username": "eve", "password": "secret"}),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body.get("email").and_then(Value::as_str), Some("eve@example.com"));
    assert_eq!(body.get("role").and_then(Value::as_str), Some("member"));
    assert!(body.get("password").is_none());

    let (status, body) = post_login(&harness, "eve@example.com", "secret").await;
    assert_eq!(status, StatusCode::OK);
    assert!(body.get("token").is_some());
}

#[rstest]
#[case(json!({"email": "ada@example.com", "username": "ada2", "password": "secret"}))]
#[case(json!({"email": "ada2@example.com", "username": "ada", "password": "secret"}))]
#[actix_web::test]
async fn duplicate_registrations_are_rejected(#[case] body: Value) {
    let harness = TestHarness::seeded();
    let (status, body) = post_register(&harness, body).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.get("message").and_then(Value::as_str), Some(ACCOUNT_EXISTS));
}

#[rstest]
#[case(
    json!({"email": "eve", "username": "eve", "password": "secret"}),
    ValidationExpectation { message: "email must contain '@'", field: "email", code: "malformed_email" }
)]
#[case(
    json!({"email": "eve@example.com", "username": "  ", "password": "secret"}),
    ValidationExpectation { message: "username must not be empty", field: "username", code: "empty_username" }
)]
#[case(
    json!({"email": "eve@example.com", "username": "eve", "password": "12345"}),
    ValidationExpectation { message: "password must be at least 6 characters", field: "password", code: "short_password" }
)]
#[actix_web::test]
async fn invalid_registrations_report_field_details(
    #[case] body: Value,
    #[case] expected: ValidationExpectation<'_>,
) {
    let harness = TestHarness::seeded();
    let (status, body) = post_register(&harness, body).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body.get("message").and_then(Value::as_str), Some(expected.message));
    let details = body.get("details").expect("details present");
    assert_eq!(details.get("field").and_then(Value::as_str), Some(expected.field));
    assert_eq!(details.get("code").and_then(Value::as_str), Some(expected.code));
}

#[rstest]
#[actix_web::test]
async fn vanished_accounts_are_unauthenticated_on_current_user() {
    let harness = TestHarness::seeded();
    let bearer = harness.bearer_for(7).await;
    let mut identities = MockIdentityStore::new();
    identities
        .expect_fetch_by_id()
        .returning(|_| Err(Error::not_found("account not found")));
    let mut state = harness.state.clone();
    state.identities = Arc::new(identities);
    let pipeline = state.pipeline.clone();
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(state))
            .configure(move |cfg| configure(cfg, &pipeline)),
    )
    .await;

    let request = actix_test::TestRequest::get()
        .uri("/users/me")
        .insert_header((AUTHORIZATION, bearer))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body.get("message").and_then(Value::as_str), Some(INVALID_TOKEN));
}
