//! Tests for the access-control middleware.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use actix_web::http::StatusCode;
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, HttpResponse, test as actix_test, web};
use rstest::rstest;

use super::*;
use crate::domain::auth::INVALID_TOKEN;
use crate::domain::{ResourceKind, Role};
use crate::inbound::http::caller::Caller;
use crate::inbound::http::error::ErrorEnvelope;
use crate::inbound::http::test_utils::TestHarness;

#[derive(Clone, Default)]
struct HandlerCalls(Arc<AtomicUsize>);

impl HandlerCalls {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

async fn handler(calls: web::Data<HandlerCalls>, caller: Caller) -> HttpResponse {
    calls.0.fetch_add(1, Ordering::SeqCst);
    HttpResponse::Ok().body(caller.id().to_string())
}

async fn call(
    harness: &TestHarness,
    calls: &HandlerCalls,
    policy: RoutePolicy,
    uri: &str,
    authorization: Option<String>,
) -> (StatusCode, Vec<u8>) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::Data::new(calls.clone()))
            .service(
                web::resource("/photos/{photoId}")
                    .wrap(AccessControl::new(harness.state.pipeline.clone(), policy))
                    .route(web::delete().to(handler)),
            ),
    )
    .await;
    let mut request = actix_test::TestRequest::delete().uri(uri);
    if let Some(value) = authorization {
        request = request.insert_header((AUTHORIZATION, value));
    }
    let response = actix_test::call_service(&app, request.to_request()).await;
    let status = response.status();
    let body = actix_test::read_body(response).await.to_vec();
    (status, body)
}

#[rstest]
#[case(None)]
#[case(Some("Bearer not-a-token".to_owned()))]
#[case(Some("Basic Ym9iOnB3".to_owned()))]
#[actix_web::test]
async fn bad_credentials_never_reach_the_handler(#[case] authorization: Option<String>) {
    let harness = TestHarness::seeded();
    let calls = HandlerCalls::default();

    let (status, body) = call(
        &harness,
        &calls,
        RoutePolicy::owner_of(ResourceKind::Photo),
        "/photos/42",
        authorization,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    let envelope: ErrorEnvelope = serde_json::from_slice(&body).expect("envelope");
    assert_eq!(envelope.message, INVALID_TOKEN);
    assert_eq!(calls.count(), 0);
}

#[rstest]
#[actix_web::test]
async fn owner_reaches_the_handler_with_typed_caller() {
    let harness = TestHarness::seeded();
    let calls = HandlerCalls::default();
    let bearer = harness.bearer_for(9).await;

    let (status, body) = call(
        &harness,
        &calls,
        RoutePolicy::owner_of(ResourceKind::Photo),
        "/photos/42",
        Some(bearer),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"9");
    assert_eq!(calls.count(), 1);
}

#[rstest]
#[actix_web::test]
async fn non_owner_is_forbidden_and_handler_skipped() {
    let harness = TestHarness::seeded();
    let calls = HandlerCalls::default();
    let bearer = harness.bearer_for(7).await;

    let (status, body) = call(
        &harness,
        &calls,
        RoutePolicy::owner_of(ResourceKind::Photo),
        "/photos/42",
        Some(bearer),
    )
    .await;

    assert_eq!(status, StatusCode::FORBIDDEN);
    let envelope: ErrorEnvelope = serde_json::from_slice(&body).expect("envelope");
    assert_eq!(envelope.message, "you are not authorized to modify the photo");
    assert_eq!(calls.count(), 0);
}

#[rstest]
#[case("/photos/9999")]
#[case("/photos/not-a-number")]
#[actix_web::test]
async fn unknown_or_unparsable_ids_are_bad_requests(#[case] uri: &str) {
    let harness = TestHarness::seeded();
    let calls = HandlerCalls::default();
    let bearer = harness.bearer_for(7).await;

    let (status, body) = call(
        &harness,
        &calls,
        RoutePolicy::owner_of(ResourceKind::Photo),
        uri,
        Some(bearer),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    let envelope: ErrorEnvelope = serde_json::from_slice(&body).expect("envelope");
    assert_eq!(envelope.message, "photo not found");
    assert_eq!(calls.count(), 0);
}

#[rstest]
#[case(1, StatusCode::OK)]
#[case(7, StatusCode::FORBIDDEN)]
#[actix_web::test]
async fn role_policies_ignore_ownership(#[case] caller: i64, #[case] expected: StatusCode) {
    let harness = TestHarness::seeded();
    let calls = HandlerCalls::default();
    let bearer = harness.bearer_for(caller).await;

    let (status, _) = call(
        &harness,
        &calls,
        RoutePolicy::with_role(Role::Admin),
        "/photos/42",
        Some(bearer),
    )
    .await;

    assert_eq!(status, expected);
}
