//! Tests for HTTP error mapping.

use super::*;
use actix_web::body::to_bytes;
use actix_web::{App, HttpResponse, test as actix_test, web};
use rstest::rstest;
use serde_json::json;

async fn envelope_of(error: Error) -> (StatusCode, ErrorEnvelope) {
    let response = ResponseError::error_response(&error);
    let status = response.status();
    let bytes = to_bytes(response.into_body())
        .await
        .expect("reading response body succeeds");
    let envelope = serde_json::from_slice(&bytes).expect("envelope deserialises");
    (status, envelope)
}

#[rstest]
#[case(ErrorKind::BadRequest, StatusCode::BAD_REQUEST)]
#[case(ErrorKind::Unauthenticated, StatusCode::UNAUTHORIZED)]
#[case(ErrorKind::Unauthorized, StatusCode::FORBIDDEN)]
#[case(ErrorKind::NotFound, StatusCode::NOT_FOUND)]
#[case(ErrorKind::UnprocessableEntity, StatusCode::UNPROCESSABLE_ENTITY)]
#[case(ErrorKind::Internal, StatusCode::INTERNAL_SERVER_ERROR)]
fn every_kind_has_a_status(#[case] kind: ErrorKind, #[case] status: StatusCode) {
    assert_eq!(status_for(kind), status);
    assert_eq!(ResponseError::status_code(&Error::new(kind, "x")), status);
}

#[rstest]
#[actix_web::test]
async fn client_errors_keep_message_and_details() {
    let (status, envelope) = envelope_of(
        Error::bad_request("email must contain '@'")
            .with_details(json!({ "field": "email", "code": "malformed_email" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        envelope,
        ErrorEnvelope {
            status_code: 400,
            message: "email must contain '@'".to_owned(),
            data: None,
            details: Some(json!({ "field": "email", "code": "malformed_email" })),
        }
    );
}

#[rstest]
#[actix_web::test]
async fn internal_errors_never_leak_diagnostics() {
    let (status, envelope) = envelope_of(
        Error::internal("connection to 10.0.0.3 refused").with_details(json!({ "dsn": "secret" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(envelope.message, INTERNAL_MESSAGE);
    assert_eq!(envelope.details, None);
}

#[rstest]
#[actix_web::test]
async fn envelope_always_carries_null_data() {
    let response = ResponseError::error_response(&Error::unauthenticated("invalid token"));
    let bytes = to_bytes(response.into_body()).await.expect("body");
    let value: Value = serde_json::from_slice(&bytes).expect("json");
    assert_eq!(
        value,
        json!({ "status_code": 401, "message": "invalid token", "data": null })
    );
}

#[derive(serde::Deserialize)]
struct Payload {
    #[expect(dead_code, reason = "only decoding is exercised")]
    name: String,
}

async fn echo(_payload: web::Json<Payload>) -> HttpResponse {
    HttpResponse::Ok().finish()
}

#[rstest]
#[case("{not json")]
#[case(r#"{"name": 5}"#)]
#[actix_web::test]
async fn undecodable_bodies_are_unprocessable(#[case] body: &'static str) {
    let app = actix_test::init_service(
        App::new()
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .route("/echo", web::post().to(echo)),
    )
    .await;
    let request = actix_test::TestRequest::post()
        .uri("/echo")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .to_request();

    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let envelope: ErrorEnvelope = actix_test::read_body_json(response).await;
    assert_eq!(envelope.message, INVALID_JSON_MESSAGE);
}
