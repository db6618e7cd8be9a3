use crate::app::{App, AppBuilder, AppState};
use crate::config::Config;
use crate::handler::voice::{create_call, menu, recording, CreateCallRequest, MenuForm, RecordingForm};
use crate::twilio::validate::compute_signature;
use axum::body::Body;
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::{Form, Json};
use tower::ServiceExt;

const AUTH_TOKEN: &str = "testauthtoken0000000000000000000";
const BASE_URL: &str = "https://voice.example.com";

fn test_app(skip_validation: bool) -> App {
    let mut config = Config::default();
    config.twilio.account_sid = Some("AC00000000000000000000000000000000".to_string());
    config.twilio.auth_token = Some(AUTH_TOKEN.to_string());
    config.twilio.base_url = BASE_URL.to_string();
    config.twilio.phone_number = Some("+15550009999".to_string());
    config.twilio.skip_validation = skip_validation;
    AppBuilder::new().config(config).build().unwrap()
}

fn test_state() -> AppState {
    test_app(false).state
}

// Helper function to convert axum response to a string body
async fn response_to_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn signed_form_request(path: &str, params: &[(&str, &str)]) -> Request<Body> {
    let url = format!("{}{}", BASE_URL, path);
    let owned: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    let signature = compute_signature(AUTH_TOKEN, &url, &owned);
    let body = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish();
    Request::builder()
        .method("POST")
        .uri(path)
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("X-Twilio-Signature", signature)
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn test_menu_digit_2_dials_support() {
    let response = menu(
        State(test_state()),
        Form(MenuForm {
            digits: Some("2".to_string()),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_string(response).await;
    assert!(body.contains("support team"));
    assert!(body.contains("<Dial>+15557654321</Dial>"));
}

#[tokio::test]
async fn test_menu_digit_9_apologizes_and_redirects() {
    let response = menu(
        State(test_state()),
        Form(MenuForm {
            digits: Some("9".to_string()),
        }),
    )
    .await;
    let body = response_to_string(response).await;
    assert!(body.contains("didn&apos;t understand"));
    assert!(body.contains("<Redirect>/api/voice/incoming</Redirect>"));
}

#[tokio::test]
async fn test_recording_thanks_the_caller() {
    let response = recording(Form(RecordingForm {
        recording_url: Some("https://api.twilio.com/recordings/RE123".to_string()),
    }))
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_string(response).await;
    assert!(body.contains("Thank you for your message"));
}

#[tokio::test]
async fn test_create_call_requires_to() {
    let response = create_call(
        State(test_state()),
        Json(CreateCallRequest {
            to: None,
            from: Some("+15550001111".to_string()),
        }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = response_to_string(response).await;
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    assert!(json["error"].as_str().unwrap().contains("\"to\""));
}

#[tokio::test]
async fn test_index_route() {
    let app = test_app(false);
    let response = app
        .router()
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_string(response).await;
    assert!(body.contains("running"));
}

#[tokio::test]
async fn test_webhook_without_signature_is_forbidden() {
    let app = test_app(false);
    let request = Request::builder()
        .method("POST")
        .uri("/api/voice/incoming")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_webhook_with_bad_signature_is_forbidden() {
    let app = test_app(false);
    let request = Request::builder()
        .method("POST")
        .uri("/api/voice/incoming")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .header("X-Twilio-Signature", "AAAAAAAAAAAAAAAAAAAAAAAAAAA=")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_webhook_with_valid_signature_returns_twiml() {
    let app = test_app(false);
    let request = signed_form_request("/api/voice/incoming", &[]);
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CONTENT_TYPE).unwrap(),
        "text/xml"
    );
    let body = response_to_string(response).await;
    assert!(body.contains("<Response>"));
    assert!(body.contains("<Gather"));
}

#[tokio::test]
async fn test_signed_menu_request_reaches_handler_with_digits() {
    let app = test_app(false);
    let request = signed_form_request("/api/voice/menu", &[("Digits", "1"), ("CallSid", "CA1")]);
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_string(response).await;
    assert!(body.contains("sales department"));
}

#[tokio::test]
async fn test_skip_validation_bypasses_signature_check() {
    let app = test_app(true);
    let request = Request::builder()
        .method("POST")
        .uri("/api/voice/conference")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(Body::empty())
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = response_to_string(response).await;
    assert!(body.contains("MyConference"));
}

#[tokio::test]
async fn test_call_endpoint_skips_signature_validation() {
    // The outbound trigger is not a Twilio callback, it must not be gated
    // by the webhook middleware. A missing "to" proves we reached the
    // handler rather than a 403.
    let app = test_app(false);
    let request = Request::builder()
        .method("POST")
        .uri("/api/voice/call")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{}"))
        .unwrap();
    let response = app.router().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}
