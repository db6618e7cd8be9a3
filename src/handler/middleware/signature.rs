use crate::app::AppState;
use crate::twilio::validate::validate_request;
use axum::{
    body::{to_bytes, Body},
    extract::{OriginalUri, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use tracing::warn;

const SIGNATURE_HEADER: &str = "x-twilio-signature";

// Twilio webhook bodies are small form posts.
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Rejects webhook requests whose `X-Twilio-Signature` does not match the
/// signature computed from the reconstructed callback URL and body
/// parameters. A missing header is a rejection, never a skip; the only
/// bypass is the explicit `skip_validation` development flag.
pub async fn validate_signature(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    if state.config.twilio.skip_validation {
        return next.run(request).await;
    }

    let signature = request
        .headers()
        .get(SIGNATURE_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let Some(signature) = signature else {
        warn!("rejecting webhook without Twilio signature header");
        return forbidden();
    };

    // Nested routers see a stripped path, the signature covers the full one.
    let original_uri = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.0.clone())
        .unwrap_or_else(|| request.uri().clone());
    let path_and_query = original_uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| original_uri.path());
    let url = format!(
        "{}{}",
        state.config.twilio.base_url.trim_end_matches('/'),
        path_and_query
    );

    let (parts, body) = request.into_parts();
    let bytes = match to_bytes(body, MAX_BODY_BYTES).await {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("failed to read webhook body: {}", e);
            return (StatusCode::BAD_REQUEST, "Bad Request").into_response();
        }
    };
    let params: Vec<(String, String)> = url::form_urlencoded::parse(&bytes)
        .into_owned()
        .collect();

    if !validate_request(state.twilio.auth_token(), &signature, &url, &params) {
        warn!(%url, "invalid Twilio request signature");
        return forbidden();
    }

    // Hand the body back so the handler's Form extractor can parse it.
    next.run(Request::from_parts(parts, Body::from(bytes))).await
}

fn forbidden() -> Response {
    (StatusCode::FORBIDDEN, "Forbidden: Invalid Twilio signature").into_response()
}
