use crate::app::AppState;
use crate::callflow;
use crate::twilio::VoiceResponse;
use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use tracing::{error, info};

use super::middleware::signature::validate_signature;

pub fn router(state: AppState) -> Router<AppState> {
    let webhooks = Router::new()
        .route("/incoming", post(incoming))
        .route("/menu", post(menu))
        .route("/recording", post(recording))
        .route("/outbound-call", post(outbound_call))
        .route("/conference", post(conference))
        .layer(middleware::from_fn_with_state(state, validate_signature));

    Router::new()
        .route("/call", post(create_call))
        .route("/calls/{sid}", get(fetch_call))
        .route("/calls/{sid}/recordings", get(list_recordings))
        .route("/recordings/{sid}/transcriptions", get(list_transcriptions))
        .merge(webhooks)
}

fn twiml(response: VoiceResponse) -> Response {
    (
        [(header::CONTENT_TYPE, "text/xml")],
        response.to_xml(),
    )
        .into_response()
}

pub async fn incoming() -> Response {
    twiml(callflow::incoming())
}

#[derive(Debug, Deserialize)]
pub struct MenuForm {
    #[serde(rename = "Digits")]
    pub digits: Option<String>,
}

pub async fn menu(State(state): State<AppState>, Form(form): Form<MenuForm>) -> Response {
    twiml(callflow::menu(form.digits.as_deref(), &state.config.twilio))
}

#[derive(Debug, Deserialize)]
pub struct RecordingForm {
    #[serde(rename = "RecordingUrl")]
    pub recording_url: Option<String>,
}

pub async fn recording(Form(form): Form<RecordingForm>) -> Response {
    // The recording stays with Twilio, the URL is handed off via the log
    // for whatever notification pipeline picks it up.
    match form.recording_url {
        Some(ref url) => info!(recording_url = %url, "recording completed"),
        None => info!("recording webhook without RecordingUrl"),
    }
    twiml(callflow::recording())
}

pub async fn outbound_call() -> Response {
    twiml(callflow::outbound_call())
}

pub async fn conference() -> Response {
    twiml(callflow::conference())
}

#[derive(Debug, Deserialize)]
pub struct CreateCallRequest {
    pub to: Option<String>,
    pub from: Option<String>,
}

pub async fn create_call(
    State(state): State<AppState>,
    Json(request): Json<CreateCallRequest>,
) -> Response {
    let Some(to) = request.to else {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "The \"to\" phone number is required" })),
        )
            .into_response();
    };

    match state.twilio.create_call(&to, request.from.as_deref()).await {
        Ok(sid) => Json(serde_json::json!({ "success": true, "callSid": sid })).into_response(),
        Err(e) => {
            error!("Error making outbound call: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}

pub async fn fetch_call(State(state): State<AppState>, Path(sid): Path<String>) -> Response {
    provider_lookup(state.twilio.fetch_call(&sid).await)
}

pub async fn list_recordings(State(state): State<AppState>, Path(sid): Path<String>) -> Response {
    provider_lookup(state.twilio.list_recordings(&sid).await)
}

pub async fn list_transcriptions(
    State(state): State<AppState>,
    Path(sid): Path<String>,
) -> Response {
    provider_lookup(state.twilio.list_transcriptions(&sid).await)
}

fn provider_lookup(result: anyhow::Result<serde_json::Value>) -> Response {
    match result {
        Ok(body) => Json(body).into_response(),
        Err(e) => {
            error!("Twilio lookup failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": e.to_string() })),
            )
                .into_response()
        }
    }
}
