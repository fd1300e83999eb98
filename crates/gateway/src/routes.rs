//! Request handlers.

use {
    axum::{
        Json,
        extract::State,
        http::StatusCode,
        response::{IntoResponse, Response},
    },
    serde::Deserialize,
    tracing::{error, info},
};

use kizuna_common::{ChatOutcome, ChatRequest, ProviderChoice};

use crate::state::AppState;

/// Messages starting with this prefix are answered by the gateway itself —
/// the backend never sees them. Distinct from the photo directive, which
/// operates on backend output.
const IMG_COMMAND: &str = "/img ";

#[derive(Debug, Deserialize)]
pub struct ChatPayload {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub provider: Option<String>,
}

pub async fn chat_handler(
    State(state): State<AppState>,
    Json(payload): Json<ChatPayload>,
) -> Response {
    let message = payload.message.trim();
    if message.is_empty() {
        return (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": "message must not be empty" })),
        )
            .into_response();
    }

    if let Some(description) = message.strip_prefix(IMG_COMMAND) {
        let description = description.trim();
        if !description.is_empty() {
            let url = state.image_urls.url_for(description);
            info!("image command intercepted");
            return Json(serde_json::json!({ "reply": format!("IMAGE_GENERATED::{url}") }))
                .into_response();
        }
    }

    let provider = ProviderChoice::resolve(payload.provider.as_deref());
    info!(provider = %provider, "chat request");

    let req = ChatRequest::new(message, provider);
    match state.dispatcher.dispatch(&req).await {
        ChatOutcome::Reply(reply) => {
            Json(serde_json::json!({ "reply": reply })).into_response()
        },
        ChatOutcome::Fatal(err) => {
            error!(error = %err, "chat dispatch failed");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": format!("system failure: {err}") })),
            )
                .into_response()
        },
    }
}

pub async fn health_handler() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "ok": true }))
}
