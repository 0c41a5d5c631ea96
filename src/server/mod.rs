//! Axum webhook listener.
//!
//! Provides:
//!   GET  /          → identification string
//!   POST /webhooks  → one block of logs per request
//!
//! The webhook response only reflects whether the body parsed: once a
//! batch is accepted every per-event failure is contained and logged,
//! and the provider gets a 200 so it does not re-deliver.

use crate::relay::payload::WebhookPayload;
use crate::relay::Dispatcher;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Json};
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tracing::{error, info};

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
}

/// Build the Axum router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/webhooks", post(receive_webhook))
        .with_state(state)
}

/// Start the webhook server.
pub async fn serve(state: AppState, bind_addr: &str) -> anyhow::Result<()> {
    let app = build_router(state);
    let listener = tokio::net::TcpListener::bind(bind_addr).await?;
    info!(addr = bind_addr, "webhook listener up");
    axum::serve(listener, app).await?;
    Ok(())
}

async fn index() -> &'static str {
    "betcaster relay"
}

async fn receive_webhook(State(state): State<AppState>, body: Bytes) -> impl IntoResponse {
    let payload: WebhookPayload = match serde_json::from_slice(&body) {
        Ok(payload) => payload,
        Err(err) => {
            error!(error = %err, "failed to parse webhook body");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": err.to_string() })),
            )
                .into_response();
        }
    };

    let summary = state
        .dispatcher
        .dispatch_block(&payload.event.data.block)
        .await;
    info!(
        total = summary.total,
        published = summary.published,
        skipped = summary.skipped,
        failed = summary.failed,
        "webhook block dispatched"
    );

    (StatusCode::OK, "Received").into_response()
}
