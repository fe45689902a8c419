//! Inbound webhook server
//!
//! Telegram POSTs one update per request to `/{token}`. The update is handed to
//! the dispatcher on its own task and the request is acknowledged right away.

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;

use crate::application::errors::BotError;
use crate::application::messaging::{Dispatcher, MessageParser};
use crate::infrastructure::adapters::telegram::Update;

/// Shared state for the webhook routes
#[derive(Clone)]
pub struct WebhookState {
    pub dispatcher: Arc<Dispatcher>,
    pub parser: Arc<MessageParser>,
}

/// Fixed acknowledgement body
#[derive(Debug, Serialize)]
pub struct Ack {
    status: &'static str,
}

impl Ack {
    fn ok() -> Json<Self> {
        Json(Self { status: "ok" })
    }

    fn error() -> Json<Self> {
        Json(Self { status: "error" })
    }
}

/// Path the webhook listens on for a given bot token
pub fn webhook_path(token: &str) -> String {
    format!("/{}", token.trim().trim_start_matches('/'))
}

/// Build the router: `POST /{token}` and `GET /health`
pub fn router(token: &str, state: WebhookState) -> Router {
    Router::new()
        .route(&webhook_path(token), post(webhook_handler))
        .route("/health", get(health_handler))
        .with_state(state)
}

async fn health_handler() -> Json<Ack> {
    Ack::ok()
}

async fn webhook_handler(
    State(state): State<WebhookState>,
    body: Bytes,
) -> (StatusCode, Json<Ack>) {
    let update: Update = match serde_json::from_slice(&body) {
        Ok(update) => update,
        Err(e) => {
            tracing::error!("Malformed webhook payload: {}", e);
            return (StatusCode::BAD_REQUEST, Ack::error());
        }
    };

    let update_id = update.update_id;
    tracing::debug!(update_id, "Webhook received update");

    match update.into_event(&state.parser) {
        Some(event) => {
            let dispatcher = state.dispatcher.clone();
            tokio::spawn(async move {
                let chat_id = event.chat_id();
                if let Err(e) = dispatcher.dispatch(event).await {
                    tracing::error!(update_id, chat_id, "Failed to handle update: {}", e);
                }
            });
        }
        None => tracing::debug!(update_id, "Ignoring update without text or callback data"),
    }

    (StatusCode::OK, Ack::ok())
}

/// Serve `app` on `bind_addr` until Ctrl-C
pub async fn serve(bind_addr: &str, app: Router) -> Result<(), BotError> {
    let listener = TcpListener::bind(bind_addr)
        .await
        .map_err(|e| BotError::Network(format!("Failed to bind {}: {}", bind_addr, e)))?;
    tracing::info!("Webhook server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = tokio::signal::ctrl_c().await {
                tracing::error!("Failed to listen for shutdown signal: {}", e);
            }
            tracing::info!("Shutting down webhook server");
        })
        .await
        .map_err(|e| BotError::Internal(e.to_string()))
}
