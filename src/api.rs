//! Webhook HTTP server.
//!
//! Serves the provider subscription handshake, the inbound message webhook
//! and a health check. Every accepted delivery is acknowledged right away;
//! messages are processed on their own tasks.

use crate::gateway::Gateway;
use axum::{
    body::Bytes,
    extract::{DefaultBodyLimit, Query, State},
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::get,
    Router,
};
use convoy_channels::whatsapp::{self, WebhookVerifyQuery};
use convoy_core::config::ApiConfig;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, info, warn};

const SIGNATURE_HEADER: &str = "x-hub-signature-256";

/// Shared state for API handlers.
#[derive(Clone)]
pub struct ApiState {
    gateway: Arc<Gateway>,
    verify_token: String,
    app_secret: Option<String>,
    uptime: Instant,
}

impl ApiState {
    pub fn new(config: &ApiConfig, gateway: Arc<Gateway>) -> Self {
        let app_secret = if config.app_secret.is_empty() {
            None
        } else {
            Some(config.app_secret.clone())
        };
        Self {
            gateway,
            verify_token: config.verify_token.clone(),
            app_secret,
            uptime: Instant::now(),
        }
    }
}

/// Constant-time string comparison for the verify token.
fn constant_time_eq(a: &str, b: &str) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.bytes()
        .zip(b.bytes())
        .fold(0u8, |acc, (x, y)| acc | (x ^ y))
        == 0
}

/// `GET /health`: liveness and uptime.
async fn health(State(state): State<ApiState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "channel": state.gateway.channel_name(),
        "uptime_secs": state.uptime.elapsed().as_secs(),
    }))
}

/// `GET /webhook`: subscription handshake.
async fn verify(
    State(state): State<ApiState>,
    Query(query): Query<WebhookVerifyQuery>,
) -> Response {
    let mode_ok = query.mode.as_deref() == Some("subscribe");
    let token_ok = !state.verify_token.is_empty()
        && query
            .verify_token
            .as_deref()
            .is_some_and(|t| constant_time_eq(t, &state.verify_token));

    match query.challenge {
        Some(challenge) if mode_ok && token_ok => {
            info!("webhook subscription verified");
            (StatusCode::OK, challenge).into_response()
        }
        _ => {
            warn!("webhook verification rejected");
            StatusCode::FORBIDDEN.into_response()
        }
    }
}

/// `POST /webhook`: inbound deliveries.
async fn webhook(
    State(state): State<ApiState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, (StatusCode, Json<Value>)> {
    if let Some(ref secret) = state.app_secret {
        let header = headers
            .get(SIGNATURE_HEADER)
            .and_then(|v| v.to_str().ok());
        if !whatsapp::verify_signature(secret, &body, header) {
            warn!("webhook signature mismatch");
            return Err((
                StatusCode::UNAUTHORIZED,
                Json(json!({"error": "invalid signature"})),
            ));
        }
    }

    let messages = whatsapp::parse_webhook(&body).map_err(|e| {
        error!("webhook parse failed: {e}");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({"error": "malformed payload"})),
        )
    })?;

    let accepted = messages.len();
    if accepted == 0 {
        debug!("webhook delivery carried no messages");
    }
    for message in messages {
        let gateway = Arc::clone(&state.gateway);
        tokio::spawn(async move {
            gateway.handle(message).await;
        });
    }

    Ok(Json(json!({"status": "ok", "accepted": accepted})))
}

/// Build the axum router with shared state.
pub fn build_router(state: ApiState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/webhook", get(verify).post(webhook))
        .layer(DefaultBodyLimit::max(1024 * 1024)) // 1 MB max request body
        .with_state(state)
}

/// Bind and serve until the process is stopped.
pub async fn serve(config: ApiConfig, gateway: Arc<Gateway>) -> anyhow::Result<()> {
    let state = ApiState::new(&config, gateway);
    if state.app_secret.is_none() {
        warn!("api.app_secret is empty; webhook signatures are not checked");
    }

    let app = build_router(state);
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(|e| anyhow::anyhow!("failed to bind {addr}: {e}"))?;

    info!("Webhook server listening on {addr}");
    axum::serve(listener, app).await?;
    Ok(())
}
