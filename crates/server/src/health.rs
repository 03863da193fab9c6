use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::Utc;
use serde::Serialize;
use tracing::{error, info};

#[derive(Clone)]
pub struct HealthState {
    pub recognizer_configured: bool,
    pub search_endpoint: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthCheck {
    pub status: &'static str,
    pub detail: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: HealthCheck,
    pub recognizer: HealthCheck,
    pub search: HealthCheck,
    pub checked_at: String,
}

pub fn router(state: HealthState) -> Router {
    Router::new().route("/health", get(health)).with_state(state)
}

pub async fn spawn(bind_address: &str, port: u16, state: HealthState) -> std::io::Result<()> {
    let address = format!("{bind_address}:{port}");
    let listener = tokio::net::TcpListener::bind(&address).await?;

    info!(
        event_name = "system.health.start",
        correlation_id = "bootstrap",
        conversation_id = "unknown",
        bind_address = %address,
        "health endpoint started"
    );

    tokio::spawn(async move {
        if let Err(error) = axum::serve(listener, router(state)).await {
            error!(
                event_name = "system.health.error",
                correlation_id = "bootstrap",
                conversation_id = "unknown",
                error = %error,
                "health endpoint server terminated unexpectedly"
            );
        }
    });

    Ok(())
}

pub async fn health(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let search_ready = !state.search_endpoint.trim().is_empty();

    let payload = HealthResponse {
        status: if search_ready { "ready" } else { "degraded" },
        service: HealthCheck {
            status: "ready",
            detail: "statusbot-server runtime initialized".to_string(),
        },
        recognizer: HealthCheck {
            // Unconfigured is a supported mode, not a degradation: the bot
            // collects every slot through prompts instead.
            status: "ready",
            detail: if state.recognizer_configured {
                "recognizer credentials present".to_string()
            } else {
                "recognizer unconfigured; slot prompts collect all fields".to_string()
            },
        },
        search: HealthCheck {
            status: if search_ready { "ready" } else { "degraded" },
            detail: if search_ready {
                format!("execution index endpoint set: {}", state.search_endpoint)
            } else {
                "execution index endpoint missing".to_string()
            },
        },
        checked_at: Utc::now().to_rfc3339(),
    };

    let status_code = if search_ready { StatusCode::OK } else { StatusCode::SERVICE_UNAVAILABLE };
    (status_code, Json(payload))
}
