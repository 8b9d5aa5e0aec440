use std::{net::SocketAddr, path::PathBuf, process::ExitCode, sync::Arc};

use axum::{
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderMap, StatusCode},
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use clap::Parser;
use serde::Serialize;
use sessions::{InMemorySessionStore, SessionStore};
use shared::{
    error::{ApiError, ErrorCode, IngressError},
    protocol::{InboundEvent, Reply},
};
use subtle::ConstantTimeEq;
use tower_http::limit::RequestBodyLimitLayer;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use workflow::{dispatch, ClassEntry, TracingSubmissionLog, Workflow};

mod app_state;
mod config;

use app_state::AppState;
use config::{load_settings, DEFAULT_CONFIG_PATH};

/// Events carry metadata only, never file content.
const MAX_EVENT_BYTES: usize = 64 * 1024;

#[derive(Parser, Debug)]
struct Args {
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,
    /// Overrides the bind address from the config file and environment.
    #[arg(long)]
    bind: Option<String>,
}

#[derive(Debug, Serialize)]
struct StatsResponse {
    active_sessions: usize,
    classes: usize,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run(Args::parse()).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            error!(error = %format!("{error:#}"), "failed to start bot");
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<()> {
    let settings = load_settings(&args.config)?;
    let bot_token = settings.require_bot_token()?.to_string();
    let catalog = settings.catalog()?;

    info!(classes = catalog.entries().len(), "starting assignment bot");
    let workflow = Workflow::new(
        catalog,
        Arc::new(InMemorySessionStore::new()),
        Arc::new(TracingSubmissionLog),
    );
    let app = build_router(Arc::new(AppState {
        workflow,
        bot_token,
    }));

    let addr: SocketAddr = args.bind.unwrap_or(settings.bind_addr).parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "bot started, accepting events");
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/healthz", get(healthz))
        .route("/stats", get(stats))
        .route("/classes", get(list_classes))
        .route("/events", post(handle_event))
        .layer(RequestBodyLimitLayer::new(MAX_EVENT_BYTES))
        .layer(middleware::map_response(oversized_body_as_api_error))
        .with_state(state)
}

/// The body limit layer answers oversized requests with a bare 413 before any
/// handler runs; give those the same `ApiError` body as other rejections.
async fn oversized_body_as_api_error(response: Response) -> Response {
    let is_json = response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));
    if response.status() != StatusCode::PAYLOAD_TOO_LARGE || is_json {
        return response;
    }

    let err = ApiError::new(
        ErrorCode::Validation,
        format!("event body exceeds {MAX_EVENT_BYTES} bytes"),
    );
    (StatusCode::PAYLOAD_TOO_LARGE, Json(err)).into_response()
}

async fn healthz() -> &'static str {
    "ok"
}

async fn stats(State(state): State<Arc<AppState>>) -> Json<StatsResponse> {
    Json(StatsResponse {
        active_sessions: state.workflow.sessions.len().await,
        classes: state.workflow.catalog.entries().len(),
    })
}

async fn list_classes(State(state): State<Arc<AppState>>) -> Json<Vec<ClassEntry>> {
    Json(state.workflow.catalog.entries().to_vec())
}

async fn handle_event(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    payload: Result<Json<InboundEvent>, JsonRejection>,
) -> Result<Json<Reply>, (StatusCode, Json<ApiError>)> {
    authorize(&headers, &state.bot_token)
        .map_err(|e| (StatusCode::UNAUTHORIZED, Json(ApiError::from(e))))?;

    let Json(event) = payload.map_err(|rejection| {
        let status = rejection.status();
        let err = IngressError::MalformedEvent(rejection.body_text());
        (status, Json(ApiError::from(err)))
    })?;

    Ok(Json(dispatch(&state.workflow, event).await))
}

fn authorize(headers: &HeaderMap, bot_token: &str) -> Result<(), IngressError> {
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::trim);
    match presented {
        Some(token) if bool::from(token.as_bytes().ct_eq(bot_token.as_bytes())) => Ok(()),
        _ => Err(IngressError::Unauthorized),
    }
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
