// src/server.rs
// =============================================================================
// This module serves the two reports over HTTP.
//
// Routes:
// - GET /json: JSON array, one entry per URL (same as `file-stats json`)
// - GET /csv:  appends to the CSV store and returns the whole file as a
//              `text/csv` attachment (same as `file-stats csv`)
//
// Every request runs a fresh batch with the Config given at startup. The
// CsvStore is shared by all requests, so concurrent /csv requests append one
// after the other instead of interleaving rows.
//
// Rust concepts:
// - axum Router + State: handlers receive the shared AppState
// - Arc: one AppState shared by every request
// - IntoResponse: how our Error becomes an HTTP 500
// =============================================================================

use std::net::SocketAddr;
use std::sync::Arc;

use axum::extract::State;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use tracing::info;

use crate::config::Config;
use crate::error::Error;
use crate::report::{self, CsvStore, Outcome};

pub struct AppState {
    pub config: Config,
    pub store: CsvStore,
}

// Wraps our Error so handlers can return it with `?`
struct ApiError(Error);

impl From<Error> for ApiError {
    fn from(error: Error) -> Self {
        ApiError(error)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = self.0.chain_message();
        tracing::error!(error = %message, "request failed");
        (StatusCode::INTERNAL_SERVER_ERROR, message).into_response()
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/json", get(json_results))
        .route("/csv", get(csv_results))
        .with_state(state)
}

async fn json_results(State(state): State<Arc<AppState>>) -> Result<Json<Vec<Outcome>>, ApiError> {
    let outcomes = report::records(&state.config).await?;
    Ok(Json(outcomes))
}

async fn csv_results(State(state): State<Arc<AppState>>) -> Result<Response, ApiError> {
    let summary = report::csv_results(&state.config, &state.store).await?;

    let file_name = state
        .store
        .path()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "results.csv".to_string());

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename={}", file_name),
            ),
        ],
        summary.contents,
    )
        .into_response())
}

// Binds to 0.0.0.0:<port> and serves until Ctrl-C
pub async fn serve(state: AppState, port: u16) -> anyhow::Result<()> {
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "listening");

    axum::serve(listener, router(Arc::new(state)))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;

    info!("server stopped");
    Ok(())
}
