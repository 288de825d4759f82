use std::{net::SocketAddr, sync::Arc};

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use shared::{
    domain::{InvoiceRecord, PassengerRecord, SummaryAggregate, TicketNumber},
    error::{ApiError, ApiException, ErrorCode},
    protocol::{
        artifact_route, download_action_route, healthz_route, invoices_route, parse_action_route,
        records_route, summary_route, RecordsQuery,
    },
};
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

mod api;
mod app_state;
mod config;
mod roster;

use api::{ApiContext, SimulatedExtractor};
use app_state::AppState;
use config::load_settings;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let settings = load_settings();
    let passengers = roster::load_roster(&settings.roster_path).map_err(|error| {
        error!(
            roster = %settings.roster_path.display(),
            error = ?error,
            "failed to load passenger roster"
        );
        error
    })?;
    info!(
        passengers = passengers.len(),
        invoice_dir = %settings.invoice_dir.display(),
        "roster loaded"
    );

    let api = ApiContext::new(
        passengers,
        settings.invoice_dir,
        Arc::new(SimulatedExtractor),
    );
    let app = build_router(Arc::new(AppState { api }));

    let addr: SocketAddr = settings.server_bind.parse()?;
    info!(%addr, "server listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(healthz_route(), get(healthz))
        .route(records_route(), get(http_list_records))
        .route(invoices_route(), get(http_list_invoices))
        .route(summary_route(), get(http_summary))
        .route(download_action_route(), post(http_download))
        .route(parse_action_route(), post(http_parse))
        .route(artifact_route(), get(http_artifact))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

fn error_response(err: ApiException) -> (StatusCode, Json<ApiError>) {
    let status = match err.code {
        ErrorCode::NotFound => StatusCode::NOT_FOUND,
        ErrorCode::Validation => StatusCode::BAD_REQUEST,
        ErrorCode::Internal => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(ApiError::from(err)))
}

fn pdf_headers(filename: &str, disposition: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static("application/pdf"));
    if let Ok(value) = HeaderValue::from_str(&format!("{disposition}; filename=\"{filename}\"")) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    headers
}

async fn http_list_records(
    State(state): State<Arc<AppState>>,
    Query(q): Query<RecordsQuery>,
) -> Json<Vec<PassengerRecord>> {
    Json(api::list_records(&state.api, q.query.as_deref()).await)
}

async fn http_list_invoices(State(state): State<Arc<AppState>>) -> Json<Vec<InvoiceRecord>> {
    Json(api::list_invoices(&state.api).await)
}

async fn http_summary(State(state): State<Arc<AppState>>) -> Json<SummaryAggregate> {
    Json(api::summarize(&state.api).await)
}

async fn http_download(
    State(state): State<Arc<AppState>>,
    Path(ticket): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let artifact = api::download_ticket(&state.api, &TicketNumber::new(ticket))
        .await
        .map_err(error_response)?;
    let headers = pdf_headers(&artifact.filename, "attachment");
    Ok((StatusCode::OK, headers, artifact.bytes))
}

async fn http_parse(
    State(state): State<Arc<AppState>>,
    Path(ticket): Path<String>,
) -> Result<Json<InvoiceRecord>, (StatusCode, Json<ApiError>)> {
    api::parse_ticket(&state.api, &TicketNumber::new(ticket))
        .await
        .map(Json)
        .map_err(error_response)
}

async fn http_artifact(
    State(state): State<Arc<AppState>>,
    Path(filename): Path<String>,
) -> Result<impl IntoResponse, (StatusCode, Json<ApiError>)> {
    let bytes = api::read_artifact(&state.api, &filename)
        .await
        .map_err(error_response)?;
    Ok((StatusCode::OK, pdf_headers(&filename, "inline"), bytes))
}

#[cfg(test)]
#[path = "tests/main_tests.rs"]
mod tests;
