use super::gateway::OptionsProvider;
use super::models::{ChainTable, Expiration};
use super::plots::{PlotData, PlotKind};
use super::session::{DashboardSession, SessionSummary};
use super::yahoo_client::YahooClient;
use crate::error::DashboardError;
use anyhow::Result;
use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower_http::cors::CorsLayer;
use tracing::info;

// -----------------------------------------------
// API REQUEST/RESPONSE MODELS
// -----------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ExpirationsQuery {
    pub ticker: String,
}

#[derive(Debug, Deserialize)]
pub struct SelectQuery {
    pub expiration: String,
}

#[derive(Debug, Deserialize)]
pub struct PlotQuery {
    pub kind: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub error: Option<String>,
    pub processing_time_ms: Option<u64>,
}

impl<T> ApiResponse<T> {
    fn from_result(result: Result<T, DashboardError>, start_time: Instant) -> Self {
        let processing_time_ms = Some(start_time.elapsed().as_millis() as u64);
        match result {
            Ok(data) => Self {
                success: true,
                data: Some(data),
                error: None,
                processing_time_ms,
            },
            Err(e) => Self {
                success: false,
                data: None,
                error: Some(e.to_string()),
                processing_time_ms,
            },
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ExpirationsResponse {
    pub ticker: String,
    pub expirations: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct FetchResponse {
    pub expiration: String,
    pub rows: usize,
    pub total_open_interest: u64,
    pub table: ChainTable,
}

// -----------------------------------------------
// APPLICATION STATE
// -----------------------------------------------

/// One dashboard session shared by every request; the mutex serializes interactions
pub struct AppState<P> {
    session: Arc<Mutex<DashboardSession<P>>>,
}

impl<P> Clone for AppState<P> {
    fn clone(&self) -> Self {
        Self {
            session: Arc::clone(&self.session),
        }
    }
}

impl<P: OptionsProvider> AppState<P> {
    pub fn new(provider: P) -> Self {
        Self {
            session: Arc::new(Mutex::new(DashboardSession::new(provider))),
        }
    }
}

// -----------------------------------------------
// API HANDLERS
// -----------------------------------------------

/// GET /api/expirations?ticker=AAPL - Enter a ticker and list its valid expirations
async fn get_expirations<P: OptionsProvider + 'static>(
    State(app_state): State<AppState<P>>,
    Query(query): Query<ExpirationsQuery>,
) -> Result<Json<ApiResponse<ExpirationsResponse>>, StatusCode> {
    let start_time = Instant::now();
    let mut session = app_state.session.lock().await;

    let result = session.enter_ticker(&query.ticker).await.map(|valid| {
        valid.iter().map(|e| e.to_string()).collect::<Vec<_>>()
    });
    let result = result.map(|expirations| ExpirationsResponse {
        ticker: session.ticker().map(|t| t.to_string()).unwrap_or_default(),
        expirations,
    });

    Ok(Json(ApiResponse::from_result(result, start_time)))
}

/// POST /api/select?expiration=2025-01-17 - Select one of the valid expirations
async fn select_expiration<P: OptionsProvider + 'static>(
    State(app_state): State<AppState<P>>,
    Query(query): Query<SelectQuery>,
) -> Result<Json<ApiResponse<SessionSummary>>, StatusCode> {
    let start_time = Instant::now();
    let mut session = app_state.session.lock().await;

    let result = Expiration::parse(&query.expiration)
        .and_then(|expiration| session.select_expiration(expiration))
        .map(|_| session.summary());

    Ok(Json(ApiResponse::from_result(result, start_time)))
}

/// POST /api/fetch - Fetch the chain of the selected expiration
async fn fetch_chain<P: OptionsProvider + 'static>(
    State(app_state): State<AppState<P>>,
) -> Result<Json<ApiResponse<FetchResponse>>, StatusCode> {
    let start_time = Instant::now();
    let mut session = app_state.session.lock().await;

    let expiration = session
        .selected_expiration()
        .map(|e| e.to_string())
        .unwrap_or_default();
    let result = session.fetch().await.map(|table| FetchResponse {
        expiration,
        rows: table.len(),
        total_open_interest: table.total_open_interest(),
        table: table.clone(),
    });

    Ok(Json(ApiResponse::from_result(result, start_time)))
}

/// GET /api/state - Current session summary
async fn get_state<P: OptionsProvider + 'static>(
    State(app_state): State<AppState<P>>,
) -> Result<Json<ApiResponse<SessionSummary>>, StatusCode> {
    let start_time = Instant::now();
    let session = app_state.session.lock().await;

    Ok(Json(ApiResponse::from_result(Ok(session.summary()), start_time)))
}

/// GET /api/plot?kind=change-in-oi - Bar chart payload for the fetched chain
async fn get_plot<P: OptionsProvider + 'static>(
    State(app_state): State<AppState<P>>,
    Query(query): Query<PlotQuery>,
) -> Result<Json<ApiResponse<PlotData>>, StatusCode> {
    let start_time = Instant::now();
    let session = app_state.session.lock().await;

    let kind = query.kind.as_deref().unwrap_or(PlotKind::ChangeInOpenInterest.slug());
    let result = kind.parse::<PlotKind>().and_then(|kind| session.plot(kind));

    Ok(Json(ApiResponse::from_result(result, start_time)))
}

/// GET /api/export - Download the fetched chain as CSV
async fn export_csv<P: OptionsProvider + 'static>(
    State(app_state): State<AppState<P>>,
) -> Response {
    let start_time = Instant::now();
    let session = app_state.session.lock().await;

    match session.export_csv() {
        Ok((file_name, body)) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file_name),
                ),
            ],
            body,
        )
            .into_response(),
        Err(e) => Json(ApiResponse::<()>::from_result(Err(e), start_time)).into_response(),
    }
}

// -----------------------------------------------
// SERVER SETUP
// -----------------------------------------------

pub fn build_router<P: OptionsProvider + 'static>(app_state: AppState<P>) -> Router {
    Router::new()
        .route("/api/expirations", get(get_expirations::<P>))
        .route("/api/select", post(select_expiration::<P>))
        .route("/api/fetch", post(fetch_chain::<P>))
        .route("/api/state", get(get_state::<P>))
        .route("/api/plot", get(get_plot::<P>))
        .route("/api/export", get(export_csv::<P>))
        .layer(CorsLayer::permissive())
        .with_state(app_state)
}

pub async fn start_server(port: u16) -> Result<()> {
    let app = build_router(AppState::new(YahooClient::new()?));

    let addr = format!("127.0.0.1:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!(%addr, "api server listening");
    println!("🚀 Options Dashboard API Server running on http://{}", addr);
    println!("📋 Available endpoints:");
    println!("   GET  /api/expirations?ticker=AAPL");
    println!("   POST /api/select?expiration=2025-01-17");
    println!("   POST /api/fetch");
    println!("   GET  /api/state");
    println!("   GET  /api/plot?kind=change-in-oi|volume|open-interest");
    println!("   GET  /api/export");
    println!();

    axum::serve(listener, app).await?;
    Ok(())
}
