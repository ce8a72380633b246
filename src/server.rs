//! HTTP surface: the dashboard page, selection endpoints, JSON API and chart assets.

use axum::{
    extract::{Path, Request, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    middleware::{self, Next},
    response::{Html, IntoResponse, Redirect, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;

use crate::assets::{PlotStore, MISSING_PLACEHOLDER};
use crate::catalog::{resolve_chart_asset_path, Catalog};
use crate::config::Config;
use crate::error::{DashboardError, Result};
use crate::logging::{log, log_asset_miss, log_request, obj, v_num, v_str, Domain, Level, ProfileScope};
use crate::render::render_page;
use crate::session::{Session, SessionStore, SESSION_COOKIE};
use crate::summary::{MetricSummary, ReadinessData, YearlyAverage};
use crate::view::{current_descriptor, ViewEvent, ViewState};

/// Shared state for handlers
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub plots: PlotStore,
    pub data: Option<Arc<ReadinessData>>,
}

impl AppState {
    pub fn new(catalog: Catalog, cfg: &Config, data: Option<ReadinessData>) -> Self {
        let sessions = SessionStore::new(Arc::new(catalog), cfg.view(), cfg.limits());
        Self {
            sessions: Arc::new(sessions),
            plots: PlotStore::new(cfg.plots_dir.clone()),
            data: data.map(Arc::new),
        }
    }

    /// Builtin catalog, plus the readiness data when `DATA_CSV` is set.
    pub fn from_config(cfg: &Config) -> Result<Self> {
        let data = match &cfg.data_csv {
            Some(path) => {
                let data = ReadinessData::load(path)?;
                log(
                    Level::Info,
                    Domain::Summary,
                    "loaded",
                    obj(&[
                        ("path", v_str(&path.display().to_string())),
                        ("rows", v_num(data.rows.len() as f64)),
                        ("bad_rows", v_num(data.bad_rows as f64)),
                    ]),
                );
                Some(data)
            }
            None => None,
        };
        let state = Self::new(Catalog::builtin(), cfg, data);
        for id in state.plots.missing(state.catalog()) {
            log_asset_miss(&resolve_chart_asset_path(id), "not published");
        }
        Ok(state)
    }

    pub fn catalog(&self) -> &Catalog {
        self.sessions.catalog()
    }
}

// ============================================================================
// API Types
// ============================================================================

#[derive(Debug, Serialize)]
pub struct StateView {
    pub selected_metric_id: String,
    pub revealed: bool,
    pub chart_path: String,
    pub title: String,
    pub description: String,
    pub state_hash: String,
}

impl StateView {
    fn build(catalog: &Catalog, state: &ViewState) -> Result<Self> {
        let current = current_descriptor(state, catalog)?;
        Ok(Self {
            selected_metric_id: state.selected_metric_id.clone(),
            revealed: state.revealed,
            chart_path: resolve_chart_asset_path(&state.selected_metric_id),
            title: current.title.to_string(),
            description: current.description.to_string(),
            state_hash: format!("{:016x}", state.hash()),
        })
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub chart_path: String,
}

#[derive(Debug, Serialize)]
pub struct TrendView {
    pub metric: String,
    pub points: Vec<YearlyAverage>,
}

// ============================================================================
// Errors
// ============================================================================

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::UnknownMetric(_) | DashboardError::AssetNotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::InvalidAssetPath(_) => StatusCode::BAD_REQUEST,
            DashboardError::SessionsFull(_) => StatusCode::SERVICE_UNAVAILABLE,
            DashboardError::InconsistentState(_)
            | DashboardError::InvalidCatalog(_)
            | DashboardError::Io(_)
            | DashboardError::Data(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            log(Level::Error, Domain::Http, "handler_error", obj(&[("msg", v_str(&self.to_string()))]));
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

// ============================================================================
// Sessions
// ============================================================================

fn session_cookie(headers: &HeaderMap) -> Option<&str> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(name, _)| *name == SESSION_COOKIE)
        .map(|(_, value)| value)
}

fn with_cookie(mut response: Response, session: &Session, created: bool) -> Response {
    if created {
        let cookie = format!("{}={}; Path=/; HttpOnly; SameSite=Lax", SESSION_COOKIE, session.id());
        if let Ok(value) = HeaderValue::from_str(&cookie) {
            response.headers_mut().insert(header::SET_COOKIE, value);
        }
    }
    response
}

/// Caller's session, if the cookie names a live one.
fn known_session(state: &AppState, headers: &HeaderMap) -> Option<Session> {
    session_cookie(headers).and_then(|id| state.sessions.get(id))
}

/// View state for read-only requests; never registers a session.
fn current_state(state: &AppState, headers: &HeaderMap) -> ViewState {
    match known_session(state, headers) {
        Some(session) => session.snapshot(),
        None => state.sessions.fresh_state(),
    }
}

/// Validates `id` at the boundary so the reducer never sees a foreign id.
fn select(state: &AppState, headers: &HeaderMap, id: String) -> Result<(Session, bool)> {
    if !state.catalog().contains(&id) {
        return Err(DashboardError::UnknownMetric(id));
    }
    let (session, created) = state.sessions.get_or_create(session_cookie(headers))?;
    session.dispatch(ViewEvent::Select { id });
    Ok((session, created))
}

// ============================================================================
// Handlers
// ============================================================================

async fn index(State(state): State<AppState>, headers: HeaderMap) -> Result<Html<String>> {
    let page = render_page(state.catalog(), &current_state(&state, &headers))?;
    Ok(Html(page))
}

async fn select_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    let (session, created) = select(&state, &headers, id)?;
    Ok(with_cookie(Redirect::to("/").into_response(), &session, created))
}

async fn api_select(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<Response> {
    let (session, created) = select(&state, &headers, id)?;
    let view = StateView::build(session.catalog(), &session.snapshot())?;
    Ok(with_cookie(Json(view).into_response(), &session, created))
}

async fn api_state(State(state): State<AppState>, headers: HeaderMap) -> Result<Json<StateView>> {
    let view = StateView::build(state.catalog(), &current_state(&state, &headers))?;
    Ok(Json(view))
}

async fn api_catalog(State(state): State<AppState>) -> Json<Vec<CatalogEntry>> {
    let entries = state
        .catalog()
        .entries()
        .iter()
        .map(|m| CatalogEntry {
            id: m.id,
            title: m.title,
            description: m.description,
            chart_path: resolve_chart_asset_path(m.id),
        })
        .collect();
    Json(entries)
}

fn data_unavailable() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(json!({ "error": "readiness data not configured" })),
    )
        .into_response()
}

async fn api_summary(State(state): State<AppState>) -> Response {
    let Some(data) = &state.data else {
        return data_unavailable();
    };
    let stats: Vec<MetricSummary> = state
        .catalog()
        .ids()
        .filter_map(|id| data.summary_for(id))
        .collect();
    Json(stats).into_response()
}

async fn api_trend(State(state): State<AppState>, Path(id): Path<String>) -> Result<Response> {
    if !state.catalog().contains(&id) {
        return Err(DashboardError::UnknownMetric(id));
    }
    let Some(data) = &state.data else {
        return Ok(data_unavailable());
    };
    let points = data.yearly_averages(&id);
    Ok(Json(TrendView { metric: id, points }).into_response())
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn plot(
    State(state): State<AppState>,
    headers: HeaderMap,
    Path(file): Path<String>,
) -> Response {
    let asset_path = format!("/plots/{}", file);
    match state.plots.load(&asset_path).await {
        Ok(asset) => {
            let etag = asset.etag();
            let fresh = headers
                .get(header::IF_NONE_MATCH)
                .and_then(|v| v.to_str().ok())
                .map(|v| v.split(',').any(|t| t.trim() == etag))
                .unwrap_or(false);
            let etag_header = [(header::ETAG, etag)];
            if fresh {
                return (StatusCode::NOT_MODIFIED, etag_header).into_response();
            }
            (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "text/html; charset=utf-8".to_string())],
                etag_header,
                asset.bytes,
            )
                .into_response()
        }
        Err(DashboardError::AssetNotFound(path)) => {
            log_asset_miss(&path, "not found");
            (StatusCode::NOT_FOUND, Html(MISSING_PLACEHOLDER)).into_response()
        }
        Err(err) => err.into_response(),
    }
}

// ============================================================================
// Middleware
// ============================================================================

/// Security headers and request logging
async fn dashboard_middleware(request: Request, next: Next) -> Response {
    let method = request.method().to_string();
    let path = request.uri().path().to_string();
    let scope = ProfileScope::with_context("request", &[("path", v_str(&path))]);

    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    // The page frames its own chart assets.
    headers.insert(header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN"));
    headers.insert(
        header::CONTENT_SECURITY_POLICY,
        HeaderValue::from_static(
            "default-src 'self'; \
             script-src 'self' 'unsafe-inline' 'unsafe-eval' https://cdn.plot.ly; \
             style-src 'self' 'unsafe-inline'; \
             img-src 'self' data:; \
             frame-src 'self'; \
             frame-ancestors 'self'",
        ),
    );
    headers.insert(
        header::REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );

    log_request(&method, &path, response.status().as_u16(), scope.elapsed_ms());
    response
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/select/:id", post(select_form))
        .route("/api/state", get(api_state))
        .route("/api/select/:id", post(api_select))
        .route("/api/catalog", get(api_catalog))
        .route("/api/summary", get(api_summary))
        .route("/api/trend/:id", get(api_trend))
        .route("/api/health", get(health))
        .route("/plots/:file", get(plot))
        .with_state(state)
        .layer(middleware::from_fn(dashboard_middleware))
}

/// Periodically evict idle sessions.
pub fn spawn_session_pruner(sessions: Arc<SessionStore>, every: Duration) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);
        loop {
            ticker.tick().await;
            sessions.prune();
        }
    })
}

pub async fn serve(listener: tokio::net::TcpListener, state: AppState) -> std::io::Result<()> {
    axum::serve(listener, router(state)).await
}
