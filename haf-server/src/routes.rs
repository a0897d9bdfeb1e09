//! HTTP routes: the page, its script, and the JSON chart API.

use crate::assets::DASHBOARD_JS;
use crate::page;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{Html, IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use haf_chart::{BindingLayer, ChartOptions, Figure, Layout, RegionId, RegionOutput};
use haf_db::DashboardData;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Read-only state shared by every request.
#[derive(Clone)]
pub struct AppState {
    data: Arc<DashboardData>,
    options: ChartOptions,
    layout: Arc<Layout>,
    page: Arc<str>,
}

impl AppState {
    pub fn new(data: Arc<DashboardData>, options: ChartOptions, default_msa: &str) -> Self {
        let layout = Layout::new(&data, default_msa);
        let page = page::render(&layout).into();
        Self {
            data,
            options,
            layout: Arc::new(layout),
            page,
        }
    }

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The requested key, or the default selection when absent.
    fn selection(&self, query: SelectionQuery) -> String {
        query
            .msa
            .unwrap_or_else(|| self.layout.default_selection().to_string())
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct SelectionQuery {
    msa: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RegionPayload {
    Figure(Figure),
    Error(String),
}

impl From<RegionOutput> for RegionPayload {
    fn from(output: RegionOutput) -> Self {
        match output {
            Ok(figure) => RegionPayload::Figure(figure),
            Err(fault) => RegionPayload::Error(fault.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct DashboardResponse {
    pub selection: String,
    pub regions: BTreeMap<RegionId, RegionPayload>,
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/assets/dashboard.js", get(script_handler))
        .route("/healthz", get(healthz_handler))
        .route("/api/layout", get(layout_handler))
        .route("/api/msas", get(msas_handler))
        .route("/api/dashboard", get(dashboard_handler))
        .route("/api/figures/{region}", get(figure_handler))
        .with_state(state)
}

async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(state.page.to_string())
}

async fn script_handler() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "application/javascript; charset=utf-8")],
        DASHBOARD_JS,
    )
}

async fn healthz_handler() -> &'static str {
    "ok"
}

async fn layout_handler(State(state): State<AppState>) -> Json<Layout> {
    Json(state.layout().clone())
}

async fn msas_handler(State(state): State<AppState>) -> Json<Vec<String>> {
    Json(state.data.msa_keys().to_vec())
}

async fn dashboard_handler(
    State(state): State<AppState>,
    Query(query): Query<SelectionQuery>,
) -> Json<DashboardResponse> {
    let selection = state.selection(query);
    let mut layer = BindingLayer::new(state.data.clone(), state.options.clone());
    layer.select(&selection);
    let regions = layer
        .into_outputs()
        .into_iter()
        .map(|(region, output)| (region, output.into()))
        .collect();
    Json(DashboardResponse { selection, regions })
}

async fn figure_handler(
    State(state): State<AppState>,
    Path(region): Path<String>,
    Query(query): Query<SelectionQuery>,
) -> Response {
    let region: RegionId = match region.parse() {
        Ok(region) => region,
        Err(err) => {
            log::debug!("server: {err}");
            return error_response(StatusCode::NOT_FOUND, err.to_string());
        }
    };

    let selection = state.selection(query);
    let mut layer = BindingLayer::with_bindings(
        state.data.clone(),
        state.options.clone(),
        vec![(region, region.producer())],
    );
    layer.select(&selection);
    match layer.into_outputs().pop() {
        Some((_, Ok(figure))) => Json(figure).into_response(),
        Some((_, Err(fault))) => error_response(StatusCode::INTERNAL_SERVER_ERROR, fault.to_string()),
        None => error_response(StatusCode::INTERNAL_SERVER_ERROR, format!("chart {region} produced no output")),
    }
}

fn error_response(status: StatusCode, message: String) -> Response {
    (status, Json(serde_json::json!({ "error": message }))).into_response()
}
