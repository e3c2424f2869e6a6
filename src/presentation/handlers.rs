// HTTP request handlers
use crate::application::grid_controller::{GridEvent, GridLayoutController, NewItem};
use crate::domain::dashboard::{DashboardItem, DeviceClass};
use crate::infrastructure::http_response::{accepts_brotli, json_response};
use crate::presentation::app_state::AppState;
use axum::{
    Json,
    body::Body,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderMap, Response, StatusCode},
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::Mutex;

type HandlerResult = Result<Response<Body>, StatusCode>;

#[derive(Deserialize)]
pub struct DashboardPath {
    pub page: String,
    pub device: DeviceClass,
}

#[derive(Deserialize)]
pub struct ItemPath {
    pub page: String,
    pub device: DeviceClass,
    pub id: String,
}

async fn open_dashboard(
    state: &AppState,
    page: &str,
    device: DeviceClass,
) -> Result<Arc<Mutex<GridLayoutController>>, StatusCode> {
    state.dashboard_service.open(page, device).await.map_err(|e| {
        tracing::error!("Error opening dashboard {}/{}: {:#}", page, device, e);
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Unwrap a JSON body, answering 400 for anything that does not parse into `T`
fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, StatusCode> {
    payload.map(|Json(value)| value).map_err(|rejection| {
        tracing::warn!("Rejected request body: {}", rejection.body_text());
        StatusCode::BAD_REQUEST
    })
}

/// Health check endpoint
pub async fn health_check() -> &'static str {
    "ok"
}

/// List all pages with a stored layout
pub async fn list_pages(headers: HeaderMap, State(state): State<Arc<AppState>>) -> HandlerResult {
    match state.dashboard_service.list_pages().await {
        Ok(pages) => json_response(&pages, accepts_brotli(&headers)).await,
        Err(e) => {
            tracing::error!("Error listing pages: {:#}", e);
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Current view of one dashboard
pub async fn get_dashboard(
    Path(path): Path<DashboardPath>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let controller = open_dashboard(&state, &path.page, path.device).await?;
    let view = controller.lock().await.view();
    json_response(&view, accepts_brotli(&headers)).await
}

/// Apply one event from the drag/resize engine and return the updated view
pub async fn post_event(
    Path(path): Path<DashboardPath>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GridEvent>, JsonRejection>,
) -> HandlerResult {
    let event = json_body(payload)?;
    let controller = open_dashboard(&state, &path.page, path.device).await?;
    let view = {
        let mut controller = controller.lock().await;
        let _save = controller.handle(event);
        controller.view()
    };
    json_response(&view, accepts_brotli(&headers)).await
}

/// Add a widget at the first free cell
pub async fn add_item(
    Path(path): Path<DashboardPath>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewItem>, JsonRejection>,
) -> HandlerResult {
    let new_item = json_body(payload)?;
    let controller = open_dashboard(&state, &path.page, path.device).await?;
    let (item, _save) = controller.lock().await.add_item(new_item);
    json_response(&item, accepts_brotli(&headers)).await
}

/// Replace the whole item list of a dashboard
pub async fn import_items(
    Path(path): Path<DashboardPath>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
    payload: Result<Json<Vec<DashboardItem>>, JsonRejection>,
) -> HandlerResult {
    let items = json_body(payload)?;
    let controller = open_dashboard(&state, &path.page, path.device).await?;
    let view = {
        let mut controller = controller.lock().await;
        let _save = controller.import_items(items);
        controller.view()
    };
    json_response(&view, accepts_brotli(&headers)).await
}

/// Copy a widget next to the original
pub async fn duplicate_item(
    Path(path): Path<ItemPath>,
    headers: HeaderMap,
    State(state): State<Arc<AppState>>,
) -> HandlerResult {
    let controller = open_dashboard(&state, &path.page, path.device).await?;
    let duplicated = controller.lock().await.duplicate_item(&path.id);
    match duplicated {
        Some((copy, _save)) => json_response(&copy, accepts_brotli(&headers)).await,
        None => Err(StatusCode::NOT_FOUND),
    }
}

/// Remove a widget
pub async fn delete_item(Path(path): Path<ItemPath>, State(state): State<Arc<AppState>>) -> StatusCode {
    let controller = match open_dashboard(&state, &path.page, path.device).await {
        Ok(controller) => controller,
        Err(status) => return status,
    };
    match controller.lock().await.remove_item(&path.id) {
        Some(_save) => StatusCode::NO_CONTENT,
        None => StatusCode::NOT_FOUND,
    }
}
