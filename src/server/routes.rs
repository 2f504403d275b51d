//! HTTP routes
//!
//! The HTML form at `/`, the JSON search API and the read-only history API.

use crate::cities::{parse_cities, parse_city_names};
use crate::error::Error;
use crate::history::SearchRecord;
use crate::selector::SearchOutcome;
use crate::server::html::{render_page, FormValues};
use crate::server::state::AppState;

use axum::{
    extract::{
        rejection::{FormRejection, JsonRejection},
        Path, State,
    },
    http::StatusCode,
    response::{Html, IntoResponse},
    routing::{get, post},
    Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tower_http::trace::TraceLayer;

/// Number of past searches listed under the HTML form
const RECENT_ON_PAGE: usize = 5;

/// Create the router
pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/search", post(form_search_handler))
        .route("/api/search", post(api_search_handler))
        .route("/api/status", get(status_handler))
        .route("/api/history", get(history_handler))
        .route(
            "/api/history/:id",
            get(history_entry_handler).delete(history_delete_handler),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// API error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
    pub code: String,
    #[serde(skip)]
    pub status: StatusCode,
}

impl ApiError {
    fn not_found(what: String) -> Self {
        ApiError {
            error: what,
            code: "NOT_FOUND".to_string(),
            status: StatusCode::NOT_FOUND,
        }
    }

    fn invalid_request(message: String) -> Self {
        ApiError {
            error: message,
            code: "INVALID_REQUEST".to_string(),
            status: StatusCode::BAD_REQUEST,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::invalid_request(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        (self.status, Json(self)).into_response()
    }
}

/// HTTP status for a failed operation
fn status_for(err: &Error) -> StatusCode {
    match err {
        Error::Gateway(_) | Error::Http(_) => StatusCode::BAD_GATEWAY,
        Error::History(_) | Error::Io(_) | Error::Json(_) | Error::Server(_) | Error::Config(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
        _ => StatusCode::BAD_REQUEST,
    }
}

impl From<Error> for ApiError {
    fn from(err: Error) -> Self {
        ApiError {
            status: status_for(&err),
            code: err.code().to_string(),
            error: err.to_string(),
        }
    }
}

/// Candidate cities as either one newline-delimited blob or a list
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum CityList {
    Text(String),
    List(Vec<String>),
}

impl CityList {
    fn parse(&self) -> crate::error::Result<Vec<String>> {
        match self {
            CityList::Text(text) => parse_cities(text),
            CityList::List(list) => parse_city_names(list.iter().map(String::as_str)),
        }
    }
}

/// JSON search request body
#[derive(Debug, Deserialize)]
pub struct SearchRequest {
    pub anchor_city: String,
    /// Miles; falls back to `defaults.radius`
    pub radius: Option<f64>,
    pub cities: CityList,
}

/// HTML form fields
#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub anchor_city: String,
    #[serde(default)]
    pub radius: String,
    #[serde(default)]
    pub cities: String,
}

/// Search form page
///
/// GET /
async fn index_handler(State(state): State<Arc<AppState>>) -> Html<String> {
    let radius = state.config.defaults.radius.to_string();
    let form = FormValues {
        radius: &radius,
        ..FormValues::default()
    };
    let recent = recent_searches(&state);
    Html(render_page(&form, None, None, &recent))
}

fn recent_searches(state: &AppState) -> Vec<SearchRecord> {
    state
        .load_history()
        .map(|h| h.recent(RECENT_ON_PAGE).to_vec())
        .unwrap_or_default()
}

/// Form submission
///
/// POST /search
async fn form_search_handler(
    State(state): State<Arc<AppState>>,
    form: Result<Form<SearchForm>, FormRejection>,
) -> (StatusCode, Html<String>) {
    let form = match form {
        Ok(Form(form)) => form,
        Err(rejection) => {
            let recent = recent_searches(&state);
            let message = rejection.body_text();
            return (
                StatusCode::BAD_REQUEST,
                Html(render_page(&FormValues::default(), None, Some(&message), &recent)),
            );
        }
    };

    let result: crate::error::Result<SearchOutcome> = async {
        let radius: f64 = form.radius.trim().parse().map_err(|_| {
            Error::InvalidRadius(format!("Radius must be a number, got '{}'", form.radius))
        })?;
        let cities = parse_cities(&form.cities)?;
        state.search(&form.anchor_city, radius, &cities).await
    }
    .await;

    let values = FormValues {
        anchor_city: &form.anchor_city,
        radius: &form.radius,
        cities: &form.cities,
    };

    match result {
        Ok(outcome) => {
            let recent = recent_searches(&state);
            (StatusCode::OK, Html(render_page(&values, Some(&outcome), None, &recent)))
        }
        Err(e) => {
            let recent = recent_searches(&state);
            let message = e.to_string();
            (status_for(&e), Html(render_page(&values, None, Some(&message), &recent)))
        }
    }
}

/// JSON search
///
/// POST /api/search
async fn api_search_handler(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchOutcome>, ApiError> {
    let Json(req) = payload?;
    let cities = req.cities.parse()?;
    let radius = req.radius.unwrap_or(state.config.defaults.radius);
    let outcome = state.search(&req.anchor_city, radius, &cities).await?;
    Ok(Json(outcome))
}

/// Status response
#[derive(Debug, Serialize, Deserialize)]
pub struct StatusResponse {
    pub running: bool,
    pub version: String,
    /// Active gateway backend
    pub backend: String,
    pub history_enabled: bool,
    pub history_count: usize,
}

/// Server status
///
/// GET /api/status
async fn status_handler(State(state): State<Arc<AppState>>) -> Json<StatusResponse> {
    let history_count = state.load_history().map(|h| h.len()).unwrap_or(0);

    Json(StatusResponse {
        running: true,
        version: env!("CARGO_PKG_VERSION").to_string(),
        backend: state.gateway_name().to_string(),
        history_enabled: state.config.history.enabled,
        history_count,
    })
}

/// History list response
#[derive(Debug, Serialize, Deserialize)]
pub struct HistoryResponse {
    pub entries: Vec<SearchRecord>,
    pub count: usize,
}

/// History list, newest first
///
/// GET /api/history
async fn history_handler(
    State(state): State<Arc<AppState>>,
) -> Result<Json<HistoryResponse>, ApiError> {
    let history = state.load_history()?;
    let entries = history.entries().to_vec();

    Ok(Json(HistoryResponse {
        count: entries.len(),
        entries,
    }))
}

/// Single history entry
///
/// GET /api/history/:id
async fn history_entry_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<SearchRecord>, ApiError> {
    let history = state.load_history()?;

    history
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::not_found(format!("History entry not found: {}", id)))
}

/// Delete a history entry
///
/// DELETE /api/history/:id
async fn history_delete_handler(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError> {
    if state.delete_history_entry(&id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::not_found(format!("History entry not found: {}", id)))
    }
}
