//! HTTP route handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::domain::DepartureRecord;
use crate::efa::EfaError;
use crate::persistence::spawn_upsert;

use super::dto::*;
use super::state::AppState;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/api/stops/search", get(search_stops))
        .route("/api/stops/:stop_id", get(stop_departures))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stops by name.
///
/// Found stops are handed to the stop sink in the background; the
/// response does not wait for (or depend on) persistence.
async fn search_stops(
    State(state): State<AppState>,
    Query(req): Query<StopSearchRequest>,
) -> Result<Json<Vec<StopResult>>, AppError> {
    let query = req.q.as_deref().ok_or(AppError::MissingParameter("q"))?;

    let stops = state
        .efa
        .client()
        .search_stops(query, req.city.as_deref())
        .await?;

    let include_location = req.include_location();
    let results = stops
        .iter()
        .map(|s| StopResult::from_stop(s, include_location))
        .collect();

    spawn_upsert(state.stops.clone(), stops, query.to_string());

    Ok(Json(results))
}

/// Live departures for a stop, optionally narrowed to one track.
async fn stop_departures(
    State(state): State<AppState>,
    Path(stop_id): Path<String>,
    Query(req): Query<DeparturesRequest>,
) -> Result<Json<Vec<DepartureRecord>>, AppError> {
    let departures = state
        .efa
        .departures_on_track(&stop_id, req.options(), req.track.as_deref())
        .await?;

    Ok(Json(departures))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    /// A required query parameter was absent.
    MissingParameter(&'static str),
    /// Upstream failed or answered with a non-200 status.
    Upstream { status: Option<u16>, message: String },
    /// Upstream answered with something that is not JSON.
    Parse { message: String },
}

impl From<&EfaError> for AppError {
    fn from(e: &EfaError) -> Self {
        match e {
            EfaError::Json { message, .. } => AppError::Parse {
                message: message.clone(),
            },
            _ => AppError::Upstream {
                status: e.status(),
                message: e.to_string(),
            },
        }
    }
}

impl From<EfaError> for AppError {
    fn from(e: EfaError) -> Self {
        AppError::from(&e)
    }
}

impl From<Arc<EfaError>> for AppError {
    fn from(e: Arc<EfaError>) -> Self {
        AppError::from(e.as_ref())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, body) = match &self {
            AppError::MissingParameter(name) => (
                StatusCode::BAD_REQUEST,
                ErrorResponse {
                    error: format!("Missing '{name}' parameter"),
                    code: None,
                },
            ),
            AppError::Upstream { status, .. } => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: "Upstream KVV error".to_string(),
                    code: *status,
                },
            ),
            AppError::Parse { .. } => (
                StatusCode::BAD_GATEWAY,
                ErrorResponse {
                    error: "Invalid JSON from KVV".to_string(),
                    code: None,
                },
            ),
        };

        match &self {
            AppError::MissingParameter(_) => {}
            AppError::Upstream { message, .. } | AppError::Parse { message } => {
                warn!(%status, "upstream failure: {message}");
            }
        }

        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn efa_errors_map_to_app_errors() {
        let err = AppError::from(EfaError::Upstream { status: 503 });
        assert!(matches!(err, AppError::Upstream { status: Some(503), .. }));

        let err = AppError::from(Arc::new(EfaError::Json {
            message: "expected value".into(),
            body: None,
        }));
        assert!(matches!(err, AppError::Parse { .. }));
    }

    #[test]
    fn status_codes() {
        let response = AppError::MissingParameter("q").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = AppError::Upstream {
            status: Some(500),
            message: "boom".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);

        let response = AppError::Parse {
            message: "bad".into(),
        }
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    }
}
