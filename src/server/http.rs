//! JSON-over-HTTP endpoint.
//!
//! Routes:
//! - `POST /api/medical-query`: run the clinical search pipeline
//! - `GET /api/health`: liveness check
//!
//! Pipeline outcomes, failures included, are 200 responses carrying the
//! rendered string. A 400 means the body could not be read; a 500 means
//! the pipeline task itself died.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::{HeaderName, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tracing::Instrument;
use uuid::Uuid;

use super::types::{
    AppState, ErrorResponse, HealthResponse, MedicalQueryRequest, MedicalQueryResponse,
};

/// Path of the query endpoint.
pub const MEDICAL_QUERY_PATH: &str = "/api/medical-query";

/// Path of the health check.
pub const HEALTH_PATH: &str = "/api/health";

/// Response header carrying the per-request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Build the HTTP router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route(MEDICAL_QUERY_PATH, post(medical_query))
        .route(HEALTH_PATH, get(health))
        .with_state(state)
}

async fn medical_query(
    State(state): State<AppState>,
    payload: Result<Json<MedicalQueryRequest>, JsonRejection>,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = tracing::info_span!("medical_query", request_id = %request_id);

    let response = async move {
        let Json(request) = match payload {
            Ok(body) => body,
            Err(rejection) => {
                tracing::warn!(error = %rejection.body_text(), "Invalid request format");
                return (
                    StatusCode::BAD_REQUEST,
                    Json(ErrorResponse::invalid_request(rejection.body_text())),
                )
                    .into_response();
            }
        };

        tracing::info!(query = %request.query, "Received medical query");

        let search = state.search.clone();
        let query = request.query.clone();
        // Runs on its own task so a panic inside the pipeline becomes a 500
        // instead of a dropped connection.
        let outcome = tokio::spawn(
            async move { search.clinical_search(query).await }.in_current_span(),
        )
        .await;

        match outcome {
            Ok(text) => {
                tracing::info!("Successfully processed query");
                (
                    StatusCode::OK,
                    Json(MedicalQueryResponse {
                        query: request.query,
                        response: text,
                    }),
                )
                    .into_response()
            }
            Err(e) => {
                tracing::error!(error = %e, "Processing failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(ErrorResponse::processing_failed(e.to_string())),
                )
                    .into_response()
            }
        }
    }
    .instrument(span)
    .await;

    with_request_id(response, request_id)
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse::default())
}

fn with_request_id(mut response: Response, request_id: Uuid) -> Response {
    if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
        response
            .headers_mut()
            .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
    }
    response
}
