//! Response construction and error mapping.
//!
//! # Responsibilities
//! - Map pipeline failures to HTTP status + JSON `{error}` body
//! - Attach CORS headers to every response, success or failure
//!
//! # Design Decisions
//! - A bare error without CORS headers would break browser clients, so
//!   the helpers here are the only way handlers build responses
//! - Internal causes are logged, never sent to the client

use axum::body::Body;
use axum::http::{header, HeaderValue, Response, StatusCode};
use serde::Serialize;

use crate::security::CorsPolicy;

/// Failure taxonomy of both pipelines.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Contact form is not configured")]
    NotConfigured,
    #[error("Too many requests. Please try again later.")]
    RateLimited,
    #[error("Unsupported content type")]
    UnsupportedContentType,
    #[error("Please complete the security challenge")]
    MissingChallenge,
    #[error("Security challenge verification failed")]
    ChallengeFailed,
    #[error("{0}")]
    Validation(String),
    #[error("limit must be between 1 and 1000")]
    InvalidLimit,
    #[error("An internal error occurred. Please try again later.")]
    Internal,
    #[error("Failed to fetch submissions")]
    ListFailed,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotConfigured => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::RateLimited => StatusCode::TOO_MANY_REQUESTS,
            ApiError::UnsupportedContentType
            | ApiError::MissingChallenge
            | ApiError::ChallengeFailed
            | ApiError::Validation(_)
            | ApiError::InvalidLimit => StatusCode::BAD_REQUEST,
            ApiError::Internal | ApiError::ListFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// JSON response with CORS headers attached.
pub fn json_response<T: Serialize>(
    status: StatusCode,
    body: &T,
    cors: &CorsPolicy,
) -> Response<Body> {
    let payload = serde_json::to_vec(body).unwrap_or_else(|_| b"{}".to_vec());
    let mut response = Response::new(Body::from(payload));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    cors.apply(response.headers_mut());
    response
}

/// `{error}` body for a pipeline failure.
pub fn error_response(err: &ApiError, cors: &CorsPolicy) -> Response<Body> {
    json_response(
        err.status(),
        &serde_json::json!({ "error": err.to_string() }),
        cors,
    )
}

/// Empty response (preflight).
pub fn empty_response(status: StatusCode, cors: &CorsPolicy) -> Response<Body> {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = status;
    cors.apply(response.headers_mut());
    response
}
