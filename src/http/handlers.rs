//! Request pipelines for the contact-form API.
//!
//! Each pipeline runs its checks in a fixed order and short-circuits on
//! the first failure. Every response, success or error, carries the CORS
//! headers resolved for the request origin.

use std::net::SocketAddr;

use axum::body::Body;
use axum::extract::{ConnectInfo, Query, State};
use axum::http::{HeaderMap, Request, Response, StatusCode};
use chrono::Utc;
use serde::Deserialize;

use crate::forms::{parse_submission, validate_fields, FieldBounds, ParseError};
use crate::http::response::{empty_response, error_response, json_response, ApiError};
use crate::http::server::AppState;
use crate::observability::metrics;
use crate::security::{CorsPolicy, RateLimitDecision};
use crate::store::{submissions, Submission};

const UNKNOWN: &str = "unknown";

const DEFAULT_LIST_LIMIT: usize = 100;
const MAX_LIST_LIMIT: usize = 1000;

/// CORS preflight: 204 with the resolved header set, nothing else.
pub async fn preflight(State(state): State<AppState>, headers: HeaderMap) -> Response<Body> {
    let cors = resolve_cors(&headers, &state);
    metrics::record_request("OPTIONS", 204);
    empty_response(StatusCode::NO_CONTENT, &cors)
}

/// Create-submission pipeline.
pub async fn submit(
    State(state): State<AppState>,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    request: Request<Body>,
) -> Response<Body> {
    let cors = resolve_cors(request.headers(), &state);
    let client_ip = client_ip(request.headers(), addr);
    let country = header_or_unknown(request.headers(), "cf-ipcountry");
    let user_agent = header_or_unknown(request.headers(), "user-agent");

    let result = run_submit(&state, request, &client_ip, country, user_agent).await;
    match result {
        Ok(response) => {
            metrics::record_request("POST", 200);
            metrics::record_submission();
            json_response(StatusCode::OK, &response, &cors)
        }
        Err(err) => {
            metrics::record_request("POST", err.status().as_u16());
            error_response(&err, &cors)
        }
    }
}

async fn run_submit(
    state: &AppState,
    request: Request<Body>,
    client_ip: &str,
    country: String,
    user_agent: String,
) -> Result<serde_json::Value, ApiError> {
    // 1. A store must be wired up before anything is accepted.
    let Some(store) = &state.submissions else {
        return Err(ApiError::NotConfigured);
    };
    let limiter = state
        .rate_limiter
        .as_ref()
        .ok_or(ApiError::NotConfigured)?;

    // 2. Rate limit. The counter is consumed here, before parsing, so
    // attempts that fail validation still spend budget.
    match limiter.check(client_ip).await {
        Ok(RateLimitDecision::Allowed) => {}
        Ok(RateLimitDecision::Limited) => {
            metrics::record_rate_limited();
            return Err(ApiError::RateLimited);
        }
        Err(e) => {
            tracing::error!(error = %e, "Rate limit counter unavailable");
            return Err(ApiError::Internal);
        }
    }

    // 3. Parse the body.
    let form = match parse_submission(request).await {
        Ok(form) => form,
        Err(ParseError::UnsupportedContentType) => return Err(ApiError::UnsupportedContentType),
        Err(ParseError::Malformed(reason)) => {
            tracing::debug!(%reason, "Rejecting malformed body");
            return Err(ApiError::Internal);
        }
    };

    // 4. The challenge token is required even when verification is off.
    let token = form.challenge_token().ok_or(ApiError::MissingChallenge)?;

    // 5. Verify it, when a secret is configured.
    if let Some(verifier) = &state.verifier {
        match verifier.verify(token, client_ip).await {
            Ok(true) => {}
            Ok(false) => return Err(ApiError::ChallengeFailed),
            Err(e) => {
                tracing::error!(error = %e, "Challenge verification unreachable");
                return Err(ApiError::Internal);
            }
        }
    }

    // 6. Normalize and validate fields.
    let name = form.name.trim().to_string();
    let email = form.email.trim().to_lowercase();
    let message = form.message.trim().to_string();
    let bounds = FieldBounds {
        min_name: state.config.validation.min_name_length,
        max_name: state.config.validation.max_name_length,
        min_message: state.config.validation.min_message_length,
        max_message: state.config.validation.max_message_length,
    };
    validate_fields(&name, &email, &message, &bounds).map_err(ApiError::Validation)?;

    // 7. Persist.
    let submission = Submission {
        id: submissions::generate_id(),
        name,
        email,
        message,
        timestamp: Utc::now().to_rfc3339(),
        ip: client_ip.to_string(),
        country,
        user_agent,
        read: false,
    };

    if let Err(e) = store.create(&submission).await {
        tracing::error!(error = %e, id = %submission.id, "Failed to persist submission");
        return Err(ApiError::Internal);
    }

    tracing::info!(id = %submission.id, client = %client_ip, "Submission stored");

    Ok(serde_json::json!({
        "success": true,
        "id": submission.id,
        "message": "Your message has been sent successfully!",
        "timestamp": submission.timestamp,
    }))
}

/// Query parameters of the list endpoint. `limit` stays a string so range
/// errors produce our 400 instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub struct ListQuery {
    pub api_key: Option<String>,
    pub limit: Option<String>,
    pub cursor: Option<String>,
}

/// Read-submissions pipeline.
pub async fn list(
    State(state): State<AppState>,
    Query(params): Query<ListQuery>,
    headers: HeaderMap,
) -> Response<Body> {
    let cors = resolve_cors(&headers, &state);

    // Key from query parameter or header. A wrong or absent key gets the
    // same generic status payload as an unconfigured endpoint; the
    // response never betrays whether listing is protected.
    let presented = params
        .api_key
        .as_deref()
        .or_else(|| headers.get("x-api-key").and_then(|v| v.to_str().ok()));
    let authorized = matches!(
        (&state.config.api.api_key, presented),
        (Some(expected), Some(given)) if expected.as_str() == given
    );
    if !authorized {
        metrics::record_request("GET", 200);
        return json_response(
            StatusCode::OK,
            &serde_json::json!({
                "status": "Contact form API is running",
                "timestamp": Utc::now().to_rfc3339(),
            }),
            &cors,
        );
    }

    match run_list(&state, &params).await {
        Ok(body) => {
            metrics::record_request("GET", 200);
            json_response(StatusCode::OK, &body, &cors)
        }
        Err(err) => {
            metrics::record_request("GET", err.status().as_u16());
            error_response(&err, &cors)
        }
    }
}

async fn run_list(state: &AppState, params: &ListQuery) -> Result<serde_json::Value, ApiError> {
    let Some(store) = &state.submissions else {
        tracing::error!("Listing requested but no store is configured");
        return Err(ApiError::Internal);
    };

    let limit = match &params.limit {
        None => DEFAULT_LIST_LIMIT,
        Some(raw) => match raw.parse::<usize>() {
            Ok(n) if (1..=MAX_LIST_LIMIT).contains(&n) => n,
            _ => return Err(ApiError::InvalidLimit),
        },
    };

    let page = store
        .list(limit, params.cursor.as_deref())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to fetch submissions");
            ApiError::ListFailed
        })?;

    Ok(serde_json::json!({
        "submissions": page.submissions,
        "count": page.submissions.len(),
        "list_complete": page.list_complete,
        "cursor": page.cursor,
        "timestamp": Utc::now().to_rfc3339(),
    }))
}

fn resolve_cors(headers: &HeaderMap, state: &AppState) -> CorsPolicy {
    let origin = headers.get("origin").and_then(|v| v.to_str().ok());
    CorsPolicy::resolve(origin, &state.config.cors.allowed_origins)
}

/// Client IP from proxy headers, falling back to the socket peer.
fn client_ip(headers: &HeaderMap, addr: SocketAddr) -> String {
    if let Some(ip) = headers.get("cf-connecting-ip").and_then(|v| v.to_str().ok()) {
        let ip = ip.trim();
        if !ip.is_empty() {
            return ip.to_string();
        }
    }
    if let Some(forwarded) = headers.get("x-forwarded-for").and_then(|v| v.to_str().ok()) {
        if let Some(first) = forwarded.split(',').next() {
            let first = first.trim();
            if !first.is_empty() {
                return first.to_string();
            }
        }
    }
    addr.ip().to_string()
}

fn header_or_unknown(headers: &HeaderMap, name: &str) -> String {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN)
        .to_string()
}
