//! Request-body extraction.
//!
//! Accepts the three encodings browsers actually send for a form post and
//! normalizes them into one shape. Unknown content types are rejected
//! before anything reads the body.

use axum::body::Body;
use axum::extract::{FromRequest, Multipart};
use axum::http::Request;
use serde::Deserialize;

/// Hard cap on accepted body size. Largest legal payload is an 8000-char
/// message plus headroom for multipart framing.
const BODY_LIMIT: usize = 64 * 1024;

/// Error type for body parsing.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("unsupported content type")]
    UnsupportedContentType,
    #[error("malformed request body: {0}")]
    Malformed(String),
}

/// Normalized form fields. Any field may be empty; validation happens
/// downstream.
#[derive(Debug, Default, Clone)]
pub struct RawForm {
    pub name: String,
    pub email: String,
    pub message: String,
    pub challenge_token: Option<String>,
}

impl RawForm {
    /// Token present and non-blank.
    pub fn challenge_token(&self) -> Option<&str> {
        self.challenge_token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// Wire shape shared by the JSON and form-encoded bodies. The challenge
/// token arrives as the provider's field name or the neutral alias.
#[derive(Debug, Default, Deserialize)]
struct WireForm {
    #[serde(default)]
    name: String,
    #[serde(default)]
    email: String,
    #[serde(default)]
    message: String,
    #[serde(
        default,
        rename = "cf-turnstile-response",
        alias = "challengeToken"
    )]
    challenge_token: Option<String>,
}

impl From<WireForm> for RawForm {
    fn from(wire: WireForm) -> Self {
        Self {
            name: wire.name,
            email: wire.email,
            message: wire.message,
            challenge_token: wire.challenge_token,
        }
    }
}

/// Extract the submission fields from a request according to its
/// `Content-Type`.
pub async fn parse_submission(req: Request<Body>) -> Result<RawForm, ParseError> {
    let content_type = req
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_ascii_lowercase();

    if content_type.starts_with("application/json") {
        let bytes = read_body(req).await?;
        let wire: WireForm =
            serde_json::from_slice(&bytes).map_err(|e| ParseError::Malformed(e.to_string()))?;
        Ok(wire.into())
    } else if content_type.starts_with("application/x-www-form-urlencoded") {
        let bytes = read_body(req).await?;
        let wire: WireForm = serde_urlencoded::from_bytes(&bytes)
            .map_err(|e| ParseError::Malformed(e.to_string()))?;
        Ok(wire.into())
    } else if content_type.starts_with("multipart/form-data") {
        parse_multipart(req).await
    } else {
        Err(ParseError::UnsupportedContentType)
    }
}

async fn read_body(req: Request<Body>) -> Result<Vec<u8>, ParseError> {
    let bytes = axum::body::to_bytes(req.into_body(), BODY_LIMIT)
        .await
        .map_err(|e| ParseError::Malformed(e.to_string()))?;
    Ok(bytes.to_vec())
}

async fn parse_multipart(req: Request<Body>) -> Result<RawForm, ParseError> {
    let mut multipart = Multipart::from_request(req, &())
        .await
        .map_err(|e| ParseError::Malformed(e.to_string()))?;

    let mut form = RawForm::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ParseError::Malformed(e.to_string()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        let value = field
            .text()
            .await
            .map_err(|e| ParseError::Malformed(e.to_string()))?;
        match name.as_str() {
            "name" => form.name = value,
            "email" => form.email = value,
            "message" => form.message = value,
            "cf-turnstile-response" | "challengeToken" => {
                form.challenge_token = Some(value);
            }
            _ => {}
        }
    }
    Ok(form)
}
