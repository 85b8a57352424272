//! Bot-challenge verification.
//!
//! Delegates a client-supplied token to the provider's siteverify endpoint
//! with a server-to-server POST. Only an explicit `success: true` passes;
//! transport or decode failures fail the containing request rather than
//! letting the submission through.

use serde::Deserialize;

/// Error type for verification calls.
#[derive(Debug, thiserror::Error)]
pub enum ChallengeError {
    #[error("verification request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

#[derive(Debug, Deserialize)]
struct VerifyResponse {
    success: bool,
    #[serde(default, rename = "error-codes")]
    error_codes: Vec<String>,
}

/// Client for the external verification endpoint.
pub struct ChallengeVerifier {
    client: reqwest::Client,
    verify_url: String,
    secret_key: String,
}

impl ChallengeVerifier {
    pub fn new(verify_url: String, secret_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            verify_url,
            secret_key,
        }
    }

    /// Returns `Ok(true)` only when the endpoint reports success.
    pub async fn verify(&self, token: &str, remote_ip: &str) -> Result<bool, ChallengeError> {
        let params = [
            ("secret", self.secret_key.as_str()),
            ("response", token),
            ("remoteip", remote_ip),
        ];

        let response: VerifyResponse = self
            .client
            .post(&self.verify_url)
            .form(&params)
            .send()
            .await?
            .json()
            .await?;

        if !response.success {
            tracing::warn!(
                client = %remote_ip,
                error_codes = ?response.error_codes,
                "Challenge verification rejected"
            );
        }
        Ok(response.success)
    }
}
