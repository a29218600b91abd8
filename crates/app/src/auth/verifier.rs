//! Keyed HMAC over token material.

use async_trait::async_trait;
use mockall::automock;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TokenVerifierError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response from key service: {0}")]
    UnexpectedResponse(String),
}

/// Produces and checks verifiers for API token material.
///
/// The key never leaves the implementation, so a leaked `api_tokens` table
/// cannot be used to mint or check tokens offline.
#[automock]
#[async_trait]
pub trait TokenVerifier: Send + Sync {
    /// Computes the opaque verifier string stored alongside a token.
    async fn sign(&self, input: &[u8]) -> Result<String, TokenVerifierError>;

    /// Returns `Ok(false)` when `verifier` does not match `input`.
    async fn verify(&self, input: &[u8], verifier: &str) -> Result<bool, TokenVerifierError>;
}
