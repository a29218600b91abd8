//! Auth service errors.

use thiserror::Error;

use crate::auth::TokenVerifierError;

#[derive(Debug, Error)]
pub enum AuthServiceError {
    /// The bearer token does not authenticate anyone. Malformed, unknown,
    /// revoked, expired and mis-signed tokens all collapse into this variant.
    #[error("api token not accepted")]
    NotFound,

    #[error("api token storage failed")]
    Sql(#[from] sqlx::Error),

    #[error("api token verifier unavailable")]
    Verifier(#[from] TokenVerifierError),
}
