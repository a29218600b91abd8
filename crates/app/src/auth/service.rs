//! Auth service.

use std::sync::Arc;

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenSecret, ApiTokenVersion, AuthServiceError, IssuedApiToken,
        NewApiToken, TokenVerifier, build_verifier_input, format_api_token, parse_api_token,
        repository::PgAuthRepository,
    },
    domain::users::records::UserUuid,
};

#[derive(Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
    verifier: Arc<dyn TokenVerifier>,
}

impl std::fmt::Debug for PgAuthService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PgAuthService")
            .field("repository", &self.repository)
            .finish_non_exhaustive()
    }
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool, verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
            verifier,
        }
    }

    /// Issue a new API token for `user_uuid`.
    ///
    /// The raw token is only available on the returned value.
    ///
    /// # Errors
    ///
    /// Returns an error if signing or storing the token fails.
    pub async fn issue_api_token(
        &self,
        user_uuid: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = ApiTokenSecret::generate();

        let token_hash = self
            .verifier
            .sign(&build_verifier_input(token_uuid, version, user_uuid, &secret))
            .await?;

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                user_uuid,
                version,
                token_hash,
                expires_at,
            })
            .await?;

        debug!(token_uuid = %token_uuid, user_uuid = %user_uuid, "issued api token");

        Ok(IssuedApiToken {
            token: format_api_token(token_uuid, version, &secret),
            metadata,
        })
    }

    /// List every token of `user_uuid`, revoked and expired ones included.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user_uuid: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens_by_user(user_uuid).await?)
    }

    /// Revoke a token. Returns `false` when it was unknown or already revoked.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        Ok(self
            .repository
            .revoke_api_token(token_uuid)
            .await?
            .is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|error| {
            debug!(%error, "rejected malformed api token");

            AuthServiceError::NotFound
        })?;

        let token = self
            .repository
            .find_active_api_token(parsed.token_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        if token.version != parsed.version {
            return Err(AuthServiceError::NotFound);
        }

        let input = build_verifier_input(
            parsed.token_uuid,
            parsed.version,
            token.user_uuid,
            &parsed.secret,
        );

        if !self.verifier.verify(&input, &token.token_hash).await? {
            return Err(AuthServiceError::NotFound);
        }

        // Authentication does not depend on this write succeeding.
        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed.token_uuid)
            .await
        {
            warn!(%error, token_uuid = %parsed.token_uuid, "failed to record api token use");
        }

        Ok(token.user_uuid)
    }
}

/// Resolves a bearer token to the user it was issued to.
#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// # Errors
    ///
    /// [`AuthServiceError::NotFound`] for any token that does not authenticate:
    /// malformed, unknown, revoked, expired, or failing verification.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}
