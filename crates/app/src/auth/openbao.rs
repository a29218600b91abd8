//! OpenBao Transit engine as a [`TokenVerifier`].

use async_trait::async_trait;
use base64::{Engine as _, engine::general_purpose::STANDARD as BASE64};
use reqwest::Client;
use serde::{Deserialize, de::DeserializeOwned};
use serde_json::{Value, json};

use crate::auth::{TokenVerifier, TokenVerifierError};

#[derive(Debug, Clone)]
pub struct OpenBaoConfig {
    /// Server address, e.g. `http://localhost:8200`.
    pub addr: String,

    pub token: String,

    /// Transit key used for HMAC operations.
    pub transit_key: String,
}

#[derive(Debug, Clone)]
pub struct OpenBaoClient {
    config: OpenBaoConfig,
    http: Client,
}

impl OpenBaoClient {
    #[must_use]
    pub fn new(config: OpenBaoConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn transit_url(&self, operation: &str) -> String {
        format!(
            "{}/v1/transit/{operation}/{}",
            self.config.addr.trim_end_matches('/'),
            self.config.transit_key
        )
    }

    async fn transit<T: DeserializeOwned>(
        &self,
        operation: &str,
        body: Value,
    ) -> Result<T, TokenVerifierError> {
        let response = self
            .http
            .post(self.transit_url(operation))
            .header("X-Vault-Token", &self.config.token)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();

            return Err(TokenVerifierError::UnexpectedResponse(format!(
                "{operation} request failed with status {status}: {text}"
            )));
        }

        let envelope: TransitResponse<T> = response.json().await?;

        Ok(envelope.data)
    }
}

#[async_trait]
impl TokenVerifier for OpenBaoClient {
    async fn sign(&self, input: &[u8]) -> Result<String, TokenVerifierError> {
        let data: HmacData = self
            .transit("hmac", json!({ "input": BASE64.encode(input) }))
            .await?;

        Ok(data.hmac)
    }

    async fn verify(&self, input: &[u8], verifier: &str) -> Result<bool, TokenVerifierError> {
        let data: VerifyData = self
            .transit(
                "verify",
                json!({ "input": BASE64.encode(input), "hmac": verifier }),
            )
            .await?;

        Ok(data.valid)
    }
}

#[derive(Debug, Deserialize)]
struct TransitResponse<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct HmacData {
    hmac: String,
}

#[derive(Debug, Deserialize)]
struct VerifyData {
    valid: bool,
}
