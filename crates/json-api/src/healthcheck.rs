//! Liveness probe

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

const HEALTHY: &str = "ok";

/// Liveness response
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct HealthResponse {
    pub status: String,
}

/// Answers as long as the process is serving requests. Does not touch the
/// database or OpenBao.
#[endpoint(tags("health"), summary = "Liveness probe")]
pub(crate) async fn handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: HEALTHY.to_owned(),
    })
}
