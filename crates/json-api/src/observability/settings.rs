//! Request middleware settings fixed at startup.

use std::{sync::OnceLock, time::Duration};

use crate::config::observability::ObservabilityConfig;

#[derive(Debug, Clone, Copy)]
pub(super) struct RequestSettings {
    pub slow_request_threshold: Duration,
    pub parent_propagation: bool,
}

impl Default for RequestSettings {
    fn default() -> Self {
        Self {
            slow_request_threshold: Duration::from_secs(1),
            parent_propagation: false,
        }
    }
}

static REQUEST_SETTINGS: OnceLock<RequestSettings> = OnceLock::new();

pub(super) fn install(config: &ObservabilityConfig) {
    let _first = REQUEST_SETTINGS.set(RequestSettings {
        slow_request_threshold: config.slow_request_threshold(),
        parent_propagation: config.propagates_parent(),
    });
}

/// Installed settings, or defaults when running without [`install`] (tests).
pub(super) fn request_settings() -> RequestSettings {
    REQUEST_SETTINGS.get().copied().unwrap_or_default()
}
