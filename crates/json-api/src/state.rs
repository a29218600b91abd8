//! Shared handler state

use std::sync::Arc;

use threadline_app::context::AppContext;

#[derive(Clone)]
pub(crate) struct State {
    pub(crate) app: AppContext,
}

impl State {
    #[must_use]
    pub(crate) fn new(app: AppContext) -> Arc<Self> {
        Arc::new(Self { app })
    }
}
