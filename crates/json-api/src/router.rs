//! App Router

use std::sync::Arc;

use salvo::{
    affix_state::inject,
    oapi::{
        OpenApi,
        security::{Http, HttpAuthScheme, SecurityScheme},
        swagger_ui::SwaggerUi,
    },
    prelude::*,
    trailing_slash::remove_slash,
};

use crate::{
    auth,
    catcher::json_catcher,
    healthcheck,
    observability::{metrics_handler, request_logging},
    orders,
    state::State,
};

/// The order resource, gated by bearer authentication.
pub(crate) fn orders_router() -> Router {
    Router::with_path("orders")
        .hoop(auth::middleware::handler)
        .get(orders::read::handler)
        .post(orders::create::handler)
        .put(orders::update::handler)
        .delete(orders::delete::handler)
}

pub(crate) fn app_router(state: Arc<State>) -> Router {
    let router = Router::new()
        .hoop(CatchPanic::new())
        .hoop(request_logging)
        .hoop(remove_slash())
        .hoop(inject(state))
        .push(Router::with_path("healthcheck").get(healthcheck::handler))
        .push(Router::with_path("metrics").get(metrics_handler))
        .push(orders_router());

    let doc = OpenApi::new("Threadline API", env!("CARGO_PKG_VERSION"))
        .add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        )
        .merge_router(&router);

    router
        .push(doc.into_router("/api-doc/openapi.json"))
        .push(SwaggerUi::new("/api-doc/openapi.json").into_router("docs"))
}

/// The app router behind a catcher that answers every error in JSON.
pub(crate) fn app_service(state: Arc<State>) -> Service {
    Service::new(app_router(state)).catcher(json_catcher())
}
