//! Read Orders Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::{ORDER_NOT_FOUND, into_status_error},
        models::{OrderResponse, OrdersResponse, parse_order_id, present_order_id},
    },
    state::State,
};

/// Read Orders Handler
///
/// With `id`, returns that order if the caller owns it. Without, returns all
/// of the caller's orders, newest first.
#[endpoint(
    tags("orders"),
    summary = "Read Orders",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "An order, or the caller's orders", body = OrdersResponse),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.read",
    skip(id, depot),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    id: QueryParam<String, false>,
    depot: &mut Depot,
) -> Result<Json<OrdersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));

    let Some(id) = present_order_id(id.into_inner()) else {
        let orders = state
            .app
            .orders
            .list_orders(user)
            .await
            .map_err(into_status_error)?;

        return Ok(Json(OrdersResponse::Many(
            orders.into_iter().map(OrderResponse::from).collect(),
        )));
    };

    let order = parse_order_id(&id)
        .ok_or_else(|| StatusError::not_found().brief(ORDER_NOT_FOUND))?;

    span.record("order_uuid", tracing::field::display(order));

    let order = state
        .app
        .orders
        .get_order(user, order)
        .await
        .map_err(into_status_error)?;

    Ok(Json(OrdersResponse::One(order.into())))
}
