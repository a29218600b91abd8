//! Update Order Handler

use std::{str::FromStr, sync::Arc};

use rust_decimal::Decimal;
use salvo::{
    oapi::{ToSchema, extract::QueryParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use threadline_app::domain::orders::data::OrderUpdate;

use crate::{
    extensions::*,
    orders::{
        errors::{
            INVALID_REQUEST, NOT_FOUND_OR_UNAUTHORIZED, ORDER_ID_REQUIRED, into_status_error,
        },
        models::{MessageResponse, OrderStatusDto, parse_order_id, present_order_id},
    },
    state::State,
};

pub(crate) const ORDER_UPDATED: &str = "Order updated successfully";

/// Update Order Request
///
/// Omitted fields keep their stored value.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateOrderRequest {
    pub product: Option<String>,

    pub quantity: Option<u32>,

    pub status: Option<OrderStatusDto>,

    /// Replaces the stored total; it is not recomputed from quantity
    pub total: Option<f64>,
}

impl TryFrom<UpdateOrderRequest> for OrderUpdate {
    type Error = StatusError;

    fn try_from(request: UpdateOrderRequest) -> Result<Self, Self::Error> {
        let total = request
            .total
            .map(|total| Decimal::from_str(&total.to_string()))
            .transpose()
            .or_400(INVALID_REQUEST)?;

        Ok(OrderUpdate {
            product: request.product,
            quantity: request.quantity,
            status: request.status.map(Into::into),
            total,
        })
    }
}

/// Update Order Handler
///
/// Partially updates `product`, `quantity`, `status` and `total` of an order
/// the caller owns. A missing order and a foreign one get the same 404.
#[endpoint(
    tags("orders"),
    summary = "Update Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order updated", body = MessageResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Order ID is required, or invalid request"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found or unauthorized"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.update",
    skip(id, req, depot),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    id: QueryParam<String, false>,
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let id = present_order_id(id.into_inner())
        .ok_or_else(|| StatusError::bad_request().brief(ORDER_ID_REQUIRED))?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));

    let order = parse_order_id(&id)
        .ok_or_else(|| StatusError::not_found().brief(NOT_FOUND_OR_UNAUTHORIZED))?;

    span.record("order_uuid", tracing::field::display(order));

    let update = req
        .parse_json::<UpdateOrderRequest>()
        .await
        .or_400(INVALID_REQUEST)?;

    let update = OrderUpdate::try_from(update)?;

    let updated = state
        .app
        .orders
        .update_order(user, order, update)
        .await
        .map_err(into_status_error)?;

    if updated == 0 {
        return Err(StatusError::not_found().brief(NOT_FOUND_OR_UNAUTHORIZED));
    }

    tracing::info!(order_uuid = %order, "updated order");

    Ok(Json(MessageResponse::new(ORDER_UPDATED)))
}
