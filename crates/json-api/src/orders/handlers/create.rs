//! Create Order Handler

use std::{str::FromStr, sync::Arc};

use rust_decimal::Decimal;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};

use threadline_app::domain::orders::data::{NewOrder, OrderDraft};

use crate::{
    extensions::*,
    orders::{
        errors::{INVALID_REQUEST, into_status_error},
        models::OrderResponse,
    },
    state::State,
};

/// Create Order Request
///
/// Every field is required and must be non-empty and non-zero.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateOrderRequest {
    pub product: Option<String>,

    pub quantity: Option<u32>,

    /// Unit price; the stored total is `price × quantity`
    pub price: Option<f64>,

    pub notes: Option<String>,
}

impl TryFrom<CreateOrderRequest> for OrderDraft {
    type Error = StatusError;

    fn try_from(request: CreateOrderRequest) -> Result<Self, Self::Error> {
        let unit_price = request
            .price
            .map(|price| Decimal::from_str(&price.to_string()))
            .transpose()
            .or_400(INVALID_REQUEST)?;

        Ok(OrderDraft {
            product: request.product,
            quantity: request.quantity,
            unit_price,
            notes: request.notes,
        })
    }
}

/// Create Order Handler
///
/// The order belongs to the caller and always starts out `Pending`.
#[endpoint(
    tags("orders"),
    summary = "Create Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Order created", body = OrderResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid request"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.create",
    skip(json, depot, res),
    fields(
        user_uuid = tracing::field::Empty,
        order_uuid = tracing::field::Empty
    ),
    err
)]
pub(crate) async fn handler(
    json: JsonBody<CreateOrderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<OrderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));

    let order = NewOrder::try_from(OrderDraft::try_from(json.into_inner())?)
        .or_400(INVALID_REQUEST)?;

    let order = state
        .app
        .orders
        .create_order(user, order)
        .await
        .map_err(into_status_error)?;

    span.record("order_uuid", tracing::field::display(order.uuid));

    res.add_header(LOCATION, format!("/orders?id={}", order.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(order.into()))
}
