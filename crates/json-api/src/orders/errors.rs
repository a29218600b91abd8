//! Order Errors

use salvo::http::StatusError;
use tracing::error;

use threadline_app::domain::orders::OrdersServiceError;

pub(crate) const INVALID_REQUEST: &str = "Invalid request";
pub(crate) const ORDER_NOT_FOUND: &str = "Order not found";
pub(crate) const ORDER_ID_REQUIRED: &str = "Order ID is required";

/// Shared by update and delete so a foreign order is indistinguishable from a missing one.
pub(crate) const NOT_FOUND_OR_UNAUTHORIZED: &str = "Order not found or unauthorized";

pub(crate) fn invalid_request() -> StatusError {
    StatusError::bad_request().brief(INVALID_REQUEST)
}

pub(crate) fn into_status_error(error: OrdersServiceError) -> StatusError {
    match error {
        OrdersServiceError::NotFound => StatusError::not_found().brief(ORDER_NOT_FOUND),
        OrdersServiceError::Validation(_)
        | OrdersServiceError::InvalidQuantity(_)
        | OrdersServiceError::MissingRequiredData
        | OrdersServiceError::InvalidData => invalid_request(),
        OrdersServiceError::AlreadyExists => StatusError::conflict().brief("Order already exists"),
        OrdersServiceError::InvalidReference => {
            error!("authenticated user has no user record");

            StatusError::internal_server_error()
        }
        OrdersServiceError::Sql(source) => {
            error!("order storage failed: {source}");

            StatusError::internal_server_error()
        }
    }
}
