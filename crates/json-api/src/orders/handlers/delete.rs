//! Delete Order Handler

use std::sync::Arc;

use salvo::{oapi::extract::QueryParam, prelude::*};

use crate::{
    extensions::*,
    orders::{
        errors::{NOT_FOUND_OR_UNAUTHORIZED, ORDER_ID_REQUIRED, into_status_error},
        models::{MessageResponse, parse_order_id, present_order_id},
    },
    state::State,
};

pub(crate) const ORDER_DELETED: &str = "Order deleted successfully";

/// Delete Order Handler
#[endpoint(
    tags("orders"),
    summary = "Delete Order",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Order deleted", body = MessageResponse),
        (status_code = StatusCode::BAD_REQUEST, description = "Order ID is required"),
        (status_code = StatusCode::NOT_FOUND, description = "Order not found or unauthorized"),
        (status_code = StatusCode::UNAUTHORIZED, description = "Unauthorized"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
#[tracing::instrument(
    name = "orders.delete",
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
) -> Result<Json<MessageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let user = depot.user_uuid_or_401()?;

    let id = present_order_id(id.into_inner())
        .ok_or_else(|| StatusError::bad_request().brief(ORDER_ID_REQUIRED))?;

    let order = parse_order_id(&id)
        .ok_or_else(|| StatusError::not_found().brief(NOT_FOUND_OR_UNAUTHORIZED))?;

    let span = tracing::Span::current();

    span.record("user_uuid", tracing::field::display(user));
    span.record("order_uuid", tracing::field::display(order));

    let deleted = state
        .app
        .orders
        .delete_order(user, order)
        .await
        .map_err(into_status_error)?;

    if deleted == 0 {
        return Err(StatusError::not_found().brief(NOT_FOUND_OR_UNAUTHORIZED));
    }

    tracing::info!(order_uuid = %order, "deleted order");

    Ok(Json(MessageResponse::new(ORDER_DELETED)))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use threadline_app::domain::orders::{MockOrdersService, records::OrderUuid};

    use crate::test_helpers::{TEST_USER_UUID, orders_service, strict_orders_mock};

    use super::*;

    fn make_service(orders: MockOrdersService) -> Service {
        orders_service(orders, Router::with_path("orders").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_order_success() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_delete_order()
            .once()
            .withf(move |user, u| *user == TEST_USER_UUID && *u == uuid)
            .return_once(|_, _| Ok(1));

        orders.expect_get_order().never();
        orders.expect_list_orders().never();
        orders.expect_create_order().never();
        orders.expect_update_order().never();

        let mut res = TestClient::delete(format!("http://example.com/orders?id={uuid}"))
            .send(&make_service(orders))
            .await;

        let body: MessageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.message, ORDER_DELETED);

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_without_id_returns_400_before_store_access() -> TestResult {
        let mut res = TestClient::delete("http://example.com/orders")
            .send(&make_service(strict_orders_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains(ORDER_ID_REQUIRED));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_blank_id_returns_400_before_store_access() -> TestResult {
        let mut res = TestClient::delete("http://example.com/orders?id=")
            .send(&make_service(strict_orders_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));
        assert!(res.take_string().await?.contains(ORDER_ID_REQUIRED));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_unaffected_order_returns_404() -> TestResult {
        let uuid = OrderUuid::new();

        let mut orders = MockOrdersService::new();

        orders
            .expect_delete_order()
            .once()
            .return_once(|_, _| Ok(0));

        orders.expect_get_order().never();
        orders.expect_list_orders().never();
        orders.expect_create_order().never();
        orders.expect_update_order().never();

        let mut res = TestClient::delete(format!("http://example.com/orders?id={uuid}"))
            .send(&make_service(orders))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));
        assert!(res.take_string().await?.contains(NOT_FOUND_OR_UNAUTHORIZED));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_malformed_id_returns_404_without_store_access() -> TestResult {
        let res = TestClient::delete("http://example.com/orders?id=order-1")
            .send(&make_service(strict_orders_mock()))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
