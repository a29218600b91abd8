//! Test helpers.

use std::{
    str::FromStr,
    sync::{Arc, Mutex},
};

use async_trait::async_trait;
use jiff::Timestamp;
use rust_decimal::Decimal;
use salvo::{affix_state::inject, prelude::*};
use threadline_app::{
    auth::MockAuthService,
    context::AppContext,
    domain::{
        orders::{
            MockOrdersService, OrdersService, OrdersServiceError,
            data::{NewOrder, OrderUpdate},
            records::{OrderRecord, OrderStatus, OrderUuid},
        },
        users::records::UserUuid,
    },
};
use uuid::Uuid;

use crate::{extensions::*, state::State};

pub(crate) const TEST_USER_UUID: UserUuid = UserUuid::from_uuid(Uuid::nil());

#[salvo::handler]
pub(crate) async fn inject_user(
    req: &mut Request,
    depot: &mut Depot,
    res: &mut Response,
    ctrl: &mut FlowCtrl,
) {
    depot.insert_user_uuid(TEST_USER_UUID);
    ctrl.call_next(req, depot, res).await;
}

pub(crate) fn strict_orders_mock() -> MockOrdersService {
    let mut orders = MockOrdersService::new();

    orders.expect_create_order().never();
    orders.expect_get_order().never();
    orders.expect_list_orders().never();
    orders.expect_update_order().never();
    orders.expect_delete_order().never();

    orders
}

fn strict_auth_mock() -> MockAuthService {
    let mut auth = MockAuthService::new();

    auth.expect_authenticate_bearer().never();

    auth
}

pub(crate) fn state_with(
    orders: impl OrdersService + 'static,
    auth: MockAuthService,
) -> Arc<State> {
    State::new(AppContext {
        orders: Arc::new(orders),
        auth: Arc::new(auth),
    })
}

pub(crate) fn state_with_orders(orders: MockOrdersService) -> Arc<State> {
    state_with(orders, strict_auth_mock())
}

pub(crate) fn state_with_auth(auth: MockAuthService) -> Arc<State> {
    state_with(strict_orders_mock(), auth)
}

/// `route` behind state injection and a fixed authenticated caller.
pub(crate) fn orders_service(orders: MockOrdersService, route: Router) -> Service {
    Service::new(
        Router::new()
            .hoop(inject(state_with_orders(orders)))
            .hoop(inject_user)
            .push(route),
    )
}

pub(crate) fn make_order(uuid: OrderUuid) -> OrderRecord {
    OrderRecord {
        uuid,
        owner: TEST_USER_UUID,
        product: "tshirt".to_string(),
        quantity: 2,
        status: OrderStatus::Pending,
        total: Decimal::from(20),
        notes: Some("gift wrap".to_string()),
        created_at: Timestamp::UNIX_EPOCH,
        updated_at: Timestamp::UNIX_EPOCH,
    }
}

pub(crate) fn decimal(value: &str) -> Decimal {
    Decimal::from_str(value).unwrap_or_default()
}

/// Owner-scoped orders held in memory, for end-to-end router tests.
#[derive(Debug, Default)]
pub(crate) struct InMemoryOrders {
    orders: Mutex<Vec<OrderRecord>>,
}

impl InMemoryOrders {
    fn with_orders<T>(&self, f: impl FnOnce(&mut Vec<OrderRecord>) -> T) -> T {
        let mut orders = self
            .orders
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner);

        f(&mut orders)
    }
}

#[async_trait]
impl OrdersService for InMemoryOrders {
    async fn list_orders(&self, owner: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        Ok(self.with_orders(|orders| {
            orders
                .iter()
                .rev()
                .filter(|order| order.owner == owner)
                .cloned()
                .collect()
        }))
    }

    async fn get_order(
        &self,
        owner: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        self.with_orders(|orders| {
            orders
                .iter()
                .find(|record| record.uuid == order && record.owner == owner)
                .cloned()
                .ok_or(OrdersServiceError::NotFound)
        })
    }

    async fn create_order(
        &self,
        owner: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let now = Timestamp::now();

        let record = OrderRecord {
            uuid: OrderUuid::new(),
            owner,
            product: order.product().to_string(),
            quantity: order.quantity(),
            status: OrderStatus::Pending,
            total: order.total(),
            notes: Some(order.notes().to_string()),
            created_at: now,
            updated_at: now,
        };

        self.with_orders(|orders| orders.push(record.clone()));

        Ok(record)
    }

    async fn update_order(
        &self,
        owner: UserUuid,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<u64, OrdersServiceError> {
        Ok(self.with_orders(|orders| {
            let Some(record) = orders
                .iter_mut()
                .find(|record| record.uuid == order && record.owner == owner)
            else {
                return 0;
            };

            if let Some(product) = update.product {
                record.product = product;
            }
            if let Some(quantity) = update.quantity {
                record.quantity = quantity;
            }
            if let Some(status) = update.status {
                record.status = status;
            }
            if let Some(total) = update.total {
                record.total = total;
            }

            record.updated_at = Timestamp::now();

            1
        }))
    }

    async fn delete_order(
        &self,
        owner: UserUuid,
        order: OrderUuid,
    ) -> Result<u64, OrdersServiceError> {
        Ok(self.with_orders(|orders| {
            let before = orders.len();

            orders.retain(|record| !(record.uuid == order && record.owner == owner));

            u64::try_from(before - orders.len()).unwrap_or_default()
        }))
    }
}
