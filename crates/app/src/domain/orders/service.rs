//! Orders service.

use async_trait::async_trait;
use mockall::automock;
use tracing::debug;

use crate::{
    database::Db,
    domain::{
        orders::{
            data::{NewOrder, OrderUpdate},
            errors::OrdersServiceError,
            records::{OrderRecord, OrderUuid},
            repository::{OrderChanges, PgOrdersRepository},
        },
        users::records::UserUuid,
    },
};

#[derive(Debug, Clone)]
pub struct PgOrdersService {
    db: Db,
    repository: PgOrdersRepository,
}

impl PgOrdersService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgOrdersRepository::new(),
        }
    }
}

#[async_trait]
impl OrdersService for PgOrdersService {
    async fn list_orders(&self, owner: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(owner).await?;

        let orders = self.repository.list_orders(&mut tx, owner).await?;

        tx.commit().await?;

        Ok(orders)
    }

    async fn get_order(
        &self,
        owner: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(owner).await?;

        let order = self.repository.get_order(&mut tx, owner, order).await?;

        tx.commit().await?;

        Ok(order)
    }

    async fn create_order(
        &self,
        owner: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError> {
        let quantity = i32::try_from(order.quantity())?;

        let mut tx = self.db.begin_user_transaction(owner).await?;

        let created = self
            .repository
            .create_order(&mut tx, owner, OrderUuid::new(), quantity, &order)
            .await?;

        tx.commit().await?;

        debug!(order_uuid = %created.uuid, owner_uuid = %owner, "created order");

        Ok(created)
    }

    async fn update_order(
        &self,
        owner: UserUuid,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<u64, OrdersServiceError> {
        let changes = OrderChanges {
            quantity: update.quantity.map(i32::try_from).transpose()?,
            product: update.product,
            status: update.status,
            total: update.total,
        };

        let mut tx = self.db.begin_user_transaction(owner).await?;

        let rows_affected = self
            .repository
            .update_order(&mut tx, owner, order, changes)
            .await?;

        tx.commit().await?;

        Ok(rows_affected)
    }

    async fn delete_order(
        &self,
        owner: UserUuid,
        order: OrderUuid,
    ) -> Result<u64, OrdersServiceError> {
        let mut tx = self.db.begin_user_transaction(owner).await?;

        let rows_affected = self.repository.delete_order(&mut tx, owner, order).await?;

        tx.commit().await?;

        Ok(rows_affected)
    }
}

/// Owner-scoped order persistence.
///
/// Every operation takes the caller's identity and only ever sees orders that
/// identity owns; an order owned by someone else behaves as if it did not exist.
#[automock]
#[async_trait]
pub trait OrdersService: Send + Sync {
    /// Retrieves the owner's orders, newest first.
    async fn list_orders(&self, owner: UserUuid) -> Result<Vec<OrderRecord>, OrdersServiceError>;

    /// Retrieves a single order.
    async fn get_order(
        &self,
        owner: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Creates a pending order owned by `owner`.
    async fn create_order(
        &self,
        owner: UserUuid,
        order: NewOrder,
    ) -> Result<OrderRecord, OrdersServiceError>;

    /// Applies `update` and returns the number of orders changed (0 or 1).
    async fn update_order(
        &self,
        owner: UserUuid,
        order: OrderUuid,
        update: OrderUpdate,
    ) -> Result<u64, OrdersServiceError>;

    /// Deletes an order and returns the number of orders removed (0 or 1).
    async fn delete_order(
        &self,
        owner: UserUuid,
        order: OrderUuid,
    ) -> Result<u64, OrdersServiceError>;
}
