//! Orders Repository

use std::str::FromStr;

use jiff_sqlx::Timestamp as SqlxTimestamp;
use rust_decimal::Decimal;
use sqlx::{FromRow, Postgres, Row, Transaction, postgres::PgRow, query, query_as};

use crate::domain::{
    orders::{
        data::NewOrder,
        records::{OrderRecord, OrderStatus, OrderUuid},
    },
    users::records::UserUuid,
};

const LIST_ORDERS_SQL: &str = include_str!("sql/list_orders.sql");
const GET_ORDER_SQL: &str = include_str!("sql/get_order.sql");
const CREATE_ORDER_SQL: &str = include_str!("sql/create_order.sql");
const UPDATE_ORDER_SQL: &str = include_str!("sql/update_order.sql");
const DELETE_ORDER_SQL: &str = include_str!("sql/delete_order.sql");

/// Column values for an update; `None` keeps the stored value.
#[derive(Debug, Clone, Default)]
pub(crate) struct OrderChanges {
    pub product: Option<String>,
    pub quantity: Option<i32>,
    pub status: Option<OrderStatus>,
    pub total: Option<Decimal>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PgOrdersRepository;

impl PgOrdersRepository {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self
    }

    pub(crate) async fn list_orders(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
    ) -> Result<Vec<OrderRecord>, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(LIST_ORDERS_SQL)
            .bind(owner.into_uuid())
            .fetch_all(&mut **tx)
            .await
    }

    pub(crate) async fn get_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        order: OrderUuid,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(GET_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(owner.into_uuid())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn create_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        order: OrderUuid,
        quantity: i32,
        new_order: &NewOrder,
    ) -> Result<OrderRecord, sqlx::Error> {
        query_as::<Postgres, OrderRecord>(CREATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(owner.into_uuid())
            .bind(new_order.product())
            .bind(quantity)
            .bind(OrderStatus::Pending.as_str())
            .bind(new_order.total())
            .bind(new_order.notes())
            .fetch_one(&mut **tx)
            .await
    }

    pub(crate) async fn update_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        order: OrderUuid,
        changes: OrderChanges,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(UPDATE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(owner.into_uuid())
            .bind(changes.product)
            .bind(changes.quantity)
            .bind(changes.status.map(OrderStatus::as_str))
            .bind(changes.total)
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }

    pub(crate) async fn delete_order(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        owner: UserUuid,
        order: OrderUuid,
    ) -> Result<u64, sqlx::Error> {
        let rows_affected = query(DELETE_ORDER_SQL)
            .bind(order.into_uuid())
            .bind(owner.into_uuid())
            .execute(&mut **tx)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}

impl<'r> FromRow<'r, PgRow> for OrderRecord {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        let quantity = u32::try_from(row.try_get::<i32, _>("quantity")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "quantity".to_string(),
                source: Box::new(e),
            }
        })?;

        let status = OrderStatus::from_str(row.try_get::<&str, _>("status")?).map_err(|e| {
            sqlx::Error::ColumnDecode {
                index: "status".to_string(),
                source: Box::new(e),
            }
        })?;

        Ok(Self {
            uuid: OrderUuid::from_uuid(row.try_get("uuid")?),
            owner: UserUuid::from_uuid(row.try_get("owner_uuid")?),
            product: row.try_get("product")?,
            quantity,
            status,
            total: row.try_get("total")?,
            notes: row.try_get("notes")?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            updated_at: row.try_get::<SqlxTimestamp, _>("updated_at")?.to_jiff(),
        })
    }
}
