//! Order wire models

use salvo::oapi::ToSchema;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use threadline_app::domain::orders::records::{OrderRecord, OrderStatus, OrderUuid};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub(crate) enum OrderStatusDto {
    Pending,

    #[serde(rename = "In Progress")]
    InProgress,

    Completed,
}

impl From<OrderStatus> for OrderStatusDto {
    fn from(status: OrderStatus) -> Self {
        match status {
            OrderStatus::Pending => Self::Pending,
            OrderStatus::InProgress => Self::InProgress,
            OrderStatus::Completed => Self::Completed,
        }
    }
}

impl From<OrderStatusDto> for OrderStatus {
    fn from(status: OrderStatusDto) -> Self {
        match status {
            OrderStatusDto::Pending => Self::Pending,
            OrderStatusDto::InProgress => Self::InProgress,
            OrderStatusDto::Completed => Self::Completed,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OrderResponse {
    pub id: Uuid,

    /// The user who created the order
    pub owner: Uuid,

    pub product: String,

    pub quantity: u32,

    pub status: OrderStatusDto,

    /// Decimal amount, e.g. `"59.97"`
    pub total: String,

    pub notes: Option<String>,

    pub created_at: String,

    pub updated_at: String,
}

impl From<OrderRecord> for OrderResponse {
    fn from(order: OrderRecord) -> Self {
        Self {
            id: order.uuid.into(),
            owner: order.owner.into(),
            product: order.product,
            quantity: order.quantity,
            status: order.status.into(),
            total: order.total.to_string(),
            notes: order.notes,
            created_at: order.created_at.to_string(),
            updated_at: order.updated_at.to_string(),
        }
    }
}

/// A single order when `id` is given, otherwise the caller's orders.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum OrdersResponse {
    One(OrderResponse),
    Many(Vec<OrderResponse>),
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub(crate) fn new(message: &str) -> Self {
        Self {
            message: message.to_string(),
        }
    }
}

/// An `id` query parameter that is blank counts as absent.
pub(crate) fn present_order_id(id: Option<String>) -> Option<String> {
    id.filter(|id| !id.trim().is_empty())
}

/// A malformed id cannot name any order, so it is treated as an unknown one.
pub(crate) fn parse_order_id(id: &str) -> Option<OrderUuid> {
    id.trim().parse().ok()
}
