//! Orders Data

use rust_decimal::Decimal;
use thiserror::Error;

use crate::domain::orders::records::OrderStatus;

/// Unvalidated create input, as received from a caller.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderDraft {
    pub product: Option<String>,
    pub quantity: Option<u32>,
    pub unit_price: Option<Decimal>,
    pub notes: Option<String>,
}

/// Reasons a draft cannot become an order.
///
/// Zero and empty values count as missing: a zero quantity or zero price is
/// rejected rather than treated as a free order.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum OrderValidationError {
    #[error("product is required")]
    MissingProduct,

    #[error("quantity is required")]
    MissingQuantity,

    #[error("price is required")]
    MissingPrice,

    #[error("notes are required")]
    MissingNotes,

    #[error("price cannot be negative")]
    NegativePrice,

    #[error("quantity is too large")]
    QuantityOutOfRange,

    #[error("order total is too large")]
    TotalOutOfRange,
}

/// Validated create input.
#[derive(Debug, Clone, PartialEq)]
pub struct NewOrder {
    product: String,
    quantity: u32,
    unit_price: Decimal,
    total: Decimal,
    notes: String,
}

impl NewOrder {
    #[must_use]
    pub fn product(&self) -> &str {
        &self.product
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    #[must_use]
    pub const fn unit_price(&self) -> Decimal {
        self.unit_price
    }

    /// `unit_price × quantity`.
    #[must_use]
    pub const fn total(&self) -> Decimal {
        self.total
    }

    #[must_use]
    pub fn notes(&self) -> &str {
        &self.notes
    }
}

impl TryFrom<OrderDraft> for NewOrder {
    type Error = OrderValidationError;

    fn try_from(draft: OrderDraft) -> Result<Self, Self::Error> {
        let product = draft
            .product
            .filter(|product| !product.is_empty())
            .ok_or(OrderValidationError::MissingProduct)?;

        let quantity = draft
            .quantity
            .filter(|quantity| *quantity > 0)
            .ok_or(OrderValidationError::MissingQuantity)?;

        if i32::try_from(quantity).is_err() {
            return Err(OrderValidationError::QuantityOutOfRange);
        }

        let unit_price = draft
            .unit_price
            .filter(|price| !price.is_zero())
            .ok_or(OrderValidationError::MissingPrice)?;

        if unit_price.is_sign_negative() {
            return Err(OrderValidationError::NegativePrice);
        }

        let notes = draft
            .notes
            .filter(|notes| !notes.is_empty())
            .ok_or(OrderValidationError::MissingNotes)?;

        let total = unit_price
            .checked_mul(Decimal::from(quantity))
            .ok_or(OrderValidationError::TotalOutOfRange)?;

        Ok(Self {
            product,
            quantity,
            unit_price,
            total,
            notes,
        })
    }
}

/// Order Update Data
///
/// `None` leaves the stored value untouched. Owner, id and notes are not
/// updatable.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OrderUpdate {
    pub product: Option<String>,
    pub quantity: Option<u32>,
    pub status: Option<OrderStatus>,
    pub total: Option<Decimal>,
}
