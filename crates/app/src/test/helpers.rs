//! Test Helpers

use std::str::FromStr;

use rust_decimal::Decimal;

use crate::domain::orders::data::{NewOrder, OrderDraft};

/// A valid order with the fixed note `"gift wrap"`.
pub(crate) fn new_order(
    product: &str,
    quantity: u32,
    unit_price: &str,
) -> Result<NewOrder, Box<dyn std::error::Error>> {
    let order = NewOrder::try_from(OrderDraft {
        product: Some(product.to_string()),
        quantity: Some(quantity),
        unit_price: Some(Decimal::from_str(unit_price)?),
        notes: Some("gift wrap".to_string()),
    })?;

    Ok(order)
}
