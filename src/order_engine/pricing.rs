use chrono::{DateTime, Utc};

use super::OrderError;
use crate::domain::{CartLine, DeliveryInfo, MenuItem, Money, Order, OrderId, OrderLine, OrderStatus, Restaurant};

/// Turns one restaurant's share of a cart into a priced order.
#[derive(Debug, Clone, Copy, Default)]
pub struct Pricing {
    tax_rate_bps: u32,
}

/// A cart line together with the menu item it refers to, as read at checkout.
pub type PricedLine = (CartLine, MenuItem);

impl Pricing {
    pub fn new(tax_rate_bps: u32) -> Self {
        Self { tax_rate_bps }
    }

    pub fn tax_rate_bps(&self) -> u32 {
        self.tax_rate_bps
    }

    /// Builds a pending order for `restaurant` from its cart lines.
    ///
    /// Unit prices and item names are copied from the menu items as given, so
    /// the order is immune to later menu edits.
    ///
    /// # Errors
    /// `ValidationError` if any amount would overflow.
    pub fn build_order(
        &self,
        id: OrderId,
        restaurant: &Restaurant,
        lines: &[PricedLine],
        delivery: &DeliveryInfo,
        now: DateTime<Utc>,
    ) -> Result<Order, OrderError> {
        let overflow = || OrderError::ValidationError("order amount is too large".to_string());

        let mut order_lines = Vec::with_capacity(lines.len());
        let mut subtotal = Money::ZERO;
        for (line, item) in lines {
            let line_total = item.price.checked_times(line.quantity).ok_or_else(overflow)?;
            subtotal = subtotal.checked_add(line_total).ok_or_else(overflow)?;
            order_lines.push(OrderLine {
                order_id: id.clone(),
                menu_item_id: item.id.clone(),
                item_name: item.name.clone(),
                quantity: line.quantity,
                unit_price: item.price,
                special_instructions: line.special_instructions.clone(),
            });
        }

        let tax_amount = subtotal.checked_rate_bps(self.tax_rate_bps).ok_or_else(overflow)?;
        let total_amount = subtotal
            .checked_add(restaurant.delivery_fee)
            .and_then(|m| m.checked_add(tax_amount))
            .ok_or_else(overflow)?;

        Ok(Order {
            id,
            customer_id: lines
                .first()
                .map(|(line, _)| line.customer_id.clone())
                .ok_or_else(|| OrderError::ValidationError("an order needs at least one line".to_string()))?,
            restaurant_id: restaurant.id.clone(),
            status: OrderStatus::Pending,
            lines: order_lines,
            total_amount,
            delivery_fee: restaurant.delivery_fee,
            tax_amount,
            delivery_address: delivery.address.trim().to_string(),
            notes: delivery.notes.clone().filter(|n| !n.trim().is_empty()),
            created_at: now,
            updated_at: now,
        })
    }
}
