use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{MenuItemId, Money, OrderId, RestaurantId, UserId};

/// Lifecycle state of an order.
///
/// ```text
/// pending -> confirmed -> preparing -> ready -> delivered
/// pending -> cancelled
/// confirmed -> cancelled
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Preparing,
        OrderStatus::Ready,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Preparing => "preparing",
            OrderStatus::Ready => "ready",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Checks if a status transition is permitted.
    pub fn can_transition_to(&self, to: OrderStatus) -> bool {
        matches!(
            (self, to),
            (OrderStatus::Pending, OrderStatus::Confirmed)
                | (OrderStatus::Confirmed, OrderStatus::Preparing)
                | (OrderStatus::Preparing, OrderStatus::Ready)
                | (OrderStatus::Ready, OrderStatus::Delivered)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Confirmed, OrderStatus::Cancelled)
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| format!("unknown order status: {s}"))
    }
}

/// One line of a placed order, with the unit price captured at checkout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderLine {
    pub order_id: OrderId,
    pub menu_item_id: MenuItemId,
    pub item_name: String,
    pub quantity: u32,
    pub unit_price: Money,
    pub special_instructions: Option<String>,
}

impl OrderLine {
    pub fn line_total(&self) -> Money {
        Money::from_cents(self.unit_price.cents().saturating_mul(u64::from(self.quantity)))
    }
}

/// A customer order placed with a single restaurant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Order {
    pub id: OrderId,
    pub customer_id: UserId,
    pub restaurant_id: RestaurantId,
    pub status: OrderStatus,
    pub lines: Vec<OrderLine>,
    /// Subtotal plus delivery fee plus tax, fixed when the order is placed.
    pub total_amount: Money,
    pub delivery_fee: Money,
    pub tax_amount: Money,
    pub delivery_address: String,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Order {
    /// Sum of the line totals, excluding fees.
    pub fn subtotal(&self) -> Money {
        self.lines
            .iter()
            .map(OrderLine::line_total)
            .fold(Money::ZERO, Money::saturating_add)
    }
}

/// Where and how a checkout should be delivered.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DeliveryInfo {
    pub address: String,
    pub notes: Option<String>,
}

impl DeliveryInfo {
    pub fn new(address: impl Into<String>) -> Self {
        Self { address: address.into(), notes: None }
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_path_is_permitted() {
        use OrderStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Confirmed.can_transition_to(Preparing));
        assert!(Preparing.can_transition_to(Ready));
        assert!(Ready.can_transition_to(Delivered));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));
    }

    #[test]
    fn no_other_edges_exist() {
        let permitted = OrderStatus::ALL
            .iter()
            .flat_map(|from| OrderStatus::ALL.iter().map(move |to| (*from, *to)))
            .filter(|(from, to)| from.can_transition_to(*to))
            .count();
        assert_eq!(permitted, 6);
    }

    #[test]
    fn terminal_states_have_no_exits() {
        for from in [OrderStatus::Delivered, OrderStatus::Cancelled] {
            assert!(from.is_terminal());
            for to in OrderStatus::ALL {
                assert!(!from.can_transition_to(to), "{from} -> {to} must be rejected");
            }
        }
    }

    #[test]
    fn status_strings_round_trip() {
        for status in OrderStatus::ALL {
            assert_eq!(status.as_str().parse::<OrderStatus>(), Ok(status));
        }
        assert!("shipped".parse::<OrderStatus>().is_err());
    }
}
