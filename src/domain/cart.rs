use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MenuItemId, Money, RestaurantId, UserId};

/// One pending item selection in a customer's cart.
///
/// There is at most one line per (customer, menu item); adding the same item
/// again grows the existing line.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartLine {
    pub customer_id: UserId,
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub special_instructions: Option<String>,
    pub added_at: DateTime<Utc>,
}

/// Validated add-to-cart command.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AddToCart {
    pub menu_item_id: MenuItemId,
    pub quantity: u32,
    pub special_instructions: Option<String>,
}

impl AddToCart {
    pub fn new(menu_item_id: impl Into<MenuItemId>, quantity: u32) -> Self {
        Self {
            menu_item_id: menu_item_id.into(),
            quantity,
            special_instructions: None,
        }
    }

    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.special_instructions = Some(instructions.into());
        self
    }
}

/// A cart line priced at the menu's current price.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartItemView {
    pub line: CartLine,
    pub item_name: String,
    pub restaurant_id: RestaurantId,
    pub unit_price: Money,
    pub line_total: Money,
    pub is_available: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: Money,
}

impl CartView {
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
