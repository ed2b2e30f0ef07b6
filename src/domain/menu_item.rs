use serde::{Deserialize, Serialize};

use super::{MenuItemId, Money, RestaurantId};

/// A dish on a restaurant's menu.
///
/// `price` is the current list price; orders keep their own copy taken at
/// checkout, so edits here never reach placed orders.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MenuItem {
    pub id: MenuItemId,
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub category: String,
    pub price: Money,
    pub is_available: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MenuItemCreate {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub category: String,
    pub price: Money,
}

impl MenuItemCreate {
    pub fn new(
        restaurant_id: impl Into<RestaurantId>,
        name: impl Into<String>,
        category: impl Into<String>,
        price: Money,
    ) -> Self {
        Self {
            restaurant_id: restaurant_id.into(),
            name: name.into(),
            category: category.into(),
            price,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuItemPatch {
    pub name: Option<String>,
    pub category: Option<String>,
    pub price: Option<Money>,
}
