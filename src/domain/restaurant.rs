use serde::{Deserialize, Serialize};

use super::{Money, RestaurantId, UserId};

/// A restaurant listed in the catalog, owned by one restaurant owner.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Restaurant {
    pub id: RestaurantId,
    pub name: String,
    pub cuisine_type: String,
    pub owner_id: UserId,
    /// Flat fee added to every order placed with this restaurant.
    pub delivery_fee: Money,
    pub is_active: bool,
}

impl Restaurant {
    pub fn is_owned_by(&self, user: &UserId) -> bool {
        &self.owner_id == user
    }
}

/// Payload for listing a new restaurant. The owner comes from the acting user.
#[derive(Debug, Clone, Deserialize)]
pub struct RestaurantCreate {
    pub name: String,
    pub cuisine_type: String,
    pub delivery_fee: Money,
    #[serde(skip)]
    pub owner_id: Option<UserId>,
}

impl RestaurantCreate {
    pub fn new(name: impl Into<String>, cuisine_type: impl Into<String>, delivery_fee: Money) -> Self {
        Self {
            name: name.into(),
            cuisine_type: cuisine_type.into(),
            delivery_fee,
            owner_id: None,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RestaurantPatch {
    pub name: Option<String>,
    pub cuisine_type: Option<String>,
    pub delivery_fee: Option<Money>,
    pub is_active: Option<bool>,
}
