use super::actions::{MenuItemAction, MenuItemActionResult};
use crate::actor_framework::Entity;
use crate::domain::{
    MenuItem, MenuItemCreate, MenuItemId, MenuItemPatch, Money, Restaurant, RestaurantCreate, RestaurantId,
    RestaurantPatch,
};

fn require_name(field: &str, value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err(format!("{field} must not be blank"))
    } else {
        Ok(())
    }
}

/// Upper bound for menu prices and delivery fees.
pub const MAX_PRICE: Money = Money::from_dollars(10_000);

fn require_price(price: Money) -> Result<(), String> {
    if price.is_zero() {
        Err("price must be greater than zero".to_string())
    } else if price > MAX_PRICE {
        Err(format!("price must not exceed {MAX_PRICE}"))
    } else {
        Ok(())
    }
}

fn require_fee(fee: Money) -> Result<(), String> {
    if fee > MAX_PRICE {
        Err(format!("delivery fee must not exceed {MAX_PRICE}"))
    } else {
        Ok(())
    }
}

impl Entity for Restaurant {
    const KIND: &'static str = "restaurant";

    type Id = RestaurantId;
    type CreatePayload = RestaurantCreate;
    type Patch = RestaurantPatch;
    type Action = ();
    type ActionResult = ();

    fn id(&self) -> &RestaurantId {
        &self.id
    }

    /// Creates a new Restaurant from creation parameters.
    ///
    /// # Notes
    /// The owner must already have been stamped on the payload by the client;
    /// new restaurants start active.
    fn from_create(id: RestaurantId, payload: RestaurantCreate) -> Result<Self, String> {
        require_name("restaurant name", &payload.name)?;
        require_fee(payload.delivery_fee)?;
        let owner_id = payload.owner_id.ok_or_else(|| "restaurant owner is required".to_string())?;
        Ok(Self {
            id,
            name: payload.name.trim().to_string(),
            cuisine_type: payload.cuisine_type,
            owner_id,
            delivery_fee: payload.delivery_fee,
            is_active: true,
        })
    }

    fn on_update(&mut self, patch: RestaurantPatch) -> Result<(), String> {
        if let Some(name) = &patch.name {
            require_name("restaurant name", name)?;
        }
        if let Some(fee) = patch.delivery_fee {
            require_fee(fee)?;
        }
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(cuisine_type) = patch.cuisine_type {
            self.cuisine_type = cuisine_type;
        }
        if let Some(delivery_fee) = patch.delivery_fee {
            self.delivery_fee = delivery_fee;
        }
        if let Some(is_active) = patch.is_active {
            self.is_active = is_active;
        }
        Ok(())
    }

    fn handle_action(&mut self, _action: ()) -> Result<(), String> {
        Ok(())
    }
}

impl Entity for MenuItem {
    const KIND: &'static str = "menu item";

    type Id = MenuItemId;
    type CreatePayload = MenuItemCreate;
    type Patch = MenuItemPatch;
    type Action = MenuItemAction;
    type ActionResult = MenuItemActionResult;

    fn id(&self) -> &MenuItemId {
        &self.id
    }

    fn from_create(id: MenuItemId, payload: MenuItemCreate) -> Result<Self, String> {
        require_name("menu item name", &payload.name)?;
        require_price(payload.price)?;
        Ok(Self {
            id,
            restaurant_id: payload.restaurant_id,
            name: payload.name.trim().to_string(),
            category: payload.category,
            price: payload.price,
            is_available: true,
        })
    }

    /// Updates name, category and/or price.
    ///
    /// # Errors
    /// Rejects blank names and zero prices without applying any part of the patch.
    fn on_update(&mut self, patch: MenuItemPatch) -> Result<(), String> {
        if let Some(name) = &patch.name {
            require_name("menu item name", name)?;
        }
        if let Some(price) = patch.price {
            require_price(price)?;
        }
        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(price) = patch.price {
            self.price = price;
        }
        Ok(())
    }

    fn handle_action(&mut self, action: MenuItemAction) -> Result<MenuItemActionResult, String> {
        match action {
            MenuItemAction::SetAvailability(is_available) => {
                let changed = self.is_available != is_available;
                self.is_available = is_available;
                Ok(MenuItemActionResult::Availability { changed, is_available })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::UserId;

    fn create_payload() -> RestaurantCreate {
        let mut payload = RestaurantCreate::new("Thai Palace", "Thai", Money::from_cents(299));
        payload.owner_id = Some(UserId::from("user_1"));
        payload
    }

    #[test]
    fn restaurant_requires_owner() {
        let payload = RestaurantCreate::new("Thai Palace", "Thai", Money::ZERO);
        assert!(Restaurant::from_create(RestaurantId::from("restaurant_1"), payload).is_err());

        let restaurant = Restaurant::from_create(RestaurantId::from("restaurant_1"), create_payload()).unwrap();
        assert!(restaurant.is_active);
        assert!(restaurant.is_owned_by(&UserId::from("user_1")));
    }

    #[test]
    fn prices_and_fees_are_capped() {
        let over = Money::from_cents(MAX_PRICE.cents() + 1);
        let huge = MenuItem::from_create(
            MenuItemId::from("item_1"),
            MenuItemCreate::new("restaurant_1", "Gold Leaf Platter", "Mains", Money::from_cents(u64::MAX / 2 + 10)),
        );
        assert!(huge.is_err());
        assert!(MenuItem::from_create(
            MenuItemId::from("item_2"),
            MenuItemCreate::new("restaurant_1", "Tasting Menu", "Mains", MAX_PRICE),
        )
        .is_ok());

        let mut payload = create_payload();
        payload.delivery_fee = over;
        assert!(Restaurant::from_create(RestaurantId::from("restaurant_1"), payload).is_err());

        let mut restaurant = Restaurant::from_create(RestaurantId::from("restaurant_1"), create_payload()).unwrap();
        let patch = RestaurantPatch {
            name: Some("Renamed".to_string()),
            delivery_fee: Some(over),
            ..Default::default()
        };
        assert!(restaurant.on_update(patch).is_err());
        assert_eq!(restaurant.name, "Thai Palace");
        assert_eq!(restaurant.delivery_fee, Money::from_cents(299));
    }

    #[test]
    fn rejected_patch_leaves_item_untouched() {
        let mut item = MenuItem::from_create(
            MenuItemId::from("item_1"),
            MenuItemCreate::new("restaurant_1", "Green Curry", "Mains", Money::from_cents(1400)),
        )
        .unwrap();

        let patch = MenuItemPatch {
            name: Some("Red Curry".to_string()),
            category: None,
            price: Some(Money::ZERO),
        };
        assert!(item.on_update(patch).is_err());
        assert_eq!(item.name, "Green Curry");
        assert_eq!(item.price, Money::from_cents(1400));
    }
}
