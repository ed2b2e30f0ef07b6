use tracing::{debug, info, instrument};

use super::RestaurantClient;
use crate::actor_framework::ResourceClient;
use crate::catalog::{CatalogError, MenuItemAction, MenuItemActionResult};
use crate::domain::{Actor, MenuItem, MenuItemCreate, MenuItemId, MenuItemPatch};

/// Client for the menu item catalog actor.
///
/// Every mutation is checked against the owner of the item's restaurant.
#[derive(Clone)]
pub struct MenuClient {
    inner: ResourceClient<MenuItem>,
    restaurants: RestaurantClient,
}

impl MenuClient {
    pub fn new(inner: ResourceClient<MenuItem>, restaurants: RestaurantClient) -> Self {
        Self { inner, restaurants }
    }

    #[instrument(skip(self))]
    pub async fn create_menu_item(&self, actor: Actor, payload: MenuItemCreate) -> Result<MenuItem, CatalogError> {
        debug!("Sending request");
        self.restaurants.require_owned(&actor, payload.restaurant_id.clone()).await?;
        let item = self.inner.create(payload).await?;
        info!(menu_item_id = %item.id, price = %item.price, "Menu item added");
        Ok(item)
    }

    /// Applies a patch to an item. Placed orders keep the price they were placed at.
    #[instrument(skip(self))]
    pub async fn update_menu_item(
        &self,
        actor: Actor,
        id: MenuItemId,
        patch: MenuItemPatch,
    ) -> Result<MenuItem, CatalogError> {
        debug!("Sending request");
        let item = self.require_menu_item(id.clone()).await?;
        self.restaurants.require_owned(&actor, item.restaurant_id).await?;
        Ok(self.inner.update(id, patch).await?)
    }

    /// Returns whether the availability flag actually changed.
    #[instrument(skip(self))]
    pub async fn set_availability(
        &self,
        actor: Actor,
        id: MenuItemId,
        is_available: bool,
    ) -> Result<bool, CatalogError> {
        debug!("Sending request");
        let item = self.require_menu_item(id.clone()).await?;
        self.restaurants.require_owned(&actor, item.restaurant_id).await?;
        match self.inner.perform_action(id, MenuItemAction::SetAvailability(is_available)).await? {
            MenuItemActionResult::Availability { changed, .. } => Ok(changed),
        }
    }

    #[instrument(skip(self))]
    pub async fn delete_menu_item(&self, actor: Actor, id: MenuItemId) -> Result<(), CatalogError> {
        debug!("Sending request");
        let item = self.require_menu_item(id.clone()).await?;
        self.restaurants.require_owned(&actor, item.restaurant_id).await?;
        Ok(self.inner.delete(id).await?)
    }
}

impl_client_methods!(MenuClient, MenuItem, MenuItemId, CatalogError, menu_item);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor_framework::{sequential_ids, ResourceActor};
    use crate::catalog::entity::MAX_PRICE;
    use crate::domain::{Money, Restaurant, RestaurantCreate, RestaurantId};

    fn spawn_catalog() -> (RestaurantClient, MenuClient) {
        let (restaurant_actor, restaurant_inner) =
            ResourceActor::<Restaurant>::new(10, sequential_ids(RestaurantId::sequential));
        let (menu_actor, menu_inner) = ResourceActor::<MenuItem>::new(10, sequential_ids(MenuItemId::sequential));
        tokio::spawn(restaurant_actor.run());
        tokio::spawn(menu_actor.run());
        let restaurants = RestaurantClient::new(restaurant_inner);
        let menu = MenuClient::new(menu_inner, restaurants.clone());
        (restaurants, menu)
    }

    #[tokio::test]
    async fn only_the_owner_edits_a_menu() {
        let (restaurants, menu) = spawn_catalog();
        let owner = Actor::owner("user_1");
        let rival = Actor::owner("user_2");
        let customer = Actor::customer("user_3");

        let restaurant = restaurants
            .create_restaurant(owner.clone(), RestaurantCreate::new("Thai Palace", "Thai", Money::ZERO))
            .await
            .unwrap();
        let item = menu
            .create_menu_item(
                owner.clone(),
                MenuItemCreate::new(restaurant.id.clone(), "Pad Thai", "Mains", Money::from_dollars(10)),
            )
            .await
            .unwrap();

        for actor in [rival.clone(), customer.clone()] {
            let create = menu
                .create_menu_item(
                    actor.clone(),
                    MenuItemCreate::new(restaurant.id.clone(), "Knock-off", "Mains", Money::from_dollars(1)),
                )
                .await;
            assert!(matches!(create, Err(CatalogError::AuthorizationError(_))));

            let patch = MenuItemPatch {
                price: Some(Money::from_dollars(1)),
                ..Default::default()
            };
            let update = menu.update_menu_item(actor.clone(), item.id.clone(), patch).await;
            assert!(matches!(update, Err(CatalogError::AuthorizationError(_))));

            let availability = menu.set_availability(actor.clone(), item.id.clone(), false).await;
            assert!(matches!(availability, Err(CatalogError::AuthorizationError(_))));

            let delete = menu.delete_menu_item(actor, item.id.clone()).await;
            assert!(matches!(delete, Err(CatalogError::AuthorizationError(_))));
        }

        let untouched = menu.require_menu_item(item.id.clone()).await.unwrap();
        assert_eq!(untouched, item);

        menu.delete_menu_item(owner.clone(), item.id.clone()).await.unwrap();
        assert_eq!(menu.get_menu_item(item.id.clone()).await, Ok(None));
        let gone = menu.delete_menu_item(owner, item.id.clone()).await;
        assert!(matches!(gone, Err(CatalogError::NotFound { kind: "menu item", .. })));
    }

    #[tokio::test]
    async fn prices_above_the_cap_are_rejected() {
        let (restaurants, menu) = spawn_catalog();
        let owner = Actor::owner("user_1");
        let restaurant = restaurants
            .create_restaurant(owner.clone(), RestaurantCreate::new("Thai Palace", "Thai", Money::ZERO))
            .await
            .unwrap();

        let result = menu
            .create_menu_item(
                owner,
                MenuItemCreate::new(
                    restaurant.id,
                    "Gold Leaf Platter",
                    "Mains",
                    Money::from_cents(MAX_PRICE.cents() + 1),
                ),
            )
            .await;
        assert!(matches!(result, Err(CatalogError::ValidationError(_))));
    }
}
