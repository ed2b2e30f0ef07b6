use tracing::{debug, instrument, warn};

use crate::actor_framework::ResourceClient;
use crate::catalog::CatalogError;
use crate::domain::{Actor, Restaurant, RestaurantCreate, RestaurantId, RestaurantPatch};

/// Client for the restaurant catalog actor.
#[derive(Clone)]
pub struct RestaurantClient {
    inner: ResourceClient<Restaurant>,
}

impl_basic_client!(RestaurantClient, Restaurant, RestaurantId, CatalogError, restaurant);

impl RestaurantClient {
    /// Lists a new restaurant owned by the acting restaurant owner.
    #[instrument(skip(self))]
    pub async fn create_restaurant(
        &self,
        actor: Actor,
        mut payload: RestaurantCreate,
    ) -> Result<Restaurant, CatalogError> {
        debug!("Sending request");
        if !actor.is_owner() {
            return Err(CatalogError::AuthorizationError(format!(
                "{} is not a restaurant owner",
                actor.id
            )));
        }
        payload.owner_id = Some(actor.id);
        Ok(self.inner.create(payload).await?)
    }

    #[instrument(skip(self))]
    pub async fn update_restaurant(
        &self,
        actor: Actor,
        id: RestaurantId,
        patch: RestaurantPatch,
    ) -> Result<Restaurant, CatalogError> {
        debug!("Sending request");
        self.require_owned(&actor, id.clone()).await?;
        Ok(self.inner.update(id, patch).await?)
    }

    /// Fetches a restaurant and checks that `actor` owns it.
    pub async fn require_owned(&self, actor: &Actor, id: RestaurantId) -> Result<Restaurant, CatalogError> {
        let restaurant = self.require_restaurant(id).await?;
        if actor.is_owner() && restaurant.is_owned_by(&actor.id) {
            Ok(restaurant)
        } else {
            warn!(restaurant_id = %restaurant.id, user_id = %actor.id, "Ownership check failed");
            Err(CatalogError::AuthorizationError(format!(
                "{} does not own {}",
                actor.id, restaurant.id
            )))
        }
    }
}
