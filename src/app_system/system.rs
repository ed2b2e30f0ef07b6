use tokio::task::JoinHandle;
use tracing::{error, info, instrument};

use super::MarketplaceConfig;
use crate::actor_framework::{sequential_ids, ResourceActor};
use crate::clients::{IdentityClient, MenuClient, OrderClient, RestaurantClient};
use crate::domain::{MenuItem, MenuItemId, Restaurant, RestaurantId};
use crate::identity::IdentityService;
use crate::order_engine::{OrderEngine, Pricing};

/// The running marketplace: every actor spawned and wired together.
///
/// Handles are kept in dependency order; the order engine is stopped first
/// so it releases its catalog clients before the catalog actors wind down.
pub struct MarketplaceSystem {
    pub order_client: OrderClient,
    pub identity_client: IdentityClient,
    pub restaurant_client: RestaurantClient,
    pub menu_client: MenuClient,
    handles: Vec<(&'static str, JoinHandle<()>)>,
}

impl MarketplaceSystem {
    #[instrument(name = "marketplace_system", skip(config))]
    pub fn new(config: &MarketplaceConfig) -> Self {
        let buffer = config.channel_buffer;

        // 1. Identity provider
        let (identity, identity_client) = IdentityService::new(buffer);
        let identity_handle = tokio::spawn(identity.run());

        // 2. Catalog: restaurants, then menu items (which check restaurant ownership)
        let (restaurant_actor, restaurant_inner) =
            ResourceActor::<Restaurant>::new(buffer, sequential_ids(RestaurantId::sequential));
        let restaurant_client = RestaurantClient::new(restaurant_inner);
        let restaurant_handle = tokio::spawn(restaurant_actor.run());

        let (menu_actor, menu_inner) = ResourceActor::<MenuItem>::new(buffer, sequential_ids(MenuItemId::sequential));
        let menu_client = MenuClient::new(menu_inner, restaurant_client.clone());
        let menu_handle = tokio::spawn(menu_actor.run());

        // 3. Order engine, reading the catalog through its clients
        let (engine, order_client) = OrderEngine::new(
            buffer,
            restaurant_client.clone(),
            menu_client.clone(),
            Pricing::new(config.tax_rate_bps),
        );
        let engine_handle = tokio::spawn(engine.run());

        info!(buffer, tax_rate_bps = config.tax_rate_bps, "Marketplace started");

        Self {
            order_client,
            identity_client,
            restaurant_client,
            menu_client,
            handles: vec![
                ("order_engine", engine_handle),
                ("identity_service", identity_handle),
                ("menu_items", menu_handle),
                ("restaurants", restaurant_handle),
            ],
        }
    }

    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down marketplace...");

        // Service actors stop on request; catalog actors stop once every client is gone.
        self.order_client.shutdown().await?;
        self.identity_client.shutdown().await?;
        drop(self.order_client);
        drop(self.identity_client);
        drop(self.menu_client);
        drop(self.restaurant_client);

        for (name, handle) in self.handles {
            if let Err(e) = handle.await {
                error!(actor = name, "Actor task failed: {:?}", e);
                return Err(format!("Actor task {name} failed: {e:?}"));
            }
        }

        info!("Marketplace shutdown complete.");
        Ok(())
    }
}
