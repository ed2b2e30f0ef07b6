use tracing::{error, info, Instrument};

use marketplace_orders::app_system::{setup_tracing, MarketplaceConfig, MarketplaceSystem};
use marketplace_orders::domain::{
    AddToCart, Credentials, DeliveryInfo, MenuItemCreate, Money, OrderStatus, RestaurantCreate, ReviewSubmission, Role,
    UserCreate,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = MarketplaceConfig::load()?;

    // Setup tracing once for the entire application
    setup_tracing(&config.log_filter);
    info!(?config, "Starting marketplace demo");

    let system = MarketplaceSystem::new(&config);

    // Accounts
    let span = tracing::info_span!("registration");
    let (owner, customer) = async {
        let identity = &system.identity_client;
        identity
            .register(UserCreate::new("olive", "olive@example.com", "secret", Role::RestaurantOwner))
            .await?;
        identity
            .register(UserCreate::new("carl", "carl@example.com", "hunter2", Role::Customer))
            .await?;
        let owner = identity.authenticate(Credentials::new("olive", "secret")).await?;
        let customer = identity.authenticate(Credentials::new("carl", "hunter2")).await?;
        Ok::<_, Box<dyn std::error::Error>>((owner, customer))
    }
    .instrument(span)
    .await?;

    // Catalog
    let span = tracing::info_span!("catalog_seeding", owner_id = %owner.id);
    let (thai, items) = async {
        let thai = system
            .restaurant_client
            .create_restaurant(
                owner.clone(),
                RestaurantCreate::new("Thai Palace", "Thai", Money::from_cents(299)),
            )
            .await?;
        let mut items = Vec::new();
        for (name, category, cents) in [("Pad Thai", "Mains", 1250), ("Spring Rolls", "Starters", 600)] {
            let item = system
                .menu_client
                .create_menu_item(
                    owner.clone(),
                    MenuItemCreate::new(thai.id.clone(), name, category, Money::from_cents(cents)),
                )
                .await?;
            items.push(item);
        }
        Ok::<_, Box<dyn std::error::Error>>((thai, items))
    }
    .instrument(span)
    .await?;

    // Cart and checkout
    let span = tracing::info_span!("checkout", customer_id = %customer.id);
    let placed = async {
        let orders = &system.order_client;
        orders
            .add_to_cart(customer.clone(), AddToCart::new(items[0].id.clone(), 2).with_instructions("extra spicy"))
            .await?;
        orders.add_to_cart(customer.clone(), AddToCart::new(items[1].id.clone(), 1)).await?;
        let cart = orders.view_cart(customer.clone()).await?;
        info!(lines = cart.items.len(), total = %cart.total, "Cart ready");
        let placed = orders
            .checkout(customer.clone(), DeliveryInfo::new("12 Harbour Road").with_notes("ring twice"))
            .await?;
        Ok::<_, Box<dyn std::error::Error>>(placed)
    }
    .instrument(span)
    .await?;

    // Fulfilment and review
    let span = tracing::info_span!("fulfilment");
    async {
        for order in &placed {
            for status in [
                OrderStatus::Confirmed,
                OrderStatus::Preparing,
                OrderStatus::Ready,
                OrderStatus::Delivered,
            ] {
                system.order_client.update_status(owner.clone(), order.id.clone(), status).await?;
            }
            let outcome = system
                .order_client
                .add_review(customer.clone(), ReviewSubmission::new(order.id.clone(), 5, "Hot and fast"))
                .await?;
            info!(review_id = %outcome.review().id, "Review submitted");
        }
        Ok::<_, Box<dyn std::error::Error>>(())
    }
    .instrument(span)
    .await?;

    match system.order_client.restaurant_analytics(owner.clone()).await {
        Ok(report) => {
            let report = serde_json::to_string(&report)?;
            info!(%report, "Owner dashboard");
        }
        Err(e) => error!(error = %e, "Analytics failed"),
    }
    let rating = system.order_client.restaurant_rating(thai.id.clone()).await?;
    info!(restaurant_id = %thai.id, average = rating.average, count = rating.count, "Restaurant rating");

    // Shutdown system gracefully
    system.shutdown().await?;

    info!("Demo completed successfully");
    Ok(())
}
