use tokio::sync::mpsc;
use tracing::{debug, instrument};

use crate::domain::{
    Actor, AddToCart, CartLine, CartView, DeliveryInfo, MenuItemId, Order, OrderId, OrderStatus, RatingSummary,
    RestaurantId, ReviewOutcome, ReviewSubmission,
};
use crate::messages::EngineRequest;
use crate::order_engine::{OrderError, RestaurantAnalytics};

/// Client for the order engine. Every call carries the acting user explicitly.
#[derive(Clone)]
pub struct OrderClient {
    sender: mpsc::Sender<EngineRequest>,
}

impl OrderClient {
    pub fn new(sender: mpsc::Sender<EngineRequest>) -> Self {
        Self { sender }
    }

    #[instrument(skip(self))]
    pub async fn shutdown(&self) -> Result<(), String> {
        debug!("Sending shutdown request");
        self.sender
            .send(EngineRequest::Shutdown)
            .await
            .map_err(|e| e.to_string())?;
        Ok(())
    }
}

// Cart
client_method!(OrderClient => fn add_to_cart(actor: Actor, request: AddToCart) -> CartLine
    as EngineRequest::AddToCart, Error = OrderError);
client_method!(OrderClient => fn update_cart_line(actor: Actor, menu_item_id: MenuItemId, quantity: i64)
    -> Option<CartLine> as EngineRequest::UpdateCartLine, Error = OrderError);
client_method!(OrderClient => fn remove_cart_line(actor: Actor, menu_item_id: MenuItemId) -> ()
    as EngineRequest::RemoveCartLine, Error = OrderError);
client_method!(OrderClient => fn view_cart(actor: Actor) -> CartView
    as EngineRequest::ViewCart, Error = OrderError);

// Orders
client_method!(OrderClient => fn checkout(actor: Actor, delivery: DeliveryInfo) -> Vec<Order>
    as EngineRequest::Checkout, Error = OrderError);
client_method!(OrderClient => fn update_status(actor: Actor, order_id: OrderId, status: OrderStatus) -> Order
    as EngineRequest::UpdateStatus, Error = OrderError);
client_method!(OrderClient => fn order_history(actor: Actor) -> Vec<Order>
    as EngineRequest::OrderHistory, Error = OrderError);
client_method!(OrderClient => fn order_details(actor: Actor, order_id: OrderId) -> Order
    as EngineRequest::OrderDetails, Error = OrderError);
client_method!(OrderClient => fn restaurant_orders(actor: Actor, status: Option<OrderStatus>) -> Vec<Order>
    as EngineRequest::RestaurantOrders, Error = OrderError);
client_method!(OrderClient => fn restaurant_analytics(actor: Actor) -> RestaurantAnalytics
    as EngineRequest::RestaurantAnalytics, Error = OrderError);

// Reviews and favourites
client_method!(OrderClient => fn add_review(actor: Actor, submission: ReviewSubmission) -> ReviewOutcome
    as EngineRequest::AddReview, Error = OrderError);
client_method!(OrderClient => fn restaurant_rating(restaurant_id: RestaurantId) -> RatingSummary
    as EngineRequest::RestaurantRating, Error = OrderError);
client_method!(OrderClient => fn toggle_favorite(actor: Actor, restaurant_id: RestaurantId) -> bool
    as EngineRequest::ToggleFavorite, Error = OrderError);
client_method!(OrderClient => fn favorites(actor: Actor) -> Vec<RestaurantId>
    as EngineRequest::Favorites, Error = OrderError);
