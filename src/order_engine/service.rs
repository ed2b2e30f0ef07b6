use chrono::Utc;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::mpsc;
use tracing::{debug, error, info, instrument, warn};

use super::{
    analytics, rating_summary, OrderError, OrderStore, PricedLine, Pricing, RestaurantAnalytics, StorageError,
    UnitOfWork,
};
use crate::clients::{MenuClient, OrderClient, RestaurantClient};
use crate::domain::{
    Actor, AddToCart, CartItemView, CartLine, CartView, DeliveryInfo, MenuItem, MenuItemId, Money, Order, OrderId,
    OrderStatus, RatingSummary, Restaurant, RestaurantId, Review, ReviewOutcome, ReviewSubmission, MAX_RATING,
    MIN_RATING,
};
use crate::messages::EngineRequest;

/// The order engine actor.
///
/// Sole owner of carts, orders, reviews and favourites. Requests are handled
/// one at a time, which gives every customer's cart and every order a single
/// writer; catalog data is read through the catalog clients.
pub struct OrderEngine {
    receiver: mpsc::Receiver<EngineRequest>,
    store: OrderStore,
    restaurants: RestaurantClient,
    menu: MenuClient,
    pricing: Pricing,
}

fn require_customer(actor: &Actor) -> Result<(), OrderError> {
    if actor.is_customer() {
        Ok(())
    } else {
        Err(OrderError::AuthorizationError(format!("{} is not a customer", actor.id)))
    }
}

fn require_owner(actor: &Actor) -> Result<(), OrderError> {
    if actor.is_owner() {
        Ok(())
    } else {
        Err(OrderError::AuthorizationError(format!("{} is not a restaurant owner", actor.id)))
    }
}

impl OrderEngine {
    pub fn new(
        buffer_size: usize,
        restaurants: RestaurantClient,
        menu: MenuClient,
        pricing: Pricing,
    ) -> (Self, OrderClient) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let engine = Self {
            receiver,
            store: OrderStore::new(),
            restaurants,
            menu,
            pricing,
        };
        (engine, OrderClient::new(sender))
    }

    #[instrument(name = "order_engine", skip(self))]
    pub async fn run(mut self) {
        info!(tax_rate_bps = self.pricing.tax_rate_bps(), "OrderEngine starting");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                EngineRequest::AddToCart { actor, request, respond_to } => {
                    let _ = respond_to.send(self.handle_add_to_cart(actor, request).await);
                }
                EngineRequest::UpdateCartLine { actor, menu_item_id, quantity, respond_to } => {
                    let _ = respond_to.send(self.handle_update_cart_line(actor, menu_item_id, quantity));
                }
                EngineRequest::RemoveCartLine { actor, menu_item_id, respond_to } => {
                    let _ = respond_to.send(self.handle_remove_cart_line(actor, menu_item_id));
                }
                EngineRequest::ViewCart { actor, respond_to } => {
                    let _ = respond_to.send(self.handle_view_cart(actor).await);
                }
                EngineRequest::Checkout { actor, delivery, respond_to } => {
                    let _ = respond_to.send(self.handle_checkout(actor, delivery).await);
                }
                EngineRequest::UpdateStatus { actor, order_id, status, respond_to } => {
                    let _ = respond_to.send(self.handle_update_status(actor, order_id, status).await);
                }
                EngineRequest::AddReview { actor, submission, respond_to } => {
                    let _ = respond_to.send(self.handle_add_review(actor, submission));
                }
                EngineRequest::OrderHistory { actor, respond_to } => {
                    let _ = respond_to.send(self.handle_order_history(actor));
                }
                EngineRequest::OrderDetails { actor, order_id, respond_to } => {
                    let _ = respond_to.send(self.handle_order_details(actor, order_id));
                }
                EngineRequest::RestaurantOrders { actor, status, respond_to } => {
                    let _ = respond_to.send(self.handle_restaurant_orders(actor, status).await);
                }
                EngineRequest::RestaurantAnalytics { actor, respond_to } => {
                    let _ = respond_to.send(self.handle_restaurant_analytics(actor).await);
                }
                EngineRequest::RestaurantRating { restaurant_id, respond_to } => {
                    let _ = respond_to.send(self.handle_restaurant_rating(restaurant_id).await);
                }
                EngineRequest::ToggleFavorite { actor, restaurant_id, respond_to } => {
                    let _ = respond_to.send(self.handle_toggle_favorite(actor, restaurant_id).await);
                }
                EngineRequest::Favorites { actor, respond_to } => {
                    let result = require_customer(&actor).map(|()| self.store.favorites_of(&actor.id));
                    let _ = respond_to.send(result);
                }
                EngineRequest::Shutdown => {
                    info!("OrderEngine shutting down");
                    break;
                }
            }
        }

        info!("OrderEngine stopped");
    }

    // =========================================================================
    // Catalog reads
    // =========================================================================

    async fn menu_item(&self, id: &MenuItemId) -> Result<MenuItem, OrderError> {
        Ok(self.menu.require_menu_item(id.clone()).await?)
    }

    async fn restaurant(&self, id: &RestaurantId) -> Result<Restaurant, OrderError> {
        Ok(self.restaurants.require_restaurant(id.clone()).await?)
    }

    /// Ids of every restaurant that has orders and is owned by `actor`.
    async fn owned_restaurants(&self, actor: &Actor) -> Result<HashSet<RestaurantId>, OrderError> {
        let with_orders: HashSet<RestaurantId> =
            self.store.orders_newest_first().map(|o| o.restaurant_id.clone()).collect();

        let mut owned = HashSet::new();
        for id in with_orders {
            match self.restaurants.get_restaurant(id.clone()).await? {
                Some(restaurant) if restaurant.is_owned_by(&actor.id) => {
                    owned.insert(id);
                }
                Some(_) => {}
                None => debug!(restaurant_id = %id, "Restaurant of past orders no longer listed"),
            }
        }
        Ok(owned)
    }

    // =========================================================================
    // Cart
    // =========================================================================

    #[instrument(
        fields(customer_id = %actor.id, menu_item_id = %request.menu_item_id, quantity = request.quantity),
        skip(self, actor, request)
    )]
    async fn handle_add_to_cart(&mut self, actor: Actor, request: AddToCart) -> Result<CartLine, OrderError> {
        require_customer(&actor)?;
        if request.quantity == 0 {
            return Err(OrderError::ValidationError("quantity must be greater than zero".to_string()));
        }

        let item = self.menu_item(&request.menu_item_id).await?;
        if !item.is_available {
            warn!("Item not available");
            return Err(OrderError::ValidationError(format!("{} is not available", item.name)));
        }

        let instructions = request.special_instructions.filter(|s| !s.trim().is_empty());
        let existing = self.store.cart_line(&actor.id, &item.id).cloned();
        let expected = existing.as_ref().map(|l| l.quantity);

        let line = match existing {
            Some(mut line) => {
                line.quantity = line
                    .quantity
                    .checked_add(request.quantity)
                    .ok_or_else(|| OrderError::ValidationError("quantity is too large".to_string()))?;
                if instructions.is_some() {
                    line.special_instructions = instructions;
                }
                line
            }
            None => CartLine {
                customer_id: actor.id.clone(),
                menu_item_id: item.id.clone(),
                quantity: request.quantity,
                special_instructions: instructions,
                added_at: Utc::now(),
            },
        };

        let mut uow = UnitOfWork::begin();
        uow.put_cart_line(line.clone(), expected);
        self.store.commit(uow)?;

        info!(item_name = %item.name, cart_quantity = line.quantity, "Added to cart");
        Ok(line)
    }

    #[instrument(fields(customer_id = %actor.id, menu_item_id = %menu_item_id), skip(self, actor))]
    fn handle_update_cart_line(
        &mut self,
        actor: Actor,
        menu_item_id: MenuItemId,
        quantity: i64,
    ) -> Result<Option<CartLine>, OrderError> {
        require_customer(&actor)?;
        let existing = self
            .store
            .cart_line(&actor.id, &menu_item_id)
            .cloned()
            .ok_or_else(|| OrderError::not_found("cart line", &menu_item_id))?;

        let mut uow = UnitOfWork::begin();
        if quantity <= 0 {
            uow.remove_cart_line(actor.id, menu_item_id, existing.quantity);
            self.store.commit(uow)?;
            info!("Cart line removed");
            return Ok(None);
        }

        let mut line = existing.clone();
        line.quantity = u32::try_from(quantity)
            .map_err(|_| OrderError::ValidationError(format!("quantity {quantity} is too large")))?;
        uow.put_cart_line(line.clone(), Some(existing.quantity));
        self.store.commit(uow)?;
        info!("Cart line updated");
        Ok(Some(line))
    }

    #[instrument(fields(customer_id = %actor.id, menu_item_id = %menu_item_id), skip(self, actor))]
    fn handle_remove_cart_line(&mut self, actor: Actor, menu_item_id: MenuItemId) -> Result<(), OrderError> {
        require_customer(&actor)?;
        let quantity = self
            .store
            .cart_line(&actor.id, &menu_item_id)
            .map(|l| l.quantity)
            .ok_or_else(|| OrderError::not_found("cart line", &menu_item_id))?;

        let mut uow = UnitOfWork::begin();
        uow.remove_cart_line(actor.id, menu_item_id, quantity);
        self.store.commit(uow)?;
        info!("Cart line removed");
        Ok(())
    }

    #[instrument(fields(customer_id = %actor.id), skip(self, actor))]
    async fn handle_view_cart(&self, actor: Actor) -> Result<CartView, OrderError> {
        require_customer(&actor)?;

        let mut items = Vec::new();
        let mut total = Money::ZERO;
        for line in self.store.cart_lines(&actor.id) {
            let item = self.menu_item(&line.menu_item_id).await?;
            let overflow = || OrderError::ValidationError("cart amount is too large".to_string());
            let line_total = item.price.checked_times(line.quantity).ok_or_else(overflow)?;
            total = total.checked_add(line_total).ok_or_else(overflow)?;
            items.push(CartItemView {
                line: line.clone(),
                item_name: item.name,
                restaurant_id: item.restaurant_id,
                unit_price: item.price,
                line_total,
                is_available: item.is_available,
            });
        }

        debug!(lines = items.len(), total = %total, "Cart priced");
        Ok(CartView { items, total })
    }

    // =========================================================================
    // Checkout
    // =========================================================================

    /// Turns the customer's whole cart into one pending order per restaurant.
    ///
    /// Every group is priced and staged before anything is written; the
    /// orders and the removal of the consumed cart lines commit together.
    #[instrument(fields(customer_id = %actor.id), skip(self, actor, delivery))]
    async fn handle_checkout(&mut self, actor: Actor, delivery: DeliveryInfo) -> Result<Vec<Order>, OrderError> {
        require_customer(&actor)?;

        let lines = self.store.cart_lines(&actor.id).to_vec();
        if lines.is_empty() {
            warn!("Checkout with empty cart");
            return Err(OrderError::EmptyCart);
        }
        if delivery.address.trim().is_empty() {
            return Err(OrderError::ValidationError("delivery address is required".to_string()));
        }

        // Step 1: Price every line at the current menu price, grouped by restaurant
        let mut groups: BTreeMap<RestaurantId, Vec<PricedLine>> = BTreeMap::new();
        for line in lines {
            let item = self.menu_item(&line.menu_item_id).await?;
            if !item.is_available {
                warn!(menu_item_id = %item.id, "Item became unavailable");
                return Err(OrderError::ValidationError(format!("{} is no longer available", item.name)));
            }
            groups.entry(item.restaurant_id.clone()).or_default().push((line, item));
        }

        // Step 2: Build one order per restaurant and stage it with its cart removals
        let now = Utc::now();
        let mut uow = UnitOfWork::begin();
        let mut orders = Vec::with_capacity(groups.len());
        for (restaurant_id, group) in &groups {
            let restaurant = self.restaurant(restaurant_id).await?;
            if !restaurant.is_active {
                return Err(OrderError::ValidationError(format!(
                    "{} is not accepting orders",
                    restaurant.name
                )));
            }

            let order_id = self.store.allocate_order_id();
            let order = self.pricing.build_order(order_id, &restaurant, group, &delivery, now)?;
            for (line, _) in group {
                uow.remove_cart_line(line.customer_id.clone(), line.menu_item_id.clone(), line.quantity);
            }
            uow.insert_order(order.clone());
            orders.push(order);
        }

        // Step 3: Commit everything at once
        if let Err(e) = self.store.commit(uow) {
            error!(error = %e, "Checkout rolled back");
            return Err(e.into());
        }

        for order in &orders {
            info!(
                order_id = %order.id,
                restaurant_id = %order.restaurant_id,
                total = %order.total_amount,
                "Order placed"
            );
        }
        Ok(orders)
    }

    // =========================================================================
    // Order lifecycle
    // =========================================================================

    #[instrument(fields(user_id = %actor.id, order_id = %order_id, status = %status), skip(self, actor))]
    async fn handle_update_status(
        &mut self,
        actor: Actor,
        order_id: OrderId,
        status: OrderStatus,
    ) -> Result<Order, OrderError> {
        require_owner(&actor)?;
        let order = self
            .store
            .order(&order_id)
            .cloned()
            .ok_or_else(|| OrderError::not_found("order", &order_id))?;

        let restaurant = self.restaurant(&order.restaurant_id).await?;
        if !restaurant.is_owned_by(&actor.id) {
            warn!(restaurant_id = %restaurant.id, "Status update by non-owner");
            return Err(OrderError::AuthorizationError(format!(
                "{} does not own {}",
                actor.id, restaurant.id
            )));
        }

        if !order.status.can_transition_to(status) {
            warn!(from = %order.status, terminal = order.status.is_terminal(), "Invalid status transition");
            return Err(OrderError::InvalidTransition { from: order.status, to: status });
        }

        let mut uow = UnitOfWork::begin();
        uow.set_status(order_id.clone(), order.status, status, Utc::now());
        self.store.commit(uow)?;

        info!(from = %order.status, "Order status updated");
        self.store
            .order(&order_id)
            .cloned()
            .ok_or_else(|| OrderError::not_found("order", &order_id))
    }

    #[instrument(
        fields(customer_id = %actor.id, order_id = %submission.order_id, rating = submission.rating),
        skip(self, actor, submission)
    )]
    fn handle_add_review(&mut self, actor: Actor, submission: ReviewSubmission) -> Result<ReviewOutcome, OrderError> {
        require_customer(&actor)?;
        if !(MIN_RATING..=MAX_RATING).contains(&submission.rating) {
            return Err(OrderError::ValidationError(format!(
                "rating must be between {MIN_RATING} and {MAX_RATING}"
            )));
        }

        let order = self
            .store
            .order(&submission.order_id)
            .ok_or_else(|| OrderError::not_found("order", &submission.order_id))?;
        if order.customer_id != actor.id {
            return Err(OrderError::AuthorizationError(format!(
                "order {} does not belong to {}",
                order.id, actor.id
            )));
        }
        if order.status != OrderStatus::Delivered {
            return Err(OrderError::ValidationError(format!(
                "order {} is {}, only delivered orders can be reviewed",
                order.id, order.status
            )));
        }
        let restaurant_id = order.restaurant_id.clone();

        let now = Utc::now();
        let mut uow = UnitOfWork::begin();
        let outcome = match self.store.review_for(&submission.order_id).cloned() {
            Some(mut review) => {
                review.rating = submission.rating;
                review.comment = submission.comment;
                review.updated_at = now;
                uow.replace_review(review.clone());
                ReviewOutcome::Updated(review)
            }
            None => {
                let review = Review {
                    id: self.store.allocate_review_id(),
                    order_id: submission.order_id.clone(),
                    customer_id: actor.id,
                    restaurant_id,
                    rating: submission.rating,
                    comment: submission.comment,
                    created_at: now,
                    updated_at: now,
                };
                uow.insert_review(review.clone());
                ReviewOutcome::Created(review)
            }
        };

        self.store.commit(uow).map_err(|e| match e {
            StorageError::DuplicateKey { table: "reviews", .. } => OrderError::DuplicateReview(submission.order_id),
            other => other.into(),
        })?;

        info!(review_id = %outcome.review().id, "Review saved");
        Ok(outcome)
    }

    // =========================================================================
    // Read models
    // =========================================================================

    fn handle_order_history(&self, actor: Actor) -> Result<Vec<Order>, OrderError> {
        require_customer(&actor)?;
        Ok(self
            .store
            .orders_newest_first()
            .filter(|o| o.customer_id == actor.id)
            .cloned()
            .collect())
    }

    fn handle_order_details(&self, actor: Actor, order_id: OrderId) -> Result<Order, OrderError> {
        require_customer(&actor)?;
        let order = self
            .store
            .order(&order_id)
            .ok_or_else(|| OrderError::not_found("order", &order_id))?;
        if order.customer_id != actor.id {
            return Err(OrderError::AuthorizationError(format!(
                "order {order_id} does not belong to {}",
                actor.id
            )));
        }
        Ok(order.clone())
    }

    #[instrument(fields(user_id = %actor.id, status = ?status), skip(self, actor))]
    async fn handle_restaurant_orders(
        &self,
        actor: Actor,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, OrderError> {
        require_owner(&actor)?;
        let owned = self.owned_restaurants(&actor).await?;
        let orders: Vec<Order> = self
            .store
            .orders_newest_first()
            .filter(|o| owned.contains(&o.restaurant_id))
            .filter(|o| status.map_or(true, |s| o.status == s))
            .cloned()
            .collect();
        debug!(order_count = orders.len(), "Restaurant orders listed");
        Ok(orders)
    }

    #[instrument(fields(user_id = %actor.id), skip(self, actor))]
    async fn handle_restaurant_analytics(&self, actor: Actor) -> Result<RestaurantAnalytics, OrderError> {
        require_owner(&actor)?;
        let owned = self.owned_restaurants(&actor).await?;
        Ok(analytics(
            self.store.orders_newest_first().filter(|o| owned.contains(&o.restaurant_id)),
        ))
    }

    async fn handle_restaurant_rating(&self, restaurant_id: RestaurantId) -> Result<RatingSummary, OrderError> {
        let restaurant = self.restaurant(&restaurant_id).await?;
        Ok(rating_summary(
            restaurant.id.clone(),
            self.store.reviews_for_restaurant(&restaurant.id),
        ))
    }

    #[instrument(fields(customer_id = %actor.id, restaurant_id = %restaurant_id), skip(self, actor))]
    async fn handle_toggle_favorite(&mut self, actor: Actor, restaurant_id: RestaurantId) -> Result<bool, OrderError> {
        require_customer(&actor)?;
        let restaurant = self.restaurant(&restaurant_id).await?;

        let favorite = !self.store.is_favorite(&actor.id, &restaurant.id);
        let mut uow = UnitOfWork::begin();
        uow.set_favorite(actor.id, restaurant.id, favorite);
        self.store.commit(uow)?;

        info!(favorite, "Favorite toggled");
        Ok(favorite)
    }
}
