use tokio::sync::oneshot;

use crate::domain::{
    Actor, AddToCart, CartLine, CartView, Credentials, DeliveryInfo, MenuItemId, Order, OrderId, OrderStatus,
    RatingSummary, RestaurantId, ReviewOutcome, ReviewSubmission, User, UserCreate, UserId,
};
use crate::identity::IdentityError;
use crate::order_engine::{OrderError, RestaurantAnalytics};

/// Generic type aliases for service communication
pub type ServiceResult<T, E> = std::result::Result<T, E>;
pub type ServiceResponse<T, E> = oneshot::Sender<ServiceResult<T, E>>;

/// Typed message enums for actor communication. Each variant includes parameters
/// and a oneshot channel for responses.

#[derive(Debug)]
pub enum IdentityRequest {
    Register {
        user: UserCreate,
        respond_to: ServiceResponse<User, IdentityError>,
    },
    Authenticate {
        credentials: Credentials,
        respond_to: ServiceResponse<Actor, IdentityError>,
    },
    GetUser {
        id: UserId,
        respond_to: ServiceResponse<Option<User>, IdentityError>,
    },
    Shutdown,
    #[cfg(test)]
    GetUserCount {
        respond_to: ServiceResponse<usize, IdentityError>,
    },
}

#[derive(Debug)]
pub enum EngineRequest {
    AddToCart {
        actor: Actor,
        request: AddToCart,
        respond_to: ServiceResponse<CartLine, OrderError>,
    },
    UpdateCartLine {
        actor: Actor,
        menu_item_id: MenuItemId,
        quantity: i64,
        respond_to: ServiceResponse<Option<CartLine>, OrderError>,
    },
    RemoveCartLine {
        actor: Actor,
        menu_item_id: MenuItemId,
        respond_to: ServiceResponse<(), OrderError>,
    },
    ViewCart {
        actor: Actor,
        respond_to: ServiceResponse<CartView, OrderError>,
    },
    Checkout {
        actor: Actor,
        delivery: DeliveryInfo,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    UpdateStatus {
        actor: Actor,
        order_id: OrderId,
        status: OrderStatus,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    AddReview {
        actor: Actor,
        submission: ReviewSubmission,
        respond_to: ServiceResponse<ReviewOutcome, OrderError>,
    },
    OrderHistory {
        actor: Actor,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    OrderDetails {
        actor: Actor,
        order_id: OrderId,
        respond_to: ServiceResponse<Order, OrderError>,
    },
    RestaurantOrders {
        actor: Actor,
        status: Option<OrderStatus>,
        respond_to: ServiceResponse<Vec<Order>, OrderError>,
    },
    RestaurantAnalytics {
        actor: Actor,
        respond_to: ServiceResponse<RestaurantAnalytics, OrderError>,
    },
    RestaurantRating {
        restaurant_id: RestaurantId,
        respond_to: ServiceResponse<RatingSummary, OrderError>,
    },
    ToggleFavorite {
        actor: Actor,
        restaurant_id: RestaurantId,
        respond_to: ServiceResponse<bool, OrderError>,
    },
    Favorites {
        actor: Actor,
        respond_to: ServiceResponse<Vec<RestaurantId>, OrderError>,
    },
    Shutdown,
}
