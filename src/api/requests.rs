use serde::Deserialize;

use crate::domain::{
    AddToCart, DeliveryInfo, MenuItemId, OrderId, OrderStatus, ReviewSubmission, MAX_RATING, MIN_RATING,
};
use crate::order_engine::OrderError;

fn invalid(message: impl Into<String>) -> OrderError {
    OrderError::ValidationError(message.into())
}

#[derive(Debug, Clone, Deserialize)]
pub struct AddToCartRequest {
    pub menu_item_id: String,
    #[serde(default = "one")]
    pub quantity: i64,
    #[serde(default)]
    pub special_instructions: Option<String>,
}

fn one() -> i64 {
    1
}

impl AddToCartRequest {
    pub fn validate(self) -> Result<AddToCart, OrderError> {
        if self.menu_item_id.trim().is_empty() {
            return Err(invalid("menu_item_id is required"));
        }
        let quantity = u32::try_from(self.quantity)
            .ok()
            .filter(|q| *q > 0)
            .ok_or_else(|| invalid(format!("quantity must be a positive integer, got {}", self.quantity)))?;

        let request = AddToCart::new(self.menu_item_id.trim(), quantity);
        Ok(match self.special_instructions {
            Some(text) => request.with_instructions(text),
            None => request,
        })
    }
}

/// New quantity for a cart line; zero or less removes it.
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateCartRequest {
    pub menu_item_id: String,
    pub quantity: i64,
}

impl UpdateCartRequest {
    pub fn validate(self) -> Result<(MenuItemId, i64), OrderError> {
        if self.menu_item_id.trim().is_empty() {
            return Err(invalid("menu_item_id is required"));
        }
        Ok((MenuItemId::from(self.menu_item_id.trim()), self.quantity))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutRequest {
    pub delivery_address: String,
    #[serde(default)]
    pub notes: Option<String>,
}

impl CheckoutRequest {
    pub fn validate(self) -> Result<DeliveryInfo, OrderError> {
        if self.delivery_address.trim().is_empty() {
            return Err(invalid("delivery_address is required"));
        }
        let delivery = DeliveryInfo::new(self.delivery_address);
        Ok(match self.notes {
            Some(notes) => delivery.with_notes(notes),
            None => delivery,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: String,
}

impl UpdateStatusRequest {
    pub fn validate(self) -> Result<OrderStatus, OrderError> {
        self.status.trim().parse().map_err(|e: String| invalid(e))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ReviewRequest {
    pub order_id: String,
    pub rating: i64,
    #[serde(default)]
    pub comment: Option<String>,
}

impl ReviewRequest {
    pub fn validate(self) -> Result<ReviewSubmission, OrderError> {
        let rating = u8::try_from(self.rating)
            .ok()
            .filter(|r| (MIN_RATING..=MAX_RATING).contains(r))
            .ok_or_else(|| invalid(format!("rating must be between {MIN_RATING} and {MAX_RATING}")))?;
        if self.order_id.trim().is_empty() {
            return Err(invalid("order_id is required"));
        }
        Ok(ReviewSubmission::new(
            OrderId::from(self.order_id.trim()),
            rating,
            self.comment.unwrap_or_default(),
        ))
    }
}
