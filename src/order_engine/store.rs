use chrono::{DateTime, Utc};
use std::collections::{BTreeSet, HashMap, HashSet};
use tracing::{debug, warn};

use super::StorageError;
use crate::domain::{CartLine, MenuItemId, Order, OrderId, OrderStatus, RestaurantId, Review, ReviewId, UserId};

/// In-memory tables owned by the order engine.
///
/// Reads are direct. Writes only go through [`OrderStore::commit`].
#[derive(Debug, Default)]
pub struct OrderStore {
    carts: HashMap<UserId, Vec<CartLine>>,
    orders: HashMap<OrderId, Order>,
    /// Order ids in placement order.
    placed: Vec<OrderId>,
    reviews: HashMap<OrderId, Review>,
    favorites: BTreeSet<(UserId, RestaurantId)>,
    next_order: u64,
    next_review: u64,
}

/// A change staged in a [`UnitOfWork`], together with the state it expects to find.
#[derive(Debug, Clone)]
enum Write {
    PutCartLine { line: CartLine, expected_quantity: Option<u32> },
    RemoveCartLine { customer_id: UserId, menu_item_id: MenuItemId, expected_quantity: u32 },
    InsertOrder(Order),
    SetStatus { order_id: OrderId, expected: OrderStatus, status: OrderStatus, at: DateTime<Utc> },
    InsertReview(Review),
    ReplaceReview(Review),
    SetFavorite { customer_id: UserId, restaurant_id: RestaurantId, favorite: bool },
}

/// Writes staged by one engine request. Dropping it without committing
/// discards every change.
#[derive(Debug, Default)]
pub struct UnitOfWork {
    writes: Vec<Write>,
}

impl UnitOfWork {
    pub fn begin() -> Self {
        Self::default()
    }

    /// Inserts or replaces a cart line. `expected_quantity` is the quantity the
    /// line had when read, `None` if it did not exist.
    pub fn put_cart_line(&mut self, line: CartLine, expected_quantity: Option<u32>) {
        self.writes.push(Write::PutCartLine { line, expected_quantity });
    }

    pub fn remove_cart_line(&mut self, customer_id: UserId, menu_item_id: MenuItemId, expected_quantity: u32) {
        self.writes.push(Write::RemoveCartLine { customer_id, menu_item_id, expected_quantity });
    }

    pub fn insert_order(&mut self, order: Order) {
        self.writes.push(Write::InsertOrder(order));
    }

    /// Compare-and-set on an order's status.
    pub fn set_status(&mut self, order_id: OrderId, expected: OrderStatus, status: OrderStatus, at: DateTime<Utc>) {
        self.writes.push(Write::SetStatus { order_id, expected, status, at });
    }

    pub fn insert_review(&mut self, review: Review) {
        self.writes.push(Write::InsertReview(review));
    }

    pub fn replace_review(&mut self, review: Review) {
        self.writes.push(Write::ReplaceReview(review));
    }

    pub fn set_favorite(&mut self, customer_id: UserId, restaurant_id: RestaurantId, favorite: bool) {
        self.writes.push(Write::SetFavorite { customer_id, restaurant_id, favorite });
    }
}

impl OrderStore {
    pub fn new() -> Self {
        Self::default()
    }

    // --- Reads ---

    pub fn cart_lines(&self, customer_id: &UserId) -> &[CartLine] {
        self.carts.get(customer_id).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn cart_line(&self, customer_id: &UserId, menu_item_id: &MenuItemId) -> Option<&CartLine> {
        self.cart_lines(customer_id).iter().find(|l| &l.menu_item_id == menu_item_id)
    }

    pub fn order(&self, id: &OrderId) -> Option<&Order> {
        self.orders.get(id)
    }

    /// All orders, most recently placed first.
    pub fn orders_newest_first(&self) -> impl Iterator<Item = &Order> {
        self.placed.iter().rev().filter_map(|id| self.orders.get(id))
    }

    pub fn review_for(&self, order_id: &OrderId) -> Option<&Review> {
        self.reviews.get(order_id)
    }

    pub fn reviews_for_restaurant<'a>(&'a self, restaurant_id: &'a RestaurantId) -> impl Iterator<Item = &'a Review> {
        self.reviews.values().filter(move |r| &r.restaurant_id == restaurant_id)
    }

    pub fn is_favorite(&self, customer_id: &UserId, restaurant_id: &RestaurantId) -> bool {
        self.favorites.contains(&(customer_id.clone(), restaurant_id.clone()))
    }

    pub fn favorites_of(&self, customer_id: &UserId) -> Vec<RestaurantId> {
        self.favorites
            .iter()
            .filter(|(c, _)| c == customer_id)
            .map(|(_, r)| r.clone())
            .collect()
    }

    // --- Id allocation (sequence semantics: ids of rolled back work are not reused) ---

    pub fn allocate_order_id(&mut self) -> OrderId {
        self.next_order += 1;
        OrderId::sequential(self.next_order)
    }

    pub fn allocate_review_id(&mut self) -> ReviewId {
        self.next_review += 1;
        ReviewId::sequential(self.next_review)
    }

    // --- Commit ---

    /// Applies every write in `uow`, or none of them.
    ///
    /// All preconditions are checked first, in staging order, against the
    /// state as the earlier writes of the same unit would leave it.
    pub fn commit(&mut self, uow: UnitOfWork) -> Result<usize, StorageError> {
        if let Err(e) = self.validate(&uow.writes) {
            warn!(error = %e, writes = uow.writes.len(), "Unit of work rolled back");
            return Err(e);
        }

        let count = uow.writes.len();
        for write in uow.writes {
            self.apply(write);
        }
        debug!(writes = count, "Unit of work committed");
        Ok(count)
    }

    fn validate(&self, writes: &[Write]) -> Result<(), StorageError> {
        let mut cart: HashMap<(&UserId, &MenuItemId), Option<u32>> = HashMap::new();
        let mut statuses: HashMap<&OrderId, OrderStatus> = HashMap::new();
        let mut new_orders: HashSet<&OrderId> = HashSet::new();
        let mut reviewed: HashSet<&OrderId> = HashSet::new();

        for write in writes {
            match write {
                Write::PutCartLine { line, expected_quantity } => {
                    let key = (&line.customer_id, &line.menu_item_id);
                    let current = match cart.get(&key) {
                        Some(staged) => *staged,
                        None => self.cart_line(key.0, key.1).map(|l| l.quantity),
                    };
                    if current != *expected_quantity {
                        return Err(StorageError::Conflict(format!(
                            "cart line {}/{} changed concurrently",
                            line.customer_id, line.menu_item_id
                        )));
                    }
                    cart.insert(key, Some(line.quantity));
                }
                Write::RemoveCartLine { customer_id, menu_item_id, expected_quantity } => {
                    let key = (customer_id, menu_item_id);
                    let current = match cart.get(&key) {
                        Some(staged) => *staged,
                        None => self.cart_line(customer_id, menu_item_id).map(|l| l.quantity),
                    };
                    if current != Some(*expected_quantity) {
                        return Err(StorageError::Conflict(format!(
                            "cart line {customer_id}/{menu_item_id} is no longer in the cart as read"
                        )));
                    }
                    cart.insert(key, None);
                }
                Write::InsertOrder(order) => {
                    if self.orders.contains_key(&order.id) || !new_orders.insert(&order.id) {
                        return Err(StorageError::DuplicateKey { table: "orders", key: order.id.to_string() });
                    }
                    statuses.insert(&order.id, order.status);
                }
                Write::SetStatus { order_id, expected, status, .. } => {
                    let current = match statuses.get(order_id) {
                        Some(staged) => Some(*staged),
                        None => self.orders.get(order_id).map(|o| o.status),
                    };
                    match current {
                        Some(current) if current == *expected => {}
                        Some(current) => {
                            return Err(StorageError::Conflict(format!(
                                "order {order_id} is {current}, expected {expected}"
                            )))
                        }
                        None => return Err(StorageError::Conflict(format!("order {order_id} does not exist"))),
                    }
                    statuses.insert(order_id, *status);
                }
                Write::InsertReview(review) => {
                    if self.reviews.contains_key(&review.order_id) || !reviewed.insert(&review.order_id) {
                        return Err(StorageError::DuplicateKey {
                            table: "reviews",
                            key: review.order_id.to_string(),
                        });
                    }
                }
                Write::ReplaceReview(review) => {
                    let existing_id = self.reviews.get(&review.order_id).map(|r| &r.id);
                    if existing_id != Some(&review.id) && !reviewed.contains(&review.order_id) {
                        return Err(StorageError::Conflict(format!(
                            "review {} for order {} does not exist",
                            review.id, review.order_id
                        )));
                    }
                }
                Write::SetFavorite { .. } => {}
            }
        }
        Ok(())
    }

    fn apply(&mut self, write: Write) {
        match write {
            Write::PutCartLine { line, .. } => {
                let lines = self.carts.entry(line.customer_id.clone()).or_default();
                match lines.iter_mut().find(|l| l.menu_item_id == line.menu_item_id) {
                    Some(existing) => *existing = line,
                    None => lines.push(line),
                }
            }
            Write::RemoveCartLine { customer_id, menu_item_id, .. } => {
                if let Some(lines) = self.carts.get_mut(&customer_id) {
                    lines.retain(|l| l.menu_item_id != menu_item_id);
                    if lines.is_empty() {
                        self.carts.remove(&customer_id);
                    }
                }
            }
            Write::InsertOrder(order) => {
                self.placed.push(order.id.clone());
                self.orders.insert(order.id.clone(), order);
            }
            Write::SetStatus { order_id, status, at, .. } => {
                if let Some(order) = self.orders.get_mut(&order_id) {
                    order.status = status;
                    order.updated_at = at;
                }
            }
            Write::InsertReview(review) | Write::ReplaceReview(review) => {
                self.reviews.insert(review.order_id.clone(), review);
            }
            Write::SetFavorite { customer_id, restaurant_id, favorite } => {
                if favorite {
                    self.favorites.insert((customer_id, restaurant_id));
                } else {
                    self.favorites.remove(&(customer_id, restaurant_id));
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Money;

    fn line(customer: &str, item: &str, quantity: u32) -> CartLine {
        CartLine {
            customer_id: UserId::from(customer),
            menu_item_id: MenuItemId::from(item),
            quantity,
            special_instructions: None,
            added_at: Utc::now(),
        }
    }

    fn order(id: &str, status: OrderStatus) -> Order {
        let now = Utc::now();
        Order {
            id: OrderId::from(id),
            customer_id: UserId::from("user_1"),
            restaurant_id: RestaurantId::from("restaurant_1"),
            status,
            lines: Vec::new(),
            total_amount: Money::ZERO,
            delivery_fee: Money::ZERO,
            tax_amount: Money::ZERO,
            delivery_address: "1 Main St".to_string(),
            notes: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn review(id: &str, order_id: &str, rating: u8) -> Review {
        let now = Utc::now();
        Review {
            id: ReviewId::from(id),
            order_id: OrderId::from(order_id),
            customer_id: UserId::from("user_1"),
            restaurant_id: RestaurantId::from("restaurant_1"),
            rating,
            comment: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn failed_precondition_applies_nothing() {
        let mut store = OrderStore::new();
        let mut seed = UnitOfWork::begin();
        seed.put_cart_line(line("user_1", "item_1", 2), None);
        store.commit(seed).unwrap();

        let mut uow = UnitOfWork::begin();
        uow.insert_order(order("order_1", OrderStatus::Pending));
        uow.remove_cart_line(UserId::from("user_1"), MenuItemId::from("item_1"), 2);
        // Stale read: the line is not in the cart with quantity 5.
        uow.remove_cart_line(UserId::from("user_1"), MenuItemId::from("item_2"), 5);

        assert!(matches!(store.commit(uow), Err(StorageError::Conflict(_))));
        assert_eq!(store.orders_newest_first().count(), 0);
        assert_eq!(store.cart_lines(&UserId::from("user_1")).len(), 1);
    }

    #[test]
    fn status_compare_and_set_detects_races() {
        let mut store = OrderStore::new();
        let mut seed = UnitOfWork::begin();
        seed.insert_order(order("order_1", OrderStatus::Pending));
        store.commit(seed).unwrap();

        let mut confirm = UnitOfWork::begin();
        confirm.set_status(OrderId::from("order_1"), OrderStatus::Pending, OrderStatus::Confirmed, Utc::now());
        let mut cancel = UnitOfWork::begin();
        cancel.set_status(OrderId::from("order_1"), OrderStatus::Pending, OrderStatus::Cancelled, Utc::now());

        store.commit(confirm).unwrap();
        assert!(matches!(store.commit(cancel), Err(StorageError::Conflict(_))));
        assert_eq!(store.order(&OrderId::from("order_1")).unwrap().status, OrderStatus::Confirmed);
    }

    #[test]
    fn staged_writes_see_earlier_writes_of_same_unit() {
        let mut store = OrderStore::new();
        let mut uow = UnitOfWork::begin();
        uow.put_cart_line(line("user_1", "item_1", 1), None);
        uow.put_cart_line(line("user_1", "item_1", 3), Some(1));
        uow.insert_order(order("order_9", OrderStatus::Pending));
        uow.set_status(OrderId::from("order_9"), OrderStatus::Pending, OrderStatus::Confirmed, Utc::now());
        assert_eq!(store.commit(uow), Ok(4));

        assert_eq!(store.cart_line(&UserId::from("user_1"), &MenuItemId::from("item_1")).unwrap().quantity, 3);
        assert_eq!(store.order(&OrderId::from("order_9")).unwrap().status, OrderStatus::Confirmed);
    }

    #[test]
    fn second_review_insert_is_a_duplicate_key() {
        let mut store = OrderStore::new();
        let mut first = UnitOfWork::begin();
        first.insert_review(review("review_1", "order_1", 4));
        store.commit(first).unwrap();

        let mut second = UnitOfWork::begin();
        second.insert_review(review("review_2", "order_1", 2));
        assert_eq!(
            store.commit(second),
            Err(StorageError::DuplicateKey { table: "reviews", key: "order_1".to_string() })
        );

        let mut update = UnitOfWork::begin();
        update.replace_review(review("review_1", "order_1", 2));
        store.commit(update).unwrap();
        assert_eq!(store.review_for(&OrderId::from("order_1")).unwrap().rating, 2);
    }

    #[test]
    fn orders_are_listed_newest_first() {
        let mut store = OrderStore::new();
        for id in ["order_1", "order_2", "order_10"] {
            let mut uow = UnitOfWork::begin();
            uow.insert_order(order(id, OrderStatus::Pending));
            store.commit(uow).unwrap();
        }
        let ids: Vec<_> = store.orders_newest_first().map(|o| o.id.to_string()).collect();
        assert_eq!(ids, ["order_10", "order_2", "order_1"]);
    }
}
