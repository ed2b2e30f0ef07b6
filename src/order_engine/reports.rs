use serde::Serialize;
use std::collections::{BTreeMap, HashMap};

use crate::domain::{MenuItemId, Money, Order, OrderStatus, RatingSummary, RestaurantId, Review};

const POPULAR_ITEM_LIMIT: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PopularItem {
    pub menu_item_id: MenuItemId,
    pub item_name: String,
    pub quantity: u64,
}

/// Owner dashboard figures over all orders of the owner's restaurants.
///
/// Money sums clamp at the largest representable amount.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RestaurantAnalytics {
    pub orders_by_status: BTreeMap<OrderStatus, usize>,
    /// Total amount of delivered orders.
    pub delivered_revenue: Money,
    /// Delivered revenue keyed by `YYYY-MM` of the order's creation.
    pub revenue_by_month: BTreeMap<String, Money>,
    pub popular_items: Vec<PopularItem>,
}

pub fn analytics<'a>(orders: impl IntoIterator<Item = &'a Order>) -> RestaurantAnalytics {
    let mut orders_by_status = BTreeMap::new();
    let mut delivered_revenue = Money::ZERO;
    let mut revenue_by_month: BTreeMap<String, Money> = BTreeMap::new();
    let mut item_totals: HashMap<&MenuItemId, (&str, u64)> = HashMap::new();

    for order in orders {
        *orders_by_status.entry(order.status).or_insert(0) += 1;

        if order.status == OrderStatus::Delivered {
            delivered_revenue = delivered_revenue.saturating_add(order.total_amount);
            let month = order.created_at.format("%Y-%m").to_string();
            let slot = revenue_by_month.entry(month).or_insert(Money::ZERO);
            *slot = slot.saturating_add(order.total_amount);
        }

        for line in &order.lines {
            let entry = item_totals.entry(&line.menu_item_id).or_insert((line.item_name.as_str(), 0));
            entry.1 = entry.1.saturating_add(u64::from(line.quantity));
        }
    }

    let mut popular_items: Vec<PopularItem> = item_totals
        .into_iter()
        .map(|(id, (name, quantity))| PopularItem {
            menu_item_id: id.clone(),
            item_name: name.to_string(),
            quantity,
        })
        .collect();
    popular_items.sort_by(|a, b| b.quantity.cmp(&a.quantity).then_with(|| a.item_name.cmp(&b.item_name)));
    popular_items.truncate(POPULAR_ITEM_LIMIT);

    RestaurantAnalytics {
        orders_by_status,
        delivered_revenue,
        revenue_by_month,
        popular_items,
    }
}

pub fn rating_summary<'a>(restaurant_id: RestaurantId, reviews: impl IntoIterator<Item = &'a Review>) -> RatingSummary {
    let (sum, count) = reviews
        .into_iter()
        .fold((0u64, 0usize), |(sum, count), r| (sum.saturating_add(u64::from(r.rating)), count + 1));

    let average = if count == 0 {
        0.0
    } else {
        (sum as f64 / count as f64 * 10.0).round() / 10.0
    };

    RatingSummary { restaurant_id, average, count }
}
