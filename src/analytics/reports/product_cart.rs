use std::collections::HashMap;

use serde::Serialize;
use serde_json::Value;

use super::rank_desc;
use crate::analytics::model::{EventRecord, EventType};

pub const CART_EVENT_TYPES: [EventType; 3] = [
    EventType::AddToCart,
    EventType::RemoveFromCart,
    EventType::OrderPlaced,
];

const TOP_PRODUCTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductCartReport {
    pub cart_actions: Vec<CartActionCount>,
    pub top_products: Vec<ProductQuantity>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartActionCount {
    pub event_type: EventType,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuantity {
    pub product_id: Value,
    /// 该商品第一次出现时的名称
    pub name: Option<String>,
    pub quantity: i64,
}

struct ProductTally {
    product_id: Value,
    name: Option<String>,
    quantity: i64,
}

/// Cart activity over add/remove/order events in the window.
///
/// `events` must be in `(timestamp, id)` order so the first-seen product
/// name is stable.
pub fn build_product_cart(events: &[EventRecord]) -> Option<ProductCartReport> {
    let cart_events: Vec<&EventRecord> = events
        .iter()
        .filter(|e| CART_EVENT_TYPES.contains(&e.event_type))
        .collect();
    if cart_events.is_empty() {
        return None;
    }

    let mut actions: HashMap<EventType, u64> = HashMap::new();
    // key 为 productId 的 JSON 文本，数字与字符串 id 不会合并
    let mut products: HashMap<String, ProductTally> = HashMap::new();

    for event in cart_events {
        *actions.entry(event.event_type).or_insert(0) += 1;

        if event.event_type != EventType::AddToCart {
            continue;
        }
        let product_id = event.metadata.get("productId").cloned().unwrap_or(Value::Null);
        let tally = products
            .entry(product_id.to_string())
            .or_insert_with(|| ProductTally {
                product_id,
                name: event.metadata.text("productName").map(String::from),
                quantity: 0,
            });
        tally.quantity = tally
            .quantity
            .saturating_add(event.metadata.integer("quantity").unwrap_or(0));
    }

    let mut top_products: Vec<(String, ProductTally)> = products.into_iter().collect();
    top_products.sort_by(|(ka, a), (kb, b)| b.quantity.cmp(&a.quantity).then_with(|| ka.cmp(kb)));
    top_products.truncate(TOP_PRODUCTS);

    Some(ProductCartReport {
        cart_actions: rank_desc(actions)
            .into_iter()
            .map(|(event_type, count)| CartActionCount { event_type, count })
            .collect(),
        top_products: top_products
            .into_iter()
            .map(|(_, tally)| ProductQuantity {
                product_id: tally.product_id,
                name: tally.name,
                quantity: tally.quantity,
            })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::model::Metadata;
    use chrono::{DateTime, Duration, Utc};
    use serde_json::json;

    fn event(id: i64, event_type: EventType, meta: Value) -> EventRecord {
        let base: DateTime<Utc> = "2025-03-01T10:00:00Z".parse().unwrap();
        EventRecord {
            id,
            user_id: "u1".into(),
            session_id: "s1".into(),
            event_type,
            page: Some("/p".into()),
            timestamp: base + Duration::seconds(id),
            metadata: serde_json::from_value(meta).unwrap(),
        }
    }

    #[test]
    fn test_no_cart_events_is_none() {
        let view = EventRecord {
            metadata: Metadata::new(),
            ..event(1, EventType::PageView, json!({}))
        };
        assert_eq!(build_product_cart(&[view]), None);
    }

    #[test]
    fn test_cart_actions_and_top_products() {
        let events = vec![
            event(1, EventType::AddToCart,
                json!({"productId": 101, "productName": "Runner", "quantity": 2})),
            event(2, EventType::AddToCart,
                json!({"productId": 101, "productName": "Runner v2", "quantity": 3})),
            event(3, EventType::AddToCart,
                json!({"productId": 202, "productName": "Cap", "quantity": 4})),
            event(4, EventType::RemoveFromCart,
                json!({"productId": 202, "quantity": 9})),
            event(5, EventType::OrderPlaced, json!({"amount": 10})),
            event(6, EventType::AddToCart, json!({"productId": 303})),
        ];
        let report = build_product_cart(&events).unwrap();

        assert_eq!(
            report.cart_actions,
            vec![
                CartActionCount { event_type: EventType::AddToCart, count: 4 },
                CartActionCount { event_type: EventType::RemoveFromCart, count: 1 },
                CartActionCount { event_type: EventType::OrderPlaced, count: 1 },
            ]
        );
        assert_eq!(report.top_products.len(), 3);
        assert_eq!(report.top_products[0].product_id, json!(101));
        // 保留第一次出现的商品名
        assert_eq!(report.top_products[0].name.as_deref(), Some("Runner"));
        assert_eq!(report.top_products[0].quantity, 5);
        assert_eq!(report.top_products[1].product_id, json!(202));
        assert_eq!(report.top_products[1].quantity, 4);
        assert_eq!(report.top_products[2].quantity, 0);
        assert_eq!(report.top_products[2].name, None);
    }

    #[test]
    fn test_top_products_capped_at_ten() {
        let events: Vec<EventRecord> = (0..12)
            .map(|i| event(i, EventType::AddToCart, json!({"productId": i, "quantity": i})))
            .collect();
        let report = build_product_cart(&events).unwrap();
        assert_eq!(report.top_products.len(), 10);
        assert_eq!(report.top_products[0].product_id, json!(11));
    }

    #[test]
    fn test_huge_quantities_saturate() {
        let events = vec![
            event(1, EventType::AddToCart, json!({"productId": 1, "quantity": 6_000_000_000_000_000_000i64})),
            event(2, EventType::AddToCart, json!({"productId": 1, "quantity": 6_000_000_000_000_000_000i64})),
            event(3, EventType::AddToCart, json!({"productId": 2, "quantity": -6_000_000_000_000_000_000i64})),
            event(4, EventType::AddToCart, json!({"productId": 2, "quantity": -6_000_000_000_000_000_000i64})),
        ];
        let report = build_product_cart(&events).unwrap();
        assert_eq!(report.top_products[0].product_id, json!(1));
        assert_eq!(report.top_products[0].quantity, i64::MAX);
        assert_eq!(report.top_products[1].quantity, i64::MIN);
    }
}
