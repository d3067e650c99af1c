use serde::Serialize;

use super::by_day;
use crate::analytics::model::{EventRecord, EventType};
use crate::analytics::round::round2;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueReport {
    pub revenue_stats: RevenueStats,
    pub orders_over_time: Vec<DailyOrders>,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueStats {
    pub orders: u64,
    pub revenue: f64,
    pub avg_order_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyOrders {
    pub date: String,
    pub orders: u64,
}

/// Revenue over `ORDER_PLACED` events in the window.
///
/// Orders without a numeric amount count as orders and add nothing to
/// revenue; they are left out of the average.
pub fn build_revenue(events: &[EventRecord]) -> Option<RevenueReport> {
    let orders: Vec<&EventRecord> = events
        .iter()
        .filter(|e| e.event_type == EventType::OrderPlaced)
        .collect();
    if orders.is_empty() {
        return None;
    }

    let amounts: Vec<f64> = orders
        .iter()
        .filter_map(|e| e.metadata.number("amount"))
        .collect();
    let revenue: f64 = amounts.iter().sum();
    let avg_order_value = if amounts.is_empty() {
        0.0
    } else {
        revenue / amounts.len() as f64
    };

    Some(RevenueReport {
        revenue_stats: RevenueStats {
            orders: orders.len() as u64,
            revenue: round2(revenue),
            avg_order_value: round2(avg_order_value),
        },
        orders_over_time: by_day(orders.iter().map(|e| &e.timestamp))
            .into_iter()
            .map(|(date, orders)| DailyOrders { date, orders })
            .collect(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use serde_json::json;

    fn order(id: i64, at: &str, meta: serde_json::Value) -> EventRecord {
        EventRecord {
            id,
            user_id: "u1".into(),
            session_id: "s1".into(),
            event_type: EventType::OrderPlaced,
            page: Some("/checkout".into()),
            timestamp: at.parse::<DateTime<Utc>>().unwrap(),
            metadata: serde_json::from_value(meta).unwrap(),
        }
    }

    #[test]
    fn test_three_orders() {
        let events = vec![
            order(1, "2025-03-01T10:00:00Z", json!({"amount": 100})),
            order(2, "2025-03-01T11:00:00Z", json!({"amount": 200})),
            order(3, "2025-03-02T09:00:00Z", json!({"amount": 300})),
        ];
        let report = build_revenue(&events).unwrap();
        assert_eq!(
            report.revenue_stats,
            RevenueStats { orders: 3, revenue: 600.0, avg_order_value: 200.0 }
        );
        assert_eq!(
            report.orders_over_time,
            vec![
                DailyOrders { date: "2025-03-01".into(), orders: 2 },
                DailyOrders { date: "2025-03-02".into(), orders: 1 },
            ]
        );
    }

    #[test]
    fn test_rounding_and_missing_amounts() {
        let events = vec![
            order(1, "2025-03-01T10:00:00Z", json!({"amount": 10.333})),
            order(2, "2025-03-01T10:00:00Z", json!({"amount": 10.333})),
            order(3, "2025-03-01T10:00:00Z", json!({})),
        ];
        let report = build_revenue(&events).unwrap();
        assert_eq!(report.revenue_stats.orders, 3);
        assert_eq!(report.revenue_stats.revenue, 20.67);
        assert_eq!(report.revenue_stats.avg_order_value, 10.33);
    }

    #[test]
    fn test_no_orders_is_none() {
        assert_eq!(build_revenue(&[]), None);
    }
}
