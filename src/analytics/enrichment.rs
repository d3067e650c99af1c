//! Per-event derived metrics
//!
//! Walks one session's events in order and attaches time-on-page and
//! purchase attribution. Time on a page runs until the visitor navigates to a
//! different page; when the next event stays on the same page (or there is
//! no next event) the remaining session time up to `last_activity_at` is
//! attributed to the current event.

use chrono::{DateTime, Utc};

use super::model::{EventRecord, EventType, Metadata};
use super::round::round2;

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedEvent {
    pub id: i64,
    pub event_type: EventType,
    pub page: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Metadata,
    /// 秒，>= 0
    pub time_spent_on_page: f64,
    pub purchase_amount: f64,
    pub purchase_quantity: i64,
}

impl EnrichedEvent {
    /// 原始订单金额（未取整），只有 ORDER_PLACED 才有意义
    pub fn order_amount(&self) -> Option<f64> {
        match self.event_type {
            EventType::OrderPlaced => self.metadata.number("amount"),
            _ => None,
        }
    }
}

/// Enriches a session's events.
///
/// `events` must already be sorted by `(timestamp, id)`. Out-of-order or
/// duplicated timestamps never produce a negative duration; they clamp to 0.
pub fn enrich_events(
    events: Vec<EventRecord>,
    last_activity_at: DateTime<Utc>,
) -> Vec<EnrichedEvent> {
    let mut enriched = Vec::with_capacity(events.len());
    let mut iter = events.into_iter().peekable();

    while let Some(event) = iter.next() {
        let reference_end = match iter.peek() {
            Some(next) if next.page != event.page => next.timestamp,
            _ => last_activity_at,
        };
        enriched.push(enrich_one(event, reference_end));
    }

    enriched
}

fn enrich_one(event: EventRecord, reference_end: DateTime<Utc>) -> EnrichedEvent {
    let elapsed_ms = (reference_end - event.timestamp).num_milliseconds().max(0);

    let (purchase_amount, purchase_quantity) = match event.event_type {
        EventType::OrderPlaced => (
            round2(event.metadata.number("amount").unwrap_or(0.0)),
            event.metadata.integer("quantity").unwrap_or(1),
        ),
        _ => (0.0, 0),
    };

    EnrichedEvent {
        id: event.id,
        event_type: event.event_type,
        page: event.page,
        timestamp: event.timestamp,
        metadata: event.metadata,
        time_spent_on_page: elapsed_ms as f64 / 1000.0,
        purchase_amount,
        purchase_quantity,
    }
}
