//! Session rollup
//!
//! Folds one session's enriched events into a per-session summary.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::enrichment::EnrichedEvent;
use super::model::{EventType, Metadata, SessionRecord};

/// 会话时间线中的单个事件（输出用，不含内部字段）
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyEvent {
    pub event_type: EventType,
    pub page: Option<String>,
    pub timestamp: DateTime<Utc>,
    pub metadata: Metadata,
    pub time_spent_on_page: f64,
}

impl From<EnrichedEvent> for JourneyEvent {
    fn from(event: EnrichedEvent) -> Self {
        Self {
            event_type: event.event_type,
            page: event.page,
            timestamp: event.timestamp,
            metadata: event.metadata,
            time_spent_on_page: event.time_spent_on_page,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSummary {
    pub session_id: String,
    pub started_at: DateTime<Utc>,
    pub last_activity_at: DateTime<Utc>,
    pub ended_at: DateTime<Utc>,
    pub total_events: u64,
    pub total_time_spent: f64,
    pub total_purchase_amount: f64,
    pub total_purchase_quantity: i64,
    pub total_distinct_pages: u64,
    pub has_order_placed: bool,
    pub events: Vec<JourneyEvent>,
}

/// Rolls a session's enriched events up into its summary.
///
/// A session only counts as converted when it holds an `ORDER_PLACED` event
/// with a strictly positive amount; zero-value orders still contribute their
/// purchase quantity but not the flag.
pub fn rollup_session(session: &SessionRecord, events: Vec<EnrichedEvent>) -> SessionSummary {
    let mut total_time_spent = 0.0;
    let mut total_purchase_amount = 0.0;
    let mut total_purchase_quantity: i64 = 0;
    let mut has_order_placed = false;

    for event in &events {
        total_time_spent += event.time_spent_on_page;
        total_purchase_amount += event.purchase_amount;
        total_purchase_quantity = total_purchase_quantity.saturating_add(event.purchase_quantity);
        if event.order_amount().is_some_and(|amount| amount > 0.0) {
            has_order_placed = true;
        }
    }

    let total_distinct_pages = events
        .iter()
        .filter_map(|e| e.page.as_deref())
        .collect::<HashSet<_>>()
        .len() as u64;

    SessionSummary {
        session_id: session.session_id.clone(),
        started_at: session.started_at,
        last_activity_at: session.last_activity_at,
        ended_at: session.ended_at,
        total_events: events.len() as u64,
        total_time_spent,
        total_purchase_amount,
        total_purchase_quantity,
        total_distinct_pages,
        has_order_placed,
        events: events.into_iter().map(JourneyEvent::from).collect(),
    }
}
