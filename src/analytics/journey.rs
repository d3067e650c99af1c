//! User journey reconstruction
//!
//! Stitches a user's sessions and their events into ordered per-session
//! timelines and folds them into user-level totals.

use std::collections::HashMap;

use serde::Serialize;

use super::enrichment::enrich_events;
use super::model::{EventRecord, SessionRecord, sort_events};
use super::rollup::{SessionSummary, rollup_session};
use super::round::round2;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JourneyResponse {
    pub total_sessions: u64,
    pub order_placed_sessions: u64,
    pub total_events: u64,
    pub total_purchase_amount: f64,
    pub total_purchase_quantity: i64,
    /// 百分比，0..=100
    pub conversion_rate: f64,
    pub sessions: Vec<SessionSummary>,
}

/// Placeholder rendered when no session matched the requested range.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EmptyJourney {
    pub sessions: Vec<SessionSummary>,
    pub total_purchase_amount: f64,
    pub total_purchase_items: i64,
}

/// Journey as presented to callers: either the full fold or the zeroed
/// placeholder.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum JourneyView {
    Found(JourneyResponse),
    Empty(EmptyJourney),
}

impl From<Option<JourneyResponse>> for JourneyView {
    fn from(journey: Option<JourneyResponse>) -> Self {
        match journey {
            Some(journey) => JourneyView::Found(journey),
            None => JourneyView::Empty(EmptyJourney::default()),
        }
    }
}

/// Builds per-session summaries.
///
/// Events are matched to sessions by id; events whose session is not in
/// `sessions` are ignored. Session order is preserved.
pub fn summarize_sessions(
    sessions: &[SessionRecord],
    events: Vec<EventRecord>,
) -> Vec<SessionSummary> {
    let mut by_session: HashMap<String, Vec<EventRecord>> = HashMap::with_capacity(sessions.len());
    for event in events {
        by_session
            .entry(event.session_id.clone())
            .or_default()
            .push(event);
    }

    sessions
        .iter()
        .map(|session| {
            let mut session_events = by_session.remove(&session.session_id).unwrap_or_default();
            session_events.retain(|e| e.user_id == session.user_id);
            sort_events(&mut session_events);
            let enriched = enrich_events(session_events, session.last_activity_at);
            rollup_session(session, enriched)
        })
        .collect()
}

/// Folds session summaries into a journey.
///
/// Returns `None` when there are no sessions at all. That is distinct from
/// sessions that exist but carry no events, which still produce a journey.
pub fn fold_journey(sessions: Vec<SessionSummary>) -> Option<JourneyResponse> {
    if sessions.is_empty() {
        return None;
    }

    let total_sessions = sessions.len() as u64;
    let order_placed_sessions = sessions.iter().filter(|s| s.has_order_placed).count() as u64;
    let total_events = sessions.iter().map(|s| s.total_events).sum();
    let total_purchase_amount = sessions.iter().map(|s| s.total_purchase_amount).sum::<f64>();
    let total_purchase_quantity = sessions
        .iter()
        .fold(0i64, |acc, s| acc.saturating_add(s.total_purchase_quantity));
    let conversion_rate = round2(order_placed_sessions as f64 / total_sessions as f64 * 100.0);

    Some(JourneyResponse {
        total_sessions,
        order_placed_sessions,
        total_events,
        total_purchase_amount: round2(total_purchase_amount),
        total_purchase_quantity,
        conversion_rate,
        sessions,
    })
}

/// Reconstructs a journey from raw sessions and events.
pub fn build_journey(
    sessions: &[SessionRecord],
    events: Vec<EventRecord>,
) -> Option<JourneyResponse> {
    fold_journey(summarize_sessions(sessions, events))
}
