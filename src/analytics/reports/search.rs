use std::collections::HashMap;

use serde::Serialize;

use super::rank_desc;
use crate::analytics::model::{EventRecord, EventType};

const TOP_QUERIES: usize = 10;

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchReport {
    pub total_searches: u64,
    pub top_queries: Vec<QueryCount>,
    pub zero_result_queries: Vec<QueryCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryCount {
    pub query: Option<String>,
    pub searches: u64,
}

fn to_query_counts(counts: HashMap<Option<String>, u64>) -> Vec<QueryCount> {
    rank_desc(counts)
        .into_iter()
        .map(|(query, searches)| QueryCount { query, searches })
        .collect()
}

/// Search activity over `SEARCH` events in the window.
///
/// Queries are grouped verbatim; searches without a query string group
/// under `null`.
pub fn build_search(events: &[EventRecord]) -> Option<SearchReport> {
    let searches: Vec<&EventRecord> = events
        .iter()
        .filter(|e| e.event_type == EventType::Search)
        .collect();
    if searches.is_empty() {
        return None;
    }

    let mut all: HashMap<Option<String>, u64> = HashMap::new();
    let mut zero_result: HashMap<Option<String>, u64> = HashMap::new();
    for event in &searches {
        let query = event.metadata.text("query").map(String::from);
        if event.metadata.number("resultCount") == Some(0.0) {
            *zero_result.entry(query.clone()).or_insert(0) += 1;
        }
        *all.entry(query).or_insert(0) += 1;
    }

    let mut top_queries = to_query_counts(all);
    top_queries.truncate(TOP_QUERIES);

    Some(SearchReport {
        total_searches: searches.len() as u64,
        top_queries,
        zero_result_queries: to_query_counts(zero_result),
    })
}
