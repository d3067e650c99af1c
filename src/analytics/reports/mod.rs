//! KPI report builders
//!
//! Each builder is a pure fold over rows already filtered to a time window.
//! Builders return `None` when the filtered input is empty; callers render
//! that as a report with every facet zeroed.

pub mod funnel;
pub mod product_cart;
pub mod revenue;
pub mod search;
pub mod traffic;

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use chrono::{DateTime, Utc};
use serde::Serialize;

pub use funnel::{DeviceUsers, FunnelReport, FunnelStage, FunnelStep, build_funnel};
pub use product_cart::{CartActionCount, ProductCartReport, ProductQuantity, build_product_cart};
pub use revenue::{DailyOrders, RevenueReport, RevenueStats, build_revenue};
pub use search::{QueryCount, SearchReport, build_search};
pub use traffic::{DailySessions, PageViews, TrafficReport, build_traffic};

/// Report plus the window it was computed over.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WindowedReport<T> {
    #[serde(flatten)]
    pub report: T,
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl<T: Default> WindowedReport<T> {
    /// 空结果渲染为全零报表
    pub fn new(report: Option<T>, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            report: report.unwrap_or_default(),
            start,
            end,
        }
    }
}

/// UTC calendar day bucket, `YYYY-MM-DD`.
pub(crate) fn day_bucket(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d").to_string()
}

/// Sorts grouped counts by count descending, then key ascending.
pub(crate) fn rank_desc<K: Ord + Hash>(counts: HashMap<K, u64>) -> Vec<(K, u64)> {
    let mut ranked: Vec<(K, u64)> = counts.into_iter().collect();
    ranked.sort_by(|(ka, ca), (kb, cb)| cb.cmp(ca).then_with(|| ka.cmp(kb)));
    ranked
}

/// Day buckets in ascending date order.
pub(crate) fn by_day<'a, I>(timestamps: I) -> Vec<(String, u64)>
where
    I: IntoIterator<Item = &'a DateTime<Utc>>,
{
    let mut days: BTreeMap<String, u64> = BTreeMap::new();
    for ts in timestamps {
        *days.entry(day_bucket(ts)).or_insert(0) += 1;
    }
    days.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_desc_breaks_ties_by_key() {
        let counts = HashMap::from([("b", 2), ("a", 2), ("c", 5)]);
        assert_eq!(rank_desc(counts), vec![("c", 5), ("a", 2), ("b", 2)]);
    }

    #[test]
    fn test_day_buckets_are_utc() {
        let late: DateTime<Utc> = "2025-03-01T23:30:00-02:00".parse().unwrap();
        let early: DateTime<Utc> = "2025-03-01T00:10:00Z".parse().unwrap();
        assert_eq!(
            by_day([&late, &early]),
            vec![("2025-03-01".to_string(), 1), ("2025-03-02".to_string(), 1)]
        );
    }

    #[test]
    fn test_windowed_report_defaults_missing_report() {
        let start: DateTime<Utc> = "2025-03-01T00:00:00Z".parse().unwrap();
        let end: DateTime<Utc> = "2025-03-02T00:00:00Z".parse().unwrap();
        let windowed = WindowedReport::<RevenueReport>::new(None, start, end);
        let value = serde_json::to_value(&windowed).unwrap();
        assert_eq!(value["revenueStats"]["orders"], 0);
        assert_eq!(value["ordersOverTime"], serde_json::json!([]));
        assert_eq!(value["start"], "2025-03-01T00:00:00Z");
    }
}
