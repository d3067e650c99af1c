//! KPI report service
//!
//! Every report resolves its period first, so an invalid token never reaches
//! the store. The resolved window is echoed back with the report.

use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info};

use crate::analytics::reports::{
    FunnelReport, ProductCartReport, RevenueReport, SearchReport, TrafficReport, WindowedReport,
    build_funnel, build_product_cart, build_revenue, build_search, build_traffic,
    product_cart::CART_EVENT_TYPES,
};
use crate::analytics::{Clock, EventType, TimeRange, WeekStart, resolve};
use crate::errors::Result;
use crate::storage::AnalyticsStore;

/// Analytics 服务
pub struct AnalyticsService {
    store: Arc<dyn AnalyticsStore>,
    clock: Arc<dyn Clock>,
    week_start: WeekStart,
}

impl AnalyticsService {
    pub fn new(store: Arc<dyn AnalyticsStore>, clock: Arc<dyn Clock>, week_start: WeekStart) -> Self {
        Self {
            store,
            clock,
            week_start,
        }
    }

    /// 将 period token 解析为 UTC 时间窗口
    pub fn window(&self, period: &str) -> Result<TimeRange<Utc>> {
        let now = self.clock.now();
        Ok(resolve(period, &now, self.week_start)?.to_utc())
    }

    pub async fn traffic(&self, period: &str) -> Result<WindowedReport<TrafficReport>> {
        let TimeRange { start, end } = self.window(period)?;
        info!("Analytics: traffic, period={}, {} - {}", period, start, end);

        let sessions = self.store.sessions_started_between(start, end).await?;
        let session_ids: Vec<String> = sessions.iter().map(|s| s.session_id.clone()).collect();
        let events = self.store.events_for_session_ids(&session_ids).await?;
        debug!(
            "Traffic input: {} sessions, {} events",
            sessions.len(),
            events.len()
        );

        Ok(WindowedReport::new(build_traffic(&sessions, &events), start, end))
    }

    pub async fn search(&self, period: &str) -> Result<WindowedReport<SearchReport>> {
        let TimeRange { start, end } = self.window(period)?;
        info!("Analytics: search, period={}, {} - {}", period, start, end);

        let events = self
            .store
            .events_between(start, end, Some(&[EventType::Search][..]))
            .await?;
        debug!("Search input: {} events", events.len());

        Ok(WindowedReport::new(build_search(&events), start, end))
    }

    pub async fn product_and_cart(&self, period: &str) -> Result<WindowedReport<ProductCartReport>> {
        let TimeRange { start, end } = self.window(period)?;
        info!(
            "Analytics: product and cart, period={}, {} - {}",
            period, start, end
        );

        let events = self
            .store
            .events_between(start, end, Some(&CART_EVENT_TYPES[..]))
            .await?;
        debug!("Product/cart input: {} events", events.len());

        Ok(WindowedReport::new(build_product_cart(&events), start, end))
    }

    pub async fn revenue_and_conversion(
        &self,
        period: &str,
    ) -> Result<WindowedReport<RevenueReport>> {
        let TimeRange { start, end } = self.window(period)?;
        info!("Analytics: revenue, period={}, {} - {}", period, start, end);

        let events = self
            .store
            .events_between(start, end, Some(&[EventType::OrderPlaced][..]))
            .await?;
        debug!("Revenue input: {} orders", events.len());

        Ok(WindowedReport::new(build_revenue(&events), start, end))
    }

    pub async fn user_behavior_and_funnel(
        &self,
        period: &str,
    ) -> Result<WindowedReport<FunnelReport>> {
        let TimeRange { start, end } = self.window(period)?;
        info!("Analytics: funnel, period={}, {} - {}", period, start, end);

        let events = self.store.events_between(start, end, None).await?;
        debug!("Funnel input: {} events", events.len());

        Ok(WindowedReport::new(build_funnel(&events), start, end))
    }
}
