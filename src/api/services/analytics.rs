//! KPI report endpoints `/analytics/*`
//!
//! `period` is checked for presence here; the service resolves it before
//! touching the store.

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::errors::{AnalyticsError, Result};
use crate::services::AnalyticsService;

use super::helpers::{api_result, error_from_analytics};
use super::types::PeriodQuery;

fn require_period(query: &PeriodQuery) -> Result<&str> {
    query
        .period
        .as_deref()
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .ok_or_else(|| AnalyticsError::invalid_period("Query parameter 'period' is required"))
}

macro_rules! report_handler {
    ($name:ident, $method:ident) => {
        pub async fn $name(
            service: web::Data<Arc<AnalyticsService>>,
            query: web::Query<PeriodQuery>,
        ) -> HttpResponse {
            match require_period(&query) {
                Ok(period) => api_result(service.$method(period).await),
                Err(e) => error_from_analytics(&e),
            }
        }
    };
}

report_handler!(get_traffic, traffic);
report_handler!(get_search, search);
report_handler!(get_product_and_cart, product_and_cart);
report_handler!(get_revenue_and_conversion, revenue_and_conversion);
report_handler!(get_user_behavior_and_funnel, user_behavior_and_funnel);

/// KPI 路由 `/analytics`
pub fn analytics_routes() -> actix_web::Scope {
    web::scope("/analytics")
        .route("/traffic", web::get().to(get_traffic))
        .route("/search", web::get().to(get_search))
        .route("/product-and-cart", web::get().to(get_product_and_cart))
        .route(
            "/revenue-and-conversion",
            web::get().to(get_revenue_and_conversion),
        )
        .route(
            "/user-behavior-and-funnel",
            web::get().to(get_user_behavior_and_funnel),
        )
}
