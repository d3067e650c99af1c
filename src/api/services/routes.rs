//! API 路由配置

use actix_web::web;

use super::analytics::analytics_routes;
use super::events::post_event;
use super::health::HealthService;
use super::helpers::{json_config, query_config};
use super::users::users_routes;

/// `/api` 下的全部路由
///
/// 包含：
/// - GET /api/health - 健康检查
/// - /api/users/* - 用户搜索与访问路径
/// - POST /api/events - 事件写入
/// - /api/analytics/* - KPI 报表
pub fn api_routes() -> actix_web::Scope {
    web::scope("/api")
        .app_data(json_config())
        .app_data(query_config())
        .route("/health", web::get().to(HealthService::health_check))
        .route("/health", web::head().to(HealthService::health_check))
        .route("/events", web::post().to(post_event))
        .service(users_routes())
        .service(analytics_routes())
}
