//! User endpoints `/users/*`: search, session search and journeys

use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::analytics::JourneyView;
use crate::errors::Result;
use crate::services::{JourneyService, UserService};

use super::helpers::{api_result, error_from_analytics, success_response};
use super::types::{JourneyQuery, SearchQuery};

pub async fn search_users(
    service: web::Data<Arc<UserService>>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let params = match service.validate_search(query.query.as_deref(), query.limit.as_deref()) {
        Ok(p) => p,
        Err(e) => return error_from_analytics(&e),
    };
    api_result(service.search_users(&params).await)
}

pub async fn search_user_sessions(
    service: web::Data<Arc<UserService>>,
    user_id: web::Path<String>,
    query: web::Query<SearchQuery>,
) -> HttpResponse {
    let params = match service.validate_search(query.query.as_deref(), query.limit.as_deref()) {
        Ok(p) => p,
        Err(e) => return error_from_analytics(&e),
    };
    api_result(service.search_sessions(&user_id, &params).await)
}

async fn load_journey(
    service: &JourneyService,
    user_id: &str,
    query: &JourneyQuery,
) -> Result<JourneyView> {
    let (from, to) = JourneyService::parse_range(query.from.as_deref(), query.to.as_deref())?;
    Ok(JourneyView::from(service.get_journey(user_id, from, to).await?))
}

/// 没有匹配 session 时返回全零的默认结构
pub async fn get_user_journey(
    service: web::Data<Arc<JourneyService>>,
    user_id: web::Path<String>,
    query: web::Query<JourneyQuery>,
) -> HttpResponse {
    match load_journey(&service, &user_id, &query).await {
        Ok(view) => success_response(view),
        Err(e) => error_from_analytics(&e),
    }
}

/// 用户路由 `/users`
///
/// 包含：
/// - GET /users/search - 按 id/姓名搜索用户
/// - GET /users/{user_id}/sessions - 搜索用户的 session
/// - GET /users/{user_id}/journeys - 用户访问路径
pub fn users_routes() -> actix_web::Scope {
    web::scope("/users")
        .route("/search", web::get().to(search_users))
        .route("/{user_id}/sessions", web::get().to(search_user_sessions))
        .route("/{user_id}/journeys", web::get().to(get_user_journey))
}
