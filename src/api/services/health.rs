use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, trace};

use crate::api::constants::{HEALTH_PING_TIMEOUT_SECS, SERVICE_NAME};
use crate::storage::AnalyticsStore;

use super::error_code::ErrorCode;
use super::helpers::json_response;
use super::types::HealthResponse;

/// Health Service
///
/// 直接 ping 存储，不经过业务服务。
pub struct HealthService;

impl HealthService {
    pub async fn health_check(store: web::Data<Arc<dyn AnalyticsStore>>) -> HttpResponse {
        let start_time = Instant::now();
        trace!("Received health check request");

        let healthy = match tokio::time::timeout(
            Duration::from_secs(HEALTH_PING_TIMEOUT_SECS),
            store.ping(),
        )
        .await
        {
            Ok(Ok(())) => true,
            Ok(Err(e)) => {
                error!("Storage health check failed: {}", e);
                false
            }
            Err(_) => {
                error!("Storage health check timeout");
                false
            }
        };

        let data = HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            service: SERVICE_NAME.to_string(),
        };

        trace!(
            "Health check completed in {:?}, backend: {}, healthy: {}",
            start_time.elapsed(),
            store.backend_name(),
            healthy
        );

        if healthy {
            json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
        } else {
            json_response(
                StatusCode::SERVICE_UNAVAILABLE,
                ErrorCode::ServiceUnavailable,
                "Service Unavailable",
                Some(data),
            )
        }
    }
}
