use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::analytics::{Clock, SystemClock};
use crate::services::{AnalyticsService, EventService, JourneyService, UserService};
use crate::storage::{AnalyticsStore, SeaOrmStorage, StorageFactory};

/// 服务器/CLI 共用的启动上下文
pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub store: Arc<dyn AnalyticsStore>,
    pub journey_service: Arc<JourneyService>,
    pub analytics_service: Arc<AnalyticsService>,
    pub user_service: Arc<UserService>,
    pub event_service: Arc<EventService>,
}

impl StartupContext {
    /// 基于已连接的存储组装各个服务
    pub fn from_storage(storage: Arc<SeaOrmStorage>, clock: Arc<dyn Clock>) -> Self {
        let config = crate::config::get_config();
        let store: Arc<dyn AnalyticsStore> = storage.clone();

        Self {
            journey_service: Arc::new(JourneyService::new(store.clone())),
            analytics_service: Arc::new(AnalyticsService::new(
                store.clone(),
                clock.clone(),
                config.analytics.week_start,
            )),
            user_service: Arc::new(UserService::new(
                store.clone(),
                config.api.default_search_limit,
                config.api.max_search_limit,
            )),
            event_service: Arc::new(EventService::new(store.clone(), clock)),
            store,
            storage,
        }
    }
}

/// 连接数据库、执行迁移并组装服务
pub async fn prepare_startup(clock: Arc<dyn Clock>) -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let context = StartupContext::from_storage(storage, clock);

    debug!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );
    Ok(context)
}

/// 准备服务器启动的上下文（使用系统时钟）
pub async fn prepare_server_startup() -> Result<StartupContext> {
    prepare_startup(Arc::new(SystemClock)).await
}
