//! Clickstream 查询索引
//!
//! - sessions(user_id, started_at): 用户旅程按时间范围取会话
//! - events(session_id, timestamp): 会话内事件按时间排序
//! - events(event_type, timestamp): KPI 报表按事件类型 + 时间窗口过滤
//! - events(timestamp): 漏斗报表只按时间窗口过滤

use sea_orm_migration::prelude::*;

use crate::m20260301_000001_clickstream_tables::{Events, Sessions};

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sessions_user_started")
                    .table(Sessions::Table)
                    .col(Sessions::UserId)
                    .col(Sessions::StartedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_sessions_started")
                    .table(Sessions::Table)
                    .col(Sessions::StartedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_session_time")
                    .table(Events::Table)
                    .col(Events::SessionId)
                    .col(Events::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_type_time")
                    .table(Events::Table)
                    .col(Events::EventType)
                    .col(Events::Timestamp)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_events_time")
                    .table(Events::Table)
                    .col(Events::Timestamp)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        for name in ["idx_events_time", "idx_events_type_time", "idx_events_session_time"] {
            manager
                .drop_index(Index::drop().name(name).table(Events::Table).to_owned())
                .await?;
        }

        for name in ["idx_sessions_started", "idx_sessions_user_started"] {
            manager
                .drop_index(Index::drop().name(name).table(Sessions::Table).to_owned())
                .await?;
        }

        Ok(())
    }
}
