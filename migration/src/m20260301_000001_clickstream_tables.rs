//! Clickstream 基础表
//!
//! 创建 users / sessions / events 三张表：
//! - users: 用户资料（只读）
//! - sessions: 一次连续访问
//! - events: 会话内的行为事件（追加写入）

use sea_orm_migration::prelude::*;
use sea_orm_migration::sea_orm::DatabaseBackend;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let backend = manager.get_database_backend();

        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Users::UserId)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(timestamp_col(Users::CreatedAt, backend))
                    .col(timestamp_col(Users::LastActiveAt, backend))
                    .col(ColumnDef::new(Users::Fname).string_len(100).not_null())
                    .col(ColumnDef::new(Users::Lname).string_len(100).not_null())
                    .col(ColumnDef::new(Users::Age).integer().not_null().default(0))
                    .col(ColumnDef::new(Users::Country).string_len(8).not_null())
                    .col(ColumnDef::new(Users::Language).string_len(8).not_null())
                    .col(ColumnDef::new(Users::Metadata).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Sessions::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Sessions::SessionId)
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Sessions::UserId).string_len(64).not_null())
                    .col(timestamp_col(Sessions::StartedAt, backend))
                    .col(timestamp_col(Sessions::LastActivityAt, backend))
                    .col(timestamp_col(Sessions::EndedAt, backend))
                    .col(ColumnDef::new(Sessions::Metadata).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Events::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Events::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Events::UserId).string_len(64).not_null())
                    .col(ColumnDef::new(Events::SessionId).string_len(64).not_null())
                    .col(ColumnDef::new(Events::EventType).string_len(32).not_null())
                    .col(ColumnDef::new(Events::Page).string_len(255).null())
                    .col(timestamp_col(Events::Timestamp, backend))
                    .col(ColumnDef::new(Events::Metadata).text().null())
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Events::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Sessions::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await
    }
}

/// 毫秒精度的时间列
///
/// MySQL 的 TIMESTAMP 默认不保留小数秒，需显式指定 fsp；
/// SQLite / PostgreSQL 的 timestamp_with_time_zone 本身即可保留毫秒。
fn timestamp_col<T: IntoIden>(col: T, backend: DatabaseBackend) -> ColumnDef {
    let mut def = ColumnDef::new(col);
    match backend {
        DatabaseBackend::MySql => def.custom(Alias::new("TIMESTAMP(3)")),
        _ => def.timestamp_with_time_zone(),
    };
    def.not_null();
    def
}

#[derive(DeriveIden)]
pub(crate) enum Users {
    #[sea_orm(iden = "users")]
    Table,
    UserId,
    CreatedAt,
    LastActiveAt,
    Fname,
    Lname,
    Age,
    Country,
    Language,
    Metadata,
}

#[derive(DeriveIden)]
pub(crate) enum Sessions {
    #[sea_orm(iden = "sessions")]
    Table,
    SessionId,
    UserId,
    StartedAt,
    LastActivityAt,
    EndedAt,
    Metadata,
}

#[derive(DeriveIden)]
pub(crate) enum Events {
    #[sea_orm(iden = "events")]
    Table,
    Id,
    UserId,
    SessionId,
    EventType,
    Page,
    Timestamp,
    Metadata,
}
