use colored::Colorize;

use super::open_storage;
use crate::interfaces::cli::CliError;
use crate::storage::AnalyticsStore;

/// 执行数据库迁移（StorageFactory 连接时自动完成）并输出概况
pub async fn run_migrate() -> Result<(), CliError> {
    let storage = open_storage().await?;
    let users = storage.count_users().await?;

    println!(
        "{} {} ({} users)",
        "Schema is up to date on".green(),
        storage.backend_name().to_uppercase().blue(),
        users
    );
    Ok(())
}
