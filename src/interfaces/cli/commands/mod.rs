//! CLI commands

mod config_gen;
mod journey;
mod migrate;
mod report;

pub use config_gen::config_generate;
pub use journey::print_journey;
pub use migrate::run_migrate;
pub use report::print_report;

use serde::Serialize;

use crate::interfaces::cli::CliError;
use crate::storage::{SeaOrmStorage, StorageFactory};
use std::sync::Arc;

/// 连接数据库（包含迁移）
async fn open_storage() -> Result<Arc<SeaOrmStorage>, CliError> {
    StorageFactory::create()
        .await
        .map_err(|e| CliError::StorageError(e.to_string()))
}

/// 以格式化 JSON 输出到 stdout
fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let text = serde_json::to_string_pretty(value)
        .map_err(|e| CliError::CommandError(format!("Failed to serialize output: {}", e)))?;
    println!("{}", text);
    Ok(())
}
