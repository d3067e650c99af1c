use super::{open_storage, print_json};
use crate::analytics::JourneyView;
use crate::interfaces::cli::CliError;
use crate::services::JourneyService;

/// 输出用户访问路径（JSON，与 HTTP 接口的 data 字段一致）
pub async fn print_journey(user_id: &str, from: &str, to: &str) -> Result<(), CliError> {
    let (from, to) = JourneyService::parse_range(Some(from), Some(to))?;

    let storage = open_storage().await?;
    let service = JourneyService::new(storage);

    let journey = service.get_journey(user_id, from, to).await?;
    print_json(&JourneyView::from(journey))
}

