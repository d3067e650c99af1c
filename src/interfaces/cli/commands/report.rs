use std::sync::Arc;

use chrono::DateTime;

use super::{open_storage, print_json};
use crate::analytics::{Clock, FixedClock, Period, SystemClock};
use crate::cli::ReportKind;
use crate::interfaces::cli::CliError;
use crate::runtime::lifetime::startup::StartupContext;

fn clock_from_arg(now: Option<&str>) -> Result<Arc<dyn Clock>, CliError> {
    match now {
        Some(raw) => {
            let instant = DateTime::parse_from_rfc3339(raw).map_err(|e| {
                CliError::ParseError(format!("Invalid --now '{}': {}", raw, e))
            })?;
            Ok(Arc::new(FixedClock(instant)))
        }
        None => Ok(Arc::new(SystemClock)),
    }
}

/// 计算并输出 KPI 报表
pub async fn print_report(kind: ReportKind, period: &str, now: Option<&str>) -> Result<(), CliError> {
    // 先校验 period，再连接数据库
    Period::parse(period)?;
    let clock = clock_from_arg(now)?;

    let storage = open_storage().await?;
    let service = StartupContext::from_storage(storage, clock).analytics_service;

    match kind {
        ReportKind::Traffic => print_json(&service.traffic(period).await?),
        ReportKind::Search => print_json(&service.search(period).await?),
        ReportKind::ProductAndCart => print_json(&service.product_and_cart(period).await?),
        ReportKind::RevenueAndConversion => {
            print_json(&service.revenue_and_conversion(period).await?)
        }
        ReportKind::UserBehaviorAndFunnel => {
            print_json(&service.user_behavior_and_funnel(period).await?)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clock_from_arg() {
        let clock = clock_from_arg(Some("2025-03-12T15:30:45+08:00")).unwrap();
        assert_eq!(clock.now().to_rfc3339(), "2025-03-12T15:30:45+08:00");

        assert!(matches!(
            clock_from_arg(Some("yesterday")),
            Err(CliError::ParseError(_))
        ));
    }
}
