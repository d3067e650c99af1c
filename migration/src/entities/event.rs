//! Clickstream event entity (append-only)

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "events")]
pub struct Model {
    /// Arrival order; breaks ties between events sharing a timestamp
    #[sea_orm(primary_key)]
    pub id: i64,
    pub user_id: String,
    pub session_id: String,
    /// PAGE_VIEW / SEARCH / ADD_TO_CART / REMOVE_FROM_CART / ORDER_PLACED / SCROLL_DEPTH
    pub event_type: String,
    pub page: Option<String>,
    pub timestamp: DateTimeUtc,
    /// device, browser, productId, productName, price, quantity, amount, query, resultCount, scrollPercent
    #[sea_orm(column_type = "Text", nullable)]
    pub metadata: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
