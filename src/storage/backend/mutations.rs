//! Mutation operations for SeaOrmStorage
//!
//! This module contains all write database operations. Only event ingestion
//! is exposed through the store trait; users and sessions are written by
//! seeding tools and tests.

use sea_orm::EntityTrait;
use tracing::info;

use super::SeaOrmStorage;
use super::converters::{new_event_to_active_model, session_to_active_model, user_to_active_model};
use crate::analytics::{NewEvent, SessionRecord, UserRecord};
use crate::errors::{AnalyticsError, Result};

use migration::entities::{event, session, user};

impl SeaOrmStorage {
    pub(super) async fn append_event(&self, new_event: NewEvent) -> Result<i64> {
        let session_id = new_event.session_id.clone();
        let event_type = new_event.event_type;

        let result = event::Entity::insert(new_event_to_active_model(new_event))
            .exec(&self.db)
            .await
            .map_err(|e| AnalyticsError::store_unavailable(format!("insert_event failed: {}", e)))?;

        info!(
            "Event {} ({}) recorded for session {}",
            result.last_insert_id, event_type, session_id
        );
        Ok(result.last_insert_id)
    }

    pub async fn insert_user(&self, record: &UserRecord) -> Result<()> {
        user::Entity::insert(user_to_active_model(record))
            .exec(&self.db)
            .await
            .map_err(|e| AnalyticsError::store_unavailable(format!("insert_user failed: {}", e)))?;
        Ok(())
    }

    pub async fn insert_session(&self, record: &SessionRecord) -> Result<()> {
        session::Entity::insert(session_to_active_model(record))
            .exec(&self.db)
            .await
            .map_err(|e| {
                AnalyticsError::store_unavailable(format!("insert_session failed: {}", e))
            })?;
        Ok(())
    }
}
