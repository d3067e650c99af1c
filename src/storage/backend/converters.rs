use std::str::FromStr;

use tracing::warn;

use crate::analytics::{EventRecord, EventType, Metadata, NewEvent, SessionRecord, UserRecord};
use migration::entities::{event, session, user};

/// 解析 metadata 列；无法解析时记录警告并按空 metadata 处理
fn parse_metadata(owner: &str, text: Option<&str>) -> Metadata {
    Metadata::from_json_text(text).unwrap_or_else(|e| {
        warn!("Ignoring malformed metadata on {}: {}", owner, e);
        Metadata::new()
    })
}

/// 将 Sea-ORM Model 转换为 UserRecord
pub fn user_from_model(model: user::Model) -> UserRecord {
    let metadata = parse_metadata(&model.user_id, model.metadata.as_deref());
    UserRecord {
        user_id: model.user_id,
        created_at: model.created_at,
        last_active_at: model.last_active_at,
        fname: model.fname,
        lname: model.lname,
        age: model.age,
        country: model.country,
        language: model.language,
        metadata,
    }
}

/// 将 Sea-ORM Model 转换为 SessionRecord
pub fn session_from_model(model: session::Model) -> SessionRecord {
    let metadata = parse_metadata(&model.session_id, model.metadata.as_deref());
    SessionRecord {
        session_id: model.session_id,
        user_id: model.user_id,
        started_at: model.started_at,
        last_activity_at: model.last_activity_at,
        ended_at: model.ended_at,
        metadata,
    }
}

/// 将 Sea-ORM Model 转换为 EventRecord
///
/// 未知的 event_type 无法参与任何计算，返回 `None` 并记录警告。
pub fn event_from_model(model: event::Model) -> Option<EventRecord> {
    let event_type = match EventType::from_str(&model.event_type) {
        Ok(t) => t,
        Err(_) => {
            warn!(
                "Skipping event {} with unknown event_type '{}'",
                model.id, model.event_type
            );
            return None;
        }
    };
    let metadata = parse_metadata(&format!("event {}", model.id), model.metadata.as_deref());

    Some(EventRecord {
        id: model.id,
        user_id: model.user_id,
        session_id: model.session_id,
        event_type,
        page: model.page,
        timestamp: model.timestamp,
        metadata,
    })
}

/// 将 NewEvent 转换为 ActiveModel（id 由数据库分配）
pub fn new_event_to_active_model(event: NewEvent) -> event::ActiveModel {
    use sea_orm::ActiveValue::*;

    event::ActiveModel {
        id: NotSet,
        user_id: Set(event.user_id),
        session_id: Set(event.session_id),
        event_type: Set(event.event_type.to_string()),
        page: Set(event.page),
        timestamp: Set(event.timestamp),
        metadata: Set(event.metadata.to_json_text()),
    }
}

pub fn user_to_active_model(record: &UserRecord) -> user::ActiveModel {
    use sea_orm::ActiveValue::*;

    user::ActiveModel {
        user_id: Set(record.user_id.clone()),
        created_at: Set(record.created_at),
        last_active_at: Set(record.last_active_at),
        fname: Set(record.fname.clone()),
        lname: Set(record.lname.clone()),
        age: Set(record.age),
        country: Set(record.country.clone()),
        language: Set(record.language.clone()),
        metadata: Set(record.metadata.to_json_text()),
    }
}

pub fn session_to_active_model(record: &SessionRecord) -> session::ActiveModel {
    use sea_orm::ActiveValue::*;

    session::ActiveModel {
        session_id: Set(record.session_id.clone()),
        user_id: Set(record.user_id.clone()),
        started_at: Set(record.started_at),
        last_activity_at: Set(record.last_activity_at),
        ended_at: Set(record.ended_at),
        metadata: Set(record.metadata.to_json_text()),
    }
}
