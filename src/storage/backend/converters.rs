use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::storage::models::{ErrorLogEntry, RecordState, ShortcutRecord, UsageEvent};
use migration::entities::{error_log, shortcut, usage_event};

/// 将 Sea-ORM Model 转换为 ShortcutRecord（deleted_at -> RecordState）
pub fn model_to_record(model: shortcut::Model) -> ShortcutRecord {
    ShortcutRecord {
        id: model.id,
        full_url: model.full_url,
        short_code: model.short_code,
        usage_count: model.usage_count.max(0) as u64,
        created_at: model.created_at,
        updated_at: model.updated_at,
        state: RecordState::from_deleted_at(model.deleted_at),
    }
}

/// 新建记录的 ActiveModel；调用方负责规范化 full/short
pub fn new_active_model(
    id: Uuid,
    full_url: String,
    short_code: String,
    now: DateTime<Utc>,
) -> shortcut::ActiveModel {
    use sea_orm::ActiveValue::*;

    shortcut::ActiveModel {
        id: Set(id),
        full_url: Set(full_url),
        short_code: Set(short_code),
        usage_count: Set(0),
        created_at: Set(now),
        updated_at: Set(now),
        deleted_at: Set(None),
    }
}

pub fn model_to_usage_event(model: usage_event::Model) -> UsageEvent {
    UsageEvent {
        id: model.id,
        shortcut_id: model.shortcut_id,
        occurred_at: model.occurred_at,
    }
}

pub fn model_to_error_log(model: error_log::Model) -> ErrorLogEntry {
    ErrorLogEntry {
        id: model.id,
        message: model.message,
        logged_at: model.logged_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    fn model(deleted_at: Option<DateTime<Utc>>, usage_count: i64) -> shortcut::Model {
        let now = Utc::now();
        shortcut::Model {
            id: Uuid::new_v4(),
            full_url: "https://example.com".to_string(),
            short_code: "ex1".to_string(),
            usage_count,
            created_at: now,
            updated_at: now,
            deleted_at,
        }
    }

    #[test]
    fn test_model_to_record_active() {
        let m = model(None, 7);
        let id = m.id;
        let record = model_to_record(m);
        assert_eq!(record.id, id);
        assert_eq!(record.short_code, "ex1");
        assert_eq!(record.usage_count, 7);
        assert_eq!(record.state, RecordState::Active);
    }

    #[test]
    fn test_model_to_record_deleted() {
        let at = Utc::now();
        let record = model_to_record(model(Some(at), 0));
        assert_eq!(record.state, RecordState::Deleted { at });
    }

    #[test]
    fn test_negative_usage_count_clamped() {
        let record = model_to_record(model(None, -3));
        assert_eq!(record.usage_count, 0);
    }

    #[test]
    fn test_new_active_model() {
        let id = Uuid::new_v4();
        let now = Utc::now();
        let am = new_active_model(id, "https://a.com".into(), "a".into(), now);

        assert_eq!(am.id, ActiveValue::Set(id));
        assert_eq!(am.usage_count, ActiveValue::Set(0));
        assert_eq!(am.created_at, ActiveValue::Set(now));
        assert_eq!(am.updated_at, ActiveValue::Set(now));
        assert_eq!(am.deleted_at, ActiveValue::Set(None));
    }
}
