use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};
use uuid::Uuid;

/// Soft-delete state of a shortcut record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "lowercase")]
pub enum RecordState {
    Active,
    Deleted {
        #[serde(rename = "deleted_at")]
        at: DateTime<Utc>,
    },
}

impl RecordState {
    pub fn from_deleted_at(deleted_at: Option<DateTime<Utc>>) -> Self {
        match deleted_at {
            None => RecordState::Active,
            Some(at) => RecordState::Deleted { at },
        }
    }

    pub fn deleted_at(&self) -> Option<DateTime<Utc>> {
        match self {
            RecordState::Active => None,
            RecordState::Deleted { at } => Some(*at),
        }
    }

    pub fn is_active(&self) -> bool {
        matches!(self, RecordState::Active)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutRecord {
    pub id: Uuid,
    pub full_url: String,
    pub short_code: String,
    pub usage_count: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(flatten)]
    pub state: RecordState,
}

/// Partial update; `None` leaves the stored value unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub full_url: Option<String>,
    pub short_code: Option<String>,
}

impl RecordPatch {
    pub fn full_url(mut self, full_url: impl Into<String>) -> Self {
        self.full_url = Some(full_url.into());
        self
    }

    pub fn short_code(mut self, short_code: impl Into<String>) -> Self {
        self.short_code = Some(short_code.into());
        self
    }

    /// Lower-cases supplied fields; empty strings count as not supplied.
    pub fn normalized(self) -> Self {
        Self {
            full_url: self.full_url.and_then(normalize_field),
            short_code: self.short_code.and_then(normalize_field),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.full_url.is_none() && self.short_code.is_none()
    }
}

/// Trim + lower-case; `None` when nothing is left.
pub fn normalize_field(value: String) -> Option<String> {
    let value = value.trim().to_lowercase();
    (!value.is_empty()).then_some(value)
}

/// 可排序字段白名单
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, EnumIter, AsRefStr)]
#[strum(serialize_all = "lowercase")]
pub enum SortKey {
    #[default]
    Id,
    Full,
    Short,
    Usage,
    Created,
    Updated,
}

impl SortKey {
    /// Unknown values silently fall back to the default key.
    pub fn parse_or_default(value: &str) -> Self {
        let value = value.trim();
        SortKey::iter()
            .find(|key| key.as_ref().eq_ignore_ascii_case(value))
            .unwrap_or_default()
    }
}

pub const DEFAULT_PAGE_SIZE: u64 = 20;
pub const MAX_PAGE_SIZE: u64 = 100;

/// Listing window. Pages are 1-indexed; a page past the end is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub sort: SortKey,
    pub page: u64,
    pub page_size: u64,
}

impl PageRequest {
    pub fn new(sort: &str, page: u64, page_size: u64) -> Self {
        Self {
            sort: SortKey::parse_or_default(sort),
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            sort: SortKey::default(),
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UsageEvent {
    pub id: i64,
    pub shortcut_id: Uuid,
    pub occurred_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorLogEntry {
    pub id: i64,
    pub message: String,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShortcutStats {
    pub active_records: u64,
    pub total_usage: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sort_key_whitelist() {
        assert_eq!(SortKey::parse_or_default("usage"), SortKey::Usage);
        assert_eq!(SortKey::parse_or_default("Created"), SortKey::Created);
        assert_eq!(SortKey::parse_or_default(" short "), SortKey::Short);
        assert_eq!(SortKey::parse_or_default("full"), SortKey::Full);
    }

    #[test]
    fn test_sort_key_falls_back_to_default() {
        assert_eq!(SortKey::parse_or_default("password"), SortKey::Id);
        assert_eq!(SortKey::parse_or_default(""), SortKey::Id);
        assert_eq!(SortKey::parse_or_default("id; DROP TABLE shortcuts"), SortKey::Id);
    }

    #[test]
    fn test_page_request_bounds() {
        let page = PageRequest::new("updated", 0, 0);
        assert_eq!(page.sort, SortKey::Updated);
        assert_eq!(page.page, 1);
        assert_eq!(page.page_size, 1);

        let page = PageRequest::new("nope", 3, 10_000);
        assert_eq!(page.sort, SortKey::Id);
        assert_eq!(page.page, 3);
        assert_eq!(page.page_size, MAX_PAGE_SIZE);
    }

    #[test]
    fn test_patch_normalization() {
        let patch = RecordPatch::default()
            .full_url("  HTTPS://Example.com/A ")
            .short_code("")
            .normalized();
        assert_eq!(patch.full_url.as_deref(), Some("https://example.com/a"));
        assert_eq!(patch.short_code, None);
        assert!(!patch.is_empty());
        assert!(RecordPatch::default().normalized().is_empty());
    }

    #[test]
    fn test_record_state_conversions() {
        let now = Utc::now();
        assert_eq!(RecordState::from_deleted_at(None), RecordState::Active);
        let deleted = RecordState::from_deleted_at(Some(now));
        assert_eq!(deleted.deleted_at(), Some(now));
        assert!(!deleted.is_active());
        assert!(RecordState::Active.is_active());
    }
}
