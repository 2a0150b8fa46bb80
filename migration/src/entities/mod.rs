pub mod admin_key;
pub mod error_log;
pub mod shortcut;
pub mod usage_event;

pub use admin_key::Entity as AdminKeyEntity;
pub use error_log::Entity as ErrorLogEntity;
pub use shortcut::Entity as ShortcutEntity;
pub use usage_event::Entity as UsageEventEntity;
