//! Shortcut entity: one shortened URL.
//!
//! `deleted_at` is the persisted form of the soft-delete state; at most one
//! row with `deleted_at IS NULL` may hold a given `short_code`.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "shortcuts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub full_url: String,
    pub short_code: String,
    pub usage_count: i64,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
    pub deleted_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::usage_event::Entity")]
    UsageEvent,
}

impl Related<super::usage_event::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::UsageEvent.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
