//! Usage event entity, one row per successful resolve

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "usage_events")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub shortcut_id: Uuid,
    pub occurred_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::shortcut::Entity",
        from = "Column::ShortcutId",
        to = "super::shortcut::Column::Id"
    )]
    Shortcut,
}

impl Related<super::shortcut::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Shortcut.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
