pub use sea_orm_migration::prelude::*;

pub mod entities;
mod m20260301_000001_shortcuts;
mod m20260301_000002_admin_keys;
mod m20260301_000003_usage_events;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_shortcuts::Migration),
            Box::new(m20260301_000002_admin_keys::Migration),
            Box::new(m20260301_000003_usage_events::Migration),
        ]
    }
}
