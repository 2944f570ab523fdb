pub use sea_orm_migration::prelude::*;

mod m20250404_164039_create_task_table;
mod m20250405_091502_add_pending_index;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250404_164039_create_task_table::Migration),
            Box::new(m20250405_091502_add_pending_index::Migration),
        ]
    }
}
