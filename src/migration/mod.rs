use sea_orm_migration::prelude::*;

mod m20240101_000001_create_persons_table;
mod m20240101_000002_create_catalog_tables;
mod m20240101_000003_create_complaints_table;
mod m20240101_000004_create_state_history_table;
mod m20240101_000005_create_participants_table;
mod m20240101_000006_create_evidence_files_table;
mod m20240101_000007_create_technical_reports_table;
mod m20240101_000008_create_measure_requests_table;
mod m20240101_000009_create_notifications_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_persons_table::Migration),
            Box::new(m20240101_000002_create_catalog_tables::Migration),
            Box::new(m20240101_000003_create_complaints_table::Migration),
            Box::new(m20240101_000004_create_state_history_table::Migration),
            Box::new(m20240101_000005_create_participants_table::Migration),
            Box::new(m20240101_000006_create_evidence_files_table::Migration),
            Box::new(m20240101_000007_create_technical_reports_table::Migration),
            Box::new(m20240101_000008_create_measure_requests_table::Migration),
            Box::new(m20240101_000009_create_notifications_table::Migration),
        ]
    }
}
