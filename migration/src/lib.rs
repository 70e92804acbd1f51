pub use sea_orm_migration::prelude::*;

mod m20260301_000001_create_users_and_suppliers;
mod m20260301_000002_create_tenders;
mod m20260301_000003_create_bids;
mod m20260301_000004_create_rfq_tables;
mod m20260301_000005_add_indexes;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260301_000001_create_users_and_suppliers::Migration),
            Box::new(m20260301_000002_create_tenders::Migration),
            Box::new(m20260301_000003_create_bids::Migration),
            Box::new(m20260301_000004_create_rfq_tables::Migration),
            Box::new(m20260301_000005_add_indexes::Migration),
        ]
    }
}
