use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Tenders {
    Table,
    PublishedOnWebsite,
    CreatedAt,
}

#[derive(DeriveIden)]
enum TenderItems {
    Table,
    TenderId,
    Idx,
}

#[derive(DeriveIden)]
enum TenderSuppliers {
    Table,
    SupplierId,
}

#[derive(DeriveIden)]
enum Bids {
    Table,
    TenderId,
    SupplierId,
    DocStatus,
    GrandTotal,
}

#[derive(DeriveIden)]
enum RfqQueries {
    Table,
    TenderId,
    SupplierId,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Status sweep and public listing filter on the published flag
        manager
            .create_index(
                Index::create()
                    .name("idx_tenders_published_created")
                    .table(Tenders::Table)
                    .col(Tenders::PublishedOnWebsite)
                    .col(Tenders::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_tender_items_tender_idx")
                    .table(TenderItems::Table)
                    .col(TenderItems::TenderId)
                    .col(TenderItems::Idx)
                    .to_owned(),
            )
            .await?;

        // Supplier-side visibility looks invitations up by supplier
        manager
            .create_index(
                Index::create()
                    .name("idx_tender_suppliers_supplier_id")
                    .table(TenderSuppliers::Table)
                    .col(TenderSuppliers::SupplierId)
                    .to_owned(),
            )
            .await?;

        // Lowest submitted bid per tender
        manager
            .create_index(
                Index::create()
                    .name("idx_bids_tender_status_total")
                    .table(Bids::Table)
                    .col(Bids::TenderId)
                    .col(Bids::DocStatus)
                    .col(Bids::GrandTotal)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_bids_supplier_id")
                    .table(Bids::Table)
                    .col(Bids::SupplierId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_rfq_queries_tender_supplier")
                    .table(RfqQueries::Table)
                    .col(RfqQueries::TenderId)
                    .col(RfqQueries::SupplierId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name("idx_rfq_queries_tender_supplier")
                    .table(RfqQueries::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_bids_supplier_id")
                    .table(Bids::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_bids_tender_status_total")
                    .table(Bids::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_tender_suppliers_supplier_id")
                    .table(TenderSuppliers::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_tender_items_tender_idx")
                    .table(TenderItems::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .drop_index(
                Index::drop()
                    .name("idx_tenders_published_created")
                    .table(Tenders::Table)
                    .to_owned(),
            )
            .await
    }
}
