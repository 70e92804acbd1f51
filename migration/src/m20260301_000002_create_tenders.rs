use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Tenders {
    Table,
    Id,
    OwnerId,
    RfqSubject,
    RfqDescription,
    Category,
    PublishedOnWebsite,
    PublishDate,
    SubmissionDeadline,
    Status,
    DocStatus,
    LiveBiddingEnabled,
    MinBidDecrement,
    TotalBudget,
    TotalQuantity,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum TenderItems {
    Table,
    Id,
    TenderId,
    Idx,
    ItemCode,
    Qty,
    Uom,
    UnitBudget,
    ConversionFactor,
    BudgetAmount,
    BudgetAsStockUom,
}

/// Invite list for tenders that are not published on the website.
#[derive(DeriveIden)]
enum TenderSuppliers {
    Table,
    TenderId,
    SupplierId,
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Suppliers {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Tenders::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Tenders::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Tenders::OwnerId).uuid().not_null())
                    .col(ColumnDef::new(Tenders::RfqSubject).string().null())
                    .col(ColumnDef::new(Tenders::RfqDescription).text().null())
                    .col(ColumnDef::new(Tenders::Category).string().null())
                    .col(
                        ColumnDef::new(Tenders::PublishedOnWebsite)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(Tenders::PublishDate)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Tenders::SubmissionDeadline)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(Tenders::Status)
                            .string()
                            .not_null()
                            .default("active"),
                    )
                    .col(
                        ColumnDef::new(Tenders::DocStatus)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tenders::LiveBiddingEnabled)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(Tenders::MinBidDecrement).decimal_len(18, 4).null())
                    .col(
                        ColumnDef::new(Tenders::TotalBudget)
                            .decimal_len(18, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tenders::TotalQuantity)
                            .decimal_len(18, 4)
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(Tenders::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Tenders::UpdatedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tenders_owner_id")
                            .from(Tenders::Table, Tenders::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Restrict)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TenderItems::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TenderItems::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(TenderItems::TenderId).uuid().not_null())
                    .col(ColumnDef::new(TenderItems::Idx).integer().not_null())
                    .col(ColumnDef::new(TenderItems::ItemCode).string().not_null())
                    .col(ColumnDef::new(TenderItems::Qty).decimal_len(18, 4).null())
                    .col(ColumnDef::new(TenderItems::Uom).string().null())
                    .col(ColumnDef::new(TenderItems::UnitBudget).decimal_len(18, 4).null())
                    .col(
                        ColumnDef::new(TenderItems::ConversionFactor)
                            .decimal_len(18, 6)
                            .null(),
                    )
                    .col(ColumnDef::new(TenderItems::BudgetAmount).decimal_len(18, 4).null())
                    .col(
                        ColumnDef::new(TenderItems::BudgetAsStockUom)
                            .decimal_len(18, 4)
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tender_items_tender_id")
                            .from(TenderItems::Table, TenderItems::TenderId)
                            .to(Tenders::Table, Tenders::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(TenderSuppliers::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(TenderSuppliers::TenderId).uuid().not_null())
                    .col(ColumnDef::new(TenderSuppliers::SupplierId).uuid().not_null())
                    .primary_key(
                        Index::create()
                            .col(TenderSuppliers::TenderId)
                            .col(TenderSuppliers::SupplierId),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tender_suppliers_tender_id")
                            .from(TenderSuppliers::Table, TenderSuppliers::TenderId)
                            .to(Tenders::Table, Tenders::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_tender_suppliers_supplier_id")
                            .from(TenderSuppliers::Table, TenderSuppliers::SupplierId)
                            .to(Suppliers::Table, Suppliers::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TenderSuppliers::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(TenderItems::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Tenders::Table).to_owned())
            .await
    }
}
