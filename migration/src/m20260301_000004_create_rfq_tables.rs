use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum RfqCategories {
    Table,
    Name,
    Description,
}

#[derive(DeriveIden)]
enum RfqCategoryItemGroups {
    Table,
    Category,
    ItemGroup,
}

/// Supplier questions on a tender and procurement's answers.
#[derive(DeriveIden)]
enum RfqQueries {
    Table,
    Id,
    TenderId,
    SupplierId,
    Question,
    Response,
    Status,
    CreatedAt,
    AnsweredAt,
}

#[derive(DeriveIden)]
enum Tenders {
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
                    .table(RfqCategories::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RfqCategories::Name)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RfqCategories::Description).text().null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RfqCategoryItemGroups::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(RfqCategoryItemGroups::Category).string().not_null())
                    .col(ColumnDef::new(RfqCategoryItemGroups::ItemGroup).string().not_null())
                    .primary_key(
                        Index::create()
                            .col(RfqCategoryItemGroups::Category)
                            .col(RfqCategoryItemGroups::ItemGroup),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfq_category_item_groups_category")
                            .from(RfqCategoryItemGroups::Table, RfqCategoryItemGroups::Category)
                            .to(RfqCategories::Table, RfqCategories::Name)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RfqQueries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(RfqQueries::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(RfqQueries::TenderId).uuid().not_null())
                    .col(ColumnDef::new(RfqQueries::SupplierId).uuid().not_null())
                    .col(ColumnDef::new(RfqQueries::Question).text().not_null())
                    .col(ColumnDef::new(RfqQueries::Response).text().null())
                    .col(
                        ColumnDef::new(RfqQueries::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(RfqQueries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RfqQueries::AnsweredAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfq_queries_tender_id")
                            .from(RfqQueries::Table, RfqQueries::TenderId)
                            .to(Tenders::Table, Tenders::Id)
                            .on_delete(ForeignKeyAction::Cascade)
                            .on_update(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_rfq_queries_supplier_id")
                            .from(RfqQueries::Table, RfqQueries::SupplierId)
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
            .drop_table(Table::drop().table(RfqQueries::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RfqCategoryItemGroups::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RfqCategories::Table).to_owned())
            .await
    }
}
