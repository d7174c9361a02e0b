use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(
            m20240301_000001_create_product_catalog_table::Migration,
        )]
    }
}

// Migration implementations

mod m20240301_000001_create_product_catalog_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240301_000001_create_product_catalog_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Create product_catalog table aligned with entities::product Model
            manager
                .create_table(
                    Table::create()
                        .table(ProductCatalog::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductCatalog::Id)
                                .big_integer()
                                .not_null()
                                .auto_increment()
                                .primary_key(),
                        )
                        .col(
                            ColumnDef::new(ProductCatalog::Index)
                                .big_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductCatalog::Product).string().not_null())
                        .col(ColumnDef::new(ProductCatalog::Category).string().not_null())
                        .col(
                            ColumnDef::new(ProductCatalog::SubCategory)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductCatalog::Brand).string().not_null())
                        .col(
                            ColumnDef::new(ProductCatalog::SalePrice)
                                .double()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductCatalog::MarketPrice)
                                .double()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductCatalog::Type).string().not_null())
                        .col(ColumnDef::new(ProductCatalog::Rating).double().not_null())
                        .col(
                            ColumnDef::new(ProductCatalog::Description)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductCatalog::SalePriceEuro)
                                .double()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ProductCatalog::MarketPriceEuro)
                                .double()
                                .null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            // Drop product_catalog table
            manager
                .drop_table(Table::drop().table(ProductCatalog::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductCatalog {
        Table,
        Id,
        Index,
        Product,
        Category,
        SubCategory,
        Brand,
        SalePrice,
        MarketPrice,
        Type,
        Rating,
        Description,
        SalePriceEuro,
        MarketPriceEuro,
    }
}
