use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Persons {
    Table,
    Id,
    Rut,
    Name,
    Email,
    Phone,
    Address,
    Gender,
    BirthDate,
    PasswordHash,
    Roles,
    CreatedAt,
    UpdatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Persons::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Persons::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Persons::Rut)
                            .string_len(12)
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Persons::Name).string().not_null())
                    .col(ColumnDef::new(Persons::Email).string())
                    .col(ColumnDef::new(Persons::Phone).string())
                    .col(ColumnDef::new(Persons::Address).string())
                    .col(ColumnDef::new(Persons::Gender).string_len(20))
                    .col(ColumnDef::new(Persons::BirthDate).date())
                    .col(ColumnDef::new(Persons::PasswordHash).string())
                    .col(ColumnDef::new(Persons::Roles).string())
                    .col(
                        ColumnDef::new(Persons::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Persons::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_persons_rut")
                    .table(Persons::Table)
                    .col(Persons::Rut)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Persons::Table).to_owned())
            .await
    }
}
