use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum TechnicalReports {
    Table,
    Id,
    ComplaintId,
    AuthorPersonId,
    Facts,
    Analysis,
    Conclusion,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Complaints {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Persons {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(TechnicalReports::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(TechnicalReports::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    // Unique: one report per complaint, enforced by the schema.
                    .col(
                        ColumnDef::new(TechnicalReports::ComplaintId)
                            .integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(
                        ColumnDef::new(TechnicalReports::AuthorPersonId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(TechnicalReports::Facts).text().not_null())
                    .col(
                        ColumnDef::new(TechnicalReports::Analysis)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TechnicalReports::Conclusion)
                            .text()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(TechnicalReports::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(TechnicalReports::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_technical_reports_complaint")
                            .from(TechnicalReports::Table, TechnicalReports::ComplaintId)
                            .to(Complaints::Table, Complaints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_technical_reports_author")
                            .from(TechnicalReports::Table, TechnicalReports::AuthorPersonId)
                            .to(Persons::Table, Persons::Id),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(TechnicalReports::Table).to_owned())
            .await
    }
}
