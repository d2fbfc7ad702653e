use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum MeasureRequests {
    Table,
    Id,
    ComplaintId,
    RequesterPersonId,
    MeasureType,
    Reason,
    Status,
    CreatedAt,
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
                    .table(MeasureRequests::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(MeasureRequests::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(MeasureRequests::ComplaintId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeasureRequests::RequesterPersonId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeasureRequests::MeasureType)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(ColumnDef::new(MeasureRequests::Reason).text().not_null())
                    .col(
                        ColumnDef::new(MeasureRequests::Status)
                            .string_len(50)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(MeasureRequests::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_measure_requests_complaint")
                            .from(MeasureRequests::Table, MeasureRequests::ComplaintId)
                            .to(Complaints::Table, Complaints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_measure_requests_requester")
                            .from(MeasureRequests::Table, MeasureRequests::RequesterPersonId)
                            .to(Persons::Table, Persons::Id),
                    )
                    .to_owned(),
            )
            .await?;

        // The Dirgegen worklist filters on status.
        manager
            .create_index(
                Index::create()
                    .name("idx_measure_requests_status")
                    .table(MeasureRequests::Table)
                    .col(MeasureRequests::Status)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(MeasureRequests::Table).to_owned())
            .await
    }
}
