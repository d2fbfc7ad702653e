use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Complaints {
    Table,
    Id,
    ReporterPersonId,
    TypeId,
    StateId,
    IncidentDate,
    Narrative,
    Location,
    CreatedAt,
    UpdatedAt,
}

#[derive(DeriveIden)]
enum Persons {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ComplaintTypes {
    Table,
    Id,
}

#[derive(DeriveIden)]
enum ComplaintStates {
    Table,
    Id,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Complaints::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Complaints::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Complaints::ReporterPersonId).integer())
                    .col(ColumnDef::new(Complaints::TypeId).integer().not_null())
                    .col(ColumnDef::new(Complaints::StateId).integer().not_null())
                    .col(ColumnDef::new(Complaints::IncidentDate).date().not_null())
                    .col(ColumnDef::new(Complaints::Narrative).text().not_null())
                    .col(ColumnDef::new(Complaints::Location).string())
                    .col(
                        ColumnDef::new(Complaints::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(Complaints::UpdatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaints_reporter")
                            .from(Complaints::Table, Complaints::ReporterPersonId)
                            .to(Persons::Table, Persons::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaints_type")
                            .from(Complaints::Table, Complaints::TypeId)
                            .to(ComplaintTypes::Table, ComplaintTypes::Id),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_complaints_state")
                            .from(Complaints::Table, Complaints::StateId)
                            .to(ComplaintStates::Table, ComplaintStates::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaints_state")
                    .table(Complaints::Table)
                    .col(Complaints::StateId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_complaints_type")
                    .table(Complaints::Table)
                    .col(Complaints::TypeId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Complaints::Table).to_owned())
            .await
    }
}
