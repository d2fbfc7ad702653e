use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Participants {
    Table,
    Id,
    ComplaintId,
    Kind,
    Name,
    Rut,
    PersonId,
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
                    .table(Participants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Participants::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Participants::ComplaintId)
                            .integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Participants::Kind)
                            .string_len(20)
                            .not_null(),
                    )
                    .col(ColumnDef::new(Participants::Name).string())
                    .col(ColumnDef::new(Participants::Rut).string_len(12))
                    .col(ColumnDef::new(Participants::PersonId).integer())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_complaint")
                            .from(Participants::Table, Participants::ComplaintId)
                            .to(Complaints::Table, Complaints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_participants_person")
                            .from(Participants::Table, Participants::PersonId)
                            .to(Persons::Table, Persons::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_participants_complaint")
                    .table(Participants::Table)
                    .col(Participants::ComplaintId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Participants::Table).to_owned())
            .await
    }
}
