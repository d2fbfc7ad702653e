use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum StateHistory {
    Table,
    Id,
    ComplaintId,
    StateId,
    ChangedAt,
}

#[derive(DeriveIden)]
enum Complaints {
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
                    .table(StateHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StateHistory::Id)
                            .integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StateHistory::ComplaintId)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(StateHistory::StateId).integer().not_null())
                    .col(
                        ColumnDef::new(StateHistory::ChangedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_state_history_complaint")
                            .from(StateHistory::Table, StateHistory::ComplaintId)
                            .to(Complaints::Table, Complaints::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_state_history_state")
                            .from(StateHistory::Table, StateHistory::StateId)
                            .to(ComplaintStates::Table, ComplaintStates::Id),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_state_history_complaint")
                    .table(StateHistory::Table)
                    .col(StateHistory::ComplaintId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(StateHistory::Table).to_owned())
            .await
    }
}
