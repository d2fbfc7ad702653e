use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum ComplaintTypes {
    Table,
    Id,
    Name,
    Area,
}

#[derive(DeriveIden)]
enum ComplaintStates {
    Table,
    Id,
    Label,
}

// Seed data. State ids are referenced by the transition table, so they
// are inserted with explicit ids.
const STATES: &[(i32, &str)] = &[
    (1, "Recibida"),
    (2, "En Revisión"),
    (3, "Derivada"),
    (4, "Admisible"),
    (5, "Inadmisible"),
    (6, "En Investigación"),
    (7, "Cerrada"),
];

const TYPES: &[(i32, &str, &str)] = &[
    (1, "Acoso sexual", "DIRGEGEN"),
    (2, "Violencia de género", "DIRGEGEN"),
    (3, "Discriminación", "DIRGEGEN"),
    (4, "Conflicto académico", "VRA"),
    (5, "Conducta docente", "VRA"),
    (6, "Convivencia estudiantil", "VRAE"),
    (7, "Otro", "VRAE"),
];

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(ComplaintTypes::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintTypes::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComplaintTypes::Name)
                            .string_len(100)
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(ComplaintTypes::Area)
                            .string_len(20)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(ComplaintStates::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(ComplaintStates::Id)
                            .integer()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(ComplaintStates::Label)
                            .string_len(50)
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        for (id, label) in STATES {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(ComplaintStates::Table)
                        .columns([ComplaintStates::Id, ComplaintStates::Label])
                        .values_panic([(*id).into(), (*label).into()])
                        .to_owned(),
                )
                .await?;
        }

        for (id, name, area) in TYPES {
            manager
                .exec_stmt(
                    Query::insert()
                        .into_table(ComplaintTypes::Table)
                        .columns([
                            ComplaintTypes::Id,
                            ComplaintTypes::Name,
                            ComplaintTypes::Area,
                        ])
                        .values_panic([(*id).into(), (*name).into(), (*area).into()])
                        .to_owned(),
                )
                .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(ComplaintStates::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(ComplaintTypes::Table).to_owned())
            .await
    }
}
