use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// The case record. reporter_person_id is null for anonymous reports.
/// Deletes are physical; there is no soft-delete flag.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "complaints")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub reporter_person_id: Option<i32>,
    pub type_id: i32,
    pub state_id: i32,
    pub incident_date: Date,
    #[sea_orm(column_type = "Text")]
    pub narrative: String,
    pub location: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::ReporterPersonId",
        to = "super::person::Column::Id"
    )]
    Reporter,
    #[sea_orm(
        belongs_to = "super::complaint_type::Entity",
        from = "Column::TypeId",
        to = "super::complaint_type::Column::Id"
    )]
    Type,
    #[sea_orm(
        belongs_to = "super::complaint_state::Entity",
        from = "Column::StateId",
        to = "super::complaint_state::Column::Id"
    )]
    State,
    #[sea_orm(has_many = "super::state_history::Entity")]
    StateHistory,
    #[sea_orm(has_many = "super::participant::Entity")]
    Participants,
    #[sea_orm(has_many = "super::evidence_file::Entity")]
    EvidenceFiles,
    #[sea_orm(has_many = "super::measure_request::Entity")]
    MeasureRequests,
    #[sea_orm(has_one = "super::technical_report::Entity")]
    TechnicalReport,
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reporter.def()
    }
}

impl Related<super::complaint_type::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Type.def()
    }
}

impl Related<super::complaint_state::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::State.def()
    }
}

impl Related<super::state_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StateHistory.def()
    }
}

impl Related<super::participant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Participants.def()
    }
}

impl Related<super::evidence_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::EvidenceFiles.def()
    }
}

impl Related<super::measure_request::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MeasureRequests.def()
    }
}

impl Related<super::technical_report::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TechnicalReport.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
