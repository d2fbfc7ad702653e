use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Accused person or witness attached to a complaint. Captured as
/// free-text name/rut when the submitter does not know the legal
/// identity; person_id is filled in by the identification workflow.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "participants")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub complaint_id: i32,
    /// "denunciado" or "testigo".
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub kind: String,
    pub name: Option<String>,
    #[sea_orm(column_type = "String(StringLen::N(12))", nullable)]
    pub rut: Option<String>,
    pub person_id: Option<i32>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::complaint::Entity",
        from = "Column::ComplaintId",
        to = "super::complaint::Column::Id"
    )]
    Complaint,
    #[sea_orm(
        belongs_to = "super::person::Entity",
        from = "Column::PersonId",
        to = "super::person::Column::Id"
    )]
    Person,
}

impl Related<super::complaint::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Complaint.def()
    }
}

impl Related<super::person::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Person.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

pub mod kind {
    pub const DENUNCIADO: &str = "denunciado";
    pub const TESTIGO: &str = "testigo";
}
