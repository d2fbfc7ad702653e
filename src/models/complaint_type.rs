use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog of complaint types and the administrative area that reviews
/// them. Seeded at migration time.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "complaint_types")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(100))")]
    pub name: String,
    /// Review unit: DIRGEGEN, VRA or VRAE.
    #[sea_orm(column_type = "String(StringLen::N(20))")]
    pub area: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::complaint::Entity")]
    Complaints,
}

impl ActiveModelBehavior for ActiveModel {}

pub mod area {
    pub const DIRGEGEN: &str = "DIRGEGEN";
    pub const VRA: &str = "VRA";
    pub const VRAE: &str = "VRAE";

    pub const ALL: &[&str] = &[DIRGEGEN, VRA, VRAE];
}
