use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Catalog of lifecycle states, seeded in lifecycle order.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize, ToSchema)]
#[sea_orm(table_name = "complaint_states")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(column_type = "String(StringLen::N(50))")]
    pub label: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::complaint::Entity")]
    Complaints,
}

impl ActiveModelBehavior for ActiveModel {}

/// Seeded state ids. The ids are stable because the seed migration
/// inserts them explicitly.
pub mod state {
    pub const RECIBIDA: i32 = 1;
    pub const EN_REVISION: i32 = 2;
    pub const DERIVADA: i32 = 3;
    pub const ADMISIBLE: i32 = 4;
    pub const INADMISIBLE: i32 = 5;
    pub const EN_INVESTIGACION: i32 = 6;
    pub const CERRADA: i32 = 7;

    pub const ALL: &[(i32, &str)] = &[
        (RECIBIDA, "Recibida"),
        (EN_REVISION, "En Revisión"),
        (DERIVADA, "Derivada"),
        (ADMISIBLE, "Admisible"),
        (INADMISIBLE, "Inadmisible"),
        (EN_INVESTIGACION, "En Investigación"),
        (CERRADA, "Cerrada"),
    ];
}

/// Explicit transition table for the state-change operation. Cerrada is
/// terminal: no transition leaves it. Derivation and technical-report
/// filing write state outside this table.
pub fn is_transition_allowed(from: i32, to: i32) -> bool {
    use state::*;
    matches!(
        (from, to),
        (RECIBIDA, EN_REVISION)
            | (EN_REVISION, DERIVADA)
            | (EN_REVISION, ADMISIBLE)
            | (EN_REVISION, INADMISIBLE)
            | (DERIVADA, EN_REVISION)
            | (DERIVADA, ADMISIBLE)
            | (DERIVADA, INADMISIBLE)
            | (ADMISIBLE, EN_INVESTIGACION)
            | (INADMISIBLE, CERRADA)
            | (EN_INVESTIGACION, CERRADA)
    )
}

pub fn is_known_state(id: i32) -> bool {
    state::ALL.iter().any(|(sid, _)| *sid == id)
}

#[cfg(test)]
mod tests {
    use super::state::*;
    use super::*;

    #[test]
    fn received_only_moves_to_review() {
        assert!(is_transition_allowed(RECIBIDA, EN_REVISION));
        assert!(!is_transition_allowed(RECIBIDA, CERRADA));
        assert!(!is_transition_allowed(RECIBIDA, ADMISIBLE));
    }

    #[test]
    fn review_branches() {
        assert!(is_transition_allowed(EN_REVISION, DERIVADA));
        assert!(is_transition_allowed(EN_REVISION, ADMISIBLE));
        assert!(is_transition_allowed(EN_REVISION, INADMISIBLE));
        assert!(!is_transition_allowed(EN_REVISION, EN_INVESTIGACION));
    }

    #[test]
    fn derived_can_return_to_review() {
        assert!(is_transition_allowed(DERIVADA, EN_REVISION));
    }

    #[test]
    fn closed_is_terminal() {
        for (to, _) in ALL {
            assert!(!is_transition_allowed(CERRADA, *to));
        }
    }

    #[test]
    fn self_transition_rejected() {
        for (id, _) in ALL {
            assert!(!is_transition_allowed(*id, *id));
        }
    }

    #[test]
    fn known_states() {
        assert!(is_known_state(RECIBIDA));
        assert!(is_known_state(CERRADA));
        assert!(!is_known_state(0));
        assert!(!is_known_state(99));
    }
}
