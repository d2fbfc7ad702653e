use crate::{
    error::{sentinel, AppError, AppResult},
    models::{
        complaint, complaint_state, complaint_type, evidence_file, participant, state_history,
        Complaint, ComplaintModel, ComplaintState, ComplaintStateModel, ComplaintType,
        ComplaintTypeModel, EvidenceFile, EvidenceFileModel, MeasureRequest, MeasureRequestModel,
        Participant, ParticipantModel, StateHistory, StateHistoryModel, TechnicalReport,
        TechnicalReportModel,
    },
    services::management::upsert_person_by_rut,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, TransactionTrait,
};

pub struct ComplaintService {
    db: DatabaseConnection,
}

/// One accused/witness entry from the intake form. Entries with neither
/// a name nor a RUT are dropped silently during creation.
#[derive(Debug, Clone, Default)]
pub struct ParticipantEntry {
    pub name: Option<String>,
    pub rut: Option<String>,
}

impl ParticipantEntry {
    fn cleaned(&self) -> Option<(Option<String>, Option<String>)> {
        let name = self
            .name
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        let rut = self
            .rut
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if name.is_none() && rut.is_none() {
            None
        } else {
            Some((name, rut))
        }
    }
}

#[derive(Debug, Clone)]
pub struct EvidenceEntry {
    pub object_key: String,
    pub original_name: String,
    pub content_type: String,
    pub size_bytes: i64,
}

#[derive(Debug, Clone)]
pub struct NewComplaint {
    /// None for anonymous reports.
    pub reporter_rut: Option<String>,
    pub reporter_name: Option<String>,
    pub type_id: i32,
    /// Defaults to Recibida when absent.
    pub initial_state_id: Option<i32>,
    pub incident_date: chrono::NaiveDate,
    pub narrative: String,
    pub location: Option<String>,
    pub accused: Vec<ParticipantEntry>,
    pub witnesses: Vec<ParticipantEntry>,
    pub evidence: Vec<EvidenceEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct ComplaintUpdate {
    pub incident_date: Option<chrono::NaiveDate>,
    pub narrative: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ComplaintFilter {
    pub state_id: Option<i32>,
    pub type_id: Option<i32>,
    pub area: Option<String>,
    pub reporter_person_id: Option<i32>,
}

/// Fully joined case view returned by create and get.
pub struct ComplaintDetail {
    pub complaint: ComplaintModel,
    pub complaint_type: ComplaintTypeModel,
    pub state: ComplaintStateModel,
    pub history: Vec<StateHistoryModel>,
    pub participants: Vec<ParticipantModel>,
    pub evidence: Vec<EvidenceFileModel>,
    pub measures: Vec<MeasureRequestModel>,
    pub technical_report: Option<TechnicalReportModel>,
}

impl ComplaintService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Create a complaint with its initial history row, participants and
    /// evidence in one transaction. No partial complaint is ever visible:
    /// any failing step rolls back the whole insert.
    pub async fn create(&self, input: NewComplaint) -> AppResult<ComplaintDetail> {
        let state_id = input
            .initial_state_id
            .unwrap_or(complaint_state::state::RECIBIDA);
        if !complaint_state::is_known_state(state_id) {
            return Err(AppError::Validation(sentinel::ESTADO_INVALIDO.to_string()));
        }

        ComplaintType::find_by_id(input.type_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation(sentinel::TIPO_INVALIDO.to_string()))?;

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), None)
            .await?;

        let reporter_person_id = match &input.reporter_rut {
            Some(raw) => {
                let person = upsert_person_by_rut(
                    &txn,
                    raw,
                    input.reporter_name.as_deref(),
                    None,
                    None,
                )
                .await?;
                Some(person.id)
            }
            None => None,
        };

        let now = chrono::Utc::now().naive_utc();
        let saved = complaint::ActiveModel {
            reporter_person_id: sea_orm::ActiveValue::Set(reporter_person_id),
            type_id: sea_orm::ActiveValue::Set(input.type_id),
            state_id: sea_orm::ActiveValue::Set(state_id),
            incident_date: sea_orm::ActiveValue::Set(input.incident_date),
            narrative: sea_orm::ActiveValue::Set(input.narrative.clone()),
            location: sea_orm::ActiveValue::Set(input.location.clone()),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        state_history::ActiveModel {
            complaint_id: sea_orm::ActiveValue::Set(saved.id),
            state_id: sea_orm::ActiveValue::Set(state_id),
            changed_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        for (entries, kind) in [
            (&input.accused, participant::kind::DENUNCIADO),
            (&input.witnesses, participant::kind::TESTIGO),
        ] {
            for entry in entries.iter() {
                let Some((name, rut)) = entry.cleaned() else {
                    continue;
                };
                participant::ActiveModel {
                    complaint_id: sea_orm::ActiveValue::Set(saved.id),
                    kind: sea_orm::ActiveValue::Set(kind.to_string()),
                    name: sea_orm::ActiveValue::Set(name),
                    rut: sea_orm::ActiveValue::Set(rut),
                    person_id: sea_orm::ActiveValue::Set(None),
                    ..Default::default()
                }
                .insert(&txn)
                .await?;
            }
        }

        for item in &input.evidence {
            evidence_file::ActiveModel {
                complaint_id: sea_orm::ActiveValue::Set(saved.id),
                object_key: sea_orm::ActiveValue::Set(item.object_key.clone()),
                original_name: sea_orm::ActiveValue::Set(item.original_name.clone()),
                content_type: sea_orm::ActiveValue::Set(item.content_type.clone()),
                size_bytes: sea_orm::ActiveValue::Set(item.size_bytes),
                uploaded_at: sea_orm::ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;

        self.get_detail(saved.id).await
    }

    pub async fn get_detail(&self, id: i32) -> AppResult<ComplaintDetail> {
        let complaint = self.get_by_id(id).await?;

        let complaint_type = ComplaintType::find_by_id(complaint.type_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation(sentinel::TIPO_INVALIDO.to_string()))?;
        let state = ComplaintState::find_by_id(complaint.state_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation(sentinel::ESTADO_INVALIDO.to_string()))?;

        let history = StateHistory::find()
            .filter(state_history::Column::ComplaintId.eq(id))
            .order_by_asc(state_history::Column::ChangedAt)
            .order_by_asc(state_history::Column::Id)
            .all(&self.db)
            .await?;
        let participants = Participant::find()
            .filter(participant::Column::ComplaintId.eq(id))
            .all(&self.db)
            .await?;
        let evidence = EvidenceFile::find()
            .filter(evidence_file::Column::ComplaintId.eq(id))
            .all(&self.db)
            .await?;
        let measures = MeasureRequest::find()
            .filter(crate::models::measure_request::Column::ComplaintId.eq(id))
            .all(&self.db)
            .await?;
        let technical_report = TechnicalReport::find()
            .filter(crate::models::technical_report::Column::ComplaintId.eq(id))
            .one(&self.db)
            .await?;

        Ok(ComplaintDetail {
            complaint,
            complaint_type,
            state,
            history,
            participants,
            evidence,
            measures,
            technical_report,
        })
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<ComplaintModel> {
        Complaint::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(sentinel::DENUNCIA_NO_ENCONTRADA.to_string()))
    }

    pub async fn list(
        &self,
        filter: ComplaintFilter,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<ComplaintModel>, u64)> {
        let mut query = Complaint::find();

        if let Some(state_id) = filter.state_id {
            query = query.filter(complaint::Column::StateId.eq(state_id));
        }
        if let Some(type_id) = filter.type_id {
            query = query.filter(complaint::Column::TypeId.eq(type_id));
        }
        if let Some(person_id) = filter.reporter_person_id {
            query = query.filter(complaint::Column::ReporterPersonId.eq(person_id));
        }
        if let Some(area) = &filter.area {
            // Area is an attribute of the type catalog.
            let type_ids: Vec<i32> = ComplaintType::find()
                .filter(complaint_type::Column::Area.eq(area))
                .select_only()
                .column(complaint_type::Column::Id)
                .into_tuple()
                .all(&self.db)
                .await?;
            query = query.filter(complaint::Column::TypeId.is_in(type_ids));
        }

        let paginator = query
            .order_by_desc(complaint::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn update(&self, id: i32, changes: ComplaintUpdate) -> AppResult<ComplaintModel> {
        let existing = self.get_by_id(id).await?;

        let mut active: complaint::ActiveModel = existing.into();
        if let Some(date) = changes.incident_date {
            active.incident_date = sea_orm::ActiveValue::Set(date);
        }
        if let Some(narrative) = changes.narrative {
            active.narrative = sea_orm::ActiveValue::Set(narrative);
        }
        if let Some(location) = changes.location {
            active.location = sea_orm::ActiveValue::Set(Some(location));
        }
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        Ok(active.update(&self.db).await?)
    }

    /// Apply a state change: legality is checked against the transition
    /// table, then the state column and a history row are written in one
    /// transaction.
    pub async fn change_state(
        &self,
        id: i32,
        new_state_id: i32,
        at: Option<chrono::NaiveDateTime>,
    ) -> AppResult<ComplaintModel> {
        if !complaint_state::is_known_state(new_state_id) {
            return Err(AppError::Validation(sentinel::ESTADO_INVALIDO.to_string()));
        }

        let existing = self.get_by_id(id).await?;

        if !complaint_state::is_transition_allowed(existing.state_id, new_state_id) {
            return Err(AppError::Validation(
                sentinel::TRANSICION_INVALIDA.to_string(),
            ));
        }

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), None)
            .await?;

        let changed_at = at.unwrap_or_else(|| chrono::Utc::now().naive_utc());

        let mut active: complaint::ActiveModel = existing.into();
        active.state_id = sea_orm::ActiveValue::Set(new_state_id);
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        state_history::ActiveModel {
            complaint_id: sea_orm::ActiveValue::Set(id),
            state_id: sea_orm::ActiveValue::Set(new_state_id),
            changed_at: sea_orm::ActiveValue::Set(changed_at),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        txn.commit().await?;
        Ok(updated)
    }

    /// Physical delete; children cascade at the schema level.
    pub async fn delete(&self, id: i32) -> AppResult<()> {
        let result = Complaint::delete_by_id(id).exec(&self.db).await?;
        if result.rows_affected == 0 {
            return Err(AppError::NotFound(
                sentinel::DENUNCIA_NO_ENCONTRADA.to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_participant_entry_is_dropped() {
        let entry = ParticipantEntry {
            name: Some("   ".to_string()),
            rut: None,
        };
        assert!(entry.cleaned().is_none());
    }

    #[test]
    fn name_only_entry_is_kept() {
        let entry = ParticipantEntry {
            name: Some("N.N. conocido como Pedro".to_string()),
            rut: None,
        };
        let (name, rut) = entry.cleaned().unwrap();
        assert!(name.is_some());
        assert!(rut.is_none());
    }

    #[test]
    fn rut_only_entry_is_kept() {
        let entry = ParticipantEntry {
            name: None,
            rut: Some("12345678-5".to_string()),
        };
        let (name, rut) = entry.cleaned().unwrap();
        assert!(name.is_none());
        assert_eq!(rut.as_deref(), Some("12345678-5"));
    }
}
