use crate::{
    error::{sentinel, AppError, AppResult},
    models::{
        complaint, participant, person, ComplaintModel, ComplaintState, ComplaintType,
        Participant, ParticipantModel, Person, PersonModel,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    IsolationLevel, QueryFilter, TransactionTrait,
};

/// Find-or-create a person by normalized RUT, updating any provided
/// contact fields on the existing row. Persons are never deleted, so
/// repeated identification with the same RUT always lands on one row.
pub async fn upsert_person_by_rut<C: ConnectionTrait>(
    conn: &C,
    raw_rut: &str,
    name: Option<&str>,
    email: Option<&str>,
    phone: Option<&str>,
) -> AppResult<PersonModel> {
    let normalized = crate::utils::rut::validate(raw_rut)
        .ok_or_else(|| AppError::Validation("RUT inválido".to_string()))?;

    let existing = Person::find()
        .filter(person::Column::Rut.eq(&normalized))
        .one(conn)
        .await?;

    let now = chrono::Utc::now().naive_utc();
    match existing {
        Some(found) => {
            let mut active: person::ActiveModel = found.into();
            if let Some(name) = name {
                active.name = sea_orm::ActiveValue::Set(name.to_string());
            }
            if let Some(email) = email {
                active.email = sea_orm::ActiveValue::Set(Some(email.to_string()));
            }
            if let Some(phone) = phone {
                active.phone = sea_orm::ActiveValue::Set(Some(phone.to_string()));
            }
            active.updated_at = sea_orm::ActiveValue::Set(now);
            Ok(active.update(conn).await?)
        }
        None => {
            let saved = person::ActiveModel {
                rut: sea_orm::ActiveValue::Set(normalized.clone()),
                name: sea_orm::ActiveValue::Set(
                    name.map(str::to_string).unwrap_or_else(|| normalized),
                ),
                email: sea_orm::ActiveValue::Set(email.map(str::to_string)),
                phone: sea_orm::ActiveValue::Set(phone.map(str::to_string)),
                created_at: sea_orm::ActiveValue::Set(now),
                updated_at: sea_orm::ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(conn)
            .await?;
            Ok(saved)
        }
    }
}

pub struct ManagementService {
    db: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct IdentifyRequest {
    pub rut: String,
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
}

impl ManagementService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Re-route a complaint to another review unit: type and state are
    /// overwritten in one transaction.
    ///
    /// The observation text is accepted by the endpoint but not persisted
    /// anywhere, and no history row is appended. This mirrors the current
    /// production behavior; see DESIGN.md before changing it.
    pub async fn derive(
        &self,
        complaint_id: i32,
        new_type_id: i32,
        new_state_id: i32,
        _observation: Option<&str>,
        acting_person_id: i32,
    ) -> AppResult<ComplaintModel> {
        ComplaintType::find_by_id(new_type_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation(sentinel::TIPO_INVALIDO.to_string()))?;
        ComplaintState::find_by_id(new_state_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::Validation(sentinel::ESTADO_INVALIDO.to_string()))?;

        let existing = crate::models::Complaint::find_by_id(complaint_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(sentinel::DENUNCIA_NO_ENCONTRADA.to_string()))?;

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), None)
            .await?;

        let mut active: complaint::ActiveModel = existing.into();
        active.type_id = sea_orm::ActiveValue::Set(new_type_id);
        active.state_id = sea_orm::ActiveValue::Set(new_state_id);
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());
        let updated = active.update(&txn).await?;

        txn.commit().await?;

        tracing::info!(
            complaint_id,
            new_type_id,
            new_state_id,
            acting_person_id,
            "Complaint derived"
        );
        Ok(updated)
    }

    /// Resolve a free-text participant to a real identity: upsert the
    /// person by RUT and link the participant row to it.
    pub async fn identify_participant(
        &self,
        participant_id: i32,
        request: IdentifyRequest,
    ) -> AppResult<(ParticipantModel, PersonModel)> {
        let existing = Participant::find_by_id(participant_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| {
                AppError::NotFound(sentinel::PARTICIPANTE_NO_ENCONTRADO.to_string())
            })?;

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), None)
            .await?;

        let person = upsert_person_by_rut(
            &txn,
            &request.rut,
            request.name.as_deref(),
            request.email.as_deref(),
            request.phone.as_deref(),
        )
        .await?;

        let mut active: participant::ActiveModel = existing.into();
        active.person_id = sea_orm::ActiveValue::Set(Some(person.id));
        active.rut = sea_orm::ActiveValue::Set(Some(person.rut.clone()));
        if let Some(name) = &request.name {
            active.name = sea_orm::ActiveValue::Set(Some(name.clone()));
        }
        let participant = active.update(&txn).await?;

        txn.commit().await?;
        Ok((participant, person))
    }
}
