use crate::{
    error::{sentinel, AppError, AppResult},
    models::{
        complaint, complaint_state::state, state_history, technical_report, Complaint,
        TechnicalReport, TechnicalReportModel,
    },
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, IsolationLevel, QueryFilter,
    TransactionTrait,
};

pub struct TechnicalReportService {
    db: DatabaseConnection,
}

#[derive(Debug, Clone)]
pub struct ReportContent {
    pub facts: String,
    pub analysis: String,
    pub conclusion: String,
}

impl TechnicalReportService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// File the report for a complaint. Exactly one report may exist per
    /// complaint; filing it also moves the case to En Investigación,
    /// with a matching history row, in the same transaction.
    pub async fn create(
        &self,
        complaint_id: i32,
        author_person_id: i32,
        content: ReportContent,
    ) -> AppResult<TechnicalReportModel> {
        let complaint_row = Complaint::find_by_id(complaint_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(sentinel::DENUNCIA_NO_ENCONTRADA.to_string()))?;

        let existing = TechnicalReport::find()
            .filter(technical_report::Column::ComplaintId.eq(complaint_id))
            .one(&self.db)
            .await?;
        if existing.is_some() {
            return Err(AppError::Validation(sentinel::INFORME_YA_EXISTE.to_string()));
        }

        let txn = self
            .db
            .begin_with_config(Some(IsolationLevel::ReadCommitted), None)
            .await?;

        let now = chrono::Utc::now().naive_utc();
        let saved = technical_report::ActiveModel {
            complaint_id: sea_orm::ActiveValue::Set(complaint_id),
            author_person_id: sea_orm::ActiveValue::Set(author_person_id),
            facts: sea_orm::ActiveValue::Set(content.facts),
            analysis: sea_orm::ActiveValue::Set(content.analysis),
            conclusion: sea_orm::ActiveValue::Set(content.conclusion),
            created_at: sea_orm::ActiveValue::Set(now),
            updated_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(&txn)
        .await?;

        // Filing the report forces the case into investigation.
        if complaint_row.state_id != state::EN_INVESTIGACION {
            let mut active: complaint::ActiveModel = complaint_row.into();
            active.state_id = sea_orm::ActiveValue::Set(state::EN_INVESTIGACION);
            active.updated_at = sea_orm::ActiveValue::Set(now);
            active.update(&txn).await?;

            state_history::ActiveModel {
                complaint_id: sea_orm::ActiveValue::Set(complaint_id),
                state_id: sea_orm::ActiveValue::Set(state::EN_INVESTIGACION),
                changed_at: sea_orm::ActiveValue::Set(now),
                ..Default::default()
            }
            .insert(&txn)
            .await?;
        }

        txn.commit().await?;
        Ok(saved)
    }

    /// In-place overwrite of an existing report's content.
    pub async fn update(
        &self,
        complaint_id: i32,
        content: ReportContent,
    ) -> AppResult<TechnicalReportModel> {
        let existing = TechnicalReport::find()
            .filter(technical_report::Column::ComplaintId.eq(complaint_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(sentinel::INFORME_NO_ENCONTRADO.to_string()))?;

        let mut active: technical_report::ActiveModel = existing.into();
        active.facts = sea_orm::ActiveValue::Set(content.facts);
        active.analysis = sea_orm::ActiveValue::Set(content.analysis);
        active.conclusion = sea_orm::ActiveValue::Set(content.conclusion);
        active.updated_at = sea_orm::ActiveValue::Set(chrono::Utc::now().naive_utc());

        Ok(active.update(&self.db).await?)
    }

    pub async fn get_by_complaint(&self, complaint_id: i32) -> AppResult<TechnicalReportModel> {
        TechnicalReport::find()
            .filter(technical_report::Column::ComplaintId.eq(complaint_id))
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(sentinel::INFORME_NO_ENCONTRADO.to_string()))
    }
}
