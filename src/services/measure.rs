use crate::{
    error::{sentinel, AppError, AppResult},
    models::{measure_request, Complaint, MeasureRequest, MeasureRequestModel},
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

pub struct MeasureService {
    db: DatabaseConnection,
}

impl MeasureService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Raise a protective-measure request. The status is fixed at
    /// "Pendiente Informe"; Dirgegen picks it up from the worklist.
    pub async fn create(
        &self,
        complaint_id: i32,
        requester_person_id: i32,
        measure_type: &str,
        reason: &str,
    ) -> AppResult<MeasureRequestModel> {
        Complaint::find_by_id(complaint_id)
            .one(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound(sentinel::DENUNCIA_NO_ENCONTRADA.to_string()))?;

        let now = chrono::Utc::now().naive_utc();
        let saved = measure_request::ActiveModel {
            complaint_id: sea_orm::ActiveValue::Set(complaint_id),
            requester_person_id: sea_orm::ActiveValue::Set(requester_person_id),
            measure_type: sea_orm::ActiveValue::Set(measure_type.to_string()),
            reason: sea_orm::ActiveValue::Set(reason.to_string()),
            status: sea_orm::ActiveValue::Set(
                measure_request::status::PENDIENTE_INFORME.to_string(),
            ),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        }
        .insert(&self.db)
        .await?;

        Ok(saved)
    }

    /// Staff worklist, filtered on "Pendiente Informe" unless another
    /// status is requested.
    pub async fn list_worklist(
        &self,
        status: Option<&str>,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<MeasureRequestModel>, u64)> {
        let status = status.unwrap_or(measure_request::status::PENDIENTE_INFORME);

        let paginator = MeasureRequest::find()
            .filter(measure_request::Column::Status.eq(status))
            .order_by_desc(measure_request::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn list_for_requester(
        &self,
        requester_person_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<MeasureRequestModel>, u64)> {
        let paginator = MeasureRequest::find()
            .filter(measure_request::Column::RequesterPersonId.eq(requester_person_id))
            .order_by_desc(measure_request::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }
}
