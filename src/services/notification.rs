use crate::{
    error::AppResult,
    models::{notification, person, Notification, NotificationModel, Person},
    services::email::EmailService,
    websocket::hub::NotificationHub,
};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder,
};

pub struct NotificationService {
    db: DatabaseConnection,
    hub: NotificationHub,
}

impl NotificationService {
    pub fn new(db: DatabaseConnection, hub: NotificationHub) -> Self {
        Self { db, hub }
    }

    /// Persist a notification row, push it over the recipient's socket
    /// room, and optionally email it. Delivery of the live/email paths is
    /// best-effort; the row is always persisted.
    pub async fn notify(
        &self,
        person_id: i32,
        kind: &str,
        title: &str,
        message: &str,
        complaint_id: Option<i32>,
        email: Option<&EmailService>,
    ) -> AppResult<NotificationModel> {
        let mut email_sent = false;
        if let Some(email_service) = email {
            if email_service.is_configured() {
                let recipient = Person::find_by_id(person_id).one(&self.db).await?;
                if let Some(address) = recipient.and_then(|p| p.email) {
                    match email_service
                        .send_notification_email(&address, title, message, complaint_id)
                        .await
                    {
                        Ok(sent) => email_sent = sent,
                        Err(e) => {
                            tracing::warn!("Failed to email notification to {}: {}", address, e);
                        }
                    }
                }
            }
        }

        let now = chrono::Utc::now().naive_utc();
        let model = notification::ActiveModel {
            person_id: sea_orm::ActiveValue::Set(person_id),
            kind: sea_orm::ActiveValue::Set(kind.to_string()),
            title: sea_orm::ActiveValue::Set(title.to_string()),
            message: sea_orm::ActiveValue::Set(message.to_string()),
            complaint_id: sea_orm::ActiveValue::Set(complaint_id),
            is_read: sea_orm::ActiveValue::Set(false),
            email_sent: sea_orm::ActiveValue::Set(email_sent),
            created_at: sea_orm::ActiveValue::Set(now),
            ..Default::default()
        };

        let saved = model.insert(&self.db).await?;

        let json = serde_json::json!({
            "type": "nueva_notificacion",
            "data": {
                "id": saved.id,
                "kind": &saved.kind,
                "title": &saved.title,
                "message": &saved.message,
                "complaint_id": saved.complaint_id,
                "created_at": saved.created_at.to_string(),
            }
        });
        self.hub.send_to_person(person_id, &json.to_string());

        Ok(saved)
    }

    /// Fan a notification out to every account holding the given role
    /// (area staff). The actor is excluded.
    pub async fn notify_role(
        &self,
        role: &str,
        actor_person_id: Option<i32>,
        kind: &str,
        title: &str,
        message: &str,
        complaint_id: Option<i32>,
        email: Option<&EmailService>,
    ) -> AppResult<usize> {
        // LIKE is only a coarse pre-filter; "vra" also matches "vrae"
        // rows, so exact membership is checked on the parsed role list.
        let staff = Person::find()
            .filter(person::Column::Roles.contains(role))
            .all(&self.db)
            .await?;

        let mut count = 0;
        for person in staff {
            if Some(person.id) == actor_person_id {
                continue;
            }
            if !person.role_list().iter().any(|r| r == role) {
                continue;
            }
            self.notify(person.id, kind, title, message, complaint_id, email)
                .await?;
            count += 1;
        }
        Ok(count)
    }

    pub async fn list_for_person(
        &self,
        person_id: i32,
        page: u64,
        per_page: u64,
    ) -> AppResult<(Vec<NotificationModel>, u64)> {
        let paginator = Notification::find()
            .filter(notification::Column::PersonId.eq(person_id))
            .order_by_desc(notification::Column::CreatedAt)
            .paginate(&self.db, per_page);

        let total = paginator.num_items().await?;
        let items = paginator.fetch_page(page.saturating_sub(1)).await?;
        Ok((items, total))
    }

    pub async fn unread_count(&self, person_id: i32) -> AppResult<u64> {
        let count = Notification::find()
            .filter(notification::Column::PersonId.eq(person_id))
            .filter(notification::Column::IsRead.eq(false))
            .count(&self.db)
            .await?;
        Ok(count)
    }

    pub async fn mark_read(&self, id: i32, person_id: i32) -> AppResult<()> {
        let existing = Notification::find_by_id(id)
            .one(&self.db)
            .await?
            .ok_or(crate::error::AppError::NotFound(
                "Notification not found".to_string(),
            ))?;

        if existing.person_id != person_id {
            return Err(crate::error::AppError::Forbidden);
        }

        let mut active: notification::ActiveModel = existing.into();
        active.is_read = sea_orm::ActiveValue::Set(true);
        active.update(&self.db).await?;
        Ok(())
    }

    /// Bulk-read scoped to one recipient's unread rows.
    pub async fn mark_all_read(&self, person_id: i32) -> AppResult<u64> {
        use sea_orm::sea_query::Expr;
        let result = Notification::update_many()
            .col_expr(notification::Column::IsRead, Expr::value(true))
            .filter(notification::Column::PersonId.eq(person_id))
            .filter(notification::Column::IsRead.eq(false))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
