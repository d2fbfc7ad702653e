use crate::{
    error::{AppError, AppResult},
    models::{person, Person, PersonModel},
    utils::{encode_token, rut, verify_password},
};
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter};

pub struct AuthService {
    db: DatabaseConnection,
}

impl AuthService {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    /// Authenticate by RUT and password. Only persons with a password
    /// hash are account holders; everyone else exists purely as case
    /// data and cannot log in.
    pub async fn login(&self, raw_rut: &str, password: &str) -> AppResult<(PersonModel, String)> {
        let normalized = rut::validate(raw_rut)
            .ok_or_else(|| AppError::Validation("RUT inválido".to_string()))?;

        let person = Person::find()
            .filter(person::Column::Rut.eq(&normalized))
            .one(&self.db)
            .await?
            .ok_or(AppError::Unauthorized)?;

        let hash = person
            .password_hash
            .as_deref()
            .ok_or(AppError::Unauthorized)?;

        if !verify_password(password, hash)? {
            return Err(AppError::Unauthorized);
        }

        let roles = person.role_list();
        let token = encode_token(&person.id.to_string(), &roles)?;

        Ok((person, token))
    }

    pub async fn get_person_by_id(&self, person_id: i32) -> AppResult<PersonModel> {
        Person::find_by_id(person_id)
            .one(&self.db)
            .await?
            .ok_or(AppError::NotFound("Person not found".to_string()))
    }
}
