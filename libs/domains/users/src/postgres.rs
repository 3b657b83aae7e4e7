use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, SqlErr,
};

use crate::{
    entity,
    error::{UserError, UserResult},
    models::User,
    repository::UserRepository,
};

/// Postgres-backed [`UserRepository`].
///
/// The unique index on `users.email` is what actually guarantees one user
/// per email; a violation surfaces as `AlreadyExists`.
#[derive(Clone)]
pub struct PgUserRepository {
    db: DatabaseConnection,
}

impl PgUserRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn storage_error(e: DbErr) -> UserError {
    UserError::Storage(format!("Database error: {}", e))
}

fn write_error(e: DbErr, email: &str) -> UserError {
    match e.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => UserError::AlreadyExists(email.to_string()),
        _ => storage_error(e),
    }
}

#[async_trait]
impl UserRepository for PgUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let email = user.email.clone();
        let active_model: entity::ActiveModel = user.into();

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(|e| write_error(e, &email))?;

        tracing::info!(user_id = %model.id, "Stored user");
        Ok(model.into())
    }

    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(model.map(Into::into))
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let models = entity::Entity::find()
            .order_by_asc(entity::Column::Id)
            .all(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(models.into_iter().map(Into::into).collect())
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let id = user.id.clone();
        let email = user.email.clone();
        let mut active_model: entity::ActiveModel = user.into();
        // Primary key must be unchanged so the UPDATE targets it
        active_model.id = sea_orm::ActiveValue::Unchanged(id.clone());

        let model = match active_model.update(&self.db).await {
            Ok(model) => model,
            Err(DbErr::RecordNotUpdated) => return Err(UserError::NotFound(id)),
            Err(e) => return Err(write_error(e, &email)),
        };

        tracing::info!(user_id = %model.id, "Updated stored user");
        Ok(model.into())
    }

    async fn delete(&self, id: &str) -> UserResult<bool> {
        let result = entity::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await
            .map_err(storage_error)?;

        if result.rows_affected > 0 {
            tracing::info!(user_id = %id, "Removed stored user");
        }
        Ok(result.rows_affected > 0)
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let model = entity::Entity::find()
            .filter(entity::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(storage_error)?;

        Ok(model.map(Into::into))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};

    fn model(id: &str, email: &str) -> entity::Model {
        entity::Model {
            id: id.to_string(),
            name: "Ana".to_string(),
            email: email.to_string(),
            password_hash: "$argon2id$hash".to_string(),
        }
    }

    #[tokio::test]
    async fn test_find_by_id_maps_row_to_user() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([vec![model("u-1", "ana@example.com")]])
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let user = repo.find_by_id("u-1").await.unwrap().unwrap();
        assert_eq!(user.id, "u-1");
        assert_eq!(user.password, "$argon2id$hash");

        assert!(repo.find_by_id("ghost").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_of_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results([Vec::<entity::Model>::new()])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let result = repo.update(model("ghost", "g@example.com").into()).await;
        assert!(matches!(result, Err(UserError::NotFound(id)) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_delete_reports_whether_a_row_was_removed() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results([
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 1,
                },
                MockExecResult {
                    last_insert_id: 0,
                    rows_affected: 0,
                },
            ])
            .into_connection();
        let repo = PgUserRepository::new(db);

        assert!(repo.delete("u-1").await.unwrap());
        assert!(!repo.delete("u-1").await.unwrap());
    }

    #[tokio::test]
    async fn test_query_failure_is_storage_error() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_errors([DbErr::Custom("connection reset".to_string())])
            .into_connection();
        let repo = PgUserRepository::new(db);

        let result = repo.find_by_email("ana@example.com").await;
        assert!(matches!(result, Err(UserError::Storage(_))));
    }
}
