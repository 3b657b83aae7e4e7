use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::{UserError, UserResult};
use crate::models::User;

/// Repository trait for User persistence
///
/// Lookups are three-way: `Ok(Some)` found, `Ok(None)` absent, `Err` the
/// store could not answer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Persist a new user. Fails with `AlreadyExists` if the email is taken.
    async fn create(&self, user: User) -> UserResult<User>;

    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>>;

    /// All users; order is implementation-defined
    async fn find_all(&self) -> UserResult<Vec<User>>;

    /// Overwrite the record with `user.id`. Fails with `NotFound` if there
    /// is none, `AlreadyExists` if the email belongs to another user.
    async fn update(&self, user: User) -> UserResult<User>;

    /// Returns `false` when nothing was removed
    async fn delete(&self, id: &str) -> UserResult<bool>;

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>>;
}

/// In-memory implementation of UserRepository (for development/testing)
///
/// Email uniqueness is checked under the write lock, so concurrent creates
/// for one email yield exactly one winner.
#[derive(Debug, Default, Clone)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<String, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if users.values().any(|u| u.email == user.email) {
            return Err(UserError::AlreadyExists(user.email));
        }
        if users.contains_key(&user.id) {
            return Err(UserError::Storage(format!("duplicate id '{}'", user.id)));
        }

        users.insert(user.id.clone(), user.clone());

        tracing::info!(user_id = %user.id, "Stored user");
        Ok(user)
    }

    async fn find_by_id(&self, id: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.get(id).cloned())
    }

    async fn find_all(&self) -> UserResult<Vec<User>> {
        let users = self.users.read().await;
        let mut all: Vec<User> = users.values().cloned().collect();
        // v7 ids sort by creation time
        all.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(all)
    }

    async fn update(&self, user: User) -> UserResult<User> {
        let mut users = self.users.write().await;

        if !users.contains_key(&user.id) {
            return Err(UserError::NotFound(user.id));
        }

        if users
            .values()
            .any(|u| u.id != user.id && u.email == user.email)
        {
            return Err(UserError::AlreadyExists(user.email));
        }

        users.insert(user.id.clone(), user.clone());

        tracing::info!(user_id = %user.id, "Updated stored user");
        Ok(user)
    }

    async fn delete(&self, id: &str) -> UserResult<bool> {
        let mut users = self.users.write().await;

        if users.remove(id).is_some() {
            tracing::info!(user_id = %id, "Removed stored user");
            Ok(true)
        } else {
            Ok(false)
        }
    }

    async fn find_by_email(&self, email: &str) -> UserResult<Option<User>> {
        let users = self.users.read().await;
        Ok(users.values().find(|u| u.email == email).cloned())
    }
}
