use std::sync::Arc;
use tracing::info;

use crate::error::{UserError, UserResult};
use crate::hasher::{Argon2Hasher, CredentialHasher};
use crate::id::{IdGenerator, UuidV7Generator};
use crate::models::{CreateUser, UpdateUser, User};
use crate::repository::UserRepository;

/// Service layer for User business logic
///
/// Holds no per-call state; clones share the same repository, hasher and
/// id generator.
pub struct UserService<R: UserRepository> {
    repository: Arc<R>,
    hasher: Arc<dyn CredentialHasher>,
    ids: Arc<dyn IdGenerator>,
}

impl<R: UserRepository> Clone for UserService<R> {
    fn clone(&self) -> Self {
        Self {
            repository: Arc::clone(&self.repository),
            hasher: Arc::clone(&self.hasher),
            ids: Arc::clone(&self.ids),
        }
    }
}

impl<R: UserRepository> UserService<R> {
    /// Argon2 hashing and UUIDv7 ids
    pub fn new(repository: R) -> Self {
        Self::with_components(repository, Argon2Hasher::new(), UuidV7Generator)
    }

    pub fn with_components(
        repository: R,
        hasher: impl CredentialHasher + 'static,
        ids: impl IdGenerator + 'static,
    ) -> Self {
        Self {
            repository: Arc::new(repository),
            hasher: Arc::new(hasher),
            ids: Arc::new(ids),
        }
    }

    /// Create a new user.
    ///
    /// Rules are checked against the plaintext input before anything is
    /// hashed or stored. The email lookup is only a fast path: two racing
    /// creates can both pass it, and the loser gets `AlreadyExists` from
    /// the repository.
    pub async fn create_user(&self, input: CreateUser) -> UserResult<User> {
        let mut user = User::from(input);
        user.validate()?;

        if self.repository.find_by_email(&user.email).await?.is_some() {
            return Err(UserError::AlreadyExists(user.email));
        }

        user.password = self.hash_password(std::mem::take(&mut user.password)).await?;
        user.id = self.ids.new_id();

        let created = self.repository.create(user).await?;

        info!(user_id = %created.id, "User created");
        Ok(created)
    }

    /// Get a user by ID
    pub async fn get_user(&self, id: &str) -> UserResult<User> {
        if id.is_empty() {
            return Err(UserError::IdRequired);
        }

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))
    }

    /// All users; an empty store yields an empty list
    pub async fn list_users(&self) -> UserResult<Vec<User>> {
        self.repository.find_all().await
    }

    /// Update a user.
    ///
    /// Present fields overwrite the stored ones, the merged record is
    /// re-validated, and a new password is hashed before it is stored.
    /// The path `id` always wins.
    pub async fn update_user(&self, id: &str, input: UpdateUser) -> UserResult<User> {
        if id.is_empty() {
            return Err(UserError::IdRequired);
        }

        let existing = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| UserError::NotFound(id.to_string()))?;

        let password_changed = input.password.is_some();
        let mut user = existing.clone();
        user.apply_update(input);

        // An unchanged password is the stored hash, which passes the password rules.
        user.validate()?;

        if user.email != existing.email {
            if let Some(owner) = self.repository.find_by_email(&user.email).await? {
                if owner.id != id {
                    return Err(UserError::AlreadyExists(user.email));
                }
            }
        }

        if password_changed {
            user.password = self.hash_password(std::mem::take(&mut user.password)).await?;
        }
        user.id = id.to_string();

        let updated = self.repository.update(user).await?;

        info!(user_id = %updated.id, password_changed, "User updated");
        Ok(updated)
    }

    /// Delete a user
    pub async fn delete_user(&self, id: &str) -> UserResult<()> {
        if id.is_empty() {
            return Err(UserError::IdRequired);
        }

        if self.repository.find_by_id(id).await?.is_none() {
            return Err(UserError::NotFound(id.to_string()));
        }

        // Row removed by someone else between the check and the delete
        if !self.repository.delete(id).await? {
            return Err(UserError::NotFound(id.to_string()));
        }

        info!(user_id = %id, "User deleted");
        Ok(())
    }

    /// Argon2 is deliberately slow, so it runs off the async workers.
    async fn hash_password(&self, plaintext: String) -> UserResult<String> {
        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || hasher.hash(&plaintext))
            .await
            .map_err(|e| UserError::Hashing(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hasher::MockCredentialHasher;
    use crate::id::MockIdGenerator;
    use crate::models::ValidationError;
    use crate::repository::{InMemoryUserRepository, MockUserRepository};

    fn ana() -> CreateUser {
        CreateUser {
            name: "Ana".to_string(),
            email: "ana@example.com".to_string(),
            password: "secret1".to_string(),
        }
    }

    fn stored(id: &str, email: &str) -> User {
        User {
            id: id.to_string(),
            name: "Ana".to_string(),
            email: email.to_string(),
            password: "hashed:secret1".to_string(),
        }
    }

    fn fake_hasher() -> MockCredentialHasher {
        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .returning(|plaintext| Ok(format!("hashed:{plaintext}")));
        hasher
    }

    fn fixed_ids(id: &str) -> MockIdGenerator {
        let mut ids = MockIdGenerator::new();
        ids.expect_new_id().return_const(id.to_string());
        ids
    }

    /// Repository, hasher and id generator all panic on any call.
    fn untouched(repo: MockUserRepository) -> UserService<MockUserRepository> {
        UserService::with_components(repo, MockCredentialHasher::new(), MockIdGenerator::new())
    }

    // ------------------------------------------------------------------
    // create_user
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_assigns_id_and_hashes_password() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().times(1).returning(|_| Ok(None));
        repo.expect_create().times(1).returning(|user| {
            assert_eq!(user.id, "u-1");
            assert_eq!(user.password, "hashed:secret1");
            Ok(user)
        });

        let service = UserService::with_components(repo, fake_hasher(), fixed_ids("u-1"));
        let user = service.create_user(ana()).await.unwrap();

        assert_eq!(user.id, "u-1");
        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "ana@example.com");
        assert_ne!(user.password, "secret1");
    }

    #[tokio::test]
    async fn test_create_duplicate_email_does_not_write() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(stored("existing", email))));

        let err = untouched(repo).create_user(ana()).await.unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists(email) if email == "ana@example.com"));
    }

    #[tokio::test]
    async fn test_create_short_password_rejected_before_anything_else() {
        let input = CreateUser {
            password: "12345".to_string(),
            ..ana()
        };

        let err = untouched(MockUserRepository::new())
            .create_user(input)
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Validation(ValidationError::PasswordTooShort)));
    }

    #[tokio::test]
    async fn test_create_invalid_email_and_missing_name() {
        let service = untouched(MockUserRepository::new());

        let bad_email = CreateUser {
            email: "not-an-email".to_string(),
            ..ana()
        };
        assert!(matches!(
            service.create_user(bad_email).await,
            Err(UserError::Validation(ValidationError::EmailInvalid))
        ));

        let no_name = CreateUser {
            name: String::new(),
            ..ana()
        };
        assert!(matches!(
            service.create_user(no_name).await,
            Err(UserError::Validation(ValidationError::NameRequired))
        ));
    }

    #[tokio::test]
    async fn test_create_lookup_failure_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email()
            .times(1)
            .returning(|_| Err(UserError::Storage("connection reset".to_string())));

        let err = untouched(repo).create_user(ana()).await.unwrap_err();
        assert!(matches!(err, UserError::Storage(_)));
    }

    #[tokio::test]
    async fn test_create_hashing_failure_does_not_write() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));

        let mut hasher = MockCredentialHasher::new();
        hasher
            .expect_hash()
            .times(1)
            .returning(|_| Err(UserError::Hashing("out of memory".to_string())));

        let service = UserService::with_components(repo, hasher, MockIdGenerator::new());
        let err = service.create_user(ana()).await.unwrap_err();
        assert!(matches!(err, UserError::Hashing(_)));
    }

    #[tokio::test]
    async fn test_create_race_loser_gets_already_exists_from_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_email().returning(|_| Ok(None));
        repo.expect_create()
            .times(1)
            .returning(|user| Err(UserError::AlreadyExists(user.email)));

        let service = UserService::with_components(repo, fake_hasher(), fixed_ids("u-2"));
        let err = service.create_user(ana()).await.unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists(email) if email == "ana@example.com"));
    }

    // ------------------------------------------------------------------
    // get_user / list_users
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_empty_id_never_reaches_repository() {
        let service = untouched(MockUserRepository::new());

        assert!(matches!(service.get_user("").await, Err(UserError::IdRequired)));
        assert!(matches!(
            service.update_user("", UpdateUser::default()).await,
            Err(UserError::IdRequired)
        ));
        assert!(matches!(service.delete_user("").await, Err(UserError::IdRequired)));
    }

    #[tokio::test]
    async fn test_get_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().times(1).returning(|_| Ok(None));

        let err = untouched(repo).get_user("ghost").await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(id) if id == "ghost"));
    }

    #[tokio::test]
    async fn test_get_user_storage_error_is_not_not_found() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(UserError::Storage("timeout".to_string())));

        let err = untouched(repo).get_user("u-1").await.unwrap_err();
        assert!(matches!(err, UserError::Storage(_)));
    }

    #[tokio::test]
    async fn test_list_empty_store() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_all().times(1).returning(|| Ok(vec![]));

        let users = untouched(repo).list_users().await.unwrap();
        assert!(users.is_empty());
    }

    // ------------------------------------------------------------------
    // update_user
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_update_missing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = untouched(repo)
            .update_user("ghost", UpdateUser::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_update_lookup_failure_propagates() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|_| Err(UserError::Storage("timeout".to_string())));

        let err = untouched(repo)
            .update_user("u-1", UpdateUser::default())
            .await
            .unwrap_err();
        assert!(matches!(err, UserError::Storage(_)));
    }

    #[tokio::test]
    async fn test_update_name_keeps_hash_and_id() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "ana@example.com"))));
        repo.expect_update().times(1).returning(|user| {
            assert_eq!(user.id, "u-1");
            assert_eq!(user.password, "hashed:secret1");
            Ok(user)
        });

        let input = UpdateUser {
            name: Some("Ana Maria".to_string()),
            ..Default::default()
        };
        let updated = untouched(repo).update_user("u-1", input).await.unwrap();
        assert_eq!(updated.name, "Ana Maria");
        assert_eq!(updated.email, "ana@example.com");
    }

    #[tokio::test]
    async fn test_update_password_is_validated_then_hashed() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "ana@example.com"))));
        repo.expect_update().times(1).returning(|user| {
            assert_eq!(user.password, "hashed:n3w-secret");
            Ok(user)
        });

        let service = UserService::with_components(repo, fake_hasher(), MockIdGenerator::new());
        let input = UpdateUser {
            password: Some("n3w-secret".to_string()),
            ..Default::default()
        };
        service.update_user("u-1", input).await.unwrap();
    }

    #[tokio::test]
    async fn test_update_rejects_short_password_and_bad_email() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .times(2)
            .returning(|id| Ok(Some(stored(id, "ana@example.com"))));
        let service = untouched(repo);

        let short = UpdateUser {
            password: Some("123".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_user("u-1", short).await,
            Err(UserError::Validation(ValidationError::PasswordTooShort))
        ));

        let bad_email = UpdateUser {
            email: Some("nope".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            service.update_user("u-1", bad_email).await,
            Err(UserError::Validation(ValidationError::EmailInvalid))
        ));
    }

    #[tokio::test]
    async fn test_update_email_taken_by_other_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "ana@example.com"))));
        repo.expect_find_by_email()
            .times(1)
            .returning(|email| Ok(Some(stored("u-2", email))));

        let input = UpdateUser {
            email: Some("bob@example.com".to_string()),
            ..Default::default()
        };
        let err = untouched(repo).update_user("u-1", input).await.unwrap_err();
        assert!(matches!(err, UserError::AlreadyExists(email) if email == "bob@example.com"));
    }

    // ------------------------------------------------------------------
    // delete_user
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_delete_existing_user() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "ana@example.com"))));
        repo.expect_delete().times(1).returning(|_| Ok(true));

        untouched(repo).delete_user("u-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_missing_user_does_not_delete() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id().returning(|_| Ok(None));

        let err = untouched(repo).delete_user("ghost").await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }

    #[tokio::test]
    async fn test_delete_vanished_between_check_and_delete() {
        let mut repo = MockUserRepository::new();
        repo.expect_find_by_id()
            .returning(|id| Ok(Some(stored(id, "ana@example.com"))));
        repo.expect_delete().returning(|_| Ok(false));

        let err = untouched(repo).delete_user("u-1").await.unwrap_err();
        assert!(matches!(err, UserError::NotFound(_)));
    }

    // ------------------------------------------------------------------
    // End to end against the in-memory store with real Argon2
    // ------------------------------------------------------------------

    #[tokio::test]
    async fn test_create_get_delete_round() {
        let service = UserService::new(InMemoryUserRepository::new());

        let created = service.create_user(ana()).await.unwrap();
        assert!(!created.id.is_empty());

        let fetched = service.get_user(&created.id).await.unwrap();
        assert_eq!(fetched.name, "Ana");
        assert_eq!(fetched.email, "ana@example.com");
        assert_ne!(fetched.password, "secret1");

        let dup = service.create_user(ana()).await.unwrap_err();
        assert!(matches!(dup, UserError::AlreadyExists(email) if email == "ana@example.com"));

        service.delete_user(&created.id).await.unwrap();
        assert!(matches!(
            service.delete_user(&created.id).await,
            Err(UserError::NotFound(_))
        ));
        assert!(service.list_users().await.unwrap().is_empty());
    }
}
