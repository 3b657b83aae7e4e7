use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use thiserror::Error;
use utoipa::ToSchema;
use validator::Validate;

/// local-part "@" domain "." TLD, TLD at least two letters
static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap());

/// Minimum password length, counted in characters
pub const MIN_PASSWORD_LEN: usize = 6;

/// Structural defects in a [`User`], in the order they are checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("name is required")]
    NameRequired,

    #[error("email is required")]
    EmailRequired,

    #[error("email is invalid")]
    EmailInvalid,

    #[error("password is required")]
    PasswordRequired,

    #[error("password must be at least 6 characters")]
    PasswordTooShort,
}

/// User entity
///
/// `password` holds plaintext only between request decoding and hashing;
/// anything handed to a repository carries the hash. It is never serialized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    /// Empty until the service assigns one; immutable afterwards
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password: String,
}

impl User {
    /// Check structural rules; the first failing rule wins.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.name.is_empty() {
            return Err(ValidationError::NameRequired);
        }
        if self.email.is_empty() {
            return Err(ValidationError::EmailRequired);
        }
        if !EMAIL_PATTERN.is_match(&self.email) {
            return Err(ValidationError::EmailInvalid);
        }
        if self.password.is_empty() {
            return Err(ValidationError::PasswordRequired);
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ValidationError::PasswordTooShort);
        }
        Ok(())
    }

    /// Overwrite the fields present in `update`. `id` is never touched.
    pub fn apply_update(&mut self, update: UpdateUser) {
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(email) = update.email {
            self.email = email;
        }
        if let Some(password) = update.password {
            self.password = password;
        }
    }
}

impl From<CreateUser> for User {
    fn from(input: CreateUser) -> Self {
        Self {
            id: String::new(),
            name: input.name,
            email: input.email,
            password: input.password,
        }
    }
}

/// DTO for creating a new user
///
/// The `validate` caps only bound payload size; business rules are
/// enforced by the service.
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateUser {
    #[validate(length(max = 100))]
    #[schema(example = "Ana")]
    pub name: String,
    #[validate(length(max = 255))]
    #[schema(example = "ana@example.com")]
    pub email: String,
    #[validate(length(max = 128))]
    #[schema(example = "secret1", format = Password)]
    pub password: String,
}

/// DTO for updating an existing user; absent fields are left unchanged
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct UpdateUser {
    #[validate(length(max = 100))]
    pub name: Option<String>,
    #[validate(length(max = 255))]
    pub email: Option<String>,
    #[validate(length(max = 128))]
    #[schema(format = Password)]
    pub password: Option<String>,
}

/// User as returned to API clients
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UserResponse {
    #[schema(example = "0192f0c8-6c1e-7b3a-9d4e-5f6a7b8c9d0e")]
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
        }
    }
}
