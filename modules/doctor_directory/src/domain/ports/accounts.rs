use std::fmt;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountRole {
    Doctor,
    Patient,
}

impl AccountRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            AccountRole::Doctor => "doctor",
            AccountRole::Patient => "patient",
        }
    }
}

impl fmt::Display for AccountRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct NewAccount {
    pub email: String,
    pub password: String,
    pub role: AccountRole,
    pub full_name: String,
    pub phone: Option<String>,
}

// Keeps the password out of logs and `#[instrument]` fields.
impl fmt::Debug for NewAccount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NewAccount")
            .field("email", &self.email)
            .field("role", &self.role)
            .field("full_name", &self.full_name)
            .field("phone", &self.phone)
            .finish_non_exhaustive()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub email: String,
    pub role: AccountRole,
    pub full_name: String,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Transport-agnostic account service used by registration.
#[async_trait]
pub trait AccountsPort: Send + Sync {
    /// Create the account and its profile. Duplicate email is
    /// [`DomainError::EmailAlreadyExists`].
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, DomainError>;

    /// Remove an account created earlier; used to undo a half-finished registration.
    async fn delete_account(&self, id: Uuid) -> Result<(), DomainError>;
}
