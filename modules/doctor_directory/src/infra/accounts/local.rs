//! Accounts kept in the module's own database: `accounts` holds credentials,
//! `profiles` the public details.

use anyhow::{anyhow, Context};
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait,
    QueryFilter, Set, SqlErr, TransactionTrait,
};
use tracing::{debug, instrument};
use uuid::Uuid;

use crate::domain::error::DomainError;
use crate::domain::ports::{Account, AccountsPort, NewAccount};
use crate::infra::storage::entity::{account, profile};

pub struct LocalAccounts {
    conn: DatabaseConnection,
}

impl LocalAccounts {
    pub fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    async fn email_exists(&self, email: &str) -> anyhow::Result<bool> {
        let count = account::Entity::find()
            .filter(account::Column::Email.eq(email))
            .count(&self.conn)
            .await
            .context("account email lookup failed")?;
        Ok(count > 0)
    }

    async fn insert(&self, acc: &Account, password_hash: String) -> Result<(), DbErr> {
        let txn = self.conn.begin().await?;
        account::ActiveModel {
            id: Set(acc.id),
            email: Set(acc.email.clone()),
            password_hash: Set(password_hash),
            role: Set(acc.role.as_str().to_string()),
            created_at: Set(acc.created_at),
        }
        .insert(&txn)
        .await?;
        profile::ActiveModel {
            id: Set(acc.id),
            full_name: Set(acc.full_name.clone()),
            email: Set(acc.email.clone()),
            phone: Set(acc.phone.clone()),
            created_at: Set(acc.created_at),
        }
        .insert(&txn)
        .await?;
        txn.commit().await
    }

    async fn remove(&self, id: Uuid) -> anyhow::Result<()> {
        let txn = self.conn.begin().await.context("begin failed")?;
        profile::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete profile failed")?;
        account::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete account failed")?;
        txn.commit().await.context("commit failed")
    }

    /// Account id for a matching email and password, `None` otherwise.
    pub async fn verify_credentials(
        &self,
        email: &str,
        password: &str,
    ) -> anyhow::Result<Option<Uuid>> {
        let Some(row) = account::Entity::find()
            .filter(account::Column::Email.eq(email))
            .one(&self.conn)
            .await
            .context("account lookup failed")?
        else {
            return Ok(None);
        };
        let password = password.to_owned();
        let stored = row.password_hash.clone();
        let ok = tokio::task::spawn_blocking(move || verify_password(&stored, &password))
            .await
            .context("password check task failed")??;
        Ok(ok.then_some(row.id))
    }
}

/// Argon2id PHC string with a fresh random salt.
pub(crate) fn hash_password(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::encode_b64(&rand::random::<[u8; 16]>())
        .map_err(|e| anyhow!("salt encoding failed: {e}"))?;
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow!("password hashing failed: {e}"))?;
    Ok(hash.to_string())
}

pub(crate) fn verify_password(stored: &str, password: &str) -> anyhow::Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| anyhow!("stored hash is invalid: {e}"))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

fn map_insert_error(err: DbErr, email: &str) -> DomainError {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(_)) => DomainError::email_already_exists(email),
        _ => DomainError::account_service(format!("insert account failed: {err}")),
    }
}

#[async_trait]
impl AccountsPort for LocalAccounts {
    #[instrument(name = "doctor_directory.accounts.local.create", skip_all, fields(email = %new_account.email))]
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, DomainError> {
        if self
            .email_exists(&new_account.email)
            .await
            .map_err(|e| DomainError::account_service(e.to_string()))?
        {
            return Err(DomainError::email_already_exists(new_account.email));
        }

        let password = new_account.password;
        let password_hash = tokio::task::spawn_blocking(move || hash_password(&password))
            .await
            .map_err(|e| DomainError::account_service(e.to_string()))?
            .map_err(|e| DomainError::account_service(format!("{e:#}")))?;

        let acc = Account {
            id: Uuid::new_v4(),
            email: new_account.email,
            role: new_account.role,
            full_name: new_account.full_name,
            phone: new_account.phone,
            created_at: Utc::now(),
        };
        // A concurrent registration can pass the lookup above; the unique index decides.
        self.insert(&acc, password_hash)
            .await
            .map_err(|e| map_insert_error(e, &acc.email))?;
        debug!(account_id = %acc.id, "account created");
        Ok(acc)
    }

    #[instrument(name = "doctor_directory.accounts.local.delete", skip(self))]
    async fn delete_account(&self, id: Uuid) -> Result<(), DomainError> {
        self.remove(id)
            .await
            .map_err(|e| DomainError::account_service(format!("{e:#}")))
    }
}
