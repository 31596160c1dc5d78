#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::Utc;
use parking_lot::Mutex;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use doctor_directory::domain::error::DomainError;
use doctor_directory::domain::ports::{Account, AccountsPort, NewAccount};
use doctor_directory::domain::service::{Service, ServiceConfig};
use doctor_directory::infra::storage::{
    seed, Migrator, SeaOrmAppointmentsRepository, SeaOrmDoctorsRepository,
};

/// Fresh in-memory SQLite database with migrations applied.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

/// Same as [`create_test_db`] plus the six starter doctors.
pub async fn create_seeded_db() -> DatabaseConnection {
    let db = create_test_db().await;
    let repo = SeaOrmDoctorsRepository::new(db.clone());
    seed::seed_if_empty(&repo).await.expect("seed failed");
    db
}

/// Accounts port that records calls instead of talking to anything.
#[derive(Default)]
pub struct MockAccounts {
    pub created: AtomicUsize,
    pub deleted: Mutex<Vec<Uuid>>,
    pub fail_create: bool,
}

impl MockAccounts {
    pub fn failing() -> Self {
        Self {
            fail_create: true,
            ..Default::default()
        }
    }

    pub fn created_count(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl AccountsPort for MockAccounts {
    async fn create_account(&self, new_account: NewAccount) -> Result<Account, DomainError> {
        self.created.fetch_add(1, Ordering::SeqCst);
        if self.fail_create {
            return Err(DomainError::account_service("signup unavailable"));
        }
        Ok(Account {
            id: Uuid::new_v4(),
            email: new_account.email,
            role: new_account.role,
            full_name: new_account.full_name,
            phone: new_account.phone,
            created_at: Utc::now(),
        })
    }

    async fn delete_account(&self, id: Uuid) -> Result<(), DomainError> {
        self.deleted.lock().push(id);
        Ok(())
    }
}

pub fn service_on(db: &DatabaseConnection, accounts: Arc<dyn AccountsPort>) -> Arc<Service> {
    Arc::new(Service::new(
        Arc::new(SeaOrmDoctorsRepository::new(db.clone())),
        Arc::new(SeaOrmAppointmentsRepository::new(db.clone())),
        accounts,
        ServiceConfig::default(),
    ))
}
