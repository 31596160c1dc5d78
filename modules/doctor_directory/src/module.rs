use std::sync::Arc;

use anyhow::Context;
use arc_swap::ArcSwapOption;
use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info};
use url::Url;
use utoipa::OpenApi;

use crate::api::rest::{openapi::DoctorDirectoryDoc, routes};
use crate::config::DoctorDirectoryConfig;
use crate::contract::client::DoctorDirectoryApi;
use crate::domain::ports::AccountsPort;
use crate::domain::service::{Service, ServiceConfig};
use crate::gateways::local::DoctorDirectoryLocalClient;
use crate::infra::accounts::{HttpAccountsClient, LocalAccounts};
use crate::infra::storage::sea_orm_repo::{SeaOrmAppointmentsRepository, SeaOrmDoctorsRepository};
use crate::infra::storage::{seed, Migrator};
use modkit::TracedClient;

/// Module entry point: owns the wired service once `init` has run.
#[derive(Default)]
pub struct DoctorDirectory {
    service: ArcSwapOption<Service>,
}

impl DoctorDirectory {
    pub const NAME: &'static str = "doctor_directory";

    pub async fn migrate(&self, db: &DatabaseConnection) -> anyhow::Result<()> {
        info!("Running doctor_directory database migrations");
        Migrator::up(db, None)
            .await
            .context("doctor_directory migrations failed")?;
        Ok(())
    }

    /// Wire repositories and the accounts adapter into the service; seed if configured.
    pub async fn init(&self, cfg: DoctorDirectoryConfig, db: DatabaseConnection) -> anyhow::Result<()> {
        info!("Initializing doctor_directory module");
        debug!(
            "Loaded doctor_directory config: seed_on_startup={}, fallback_fee={}",
            cfg.seed_on_startup, cfg.fallback_fee
        );

        let doctors = Arc::new(SeaOrmDoctorsRepository::new(db.clone()));
        let appointments = Arc::new(SeaOrmAppointmentsRepository::new(db.clone()));
        let accounts = accounts_adapter(&cfg, db)?;

        if cfg.seed_on_startup {
            seed::seed_if_empty(doctors.as_ref())
                .await
                .context("seeding doctors failed")?;
        }

        let service = Service::new(
            doctors,
            appointments,
            accounts,
            ServiceConfig {
                fallback_fee: cfg.fallback_fee,
                default_rating: cfg.default_rating,
                ..ServiceConfig::default()
            },
        );
        self.service.store(Some(Arc::new(service)));
        Ok(())
    }

    pub fn service(&self) -> anyhow::Result<Arc<Service>> {
        self.service
            .load_full()
            .ok_or_else(|| anyhow::anyhow!("Service not initialized"))
    }

    /// In-process client for other modules.
    pub fn client(&self) -> anyhow::Result<Arc<dyn DoctorDirectoryApi>> {
        Ok(Arc::new(DoctorDirectoryLocalClient::new(self.service()?)))
    }

    pub fn register_rest(&self, router: axum::Router) -> anyhow::Result<axum::Router> {
        info!("Registering doctor_directory REST routes");
        Ok(routes::register_routes(router, self.service()?))
    }

    pub fn openapi() -> utoipa::openapi::OpenApi {
        DoctorDirectoryDoc::openapi()
    }
}

fn accounts_adapter(
    cfg: &DoctorDirectoryConfig,
    db: DatabaseConnection,
) -> anyhow::Result<Arc<dyn AccountsPort>> {
    match cfg.accounts_base_url.as_deref().filter(|s| !s.trim().is_empty()) {
        Some(base) => {
            let base = Url::parse(base)
                .with_context(|| format!("invalid accounts_base_url '{base}'"))?;
            info!(%base, "Using hosted accounts service");
            Ok(Arc::new(HttpAccountsClient::new(
                TracedClient::default(),
                base,
                cfg.accounts_api_key.clone(),
            )))
        }
        None => Ok(Arc::new(LocalAccounts::new(db))),
    }
}
