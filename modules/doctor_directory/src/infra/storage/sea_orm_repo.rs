//! SeaORM-backed repositories for the domain ports.
//!
//! Generic over `C: ConnectionTrait`, so they work on a `DatabaseConnection`
//! or on a transaction.

use anyhow::Context;
use sea_orm::sea_query::{Expr, LikeExpr};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, Select,
};
use uuid::Uuid;

use crate::contract::model::{Appointment, Doctor, DoctorQuery, SortKey};
use crate::domain::query::fold_case;
use crate::domain::repo::{AppointmentsRepository, DoctorsRepository};
use crate::infra::storage::entity::appointment::Entity as AppointmentEntity;
use crate::infra::storage::entity::doctor::{Column, Entity as DoctorEntity};
use crate::infra::storage::mapper;

pub struct SeaOrmDoctorsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmDoctorsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

/// Escape LIKE wildcards so user text only ever matches literally.
pub(crate) fn escape_like(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// SQL `LOWER()` only folds ASCII on SQLite, so text is matched against
/// columns folded in Rust at insert time.
fn folded_contains(col: Column, pattern: &str) -> sea_orm::sea_query::SimpleExpr {
    Expr::col((DoctorEntity, col)).like(LikeExpr::new(pattern).escape('\\'))
}

fn search_select(query: &DoctorQuery) -> Select<DoctorEntity> {
    let mut select = DoctorEntity::find();

    if let Some(text) = query.effective_search_text() {
        let pattern = format!("%{}%", escape_like(&fold_case(text)));
        select = select.filter(
            Condition::any()
                .add(folded_contains(Column::SpecialtyFolded, &pattern))
                .add(folded_contains(Column::NameFolded, &pattern)),
        );
    }
    if let Some(region) = query.effective_region() {
        select = select.filter(Column::Region.eq(region));
    }

    let select = match query.sort {
        SortKey::Rating => select.order_by_desc(Column::Rating),
        SortKey::Experience => select.order_by_desc(Column::Experience),
        SortKey::FeeLow => select.order_by_asc(Column::ConsultationFee),
        SortKey::FeeHigh => select.order_by_desc(Column::ConsultationFee),
    };
    select.order_by_asc(Column::CreatedAt)
}

#[async_trait::async_trait]
impl<C> DoctorsRepository for SeaOrmDoctorsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn search(&self, query: &DoctorQuery) -> anyhow::Result<Vec<Doctor>> {
        let rows = search_select(query)
            .all(&self.conn)
            .await
            .context("doctor search failed")?;
        Ok(rows.into_iter().map(mapper::doctor_to_contract).collect())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Doctor>> {
        let found = DoctorEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find doctor by id failed")?;
        Ok(found.map(mapper::doctor_to_contract))
    }

    async fn insert(&self, doctor: Doctor) -> anyhow::Result<()> {
        let _ = mapper::doctor_to_active(doctor)
            .insert(&self.conn)
            .await
            .context("insert doctor failed")?;
        Ok(())
    }

    async fn count(&self) -> anyhow::Result<u64> {
        DoctorEntity::find()
            .count(&self.conn)
            .await
            .context("count doctors failed")
    }
}

pub struct SeaOrmAppointmentsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmAppointmentsRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> AppointmentsRepository for SeaOrmAppointmentsRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn insert(&self, appointment: Appointment) -> anyhow::Result<()> {
        let _ = mapper::appointment_to_active(appointment)
            .insert(&self.conn)
            .await
            .context("insert appointment failed")?;
        Ok(())
    }

    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Appointment>> {
        let found = AppointmentEntity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find appointment by id failed")?;
        found.map(mapper::appointment_to_contract).transpose()
    }
}
