use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use uuid::Uuid;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "doctors")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub name: String,
    pub specialty: String,
    pub experience: i32,
    pub region: String,
    pub clinic_name: String,
    pub address: Option<String>,
    #[sea_orm(column_type = "Double")]
    pub rating: f64,
    pub reviews: i32,
    pub consultation_fee: i32,
    pub availability: String,
    pub qualifications: Option<String>,
    pub about: Option<String>,
    pub phone: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Case-folded `name`, written on insert and matched by search.
    pub name_folded: String,
    pub specialty_folded: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::appointment::Entity")]
    Appointments,
}

impl Related<super::appointment::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Appointments.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
