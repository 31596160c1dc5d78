pub mod entity;
pub mod mapper;
pub mod migrations;
pub mod sea_orm_repo;
pub mod seed;

pub use migrations::Migrator;
pub use sea_orm_repo::{SeaOrmAppointmentsRepository, SeaOrmDoctorsRepository};
