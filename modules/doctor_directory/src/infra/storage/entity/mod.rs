pub mod account;
pub mod appointment;
pub mod doctor;
pub mod profile;
