use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(DeriveIden)]
enum Doctors {
    Table,
    Id,
    UserId,
    Name,
    Specialty,
    Experience,
    Region,
    ClinicName,
    Address,
    Rating,
    Reviews,
    ConsultationFee,
    Availability,
    Qualifications,
    About,
    Phone,
    CreatedAt,
    NameFolded,
    SpecialtyFolded,
}

#[derive(DeriveIden)]
enum Appointments {
    Table,
    Id,
    PatientId,
    DoctorId,
    AppointmentDate,
    AppointmentTime,
    Reason,
    Status,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Accounts {
    Table,
    Id,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Profiles {
    Table,
    Id,
    FullName,
    Email,
    Phone,
    CreatedAt,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Doctors::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Doctors::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Doctors::UserId).uuid().null())
                    .col(ColumnDef::new(Doctors::Name).string().not_null())
                    .col(ColumnDef::new(Doctors::Specialty).string().not_null())
                    .col(ColumnDef::new(Doctors::Experience).integer().not_null().default(0))
                    .col(ColumnDef::new(Doctors::Region).string().not_null())
                    .col(ColumnDef::new(Doctors::ClinicName).string().not_null())
                    .col(ColumnDef::new(Doctors::Address).string().null())
                    .col(ColumnDef::new(Doctors::Rating).double().not_null().default(4.0))
                    .col(ColumnDef::new(Doctors::Reviews).integer().not_null().default(0))
                    .col(ColumnDef::new(Doctors::ConsultationFee).integer().not_null())
                    .col(ColumnDef::new(Doctors::Availability).string().not_null())
                    .col(ColumnDef::new(Doctors::Qualifications).string().null())
                    .col(ColumnDef::new(Doctors::About).text().null())
                    .col(ColumnDef::new(Doctors::Phone).string().null())
                    .col(
                        ColumnDef::new(Doctors::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Doctors::NameFolded).string().not_null())
                    .col(ColumnDef::new(Doctors::SpecialtyFolded).string().not_null())
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_doctors_region")
                    .table(Doctors::Table)
                    .col(Doctors::Region)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Appointments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Appointments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Appointments::PatientId).uuid().not_null())
                    .col(ColumnDef::new(Appointments::DoctorId).uuid().not_null())
                    .col(ColumnDef::new(Appointments::AppointmentDate).date().not_null())
                    .col(ColumnDef::new(Appointments::AppointmentTime).string().not_null())
                    .col(ColumnDef::new(Appointments::Reason).text().null())
                    .col(
                        ColumnDef::new(Appointments::Status)
                            .string()
                            .not_null()
                            .default("pending"),
                    )
                    .col(
                        ColumnDef::new(Appointments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_appointments_doctor")
                            .from(Appointments::Table, Appointments::DoctorId)
                            .to(Doctors::Table, Doctors::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Accounts::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Accounts::Id).uuid().not_null().primary_key())
                    .col(
                        ColumnDef::new(Accounts::Email)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(Accounts::PasswordHash).string().not_null())
                    .col(ColumnDef::new(Accounts::Role).string().not_null())
                    .col(
                        ColumnDef::new(Accounts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Profiles::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Profiles::FullName).string().not_null())
                    .col(ColumnDef::new(Profiles::Email).string().not_null())
                    .col(ColumnDef::new(Profiles::Phone).string().null())
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_profiles_account")
                            .from(Profiles::Table, Profiles::Id)
                            .to(Accounts::Table, Accounts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Accounts::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Appointments::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Doctors::Table).to_owned())
            .await
    }
}
