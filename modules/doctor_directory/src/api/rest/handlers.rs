use std::sync::Arc;

use axum::{
    extract::{Path, Query},
    http::{StatusCode, Uri},
    response::Json,
    Extension,
};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    AppointmentDto, BookAppointmentReq, DoctorDto, DoctorListDto, RegisterDoctorReq,
    SearchDoctorsQuery, TimeSlotDto,
};
use crate::api::rest::error::map_domain_error;
use crate::contract::model::{DoctorQuery, NewAppointment, TimeSlot};
use crate::domain::service::Service;
use modkit::ProblemResponse;

/// Search doctors by specialty/name and region
#[utoipa::path(
    get,
    path = "/doctors",
    tag = "doctors",
    operation_id = "doctor_directory.search_doctors",
    params(SearchDoctorsQuery),
    responses(
        (status = 200, description = "Matching doctors", body = DoctorListDto),
        (status = 500, description = "Internal Server Error", body = modkit::Problem,
            content_type = "application/problem+json")
    )
)]
pub async fn search_doctors(
    Extension(svc): Extension<Arc<Service>>,
    Query(params): Query<SearchDoctorsQuery>,
    uri: Uri,
) -> Result<Json<DoctorListDto>, ProblemResponse> {
    info!("Searching doctors: {:?}", params);
    let query = DoctorQuery::from(params);
    let sort = query.sort.to_string();

    match svc.search_doctors(query).await {
        Ok(doctors) => {
            let doctors: Vec<DoctorDto> = doctors.into_iter().map(DoctorDto::from).collect();
            Ok(Json(DoctorListDto {
                total: doctors.len(),
                doctors,
                sort,
            }))
        }
        Err(e) => {
            error!("Failed to search doctors: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get a doctor by ID
#[utoipa::path(
    get,
    path = "/doctors/{id}",
    tag = "doctors",
    operation_id = "doctor_directory.get_doctor",
    params(("id" = Uuid, Path, description = "Doctor UUID")),
    responses(
        (status = 200, description = "Doctor found", body = DoctorDto),
        (status = 404, description = "Not Found", body = modkit::Problem,
            content_type = "application/problem+json"),
        (status = 500, description = "Internal Server Error", body = modkit::Problem,
            content_type = "application/problem+json")
    )
)]
pub async fn get_doctor(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> Result<Json<DoctorDto>, ProblemResponse> {
    info!("Getting doctor with id: {}", id);

    match svc.get_doctor(id).await {
        Ok(doctor) => Ok(Json(DoctorDto::from(doctor))),
        Err(e) => {
            error!("Failed to get doctor {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Register a doctor together with a new account
#[utoipa::path(
    post,
    path = "/doctors/register",
    tag = "doctors",
    operation_id = "doctor_directory.register_doctor",
    request_body = RegisterDoctorReq,
    responses(
        (status = 201, description = "Doctor registered", body = DoctorDto),
        (status = 409, description = "Conflict", body = modkit::Problem,
            content_type = "application/problem+json"),
        (status = 422, description = "Validation failed", body = modkit::Problem,
            content_type = "application/problem+json"),
        (status = 502, description = "Account service error", body = modkit::Problem,
            content_type = "application/problem+json")
    )
)]
pub async fn register_doctor(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Json(req_body): Json<RegisterDoctorReq>,
) -> Result<(StatusCode, Json<DoctorDto>), ProblemResponse> {
    info!("Registering doctor: {}", req_body.email);

    match svc.register_doctor(req_body.into()).await {
        Ok(doctor) => Ok((StatusCode::CREATED, Json(DoctorDto::from(doctor)))),
        Err(e) => {
            error!("Failed to register doctor: {}", e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Book an appointment with a doctor
#[utoipa::path(
    post,
    path = "/doctors/{id}/appointments",
    tag = "appointments",
    operation_id = "doctor_directory.book_appointment",
    params(("id" = Uuid, Path, description = "Doctor UUID")),
    request_body = BookAppointmentReq,
    responses(
        (status = 201, description = "Appointment created", body = AppointmentDto),
        (status = 404, description = "Doctor not found", body = modkit::Problem,
            content_type = "application/problem+json"),
        (status = 422, description = "Validation failed", body = modkit::Problem,
            content_type = "application/problem+json")
    )
)]
pub async fn book_appointment(
    uri: Uri,
    Extension(svc): Extension<Arc<Service>>,
    Path(doctor_id): Path<Uuid>,
    Json(req_body): Json<BookAppointmentReq>,
) -> Result<(StatusCode, Json<AppointmentDto>), ProblemResponse> {
    info!("Booking appointment with doctor {}", doctor_id);

    let request = NewAppointment {
        patient_id: req_body.patient_id,
        doctor_id,
        appointment_date: req_body.appointment_date,
        appointment_time: req_body.appointment_time,
        reason: req_body.reason,
    };
    match svc.book_appointment(request).await {
        Ok(appt) => Ok((StatusCode::CREATED, Json(AppointmentDto::from(appt)))),
        Err(e) => {
            error!("Failed to book appointment with {}: {}", doctor_id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// Get an appointment by ID
#[utoipa::path(
    get,
    path = "/appointments/{id}",
    tag = "appointments",
    operation_id = "doctor_directory.get_appointment",
    params(("id" = Uuid, Path, description = "Appointment UUID")),
    responses(
        (status = 200, description = "Appointment found", body = AppointmentDto),
        (status = 404, description = "Not Found", body = modkit::Problem,
            content_type = "application/problem+json")
    )
)]
pub async fn get_appointment(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    uri: Uri,
) -> Result<Json<AppointmentDto>, ProblemResponse> {
    match svc.get_appointment(id).await {
        Ok(appt) => Ok(Json(AppointmentDto::from(appt))),
        Err(e) => {
            error!("Failed to get appointment {}: {}", id, e);
            Err(map_domain_error(&e, uri.path()))
        }
    }
}

/// List bookable time slots
#[utoipa::path(
    get,
    path = "/time-slots",
    tag = "appointments",
    operation_id = "doctor_directory.list_time_slots",
    responses((status = 200, description = "Bookable slots", body = Vec<TimeSlotDto>))
)]
pub async fn list_time_slots() -> Json<Vec<TimeSlotDto>> {
    Json(TimeSlot::all().into_iter().map(TimeSlotDto::from).collect())
}
