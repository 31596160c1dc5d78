use utoipa::OpenApi;

use crate::api::rest::{dto, handlers};

#[derive(OpenApi)]
#[openapi(
    info(title = "Doctor Directory API", version = "0.1.0"),
    paths(
        handlers::search_doctors,
        handlers::get_doctor,
        handlers::register_doctor,
        handlers::book_appointment,
        handlers::get_appointment,
        handlers::list_time_slots,
    ),
    components(schemas(
        dto::DoctorDto,
        dto::DoctorListDto,
        dto::RegisterDoctorReq,
        dto::FormNumber,
        dto::BookAppointmentReq,
        dto::AppointmentDto,
        dto::TimeSlotDto,
        modkit::Problem,
        modkit::ValidationError,
    )),
    tags(
        (name = "doctors", description = "Doctor search and registration"),
        (name = "appointments", description = "Appointment booking")
    )
)]
pub struct DoctorDirectoryDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = DoctorDirectoryDoc::openapi();
        let paths: Vec<&str> = doc.paths.paths.keys().map(String::as_str).collect();
        for p in [
            "/doctors",
            "/doctors/{id}",
            "/doctors/register",
            "/doctors/{id}/appointments",
            "/appointments/{id}",
            "/time-slots",
        ] {
            assert!(paths.contains(&p), "missing {p}");
        }
    }
}
