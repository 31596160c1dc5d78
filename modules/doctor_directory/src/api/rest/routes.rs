use std::sync::Arc;

use axum::{
    routing::{get, post},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// All doctor_directory routes with the service attached.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let routes = Router::new()
        .route("/doctors", get(handlers::search_doctors))
        .route("/doctors/register", post(handlers::register_doctor))
        .route("/doctors/{id}", get(handlers::get_doctor))
        .route("/doctors/{id}/appointments", post(handlers::book_appointment))
        .route("/appointments/{id}", get(handlers::get_appointment))
        .route("/time-slots", get(handlers::list_time_slots))
        .layer(Extension(service));

    router.merge(routes)
}
