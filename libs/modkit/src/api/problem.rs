//! `application/problem+json` error bodies (RFC 9457) for axum handlers.

use axum::{
    http::{header, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const APPLICATION_PROBLEM_JSON: &str = "application/problem+json";

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "Problem", description = "RFC 9457 problem details")]
pub struct Problem {
    /// Catalog URL of the error kind, `about:blank` when uncatalogued.
    #[serde(rename = "type")]
    pub type_url: String,
    pub title: String,
    pub status: u16,
    pub detail: String,
    /// Request path the error belongs to.
    pub instance: String,
    /// Catalog code, e.g. `doctor_directory.doctor.not_found.v1`.
    pub code: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trace_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<ValidationError>>,
}

/// One rejected input field.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[schema(title = "ValidationError")]
pub struct ValidationError {
    pub detail: String,
    /// JSON pointer into the request body, e.g. `/confirm_password`.
    pub pointer: String,
}

impl Problem {
    pub fn new(status: StatusCode, title: impl Into<String>, detail: impl Into<String>) -> Self {
        Self {
            type_url: "about:blank".to_owned(),
            title: title.into(),
            status: status.as_u16(),
            detail: detail.into(),
            instance: String::new(),
            code: String::new(),
            request_id: None,
            trace_id: None,
            errors: None,
        }
    }

    pub fn with_type(self, type_url: impl Into<String>) -> Self {
        Self {
            type_url: type_url.into(),
            ..self
        }
    }

    pub fn with_code(self, code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            ..self
        }
    }

    pub fn with_instance(self, path: impl Into<String>) -> Self {
        Self {
            instance: path.into(),
            ..self
        }
    }

    pub fn with_request_id(self, id: impl Into<String>) -> Self {
        Self {
            request_id: Some(id.into()),
            ..self
        }
    }

    pub fn with_trace_id(self, id: impl Into<String>) -> Self {
        Self {
            trace_id: Some(id.into()),
            ..self
        }
    }

    /// Append a field error; `field` becomes the pointer `/field`.
    pub fn with_field_error(mut self, field: &str, detail: impl Into<String>) -> Self {
        self.errors.get_or_insert_with(Vec::new).push(ValidationError {
            detail: detail.into(),
            pointer: format!("/{field}"),
        });
        self
    }

    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }
}

/// Handler error type: renders the wrapped [`Problem`] with its status.
#[derive(Debug, Clone)]
pub struct ProblemResponse(pub Problem);

impl From<Problem> for ProblemResponse {
    fn from(p: Problem) -> Self {
        Self(p)
    }
}

impl IntoResponse for ProblemResponse {
    fn into_response(self) -> Response {
        let status = self.0.status_code();
        let mut resp = (status, axum::Json(self.0)).into_response();
        resp.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static(APPLICATION_PROBLEM_JSON),
        );
        resp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_carries_status_and_problem_content_type() {
        let p = Problem::new(StatusCode::CONFLICT, "Conflict", "email taken");
        let resp = ProblemResponse::from(p).into_response();
        assert_eq!(resp.status(), StatusCode::CONFLICT);
        assert_eq!(
            resp.headers().get(header::CONTENT_TYPE).unwrap(),
            APPLICATION_PROBLEM_JSON
        );
    }

    #[test]
    fn out_of_range_status_renders_as_500() {
        let mut p = Problem::new(StatusCode::OK, "Odd", "x");
        p.status = 1000;
        let resp = ProblemResponse(p).into_response();
        assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn field_errors_accumulate_as_pointers() {
        let p = Problem::new(StatusCode::UNPROCESSABLE_ENTITY, "Invalid registration", "x")
            .with_field_error("password", "Password must be at least 8 characters")
            .with_field_error("confirm_password", "Passwords do not match");
        let errors = p.errors.unwrap();
        assert_eq!(errors.len(), 2);
        assert_eq!(errors[0].pointer, "/password");
        assert_eq!(errors[1].pointer, "/confirm_password");
    }

    #[test]
    fn optional_members_are_omitted_from_json() {
        let v = serde_json::to_value(
            Problem::new(StatusCode::NOT_FOUND, "Doctor not found", "gone")
                .with_instance("/doctors/1"),
        )
        .unwrap();
        assert_eq!(v["type"], "about:blank");
        assert_eq!(v["instance"], "/doctors/1");
        assert!(v.get("request_id").is_none());
        assert!(v.get("trace_id").is_none());
        assert!(v.get("errors").is_none());

        let v = serde_json::to_value(
            Problem::new(StatusCode::NOT_FOUND, "Doctor not found", "gone")
                .with_request_id("req-9")
                .with_trace_id("77"),
        )
        .unwrap();
        assert_eq!(v["request_id"], "req-9");
        assert_eq!(v["trace_id"], "77");
    }
}
