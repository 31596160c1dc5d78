//! Catalog-driven Problem building.
use http::StatusCode;

use crate::api::problem::Problem;

/// Static error definition from a module's error catalog.
#[derive(Debug, Clone, Copy)]
pub struct ErrDef {
    pub status: u16,
    pub title: &'static str,
    pub code: &'static str,
    pub type_url: &'static str,
}

impl ErrDef {
    #[inline]
    pub fn to_problem(&self, detail: impl Into<String>) -> Problem {
        Problem::new(
            StatusCode::from_u16(self.status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            self.title,
            detail.into(),
        )
        .with_code(self.code)
        .with_type(self.type_url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn err_def_to_problem_works() {
        let def = ErrDef {
            status: 404,
            title: "Doctor not found",
            code: "DOCTORS_NOT_FOUND",
            type_url: "https://errors.clinic.local/DOCTORS_NOT_FOUND",
        };

        let problem = def.to_problem("Doctor 42 missing");
        assert_eq!(problem.status, 404);
        assert_eq!(problem.title, "Doctor not found");
        assert_eq!(problem.detail, "Doctor 42 missing");
        assert_eq!(problem.code, "DOCTORS_NOT_FOUND");
        assert_eq!(
            problem.type_url,
            "https://errors.clinic.local/DOCTORS_NOT_FOUND"
        );
    }

    #[test]
    fn unknown_status_falls_back_to_500() {
        let def = ErrDef {
            status: 1000,
            title: "Broken",
            code: "BROKEN",
            type_url: "about:blank",
        };
        assert_eq!(def.to_problem("x").status, 500);
    }
}
