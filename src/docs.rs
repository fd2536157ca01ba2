use crate::model::employee::{AttendanceEntry, FeedbackDay, PerformanceEntry};
use crate::models::{
    ActionRequest, AdminStatus, DateRequest, FeedbackResponse, MessageResponse,
    PerformanceRequest, RegisteredResponse, TokenResponse,
};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "EMS API",
        version = "1.0.0",
        description = r#"
## Employee Management System (EMS)

Backend for employee profiles and their per-day timeline.

### Features
- **Users**
  - Register employees, look them up by email, list all
- **Attendance**
  - Clock in / clock out per day, payroll and communication labels per day
- **Performance**
  - One score per day, add/update/reset
- **Feedback**
  - Daily read view with display defaults

### Security
`POST /jwt` issues a bearer token valid for 7 days.
Only the admin check requires it, and the admin role is always read from the stored record.

---
Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::auth::handlers::issue_token,
        crate::auth::handlers::admin_status,

        crate::api::users::get_users,
        crate::api::users::register,
        crate::api::users::apply_action,
        crate::api::users::set_performance,
        crate::api::users::reset_communication,
        crate::api::users::reset_payroll,
        crate::api::users::reset_performance,
        crate::api::users::delete_attendance,
        crate::api::users::feedback
    ),
    components(
        schemas(
            ActionRequest,
            PerformanceRequest,
            DateRequest,
            MessageResponse,
            TokenResponse,
            AdminStatus,
            RegisteredResponse,
            FeedbackResponse,
            FeedbackDay,
            AttendanceEntry,
            PerformanceEntry
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Token issuance and admin check"),
        (name = "Users", description = "Employee records, attendance and performance"),
        (name = "Feedback", description = "Derived read views"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .build(),
                ),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_every_route() {
        let doc = ApiDoc::openapi();
        for path in [
            "/jwt",
            "/users",
            "/users/admin/{email}",
            "/users/{id}",
            "/users/{id}/performance",
            "/users/{id}/attendance/delete",
            "/feedback",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
