use crate::model::leave_request::{CreateLeave, LeaveRequest, LeaveStatus, LeaveType};
use crate::model::role::Role;
use crate::model::user::Principal;
use crate::models::{SignInReq, SignInResponse, SignUpReq, SignUpResponse};
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi, openapi};

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Leave Management API",
        version = "1.0.0",
        description = r#"
## Leave Management System

Employees submit and track leave requests; managers review them.

### Leave lifecycle
- New requests start as **Pending**
- A manager moves a Pending request to **Approved** or **Rejected**
- Approved and Rejected are final

### Security
Every `/leave` endpoint expects `Authorization: Bearer <token>`.
Tokens come from `/signup` or `/signin` and can be revoked with `/signout`.
Roles are **employee** and **manager**; only managers may approve, reject
or list every request.

### Errors
Failures return `{"code": "...", "detail": "..."}`.
"#,
    ),
    paths(
        crate::auth::handlers::signup,
        crate::auth::handlers::signin,
        crate::auth::handlers::signout,

        crate::api::leave_request::create_leave,
        crate::api::leave_request::my_leaves,
        crate::api::leave_request::all_leaves,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,
        crate::api::leave_request::delete_leave
    ),
    components(
        schemas(
            CreateLeave,
            LeaveRequest,
            LeaveStatus,
            LeaveType,
            Role,
            Principal,
            SignUpReq,
            SignUpResponse,
            SignInReq,
            SignInResponse
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Auth", description = "Sign-up, sign-in and sign-out"),
        (name = "Leave", description = "Leave management APIs"),
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
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
    fn document_lists_every_route_and_bearer_scheme() {
        let doc = ApiDoc::openapi();
        for path in [
            "/signup",
            "/signin",
            "/signout",
            "/leave",
            "/leaves/all",
            "/leave/{leave_id}",
            "/leave/{leave_id}/approve",
            "/leave/{leave_id}/reject",
        ] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }

        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("bearer_auth"));
    }
}
