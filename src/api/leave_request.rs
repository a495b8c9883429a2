use crate::{
    error::ApiError,
    model::{
        leave_request::CreateLeave,
        user::Principal,
    },
    service::leave::LeaveLifecycle,
};
use actix_web::{HttpResponse, web};
use serde_json::json;
use tracing::instrument;

/* =========================
Submit leave request
========================= */
#[utoipa::path(
    post,
    path = "/leave",
    request_body(
        content = CreateLeave,
        description = "Leave request payload",
        content_type = "application/json"
    ),
    responses(
        (status = 201, description = "Leave request submitted", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "Validation error"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Database access denied"),
        (status = 500, description = "Database error")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(skip_all, fields(user_id = %principal.subject_id))]
pub async fn create_leave(
    principal: Principal,
    lifecycle: web::Data<LeaveLifecycle>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    let leave = lifecycle.submit(&principal, payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(leave))
}

/* =========================
Own leave requests
========================= */
#[utoipa::path(
    get,
    path = "/leave",
    responses(
        (status = 200, description = "Leave requests of the caller", body = [crate::model::leave_request::LeaveRequest]),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(skip_all, fields(user_id = %principal.subject_id))]
pub async fn my_leaves(
    principal: Principal,
    lifecycle: web::Data<LeaveLifecycle>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(lifecycle.list_mine(&principal).await?))
}

/* =========================
All leave requests (manager)
========================= */
#[utoipa::path(
    get,
    path = "/leaves/all",
    responses(
        (status = 200, description = "All leave requests, newest start date first", body = [crate::model::leave_request::LeaveRequest]),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(skip_all, fields(user_id = %principal.subject_id))]
pub async fn all_leaves(
    principal: Principal,
    lifecycle: web::Data<LeaveLifecycle>,
) -> Result<HttpResponse, ApiError> {
    Ok(HttpResponse::Ok().json(lifecycle.list_all(&principal).await?))
}

/* =========================
Approve leave (manager)
========================= */
#[utoipa::path(
    post,
    path = "/leave/{leave_id}/approve",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "Leave request is not Pending"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(skip_all, fields(user_id = %principal.subject_id, leave_id = %path))]
pub async fn approve_leave(
    principal: Principal,
    lifecycle: web::Data<LeaveLifecycle>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let leave = lifecycle.approve(&principal, &path).await?;
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Reject leave (manager)
========================= */
#[utoipa::path(
    post,
    path = "/leave/{leave_id}/reject",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = crate::model::leave_request::LeaveRequest),
        (status = 400, description = "Leave request is not Pending"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(skip_all, fields(user_id = %principal.subject_id, leave_id = %path))]
pub async fn reject_leave(
    principal: Principal,
    lifecycle: web::Data<LeaveLifecycle>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let leave = lifecycle.reject(&principal, &path).await?;
    Ok(HttpResponse::Ok().json(leave))
}

/* =========================
Delete leave (owner or manager)
========================= */
#[utoipa::path(
    delete,
    path = "/leave/{leave_id}",
    params(
        ("leave_id" = String, Path, description = "ID of the leave request to delete")
    ),
    responses(
        (status = 200, description = "Leave request deleted", body = Object, example = json!({
            "message": "Leave request 6f1c1b8e-6d0a-4a53-9d5f-3b1f0f3f6c11 deleted successfully.",
            "leave_id": "6f1c1b8e-6d0a-4a53-9d5f-3b1f0f3f6c11"
        })),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
#[instrument(skip_all, fields(user_id = %principal.subject_id, leave_id = %path))]
pub async fn delete_leave(
    principal: Principal,
    lifecycle: web::Data<LeaveLifecycle>,
    path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();
    lifecycle.delete(&principal, &leave_id).await?;

    Ok(HttpResponse::Ok().json(json!({
        "message": format!("Leave request {leave_id} deleted successfully."),
        "leave_id": leave_id,
    })))
}
