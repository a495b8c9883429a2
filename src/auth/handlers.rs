use crate::{
    auth::guard::{AccessGuard, bearer_token},
    error::ApiError,
    model::user::Principal,
    models::{SignInReq, SignInResponse, SignUpReq, SignUpResponse},
};
use actix_web::{HttpRequest, HttpResponse, http::header::AUTHORIZATION, web};
use serde_json::json;
use tracing::{info, instrument};

/// Register a new user with a role
#[utoipa::path(
    post,
    path = "/signup",
    request_body = SignUpReq,
    responses(
        (status = 201, description = "User created", body = SignUpResponse),
        (status = 400, description = "Invalid input or email already in use"),
        (status = 429, description = "Too many requests")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_signup", skip(guard, user), fields(email = %user.email))]
pub async fn signup(
    user: web::Json<SignUpReq>,
    guard: web::Data<AccessGuard>,
) -> Result<HttpResponse, ApiError> {
    info!("Sign-up request received");

    let (principal, token) = guard.sign_up(&user.email, &user.password, &user.role).await?;

    Ok(HttpResponse::Created().json(SignUpResponse {
        message: format!(
            "User {} created successfully with role {}.",
            principal.subject_id, principal.role
        ),
        user: principal,
        token,
    }))
}

/// Authenticate with email and password
#[utoipa::path(
    post,
    path = "/signin",
    request_body = SignInReq,
    responses(
        (status = 200, description = "Sign-in successful", body = SignInResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 429, description = "Too many requests")
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_signin", skip(guard, user), fields(email = %user.email))]
pub async fn signin(
    user: web::Json<SignInReq>,
    guard: web::Data<AccessGuard>,
) -> Result<HttpResponse, ApiError> {
    info!("Sign-in request received");

    let (principal, id_token) = guard.sign_in(&user.email, &user.password).await?;

    info!(user_id = %principal.subject_id, "Sign-in successful");
    Ok(HttpResponse::Ok().json(SignInResponse {
        message: "Sign-in successful".to_string(),
        user: principal,
        id_token,
    }))
}

/// Revoke the presented token
#[utoipa::path(
    post,
    path = "/signout",
    responses(
        (status = 200, description = "Token revoked", body = Object, example = json!({
            "message": "Signed out"
        })),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Auth"
)]
#[instrument(name = "auth_signout", skip_all, fields(user_id = %principal.subject_id))]
pub async fn signout(
    req: HttpRequest,
    principal: Principal,
    guard: web::Data<AccessGuard>,
) -> Result<HttpResponse, ApiError> {
    let header = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok());
    let token = bearer_token(header)?;

    guard.sign_out(token).await?;

    Ok(HttpResponse::Ok().json(json!({ "message": "Signed out" })))
}
