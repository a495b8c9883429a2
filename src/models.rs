use crate::model::user::Principal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Deserialize, ToSchema)]
pub struct SignUpReq {
    #[schema(example = "jane@company.com")]
    pub email: String,
    #[schema(example = "hunter22")]
    pub password: String,
    /// `employee` or `manager`
    #[schema(example = "employee")]
    pub role: String,
}

#[derive(Deserialize, ToSchema)]
pub struct SignInReq {
    #[schema(example = "jane@company.com")]
    pub email: String,
    #[schema(example = "hunter22")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct SignUpResponse {
    pub message: String,
    pub user: Principal,
    pub token: String,
}

#[derive(Serialize, ToSchema)]
pub struct SignInResponse {
    pub message: String,
    pub user: Principal,
    pub id_token: String,
}

#[derive(Debug, PartialEq, Serialize, Deserialize)]
pub struct Claims {
    /// subject (user) id
    pub sub: String,
    pub email: String,
    pub iat: usize,
    pub exp: usize,
    pub jti: String,
}
