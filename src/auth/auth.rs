use crate::{
    auth::guard::{AccessGuard, bearer_token},
    error::ApiError,
    model::{
        leave_request::LeaveRequest,
        role::Capability,
        user::Principal,
    },
};
use actix_web::{FromRequest, HttpRequest, dev::Payload, http::header::AUTHORIZATION, web::Data};
use futures::future::LocalBoxFuture;

impl FromRequest for Principal {
    type Error = ApiError;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        let header = req
            .headers()
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(str::to_owned);
        let guard = req.app_data::<Data<AccessGuard>>().cloned();

        Box::pin(async move {
            let guard = guard.ok_or_else(|| ApiError::Internal("Access guard missing".into()))?;
            let token = bearer_token(header.as_deref())?;
            guard.authenticate(token).await
        })
    }
}

impl Principal {
    pub fn require(&self, capability: Capability, denial: &str) -> Result<(), ApiError> {
        if self.role.allows(capability) {
            Ok(())
        } else {
            tracing::info!(user_id = %self.subject_id, ?capability, "Forbidden");
            Err(ApiError::Forbidden(denial.to_string()))
        }
    }

    /// Owners may always remove their own request; anyone else needs
    /// [`Capability::DeleteAnyLeave`].
    pub fn may_delete(&self, leave: &LeaveRequest) -> bool {
        leave.employee_id == self.subject_id || self.role.allows(Capability::DeleteAnyLeave)
    }
}
