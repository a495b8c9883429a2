use crate::{
    auth::{
        jwt::{expires_at, generate_token, verify_token},
        password::{hash_password, verify_password},
    },
    error::{ApiError, AuthError},
    model::{
        role::Role,
        user::{Principal, UserRecord},
    },
    store::UserDirectory,
};
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

const MIN_PASSWORD_LEN: usize = 6;

/// Pull the token out of an `Authorization` header value.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    header
        .and_then(|h| h.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::Missing)
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Issues, verifies and revokes bearer tokens against a [`UserDirectory`].
pub struct AccessGuard {
    directory: Arc<dyn UserDirectory>,
    jwt_secret: String,
    token_ttl: usize,
}

impl AccessGuard {
    pub fn new(directory: Arc<dyn UserDirectory>, jwt_secret: String, token_ttl: usize) -> Self {
        Self {
            directory,
            jwt_secret,
            token_ttl,
        }
    }

    /// Resolve a bearer token into the caller's identity and current role.
    pub async fn authenticate(&self, token: &str) -> Result<Principal, ApiError> {
        let claims = verify_token(token, &self.jwt_secret)?;

        if self.directory.is_revoked(&claims.jti).await? {
            debug!(jti = %claims.jti, "Rejected revoked token");
            return Err(AuthError::Revoked.into());
        }

        match self.directory.find_by_id(&claims.sub).await? {
            Some(user) => Ok(Principal::from(&user)),
            None => {
                warn!(subject = %claims.sub, "Token subject no longer exists");
                Err(AuthError::Invalid.into())
            }
        }
    }

    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<(Principal, String), ApiError> {
        let role: Role = role.trim().parse().map_err(|_| {
            ApiError::validation("role", "Invalid role. Must be 'employee' or 'manager'.")
        })?;

        let email = normalize_email(email);
        if email.is_empty() || !email.contains('@') {
            return Err(ApiError::validation("email", "a valid email address is required"));
        }
        if password.chars().count() < MIN_PASSWORD_LEN {
            return Err(ApiError::validation(
                "password",
                format!("password must be at least {MIN_PASSWORD_LEN} characters"),
            ));
        }

        let password_hash = hash_password(password)
            .map_err(|e| ApiError::Internal(format!("Failed to hash password: {e}")))?;

        let user = UserRecord {
            id: Uuid::new_v4().to_string(),
            email,
            password_hash,
            role: Some(role.to_string()),
        };

        if !self.directory.create_user(&user).await? {
            info!(email = %user.email, "Sign-up rejected: email already registered");
            return Err(ApiError::EmailTaken);
        }

        info!(user_id = %user.id, role = %role, "User created");
        let token = self.issue(&user)?;
        Ok((Principal::from(&user), token))
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<(Principal, String), ApiError> {
        let user = match self.directory.find_by_email(&normalize_email(email)).await? {
            Some(user) => user,
            None => {
                info!("Invalid credentials: user not found");
                return Err(AuthError::BadCredentials.into());
            }
        };

        if let Err(e) = verify_password(password, &user.password_hash) {
            info!(error = %e, user_id = %user.id, "Invalid credentials: password mismatch");
            return Err(AuthError::BadCredentials.into());
        }

        let token = self.issue(&user)?;
        Ok((Principal::from(&user), token))
    }

    /// Revoke a token until it would have expired anyway.
    pub async fn sign_out(&self, token: &str) -> Result<(), ApiError> {
        let claims = verify_token(token, &self.jwt_secret)?;
        self.directory
            .revoke_token(&claims.jti, expires_at(&claims))
            .await?;
        info!(user_id = %claims.sub, jti = %claims.jti, "Token revoked");
        Ok(())
    }

    fn issue(&self, user: &UserRecord) -> Result<String, ApiError> {
        generate_token(&user.id, &user.email, &self.jwt_secret, self.token_ttl)
            .map(|(token, _)| token)
            .map_err(|e| ApiError::Internal(format!("Failed to issue token: {e}")))
    }
}
