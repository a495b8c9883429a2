use crate::model::role::Role;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct UserRecord {
    pub id: String,
    pub email: String,
    pub password_hash: String,
    /// `None` when no role was ever assigned.
    pub role: Option<String>,
}

impl UserRecord {
    pub fn role(&self) -> Role {
        Role::from_metadata(self.role.as_deref())
    }
}

/// An authenticated caller, resolved from a bearer token on every request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct Principal {
    #[serde(rename = "uid")]
    pub subject_id: String,
    pub email: String,
    pub role: Role,
}

impl From<&UserRecord> for Principal {
    fn from(user: &UserRecord) -> Self {
        Principal {
            subject_id: user.id.clone(),
            email: user.email.clone(),
            role: user.role(),
        }
    }
}
