use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, ToSchema,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    Employee,
    Manager,
}

/// Operations gated on the caller's role.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Capability {
    ReviewLeave,
    ListAllLeave,
    DeleteAnyLeave,
}

impl Role {
    /// Resolve stored role metadata. Missing or unrecognised values fall back
    /// to `Employee`.
    pub fn from_metadata(value: Option<&str>) -> Self {
        match value.map(str::parse::<Role>) {
            Some(Ok(role)) => role,
            Some(Err(_)) => {
                tracing::warn!(role = ?value, "Unknown role metadata, treating as employee");
                Role::Employee
            }
            None => Role::Employee,
        }
    }

    pub fn allows(&self, capability: Capability) -> bool {
        match capability {
            Capability::ReviewLeave | Capability::ListAllLeave | Capability::DeleteAnyLeave => {
                *self == Role::Manager
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_case_insensitively() {
        assert_eq!("Manager".parse::<Role>().unwrap(), Role::Manager);
        assert_eq!("employee".parse::<Role>().unwrap(), Role::Employee);
        assert!("admin".parse::<Role>().is_err());
    }

    #[test]
    fn absent_or_unknown_metadata_defaults_to_employee() {
        assert_eq!(Role::from_metadata(None), Role::Employee);
        assert_eq!(Role::from_metadata(Some("hr")), Role::Employee);
        assert_eq!(Role::from_metadata(Some("manager")), Role::Manager);
    }

    #[test]
    fn only_managers_hold_review_capabilities() {
        for cap in [
            Capability::ReviewLeave,
            Capability::ListAllLeave,
            Capability::DeleteAnyLeave,
        ] {
            assert!(Role::Manager.allows(cap));
            assert!(!Role::Employee.allows(cap));
        }
    }

    #[test]
    fn displays_lowercase() {
        assert_eq!(Role::Manager.to_string(), "manager");
    }
}
