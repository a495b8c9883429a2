//! Persistence seams for leave requests and user identities.
//!
//! Services depend on these traits only; `mysql` provides the production
//! adapters.

pub mod mysql;

use crate::{
    error::StorageError,
    model::{
        leave_request::{LeaveRequest, LeaveStatus},
        user::UserRecord,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};

/// Result of a conditional status change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The record was Pending and now carries the target status.
    Applied(LeaveRequest),
    /// No record with that id.
    Missing,
    /// The record exists but is no longer Pending.
    Blocked(LeaveStatus),
}

#[async_trait]
pub trait LeaveStore: Send + Sync {
    async fn insert(&self, leave: &LeaveRequest) -> Result<(), StorageError>;

    async fn find(&self, leave_id: &str) -> Result<Option<LeaveRequest>, StorageError>;

    async fn list_for_employee(&self, employee_id: &str)
    -> Result<Vec<LeaveRequest>, StorageError>;

    /// Every record, newest `start_date` first.
    async fn list_all(&self) -> Result<Vec<LeaveRequest>, StorageError>;

    /// Move a Pending record to `target` in a single conditional write.
    async fn transition(
        &self,
        leave_id: &str,
        target: LeaveStatus,
    ) -> Result<Transition, StorageError>;

    /// Returns `false` when nothing was deleted.
    async fn delete(&self, leave_id: &str) -> Result<bool, StorageError>;
}

#[async_trait]
pub trait UserDirectory: Send + Sync {
    /// Returns `false` when the email is already registered.
    async fn create_user(&self, user: &UserRecord) -> Result<bool, StorageError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StorageError>;

    async fn revoke_token(&self, jti: &str, expires_at: DateTime<Utc>)
    -> Result<(), StorageError>;

    async fn is_revoked(&self, jti: &str) -> Result<bool, StorageError>;
}
