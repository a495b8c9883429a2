//! In-memory adapters and fixtures for unit and HTTP tests.

use crate::{
    config::Config,
    error::StorageError,
    model::{
        leave_request::{LeaveRequest, LeaveStatus},
        user::UserRecord,
    },
    store::{LeaveStore, Transition, UserDirectory},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::Mutex,
};

#[derive(Default)]
pub struct InMemoryLeaveStore {
    rows: Mutex<Vec<LeaveRequest>>,
}

#[async_trait]
impl LeaveStore for InMemoryLeaveStore {
    async fn insert(&self, leave: &LeaveRequest) -> Result<(), StorageError> {
        self.rows.lock().unwrap().push(leave.clone());
        Ok(())
    }

    async fn find(&self, leave_id: &str) -> Result<Option<LeaveRequest>, StorageError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .find(|l| l.leave_id == leave_id)
            .cloned())
    }

    async fn list_for_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<LeaveRequest>, StorageError> {
        Ok(self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|l| l.employee_id == employee_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<LeaveRequest>, StorageError> {
        let mut rows = self.rows.lock().unwrap().clone();
        rows.sort_by(|a, b| b.start_date.cmp(&a.start_date));
        Ok(rows)
    }

    async fn transition(
        &self,
        leave_id: &str,
        target: LeaveStatus,
    ) -> Result<Transition, StorageError> {
        let mut rows = self.rows.lock().unwrap();
        Ok(match rows.iter_mut().find(|l| l.leave_id == leave_id) {
            None => Transition::Missing,
            Some(leave) if leave.status == LeaveStatus::Pending => {
                leave.status = target;
                Transition::Applied(leave.clone())
            }
            Some(leave) => Transition::Blocked(leave.status),
        })
    }

    async fn delete(&self, leave_id: &str) -> Result<bool, StorageError> {
        let mut rows = self.rows.lock().unwrap();
        let before = rows.len();
        rows.retain(|l| l.leave_id != leave_id);
        Ok(rows.len() < before)
    }
}

/// Every call fails with the same error.
pub struct FailingLeaveStore(pub StorageError);

#[async_trait]
impl LeaveStore for FailingLeaveStore {
    async fn insert(&self, _: &LeaveRequest) -> Result<(), StorageError> {
        Err(self.0.clone())
    }

    async fn find(&self, _: &str) -> Result<Option<LeaveRequest>, StorageError> {
        Err(self.0.clone())
    }

    async fn list_for_employee(&self, _: &str) -> Result<Vec<LeaveRequest>, StorageError> {
        Err(self.0.clone())
    }

    async fn list_all(&self) -> Result<Vec<LeaveRequest>, StorageError> {
        Err(self.0.clone())
    }

    async fn transition(&self, _: &str, _: LeaveStatus) -> Result<Transition, StorageError> {
        Err(self.0.clone())
    }

    async fn delete(&self, _: &str) -> Result<bool, StorageError> {
        Err(self.0.clone())
    }
}

#[derive(Default)]
pub struct InMemoryUserDirectory {
    users: Mutex<HashMap<String, UserRecord>>,
    revoked: Mutex<HashMap<String, DateTime<Utc>>>,
}

#[async_trait]
impl UserDirectory for InMemoryUserDirectory {
    async fn create_user(&self, user: &UserRecord) -> Result<bool, StorageError> {
        let mut users = self.users.lock().unwrap();
        if users.values().any(|u| u.email == user.email) {
            return Ok(false);
        }
        users.insert(user.id.clone(), user.clone());
        Ok(true)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self
            .users
            .lock()
            .unwrap()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StorageError> {
        Ok(self.users.lock().unwrap().get(id).cloned())
    }

    async fn revoke_token(
        &self,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        self.revoked
            .lock()
            .unwrap()
            .insert(jti.to_string(), expires_at);
        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, StorageError> {
        Ok(self.revoked.lock().unwrap().contains_key(jti))
    }
}

pub fn test_config() -> Config {
    Config {
        database_url: "mysql://unused".to_string(),
        jwt_secret: "http-test-secret".to_string(),
        server_addr: "127.0.0.1:0".to_string(),
        token_ttl: 3600,
        storage_timeout_ms: 1000,
        rate_signin_per_min: 1000,
        rate_signup_per_min: 1000,
        log_dir: "logs".to_string(),
    }
}
