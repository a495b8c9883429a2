//! Leave lifecycle: role-gated operations over the Pending → Approved |
//! Rejected state machine.

use crate::{
    error::ApiError,
    model::{
        leave_request::{CreateLeave, LeaveRequest, LeaveStatus},
        role::Capability,
        user::Principal,
    },
    store::{LeaveStore, Transition},
};
use std::sync::Arc;
use tracing::{error, info};
use uuid::Uuid;

pub struct LeaveLifecycle {
    store: Arc<dyn LeaveStore>,
}

impl LeaveLifecycle {
    pub fn new(store: Arc<dyn LeaveStore>) -> Self {
        Self { store }
    }

    pub async fn submit(
        &self,
        principal: &Principal,
        payload: CreateLeave,
    ) -> Result<LeaveRequest, ApiError> {
        let draft = payload.validate()?;
        let leave = draft.into_request(Uuid::new_v4().to_string(), principal.subject_id.clone());

        self.store.insert(&leave).await.map_err(|e| {
            error!(error = %e, employee_id = %leave.employee_id, "Failed to create leave request");
            e
        })?;

        info!(leave_id = %leave.leave_id, employee_id = %leave.employee_id, "Leave request submitted");
        Ok(leave)
    }

    pub async fn list_mine(&self, principal: &Principal) -> Result<Vec<LeaveRequest>, ApiError> {
        Ok(self.store.list_for_employee(&principal.subject_id).await?)
    }

    pub async fn list_all(&self, principal: &Principal) -> Result<Vec<LeaveRequest>, ApiError> {
        principal.require(
            Capability::ListAllLeave,
            "Only managers can view all leave requests.",
        )?;
        Ok(self.store.list_all().await?)
    }

    pub async fn approve(
        &self,
        principal: &Principal,
        leave_id: &str,
    ) -> Result<LeaveRequest, ApiError> {
        principal.require(
            Capability::ReviewLeave,
            "Only managers can approve leave requests.",
        )?;
        self.decide(principal, leave_id, LeaveStatus::Approved, "approve", "approved")
            .await
    }

    pub async fn reject(
        &self,
        principal: &Principal,
        leave_id: &str,
    ) -> Result<LeaveRequest, ApiError> {
        principal.require(
            Capability::ReviewLeave,
            "Only managers can reject leave requests.",
        )?;
        self.decide(principal, leave_id, LeaveStatus::Rejected, "reject", "rejected")
            .await
    }

    async fn decide(
        &self,
        principal: &Principal,
        leave_id: &str,
        target: LeaveStatus,
        action: &'static str,
        done: &'static str,
    ) -> Result<LeaveRequest, ApiError> {
        match self.store.transition(leave_id, target).await? {
            Transition::Applied(leave) => {
                info!(leave_id, reviewer = %principal.subject_id, status = %target, "Leave request reviewed");
                Ok(leave)
            }
            Transition::Missing => Err(ApiError::NotFound(leave_id.to_string())),
            Transition::Blocked(current) => Err(ApiError::InvalidTransition {
                action,
                done,
                current,
            }),
        }
    }

    pub async fn delete(&self, principal: &Principal, leave_id: &str) -> Result<(), ApiError> {
        let leave = self
            .store
            .find(leave_id)
            .await?
            .ok_or_else(|| ApiError::NotFound(leave_id.to_string()))?;

        if !principal.may_delete(&leave) {
            return Err(ApiError::Forbidden(
                "Only the requesting employee or a manager can delete this leave request."
                    .to_string(),
            ));
        }

        if !self.store.delete(leave_id).await? {
            return Err(ApiError::NotFound(leave_id.to_string()));
        }

        info!(leave_id, deleted_by = %principal.subject_id, "Leave request deleted");
        Ok(())
    }
}
