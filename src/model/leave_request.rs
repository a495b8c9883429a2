use crate::error::{ApiError, StorageError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use utoipa::ToSchema;

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum LeaveType {
    Annual,
    Sick,
    Personal,
    Maternity,
    Paternity,
}

#[derive(
    Debug, Copy, Clone, Eq, PartialEq, Serialize, Deserialize, Display, EnumString, AsRefStr, ToSchema,
)]
pub enum LeaveStatus {
    Pending,
    Approved,
    Rejected,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[schema(example = json!({
    "leave_id": "6f1c1b8e-6d0a-4a53-9d5f-3b1f0f3f6c11",
    "employee_id": "2b7e0a55-3c1d-4d8e-9a61-0c9a1e5d7f42",
    "start_date": "2024-06-01",
    "end_date": "2024-06-05",
    "reason": "vacation",
    "leave_type": "Annual",
    "status": "Pending"
}))]
pub struct LeaveRequest {
    pub leave_id: String,
    pub employee_id: String,
    #[schema(format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(format = "date", value_type = String)]
    pub end_date: NaiveDate,
    pub reason: String,
    pub leave_type: LeaveType,
    pub status: LeaveStatus,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "2024-06-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2024-06-05", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "vacation")]
    pub reason: String,
    /// One of Annual, Sick, Personal, Maternity, Paternity
    #[schema(example = "Annual")]
    pub leave_type: String,
}

/// A submission that passed validation and is ready to become a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LeaveDraft {
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub leave_type: LeaveType,
}

impl CreateLeave {
    pub fn validate(self) -> Result<LeaveDraft, ApiError> {
        if self.end_date < self.start_date {
            return Err(ApiError::validation(
                "end_date",
                "end_date must not be before start_date",
            ));
        }

        let reason = self.reason.trim();
        if reason.is_empty() {
            return Err(ApiError::validation("reason", "reason cannot be empty"));
        }

        let leave_type = self.leave_type.parse::<LeaveType>().map_err(|_| {
            ApiError::validation(
                "leave_type",
                "leave_type must be one of: Annual, Sick, Personal, Maternity, Paternity",
            )
        })?;

        Ok(LeaveDraft {
            start_date: self.start_date,
            end_date: self.end_date,
            reason: reason.to_string(),
            leave_type,
        })
    }
}

impl LeaveDraft {
    pub fn into_request(self, leave_id: String, employee_id: String) -> LeaveRequest {
        LeaveRequest {
            leave_id,
            employee_id,
            start_date: self.start_date,
            end_date: self.end_date,
            reason: self.reason,
            leave_type: self.leave_type,
            status: LeaveStatus::Pending,
        }
    }
}

/// Raw `leave_requests` row; enum columns are stored as text.
#[derive(Debug, sqlx::FromRow)]
pub struct LeaveRow {
    pub leave_id: String,
    pub employee_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: String,
    pub leave_type: String,
    pub status: String,
}

impl TryFrom<LeaveRow> for LeaveRequest {
    type Error = StorageError;

    fn try_from(row: LeaveRow) -> Result<Self, Self::Error> {
        let leave_type = row.leave_type.parse().map_err(|_| {
            StorageError::other(format!(
                "leave {} has unknown leave_type {}",
                row.leave_id, row.leave_type
            ))
        })?;
        let status = row.status.parse().map_err(|_| {
            StorageError::other(format!(
                "leave {} has unknown status {}",
                row.leave_id, row.status
            ))
        })?;

        Ok(LeaveRequest {
            leave_id: row.leave_id,
            employee_id: row.employee_id,
            start_date: row.start_date,
            end_date: row.end_date,
            reason: row.reason,
            leave_type,
            status,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn create(start: &str, end: &str, reason: &str, leave_type: &str) -> CreateLeave {
        CreateLeave {
            start_date: date(start),
            end_date: date(end),
            reason: reason.to_string(),
            leave_type: leave_type.to_string(),
        }
    }

    fn rejected_field(result: Result<LeaveDraft, ApiError>) -> &'static str {
        match result {
            Err(ApiError::Validation { field, .. }) => field,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[rstest]
    #[case("Annual", LeaveType::Annual)]
    #[case("Sick", LeaveType::Sick)]
    #[case("Personal", LeaveType::Personal)]
    #[case("Maternity", LeaveType::Maternity)]
    #[case("Paternity", LeaveType::Paternity)]
    fn accepts_each_leave_type(#[case] raw: &str, #[case] expected: LeaveType) {
        let draft = create("2024-06-01", "2024-06-05", "vacation", raw)
            .validate()
            .unwrap();
        assert_eq!(draft.leave_type, expected);
    }

    #[rstest]
    #[case("annual")]
    #[case("Unpaid")]
    #[case("")]
    fn rejects_unknown_leave_type(#[case] raw: &str) {
        let result = create("2024-06-01", "2024-06-05", "vacation", raw).validate();
        assert_eq!(rejected_field(result), "leave_type");
    }

    #[test]
    fn end_before_start_is_rejected() {
        let result = create("2024-07-10", "2024-07-01", "trip", "Annual").validate();
        assert_eq!(rejected_field(result), "end_date");
    }

    #[test]
    fn single_day_leave_is_accepted() {
        assert!(
            create("2024-07-01", "2024-07-01", "dentist", "Sick")
                .validate()
                .is_ok()
        );
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\t\n")]
    fn blank_reason_is_rejected(#[case] reason: &str) {
        let result = create("2024-06-01", "2024-06-05", reason, "Annual").validate();
        assert_eq!(rejected_field(result), "reason");
    }

    #[test]
    fn reason_is_trimmed() {
        let draft = create("2024-06-01", "2024-06-05", "  family event \n", "Personal")
            .validate()
            .unwrap();
        assert_eq!(draft.reason, "family event");
    }

    #[test]
    fn new_request_starts_pending() {
        let request = create("2024-06-01", "2024-06-05", "vacation", "Annual")
            .validate()
            .unwrap()
            .into_request("leave-1".into(), "emp-1".into());
        assert_eq!(request.status, LeaveStatus::Pending);
        assert_eq!(request.employee_id, "emp-1");
    }

    #[test]
    fn row_with_unknown_status_is_a_storage_error() {
        let row = LeaveRow {
            leave_id: "leave-1".into(),
            employee_id: "emp-1".into(),
            start_date: date("2024-06-01"),
            end_date: date("2024-06-02"),
            reason: "x".into(),
            leave_type: "Annual".into(),
            status: "Cancelled".into(),
        };
        assert!(LeaveRequest::try_from(row).is_err());
    }

    #[test]
    fn serializes_enums_as_variant_names() {
        let request = LeaveRequest {
            leave_id: "leave-1".into(),
            employee_id: "emp-1".into(),
            start_date: date("2024-06-01"),
            end_date: date("2024-06-02"),
            reason: "x".into(),
            leave_type: LeaveType::Maternity,
            status: LeaveStatus::Approved,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["leave_type"], "Maternity");
        assert_eq!(value["status"], "Approved");
        assert_eq!(value["start_date"], "2024-06-01");
    }
}
