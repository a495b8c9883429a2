use super::{LeaveStore, Transition, UserDirectory};
use crate::{
    error::{StorageError, StorageErrorKind},
    model::{
        leave_request::{LeaveRequest, LeaveRow, LeaveStatus},
        user::UserRecord,
    },
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, mysql::MySqlDatabaseError};
use std::{future::Future, time::Duration};

const LEAVE_COLUMNS: &str =
    "leave_id, employee_id, start_date, end_date, reason, leave_type, status";

// MySQL server error numbers
const ER_DBACCESS_DENIED: u16 = 1044;
const ER_ACCESS_DENIED: u16 = 1045;
const ER_BAD_DB: u16 = 1049;
const ER_TABLEACCESS_DENIED: u16 = 1142;
const ER_COLUMNACCESS_DENIED: u16 = 1143;
const ER_NO_SUCH_TABLE: u16 = 1146;
const ER_SPECIFIC_ACCESS_DENIED: u16 = 1227;

impl From<sqlx::Error> for StorageError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::RowNotFound => StorageError::new(StorageErrorKind::NotFound, err.to_string()),
            sqlx::Error::Database(db_err) => {
                match db_err
                    .try_downcast_ref::<MySqlDatabaseError>()
                    .map(|e| e.number())
                {
                    Some(
                        ER_DBACCESS_DENIED
                        | ER_ACCESS_DENIED
                        | ER_TABLEACCESS_DENIED
                        | ER_COLUMNACCESS_DENIED
                        | ER_SPECIFIC_ACCESS_DENIED,
                    ) => StorageError::new(StorageErrorKind::AccessDenied, err.to_string()),
                    Some(ER_BAD_DB | ER_NO_SUCH_TABLE) => {
                        StorageError::new(StorageErrorKind::NotFound, err.to_string())
                    }
                    _ => StorageError::from_message(err.to_string()),
                }
            }
            _ => StorageError::from_message(err.to_string()),
        }
    }
}

/// Run a storage call, giving up after `limit`.
async fn bounded<T, F>(limit: Duration, call: F) -> Result<T, StorageError>
where
    F: Future<Output = Result<T, sqlx::Error>>,
{
    match actix_web::rt::time::timeout(limit, call).await {
        Ok(result) => result.map_err(StorageError::from),
        Err(_) => Err(StorageError::other(format!(
            "storage call timed out after {}ms",
            limit.as_millis()
        ))),
    }
}

fn into_requests(rows: Vec<LeaveRow>) -> Result<Vec<LeaveRequest>, StorageError> {
    rows.into_iter().map(LeaveRequest::try_from).collect()
}

#[derive(Clone)]
pub struct MySqlLeaveStore {
    pool: MySqlPool,
    timeout: Duration,
}

impl MySqlLeaveStore {
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl LeaveStore for MySqlLeaveStore {
    async fn insert(&self, leave: &LeaveRequest) -> Result<(), StorageError> {
        bounded(
            self.timeout,
            sqlx::query(
                r#"
                INSERT INTO leave_requests
                    (leave_id, employee_id, start_date, end_date, reason, leave_type, status)
                VALUES (?, ?, ?, ?, ?, ?, ?)
                "#,
            )
            .bind(&leave.leave_id)
            .bind(&leave.employee_id)
            .bind(leave.start_date)
            .bind(leave.end_date)
            .bind(&leave.reason)
            .bind(leave.leave_type.as_ref())
            .bind(leave.status.as_ref())
            .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn find(&self, leave_id: &str) -> Result<Option<LeaveRequest>, StorageError> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE leave_id = ?");
        let row = bounded(
            self.timeout,
            sqlx::query_as::<_, LeaveRow>(&sql)
                .bind(leave_id)
                .fetch_optional(&self.pool),
        )
        .await?;

        row.map(LeaveRequest::try_from).transpose()
    }

    async fn list_for_employee(
        &self,
        employee_id: &str,
    ) -> Result<Vec<LeaveRequest>, StorageError> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE employee_id = ?");
        let rows = bounded(
            self.timeout,
            sqlx::query_as::<_, LeaveRow>(&sql)
                .bind(employee_id)
                .fetch_all(&self.pool),
        )
        .await?;

        into_requests(rows)
    }

    async fn list_all(&self) -> Result<Vec<LeaveRequest>, StorageError> {
        let sql = format!("SELECT {LEAVE_COLUMNS} FROM leave_requests ORDER BY start_date DESC");
        let rows = bounded(
            self.timeout,
            sqlx::query_as::<_, LeaveRow>(&sql).fetch_all(&self.pool),
        )
        .await?;

        into_requests(rows)
    }

    async fn transition(
        &self,
        leave_id: &str,
        target: LeaveStatus,
    ) -> Result<Transition, StorageError> {
        let Some(snapshot) = self.find(leave_id).await? else {
            return Ok(Transition::Missing);
        };

        let result = bounded(
            self.timeout,
            sqlx::query(
                r#"
                UPDATE leave_requests
                SET status = ?
                WHERE leave_id = ?
                AND status = ?
                "#,
            )
            .bind(target.as_ref())
            .bind(leave_id)
            .bind(LeaveStatus::Pending.as_ref())
            .execute(&self.pool),
        )
        .await?;

        if let Some(applied) = written(result.rows_affected(), snapshot, target) {
            return Ok(applied);
        }
        Ok(unwritten(self.find(leave_id).await?))
    }

    async fn delete(&self, leave_id: &str) -> Result<bool, StorageError> {
        let result = bounded(
            self.timeout,
            sqlx::query("DELETE FROM leave_requests WHERE leave_id = ?")
                .bind(leave_id)
                .execute(&self.pool),
        )
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(Clone)]
pub struct MySqlUserDirectory {
    pool: MySqlPool,
    timeout: Duration,
}

impl MySqlUserDirectory {
    pub fn new(pool: MySqlPool, timeout: Duration) -> Self {
        Self { pool, timeout }
    }
}

#[async_trait]
impl UserDirectory for MySqlUserDirectory {
    async fn create_user(&self, user: &UserRecord) -> Result<bool, StorageError> {
        let result = actix_web::rt::time::timeout(
            self.timeout,
            sqlx::query(
                r#"INSERT INTO users (id, email, password_hash, role) VALUES (?, ?, ?, ?)"#,
            )
            .bind(&user.id)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_deref())
            .execute(&self.pool),
        )
        .await
        .map_err(|_| StorageError::other("storage call timed out"))?;

        match result {
            Ok(_) => Ok(true),
            Err(sqlx::Error::Database(db_err)) if db_err.code().as_deref() == Some("23000") => {
                Ok(false)
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, StorageError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, UserRecord>(
                "SELECT id, email, password_hash, role FROM users WHERE email = ?",
            )
            .bind(email)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<UserRecord>, StorageError> {
        bounded(
            self.timeout,
            sqlx::query_as::<_, UserRecord>(
                "SELECT id, email, password_hash, role FROM users WHERE id = ?",
            )
            .bind(id)
            .fetch_optional(&self.pool),
        )
        .await
    }

    async fn revoke_token(
        &self,
        jti: &str,
        expires_at: DateTime<Utc>,
    ) -> Result<(), StorageError> {
        bounded(
            self.timeout,
            sqlx::query("INSERT IGNORE INTO revoked_tokens (jti, expires_at) VALUES (?, ?)")
                .bind(jti)
                .bind(expires_at)
                .execute(&self.pool),
        )
        .await?;

        Ok(())
    }

    async fn is_revoked(&self, jti: &str) -> Result<bool, StorageError> {
        let count = bounded(
            self.timeout,
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM revoked_tokens WHERE jti = ?")
                .bind(jti)
                .fetch_one(&self.pool),
        )
        .await?;

        Ok(count > 0)
    }
}

/// Outcome of the conditional status UPDATE when it changed a row. Only the
/// status column is written, so the pre-read snapshot is the updated record.
fn written(rows_affected: u64, snapshot: LeaveRequest, target: LeaveStatus) -> Option<Transition> {
    (rows_affected > 0).then(|| {
        Transition::Applied(LeaveRequest {
            status: target,
            ..snapshot
        })
    })
}

/// Nothing was updated: the row is gone or already decided.
fn unwritten(current: Option<LeaveRequest>) -> Transition {
    match current {
        None => Transition::Missing,
        Some(leave) => Transition::Blocked(leave.status),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveType;
    use chrono::NaiveDate;

    fn pending(leave_id: &str) -> LeaveRequest {
        LeaveRequest {
            leave_id: leave_id.to_string(),
            employee_id: "alice".to_string(),
            start_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            end_date: NaiveDate::from_ymd_opt(2024, 6, 5).unwrap(),
            reason: "vacation".to_string(),
            leave_type: LeaveType::Annual,
            status: LeaveStatus::Pending,
        }
    }

    #[test]
    fn applied_update_is_reported_from_row_count() {
        match written(1, pending("l-1"), LeaveStatus::Rejected) {
            Some(Transition::Applied(leave)) => {
                assert_eq!(leave.status, LeaveStatus::Rejected);
                assert_eq!(leave.leave_id, "l-1");
                assert_eq!(leave.reason, "vacation");
            }
            other => panic!("expected applied transition, got {other:?}"),
        }
        assert!(written(0, pending("l-1"), LeaveStatus::Approved).is_none());
    }

    #[test]
    fn untouched_row_decides_between_missing_and_blocked() {
        assert!(matches!(unwritten(None), Transition::Missing));

        let mut decided = pending("l-2");
        decided.status = LeaveStatus::Approved;
        assert!(matches!(
            unwritten(Some(decided)),
            Transition::Blocked(LeaveStatus::Approved)
        ));
    }

    #[test]
    fn row_not_found_maps_to_not_found() {
        let err = StorageError::from(sqlx::Error::RowNotFound);
        assert_eq!(err.kind, StorageErrorKind::NotFound);
    }

    #[test]
    fn pool_timeout_maps_to_other() {
        let err = StorageError::from(sqlx::Error::PoolTimedOut);
        assert_eq!(err.kind, StorageErrorKind::Other);
    }

    #[actix_web::test]
    async fn bounded_call_times_out() {
        let slow = async {
            actix_web::rt::time::sleep(Duration::from_millis(200)).await;
            Ok::<_, sqlx::Error>(())
        };
        let err = bounded(Duration::from_millis(10), slow).await.unwrap_err();
        assert_eq!(err.kind, StorageErrorKind::Other);
        assert!(err.message.contains("timed out"));
    }
}
