use crate::error::{ApiError, is_deadlock, is_transient};
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_request::{LeaveDecision, LeaveRequest};
use crate::model::user::User;
use crate::store::{AttendanceQuery, BalancePolicy, LeaveQuery, NewLeaveRequest, RecordStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::MySqlPool;

const LEAVE_COLUMNS: &str =
    "id, user_id, leave_type, start_date, end_date, total_days, reason, status, created_at";

// Helper enum for typed SQLx binding
enum FilterValue {
    U64(u64),
    Str(String),
    Date(NaiveDate),
}

pub struct MySqlStore {
    pool: MySqlPool,
}

impl MySqlStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// One attempt at the overlap-checked insert. Two racing submissions
    /// for the same user take compatible gap locks on the range scan and
    /// then deadlock on each other's INSERT; InnoDB aborts one of them
    /// (SQLSTATE 40001) with a full rollback, so the caller may replay.
    async fn try_insert_leave_request(
        &self,
        new: &NewLeaveRequest,
    ) -> Result<LeaveRequest, ApiError> {
        let mut tx = self.pool.begin().await?;

        let conflicts: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM leave_requests
            WHERE user_id = ?
              AND status <> 'rejected'
              AND start_date <= ?
              AND end_date >= ?
            FOR UPDATE
            "#,
        )
        .bind(new.user_id)
        .bind(new.end_date)
        .bind(new.start_date)
        .fetch_one(&mut *tx)
        .await?;

        if conflicts > 0 {
            return Err(ApiError::OverlapConflict);
        }

        let result = sqlx::query(
            r#"
            INSERT INTO leave_requests
                (user_id, leave_type, start_date, end_date, total_days, reason, status)
            VALUES (?, ?, ?, ?, ?, ?, 'pending')
            "#,
        )
        .bind(new.user_id)
        .bind(new.leave_type)
        .bind(new.start_date)
        .bind(new.end_date)
        .bind(new.total_days)
        .bind(new.reason.clone())
        .execute(&mut *tx)
        .await?;

        let id = result.last_insert_id();
        let row = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn fetch_leave_request(&self, id: u64) -> Result<Option<LeaveRequest>, sqlx::Error> {
        sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn fetch_balance(&self, user_id: u64) -> Result<Option<LeaveBalance>, sqlx::Error> {
        sqlx::query_as::<_, LeaveBalance>(
            "SELECT user_id, balance, last_updated FROM leave_balances WHERE user_id = ?",
        )
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
    }

    async fn query_leave_page(
        &self,
        query: &LeaveQuery,
    ) -> Result<(Vec<LeaveRequest>, i64), sqlx::Error> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(user_id) = query.user_id {
            where_sql.push_str(" AND user_id = ?");
            args.push(FilterValue::U64(user_id));
        }
        if let Some(status) = query.status {
            where_sql.push_str(" AND status = ?");
            args.push(FilterValue::Str(status.to_string()));
        }

        let count_sql = format!("SELECT COUNT(*) FROM leave_requests{}", where_sql);
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_q = bind_filter_scalar(count_q, arg);
        }
        let total = count_q.fetch_one(&self.pool).await?;

        let data_sql = format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests{} ORDER BY created_at DESC LIMIT ? OFFSET ?",
            where_sql
        );
        let mut data_q = sqlx::query_as::<_, LeaveRequest>(&data_sql);
        for arg in &args {
            data_q = bind_filter_as(data_q, arg);
        }
        let rows = data_q
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }

    async fn query_attendance_page(
        &self,
        query: &AttendanceQuery,
    ) -> Result<(Vec<Attendance>, i64), sqlx::Error> {
        let mut where_sql = String::from(" WHERE 1=1");
        let mut args: Vec<FilterValue> = Vec::new();

        if let Some(user_id) = query.user_id {
            where_sql.push_str(" AND user_id = ?");
            args.push(FilterValue::U64(user_id));
        }
        if let Some(date) = query.date {
            where_sql.push_str(" AND date = ?");
            args.push(FilterValue::Date(date));
        }

        let count_sql = format!("SELECT COUNT(*) FROM attendance{}", where_sql);
        let mut count_q = sqlx::query_scalar::<_, i64>(&count_sql);
        for arg in &args {
            count_q = bind_filter_scalar(count_q, arg);
        }
        let total = count_q.fetch_one(&self.pool).await?;

        let data_sql = format!(
            "SELECT id, user_id, date, status, created_at FROM attendance{} ORDER BY date DESC LIMIT ? OFFSET ?",
            where_sql
        );
        let mut data_q = sqlx::query_as::<_, Attendance>(&data_sql);
        for arg in &args {
            data_q = bind_filter_as(data_q, arg);
        }
        let rows = data_q
            .bind(query.limit)
            .bind(query.offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((rows, total))
    }
}

fn bind_filter_as<'q, O>(
    q: sqlx::query::QueryAs<'q, sqlx::MySql, O, sqlx::mysql::MySqlArguments>,
    arg: &FilterValue,
) -> sqlx::query::QueryAs<'q, sqlx::MySql, O, sqlx::mysql::MySqlArguments> {
    match arg {
        FilterValue::U64(v) => q.bind(*v),
        FilterValue::Str(s) => q.bind(s.clone()),
        FilterValue::Date(d) => q.bind(*d),
    }
}

fn bind_filter_scalar<'q, O>(
    q: sqlx::query::QueryScalar<'q, sqlx::MySql, O, sqlx::mysql::MySqlArguments>,
    arg: &FilterValue,
) -> sqlx::query::QueryScalar<'q, sqlx::MySql, O, sqlx::mysql::MySqlArguments> {
    match arg {
        FilterValue::U64(v) => q.bind(*v),
        FilterValue::Str(s) => q.bind(s.clone()),
        FilterValue::Date(d) => q.bind(*d),
    }
}

#[async_trait]
impl RecordStore for MySqlStore {
    async fn insert_leave_request(&self, new: NewLeaveRequest) -> Result<LeaveRequest, ApiError> {
        // Replay once when InnoDB breaks a submit/submit race by aborting
        // this transaction; the survivor has committed by then, so the
        // replay settles to the real outcome instead of a generic failure.
        match self.try_insert_leave_request(&new).await {
            Err(ApiError::Database(e)) if is_deadlock(&e) => {
                tracing::warn!(
                    user_id = new.user_id,
                    "Deadlock on leave insert, replaying once"
                );
                self.try_insert_leave_request(&new).await
            }
            other => other,
        }
    }

    async fn leave_request_by_id(&self, id: u64) -> Result<Option<LeaveRequest>, ApiError> {
        match self.fetch_leave_request(id).await {
            Err(e) if is_transient(&e) => {
                tracing::warn!(error = %e, id, "Transient read failure, retrying once");
                Ok(self.fetch_leave_request(id).await?)
            }
            other => Ok(other?),
        }
    }

    async fn list_leave_requests(
        &self,
        query: &LeaveQuery,
    ) -> Result<(Vec<LeaveRequest>, i64), ApiError> {
        match self.query_leave_page(query).await {
            Err(e) if is_transient(&e) => {
                tracing::warn!(error = %e, "Transient read failure, retrying once");
                Ok(self.query_leave_page(query).await?)
            }
            other => Ok(other?),
        }
    }

    async fn decide_leave(
        &self,
        request_id: u64,
        decision: LeaveDecision,
        policy: &BalancePolicy,
    ) -> Result<LeaveRequest, ApiError> {
        let mut tx = self.pool.begin().await?;

        let req = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ? FOR UPDATE"
        ))
        .bind(request_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(ApiError::NotFound)?;

        if req.status.is_terminal() {
            return Err(ApiError::AlreadyDecided);
        }

        if decision == LeaveDecision::Approve && policy.enforce {
            let balance: Option<i32> =
                sqlx::query_scalar("SELECT balance FROM leave_balances WHERE user_id = ? FOR UPDATE")
                    .bind(req.user_id)
                    .fetch_optional(&mut *tx)
                    .await?;
            if balance.unwrap_or(policy.default_balance) < req.total_days {
                return Err(ApiError::InsufficientBalance);
            }
        }

        // Conditional transition; the row lock above already serialises
        // racing decisions, the status guard is the invariant itself.
        let result = sqlx::query(
            "UPDATE leave_requests SET status = ? WHERE id = ? AND status = 'pending'",
        )
        .bind(decision.target_status())
        .bind(request_id)
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Err(ApiError::AlreadyDecided);
        }

        if decision == LeaveDecision::Approve {
            let updated = sqlx::query(
                "UPDATE leave_balances SET balance = balance - ? WHERE user_id = ?",
            )
            .bind(req.total_days)
            .bind(req.user_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                // Balance row never provisioned; seed it from the default
                // so the deduction still happens exactly once.
                sqlx::query("INSERT INTO leave_balances (user_id, balance) VALUES (?, ?)")
                    .bind(req.user_id)
                    .bind(policy.default_balance - req.total_days)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        let row = sqlx::query_as::<_, LeaveRequest>(&format!(
            "SELECT {LEAVE_COLUMNS} FROM leave_requests WHERE id = ?"
        ))
        .bind(request_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(row)
    }

    async fn insert_attendance(
        &self,
        user_id: u64,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<Attendance, ApiError> {
        let result = sqlx::query("INSERT INTO attendance (user_id, date, status) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(date)
            .bind(status)
            .execute(&self.pool)
            .await;

        let result = match result {
            Ok(r) => r,
            Err(e) => {
                // Duplicate mark for the same day
                if let sqlx::Error::Database(db_err) = &e {
                    if db_err.code().as_deref() == Some("23000") {
                        return Err(ApiError::AlreadyMarked);
                    }
                }
                return Err(e.into());
            }
        };

        let row = sqlx::query_as::<_, Attendance>(
            "SELECT id, user_id, date, status, created_at FROM attendance WHERE id = ?",
        )
        .bind(result.last_insert_id())
        .fetch_one(&self.pool)
        .await?;

        Ok(row)
    }

    async fn list_attendance(
        &self,
        query: &AttendanceQuery,
    ) -> Result<(Vec<Attendance>, i64), ApiError> {
        match self.query_attendance_page(query).await {
            Err(e) if is_transient(&e) => {
                tracing::warn!(error = %e, "Transient read failure, retrying once");
                Ok(self.query_attendance_page(query).await?)
            }
            other => Ok(other?),
        }
    }

    async fn leave_balance(&self, user_id: u64) -> Result<Option<LeaveBalance>, ApiError> {
        match self.fetch_balance(user_id).await {
            Err(e) if is_transient(&e) => {
                tracing::warn!(error = %e, user_id, "Transient read failure, retrying once");
                Ok(self.fetch_balance(user_id).await?)
            }
            other => Ok(other?),
        }
    }

    async fn list_users(&self, limit: u64, offset: u64) -> Result<(Vec<User>, i64), ApiError> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, User>(
            "SELECT id, name, email, role, date_of_joining FROM users ORDER BY name LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((rows, total))
    }
}
