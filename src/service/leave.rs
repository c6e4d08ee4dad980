use crate::error::ApiError;
use crate::model::leave_request::{LeaveRequest, LeaveType};
use crate::service::clock::Clock;
use crate::store::{NewLeaveRequest, RecordStore};
use chrono::NaiveDate;

#[derive(Debug, Clone)]
pub struct ApplyLeave {
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub reason: Option<String>,
}

/// Inclusive day count: same start and end is one day.
pub fn total_days(start: NaiveDate, end: NaiveDate) -> i64 {
    (end - start).num_days() + 1
}

/// Validates and submits a leave application. Fail-fast order: range,
/// then past date against the server clock, then the atomic
/// overlap-checked insert. `total_days` is always recomputed here; the
/// request shape carries no client figure to trust.
pub async fn apply(
    store: &impl RecordStore,
    clock: &dyn Clock,
    user_id: u64,
    input: ApplyLeave,
) -> Result<LeaveRequest, ApiError> {
    if input.start_date > input.end_date {
        return Err(ApiError::InvalidRange);
    }
    if input.start_date < clock.today() {
        return Err(ApiError::PastDateNotAllowed);
    }

    let total = total_days(input.start_date, input.end_date) as i32;

    let created = store
        .insert_leave_request(NewLeaveRequest {
            user_id,
            leave_type: input.leave_type,
            start_date: input.start_date,
            end_date: input.end_date,
            total_days: total,
            reason: input.reason,
        })
        .await?;

    tracing::info!(
        user_id,
        request_id = created.id,
        total_days = created.total_days,
        "Leave request submitted"
    );
    Ok(created)
}
