use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::service::clock::Clock;
use crate::store::RecordStore;

/// Marks attendance for the server's current calendar day. The caller
/// never supplies the date; accepting one would let a user fabricate
/// history or sidestep the one-per-day rule.
pub async fn mark(
    store: &impl RecordStore,
    clock: &dyn Clock,
    user_id: u64,
    status: AttendanceStatus,
) -> Result<Attendance, ApiError> {
    let today = clock.today();
    let created = store.insert_attendance(user_id, today, status).await?;

    tracing::info!(user_id, date = %today, status = %status, "Attendance marked");
    Ok(created)
}
