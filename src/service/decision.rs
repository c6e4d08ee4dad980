use crate::error::ApiError;
use crate::model::leave_request::{LeaveDecision, LeaveRequest};
use crate::store::{BalancePolicy, RecordStore};

/// Applies an admin decision to a pending request. The status guard and
/// the balance deduction live in one store transaction, so a retried or
/// racing decision can never deduct twice.
pub async fn decide(
    store: &impl RecordStore,
    request_id: u64,
    decision: LeaveDecision,
    policy: &BalancePolicy,
) -> Result<LeaveRequest, ApiError> {
    let updated = store.decide_leave(request_id, decision, policy).await?;

    tracing::info!(
        request_id,
        user_id = updated.user_id,
        status = %updated.status,
        "Leave request decided"
    );
    Ok(updated)
}
