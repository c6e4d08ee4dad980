//! Port between the services and the relational store. Every mutating
//! operation is a single atomic unit; racing callers are resolved by the
//! store, not by check-then-act in the services.

use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_request::{LeaveDecision, LeaveRequest, LeaveStatus, LeaveType};
use crate::model::user::User;
use async_trait::async_trait;
use chrono::NaiveDate;

pub mod mysql;

#[cfg(test)]
pub mod memory;

/// A validated leave application, ready to insert. `total_days` is the
/// server-side figure; nothing client-supplied reaches this struct.
#[derive(Debug, Clone)]
pub struct NewLeaveRequest {
    pub user_id: u64,
    pub leave_type: LeaveType,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub total_days: i32,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct LeaveQuery {
    pub user_id: Option<u64>,
    pub status: Option<LeaveStatus>,
    pub limit: u64,
    pub offset: u64,
}

#[derive(Debug, Clone, Default)]
pub struct AttendanceQuery {
    pub user_id: Option<u64>,
    pub date: Option<NaiveDate>,
    pub limit: u64,
    pub offset: u64,
}

/// Balance policy applied inside the decision transaction.
#[derive(Debug, Clone, Copy)]
pub struct BalancePolicy {
    /// Refuse approvals that would drive the balance negative.
    pub enforce: bool,
    /// Provisioning default, used when the balance row is missing.
    pub default_balance: i32,
}

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Inserts a pending leave request unless the user already has a
    /// non-rejected request intersecting the candidate range. The check
    /// and the insert are one atomic unit.
    async fn insert_leave_request(&self, new: NewLeaveRequest) -> Result<LeaveRequest, ApiError>;

    async fn leave_request_by_id(&self, id: u64) -> Result<Option<LeaveRequest>, ApiError>;

    async fn list_leave_requests(
        &self,
        query: &LeaveQuery,
    ) -> Result<(Vec<LeaveRequest>, i64), ApiError>;

    /// Pending -> Approved | Rejected, terminal either way. On approval
    /// the requester's balance is decremented in the same transaction;
    /// of two racing decisions exactly one succeeds and the other gets
    /// `AlreadyDecided`.
    async fn decide_leave(
        &self,
        request_id: u64,
        decision: LeaveDecision,
        policy: &BalancePolicy,
    ) -> Result<LeaveRequest, ApiError>;

    /// Inserts today's mark; the store's (user, date) uniqueness resolves
    /// duplicates to `AlreadyMarked`.
    async fn insert_attendance(
        &self,
        user_id: u64,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<Attendance, ApiError>;

    async fn list_attendance(
        &self,
        query: &AttendanceQuery,
    ) -> Result<(Vec<Attendance>, i64), ApiError>;

    async fn leave_balance(&self, user_id: u64) -> Result<Option<LeaveBalance>, ApiError>;

    async fn list_users(&self, limit: u64, offset: u64) -> Result<(Vec<User>, i64), ApiError>;
}
