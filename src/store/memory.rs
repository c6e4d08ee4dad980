//! In-memory store for tests. One mutex around all tables gives each
//! operation the same atomicity the MySQL transactions provide, so the
//! concurrency properties can be exercised without a database.

use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::leave_balance::LeaveBalance;
use crate::model::leave_request::{
    LeaveDecision, LeaveRequest, LeaveStatus, ranges_intersect,
};
use crate::model::user::User;
use crate::store::{AttendanceQuery, BalancePolicy, LeaveQuery, NewLeaveRequest, RecordStore};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::HashMap;
use tokio::sync::Mutex;

#[derive(Default)]
struct Inner {
    next_leave_id: u64,
    next_attendance_id: u64,
    leaves: Vec<LeaveRequest>,
    attendance: Vec<Attendance>,
    balances: HashMap<u64, LeaveBalance>,
    users: Vec<User>,
}

#[derive(Default)]
pub struct MemStore {
    inner: Mutex<Inner>,
}

impl MemStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn seed_balance(&self, user_id: u64, balance: i32) {
        let mut inner = self.inner.lock().await;
        inner.balances.insert(
            user_id,
            LeaveBalance {
                user_id,
                balance,
                last_updated: Utc::now(),
            },
        );
    }

    pub async fn seed_user(&self, user: User) {
        self.inner.lock().await.users.push(user);
    }
}

#[async_trait]
impl RecordStore for MemStore {
    async fn insert_leave_request(&self, new: NewLeaveRequest) -> Result<LeaveRequest, ApiError> {
        let mut inner = self.inner.lock().await;

        let conflict = inner.leaves.iter().any(|r| {
            r.user_id == new.user_id
                && r.status != LeaveStatus::Rejected
                && ranges_intersect(r.start_date, r.end_date, new.start_date, new.end_date)
        });
        if conflict {
            return Err(ApiError::OverlapConflict);
        }

        inner.next_leave_id += 1;
        let row = LeaveRequest {
            id: inner.next_leave_id,
            user_id: new.user_id,
            leave_type: new.leave_type,
            start_date: new.start_date,
            end_date: new.end_date,
            total_days: new.total_days,
            reason: new.reason,
            status: LeaveStatus::Pending,
            created_at: Utc::now(),
        };
        inner.leaves.push(row.clone());
        Ok(row)
    }

    async fn leave_request_by_id(&self, id: u64) -> Result<Option<LeaveRequest>, ApiError> {
        let inner = self.inner.lock().await;
        Ok(inner.leaves.iter().find(|r| r.id == id).cloned())
    }

    async fn list_leave_requests(
        &self,
        query: &LeaveQuery,
    ) -> Result<(Vec<LeaveRequest>, i64), ApiError> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<LeaveRequest> = inner
            .leaves
            .iter()
            .filter(|r| query.user_id.map_or(true, |u| r.user_id == u))
            .filter(|r| query.status.map_or(true, |s| r.status == s))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        let total = rows.len() as i64;
        let rows = rows
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();
        Ok((rows, total))
    }

    async fn decide_leave(
        &self,
        request_id: u64,
        decision: LeaveDecision,
        policy: &BalancePolicy,
    ) -> Result<LeaveRequest, ApiError> {
        let mut inner = self.inner.lock().await;

        let idx = inner
            .leaves
            .iter()
            .position(|r| r.id == request_id)
            .ok_or(ApiError::NotFound)?;

        if inner.leaves[idx].status.is_terminal() {
            return Err(ApiError::AlreadyDecided);
        }

        let user_id = inner.leaves[idx].user_id;
        let total_days = inner.leaves[idx].total_days;

        if decision == LeaveDecision::Approve && policy.enforce {
            let balance = inner
                .balances
                .get(&user_id)
                .map(|b| b.balance)
                .unwrap_or(policy.default_balance);
            if balance < total_days {
                return Err(ApiError::InsufficientBalance);
            }
        }

        inner.leaves[idx].status = decision.target_status();

        if decision == LeaveDecision::Approve {
            let default_balance = policy.default_balance;
            let entry = inner.balances.entry(user_id).or_insert(LeaveBalance {
                user_id,
                balance: default_balance,
                last_updated: Utc::now(),
            });
            entry.balance -= total_days;
            entry.last_updated = Utc::now();
        }

        Ok(inner.leaves[idx].clone())
    }

    async fn insert_attendance(
        &self,
        user_id: u64,
        date: NaiveDate,
        status: AttendanceStatus,
    ) -> Result<Attendance, ApiError> {
        let mut inner = self.inner.lock().await;

        if inner
            .attendance
            .iter()
            .any(|a| a.user_id == user_id && a.date == date)
        {
            return Err(ApiError::AlreadyMarked);
        }

        inner.next_attendance_id += 1;
        let row = Attendance {
            id: inner.next_attendance_id,
            user_id,
            date,
            status,
            created_at: Utc::now(),
        };
        inner.attendance.push(row.clone());
        Ok(row)
    }

    async fn list_attendance(
        &self,
        query: &AttendanceQuery,
    ) -> Result<(Vec<Attendance>, i64), ApiError> {
        let inner = self.inner.lock().await;
        let mut rows: Vec<Attendance> = inner
            .attendance
            .iter()
            .filter(|a| query.user_id.map_or(true, |u| a.user_id == u))
            .filter(|a| query.date.map_or(true, |d| a.date == d))
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.date.cmp(&a.date));
        let total = rows.len() as i64;
        let rows = rows
            .into_iter()
            .skip(query.offset as usize)
            .take(query.limit as usize)
            .collect();
        Ok((rows, total))
    }

    async fn leave_balance(&self, user_id: u64) -> Result<Option<LeaveBalance>, ApiError> {
        let inner = self.inner.lock().await;
        Ok(inner.balances.get(&user_id).cloned())
    }

    async fn list_users(&self, limit: u64, offset: u64) -> Result<(Vec<User>, i64), ApiError> {
        let inner = self.inner.lock().await;
        let total = inner.users.len() as i64;
        let rows = inner
            .users
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .cloned()
            .collect();
        Ok((rows, total))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::leave_request::LeaveType;

    fn d(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    fn new_request(user_id: u64, start: &str, end: &str) -> NewLeaveRequest {
        NewLeaveRequest {
            user_id,
            leave_type: LeaveType::Casual,
            start_date: d(start),
            end_date: d(end),
            total_days: 1,
            reason: None,
        }
    }

    #[actix_web::test]
    async fn leave_list_filters_by_user_and_status() {
        let store = MemStore::new();
        let a = store
            .insert_leave_request(new_request(1, "2026-01-01", "2026-01-02"))
            .await
            .unwrap();
        store
            .insert_leave_request(new_request(2, "2026-01-01", "2026-01-02"))
            .await
            .unwrap();
        store
            .decide_leave(
                a.id,
                LeaveDecision::Approve,
                &BalancePolicy {
                    enforce: false,
                    default_balance: 20,
                },
            )
            .await
            .unwrap();

        let (rows, total) = store
            .list_leave_requests(&LeaveQuery {
                user_id: Some(1),
                status: Some(LeaveStatus::Approved),
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].id, a.id);

        let (rows, total) = store
            .list_leave_requests(&LeaveQuery {
                user_id: None,
                status: Some(LeaveStatus::Pending),
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].user_id, 2);
    }

    #[actix_web::test]
    async fn attendance_list_filters_by_date() {
        let store = MemStore::new();
        store
            .insert_attendance(1, d("2026-01-01"), AttendanceStatus::Present)
            .await
            .unwrap();
        store
            .insert_attendance(1, d("2026-01-02"), AttendanceStatus::Absent)
            .await
            .unwrap();

        let (rows, total) = store
            .list_attendance(&AttendanceQuery {
                user_id: Some(1),
                date: Some(d("2026-01-02")),
                limit: 10,
                offset: 0,
            })
            .await
            .unwrap();
        assert_eq!(total, 1);
        assert_eq!(rows[0].status, AttendanceStatus::Absent);
    }

    #[actix_web::test]
    async fn user_directory_paginates() {
        let store = MemStore::new();
        for id in 1..=3 {
            store
                .seed_user(User {
                    id,
                    name: format!("user {id}"),
                    email: format!("user{id}@company.com"),
                    role: "employee".to_string(),
                    date_of_joining: d("2024-01-01"),
                })
                .await;
        }

        let (rows, total) = store.list_users(2, 2).await.unwrap();
        assert_eq!(total, 3);
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].id, 3);
    }
}
