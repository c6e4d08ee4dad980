use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::model::leave_request::{LeaveDecision, LeaveRequest, LeaveStatus, LeaveType};
use crate::service::clock::SystemClock;
use crate::service::{decision, leave};
use crate::store::mysql::MySqlStore;
use crate::store::{BalancePolicy, LeaveQuery, RecordStore};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, ToSchema)]
pub struct CreateLeave {
    #[schema(example = "sick")]
    pub leave_type: LeaveType,
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub start_date: NaiveDate,
    #[schema(example = "2026-01-03", format = "date", value_type = String)]
    pub end_date: NaiveDate,
    #[schema(example = "family event")]
    pub reason: Option<String>,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct LeaveFilter {
    /// Filter by user ID (admin only; employees always see their own)
    #[schema(example = 123)]
    pub user_id: Option<u64>,
    /// Filter by leave status
    #[schema(example = "pending")]
    pub status: Option<LeaveStatus>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct LeaveListResponse {
    pub data: Vec<LeaveRequest>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

fn balance_policy(config: &Config) -> BalancePolicy {
    BalancePolicy {
        enforce: config.enforce_leave_balance,
        default_balance: config.default_leave_balance,
    }
}

/* =========================
Submit leave application
========================= */
#[utoipa::path(
    post,
    path = "/api/v1/leave",
    request_body(
        content = CreateLeave,
        description = "Leave application payload",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Leave request submitted", body = LeaveRequest),
        (status = 400, description = "Invalid or past date range"),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Dates overlap an existing request", body = Object, example = json!({
            "message": "leave dates overlap with an existing request"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn create_leave(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    payload: web::Json<CreateLeave>,
) -> Result<HttpResponse, ApiError> {
    let payload = payload.into_inner();
    let created = leave::apply(
        store.get_ref(),
        &SystemClock,
        auth.user_id,
        leave::ApplyLeave {
            leave_type: payload.leave_type,
            start_date: payload.start_date,
            end_date: payload.end_date,
            reason: payload.reason,
        },
    )
    .await?;

    Ok(HttpResponse::Ok().json(created))
}

/* =========================
Approve leave (Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/approve",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to approve")
    ),
    responses(
        (status = 200, description = "Leave approved", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed or insufficient balance", body = Object, example = json!({
            "message": "leave request already processed"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn approve_leave(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let leave_id = path.into_inner();
    tracing::info!(admin = %auth.email, leave_id, "Approving leave request");
    let updated = decision::decide(
        store.get_ref(),
        leave_id,
        LeaveDecision::Approve,
        &balance_policy(&config),
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/* =========================
Reject leave (Admin)
========================= */
#[utoipa::path(
    put,
    path = "/api/v1/leave/{leave_id}/reject",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to reject")
    ),
    responses(
        (status = 200, description = "Leave rejected", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found"),
        (status = 409, description = "Already processed", body = Object, example = json!({
            "message": "leave request already processed"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn reject_leave(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    config: web::Data<Config>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let leave_id = path.into_inner();
    tracing::info!(admin = %auth.email, leave_id, "Rejecting leave request");
    let updated = decision::decide(
        store.get_ref(),
        leave_id,
        LeaveDecision::Reject,
        &balance_policy(&config),
    )
    .await?;

    Ok(HttpResponse::Ok().json(updated))
}

/// for getting a leave application details endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave/{leave_id}",
    params(
        ("leave_id" = u64, Path, description = "ID of the leave request to fetch")
    ),
    responses(
        (status = 200, description = "Leave request found", body = LeaveRequest),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Leave request not found", body = Object, example = json!({
            "message": "leave request not found"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn get_leave(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    path: web::Path<u64>,
) -> Result<HttpResponse, ApiError> {
    let leave_id = path.into_inner();

    let leave = store
        .leave_request_by_id(leave_id)
        .await?
        .ok_or(ApiError::NotFound)?;

    if !auth.is_admin() && leave.user_id != auth.user_id {
        return Err(ApiError::Forbidden);
    }

    Ok(HttpResponse::Ok().json(leave))
}

/// for getting leave applications endpoint
#[utoipa::path(
    get,
    path = "/api/v1/leave",
    params(LeaveFilter),
    responses(
        (status = 200, description = "Paginated leave list", body = LeaveListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Leave"
)]
pub async fn leave_list(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    query: web::Query<LeaveFilter>,
) -> Result<HttpResponse, ApiError> {
    let (page, per_page, offset) = super::page_window(query.page, query.per_page);

    // An employee only ever sees their own requests.
    let user_id = if auth.is_admin() {
        query.user_id
    } else {
        Some(auth.user_id)
    };

    let (data, total) = store
        .list_leave_requests(&LeaveQuery {
            user_id,
            status: query.status,
            limit: per_page,
            offset,
        })
        .await?;

    Ok(HttpResponse::Ok().json(LeaveListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
