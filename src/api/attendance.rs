use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::service::attendance as attendance_service;
use crate::service::clock::SystemClock;
use crate::store::mysql::MySqlStore;
use crate::store::{AttendanceQuery, RecordStore};
use actix_web::{HttpResponse, web};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

/// The effective date is always the server's current day; a client date
/// field is deliberately absent from this payload.
#[derive(Deserialize, ToSchema)]
pub struct MarkAttendance {
    #[schema(example = "present")]
    pub status: AttendanceStatus,
}

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct AttendanceFilter {
    /// Filter by user ID (admin only; employees always see their own)
    #[schema(example = 123)]
    pub user_id: Option<u64>,
    /// Filter by calendar date
    #[schema(example = "2026-01-01", format = "date", value_type = String)]
    pub date: Option<NaiveDate>,
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct AttendanceListResponse {
    pub data: Vec<Attendance>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// Mark attendance for today
#[utoipa::path(
    post,
    path = "/api/v1/attendance",
    request_body(
        content = MarkAttendance,
        description = "Attendance status for the current day",
        content_type = "application/json"
    ),
    responses(
        (status = 200, description = "Attendance marked", body = Attendance),
        (status = 401, description = "Unauthorized"),
        (status = 409, description = "Already marked today", body = Object, example = json!({
            "message": "attendance already marked for today"
        }))
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn mark_attendance(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    payload: web::Json<MarkAttendance>,
) -> Result<HttpResponse, ApiError> {
    let created =
        attendance_service::mark(store.get_ref(), &SystemClock, auth.user_id, payload.status)
            .await?;

    Ok(HttpResponse::Ok().json(created))
}

/// Attendance history
#[utoipa::path(
    get,
    path = "/api/v1/attendance",
    params(AttendanceFilter),
    responses(
        (status = 200, description = "Paginated attendance list", body = AttendanceListResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Attendance"
)]
pub async fn attendance_list(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    query: web::Query<AttendanceFilter>,
) -> Result<HttpResponse, ApiError> {
    let (page, per_page, offset) = super::page_window(query.page, query.per_page);

    let user_id = if auth.is_admin() {
        query.user_id
    } else {
        Some(auth.user_id)
    };

    let (data, total) = store
        .list_attendance(&AttendanceQuery {
            user_id,
            date: query.date,
            limit: per_page,
            offset,
        })
        .await?;

    Ok(HttpResponse::Ok().json(AttendanceListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
