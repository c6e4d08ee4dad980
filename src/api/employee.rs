use crate::auth::auth::AuthUser;
use crate::error::ApiError;
use crate::model::user::User;
use crate::store::RecordStore;
use crate::store::mysql::MySqlStore;
use actix_web::{HttpResponse, web};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

#[derive(Deserialize, IntoParams, ToSchema)]
pub struct EmployeeFilter {
    /// Pagination page number (start with 1)
    #[schema(example = 1)]
    pub page: Option<u64>,
    /// Pagination per page number
    #[schema(example = 10)]
    pub per_page: Option<u64>,
}

#[derive(Serialize, ToSchema)]
pub struct EmployeeListResponse {
    pub data: Vec<User>,
    #[schema(example = 1)]
    pub page: u32,
    #[schema(example = 10)]
    pub per_page: u32,
    #[schema(example = 1)]
    pub total: i64,
}

/// Employee directory (Admin)
#[utoipa::path(
    get,
    path = "/api/v1/employees",
    params(EmployeeFilter),
    responses(
        (status = 200, description = "Paginated employee list", body = EmployeeListResponse),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Employee"
)]
pub async fn list_employees(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    query: web::Query<EmployeeFilter>,
) -> Result<HttpResponse, ApiError> {
    auth.require_admin()?;

    let (page, per_page, offset) = super::page_window(query.page, query.per_page);

    let (data, total) = store.list_users(per_page, offset).await?;

    Ok(HttpResponse::Ok().json(EmployeeListResponse {
        data,
        page: page as u32,
        per_page: per_page as u32,
        total,
    }))
}
