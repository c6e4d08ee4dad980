use crate::auth::auth::AuthUser;
use crate::config::Config;
use crate::error::ApiError;
use crate::store::RecordStore;
use crate::store::mysql::MySqlStore;
use actix_web::{HttpResponse, web};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct BalanceResponse {
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = 20)]
    pub balance: i32,
    /// None until the first approval touches the row
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = Option<String>)]
    pub last_updated: Option<DateTime<Utc>>,
}

/// Remaining leave balance for the caller
#[utoipa::path(
    get,
    path = "/api/v1/balance",
    responses(
        (status = 200, description = "Remaining leave balance", body = BalanceResponse),
        (status = 401, description = "Unauthorized")
    ),
    security(
        ("bearer_auth" = [])
    ),
    tag = "Balance"
)]
pub async fn my_balance(
    auth: AuthUser,
    store: web::Data<MySqlStore>,
    config: web::Data<Config>,
) -> Result<HttpResponse, ApiError> {
    let response = match store.leave_balance(auth.user_id).await? {
        Some(row) => BalanceResponse {
            user_id: row.user_id,
            balance: row.balance,
            last_updated: Some(row.last_updated),
        },
        // Row not provisioned yet; report the starting balance.
        None => BalanceResponse {
            user_id: auth.user_id,
            balance: config.default_leave_balance,
            last_updated: None,
        },
    };

    Ok(HttpResponse::Ok().json(response))
}
