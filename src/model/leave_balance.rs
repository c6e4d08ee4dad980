use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Remaining-days counter, one row per user. Mutated only by the leave
/// decision approval path.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct LeaveBalance {
    #[schema(example = 1000)]
    pub user_id: u64,
    #[schema(example = 20)]
    pub balance: i32,
    #[schema(example = "2026-01-01T00:00:00Z", format = "date-time", value_type = String)]
    pub last_updated: DateTime<Utc>,
}
