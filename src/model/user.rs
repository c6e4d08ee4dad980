use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Employee profile row. Provisioned by the external identity service;
/// this service only reads it.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow, ToSchema)]
pub struct User {
    #[schema(example = 1)]
    pub id: u64,
    #[schema(example = "Jane Doe")]
    pub name: String,
    #[schema(example = "jane.doe@company.com", format = "email", value_type = String)]
    pub email: String,
    #[schema(example = "employee", value_type = String)]
    pub role: String,
    #[schema(example = "2024-01-01", format = "date", value_type = String)]
    pub date_of_joining: NaiveDate,
}
