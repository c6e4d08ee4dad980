use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use derive_more::Display;
use serde_json::json;

/// Every rejected precondition gets its own variant so no invariant
/// failure is swallowed into a generic 500.
#[derive(Debug, Display)]
pub enum ApiError {
    #[display(fmt = "start_date cannot be after end_date")]
    InvalidRange,
    #[display(fmt = "cannot apply for past dates")]
    PastDateNotAllowed,
    #[display(fmt = "leave dates overlap with an existing request")]
    OverlapConflict,
    #[display(fmt = "attendance already marked for today")]
    AlreadyMarked,
    #[display(fmt = "leave request already processed")]
    AlreadyDecided,
    #[display(fmt = "insufficient leave balance")]
    InsufficientBalance,
    #[display(fmt = "leave request not found")]
    NotFound,
    #[display(fmt = "not permitted")]
    Forbidden,
    #[display(fmt = "invalid or missing credentials")]
    Unauthorized,
    #[display(fmt = "Internal Server Error")]
    Database(sqlx::Error),
}

impl From<sqlx::Error> for ApiError {
    fn from(e: sqlx::Error) -> Self {
        ApiError::Database(e)
    }
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::InvalidRange | ApiError::PastDateNotAllowed => StatusCode::BAD_REQUEST,
            ApiError::OverlapConflict
            | ApiError::AlreadyMarked
            | ApiError::AlreadyDecided
            | ApiError::InsufficientBalance => StatusCode::CONFLICT,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let ApiError::Database(e) = self {
            tracing::error!(error = %e, "Database failure");
        }
        HttpResponse::build(self.status_code()).json(json!({
            "message": self.to_string()
        }))
    }
}

/// Infrastructure faults worth one transparent retry on read-only paths.
/// Mutations are never blindly retried.
pub fn is_transient(e: &sqlx::Error) -> bool {
    matches!(e, sqlx::Error::PoolTimedOut | sqlx::Error::Io(_))
}

/// InnoDB aborted the transaction to break a deadlock (errno 1213,
/// SQLSTATE 40001). Nothing was committed, so the statement can be
/// replayed as a whole.
pub fn is_deadlock(e: &sqlx::Error) -> bool {
    if let sqlx::Error::Database(db_err) = e {
        return db_err.code().as_deref() == Some("40001");
    }
    false
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conflict_errors_map_to_409() {
        assert_eq!(ApiError::OverlapConflict.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::AlreadyMarked.status_code(), StatusCode::CONFLICT);
        assert_eq!(ApiError::AlreadyDecided.status_code(), StatusCode::CONFLICT);
    }

    #[test]
    fn validation_errors_map_to_400() {
        assert_eq!(ApiError::InvalidRange.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(
            ApiError::PastDateNotAllowed.status_code(),
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn database_errors_hide_detail() {
        let e = ApiError::Database(sqlx::Error::PoolTimedOut);
        assert_eq!(e.to_string(), "Internal Server Error");
    }

    #[test]
    fn only_aborted_transactions_count_as_deadlocks() {
        assert!(!is_deadlock(&sqlx::Error::PoolTimedOut));
        assert!(!is_deadlock(&sqlx::Error::RowNotFound));
        // deadlocks are not transient reads; they get their own replay path
        assert!(!is_transient(&sqlx::Error::RowNotFound));
    }
}
