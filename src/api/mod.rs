pub mod attendance;
pub mod balance;
pub mod employee;
pub mod leave_request;

/// Clamped pagination window shared by every list endpoint. `page` is
/// capped so `(page - 1) * per_page` stays well inside u64 no matter
/// what the query string says.
pub(crate) fn page_window(page: Option<u64>, per_page: Option<u64>) -> (u64, u64, u64) {
    let per_page = per_page.unwrap_or(10).min(100);
    let page = page.unwrap_or(1).clamp(1, 1_000_000);
    (page, per_page, (page - 1) * per_page)
}
