use crate::api::attendance::{AttendanceFilter, AttendanceListResponse, MarkAttendance};
use crate::api::balance::BalanceResponse;
use crate::api::employee::{EmployeeFilter, EmployeeListResponse};
use crate::api::leave_request::{CreateLeave, LeaveFilter, LeaveListResponse};
use crate::model::attendance::{Attendance, AttendanceStatus};
use crate::model::leave_request::{LeaveRequest, LeaveStatus, LeaveType};
use crate::model::user::User;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "HR Self-Service Portal API",
        version = "1.0.0",
        description = r#"
## HR Self-Service Portal

Employees apply for leave and mark daily attendance; administrators
review pending leave requests and approve or reject them.

### Consistency rules
- No two overlapping non-rejected leave ranges per employee
- At most one attendance mark per employee per calendar day
- Leave balance is deducted exactly once per approval

### Security
All endpoints require a **JWT Bearer token** issued by the external
identity provider. Decisions and the employee directory are
**Admin**-only.

Built with **Rust**, **Actix Web**, **SQLx**, and **Utoipa**.
"#,
    ),
    paths(
        crate::api::leave_request::leave_list,
        crate::api::leave_request::get_leave,
        crate::api::leave_request::create_leave,
        crate::api::leave_request::approve_leave,
        crate::api::leave_request::reject_leave,

        crate::api::attendance::mark_attendance,
        crate::api::attendance::attendance_list,

        crate::api::balance::my_balance,

        crate::api::employee::list_employees
    ),
    components(
        schemas(
            LeaveType,
            LeaveStatus,
            LeaveRequest,
            CreateLeave,
            LeaveFilter,
            LeaveListResponse,
            AttendanceStatus,
            Attendance,
            MarkAttendance,
            AttendanceFilter,
            AttendanceListResponse,
            BalanceResponse,
            User,
            EmployeeFilter,
            EmployeeListResponse
        )
    ),
    tags(
        (name = "Leave", description = "Leave application and decision APIs"),
        (name = "Attendance", description = "Daily attendance APIs"),
        (name = "Balance", description = "Leave balance APIs"),
        (name = "Employee", description = "Employee directory APIs"),
    )
)]
pub struct ApiDoc;
