pub mod attendance;
pub mod clock;
pub mod decision;
pub mod leave;
