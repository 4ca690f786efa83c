//! Attendance handlers: check-in, check-out and history.

mod check_in;
mod check_out;
mod get_attendance;
mod get_user_attendance;

// Commands
pub use check_in::{CheckInCommand, CheckInHandler};
pub use check_out::{CheckOutCommand, CheckOutHandler};

// Queries
pub use get_attendance::{GetAttendanceByIdHandler, GetAttendanceByIdQuery};
pub use get_user_attendance::{GetUserAttendanceHandler, GetUserAttendanceQuery};
