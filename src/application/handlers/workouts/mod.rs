//! Workout session handlers.
//!
//! Sessions move Scheduled → InProgress → Completed. Reminders can be sent
//! while a session is still scheduled.

mod complete_workout;
mod get_user_workouts;
mod get_workout;
mod schedule_workout;
mod send_workout_reminder;
mod start_workout;

// Commands
pub use complete_workout::{CompleteWorkoutCommand, CompleteWorkoutHandler};
pub use schedule_workout::{ScheduleWorkoutCommand, ScheduleWorkoutHandler};
pub use send_workout_reminder::{SendWorkoutReminderCommand, SendWorkoutReminderHandler};
pub use start_workout::{StartWorkoutCommand, StartWorkoutHandler};

// Queries
pub use get_user_workouts::{GetUserWorkoutsHandler, GetUserWorkoutsQuery};
pub use get_workout::{GetWorkoutByIdHandler, GetWorkoutByIdQuery};
