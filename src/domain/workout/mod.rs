//! WorkoutSession domain module.

mod session;

pub use session::{WorkoutSession, WorkoutStatus, MAX_TITLE_LENGTH};
