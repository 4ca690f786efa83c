//! Notification adapters.
//!
//! - `LoggingNotificationSender` - Writes notifications to the log (no e-mail configured)
//! - `ResendNotificationSender` - Sends e-mail through the Resend HTTP API
//! - `RecordingNotificationSender` - Captures notifications for tests

mod logging;
mod recording;
mod resend;

pub use logging::LoggingNotificationSender;
pub use recording::{RecordedNotification, RecordingNotificationSender};
pub use resend::{ResendConfig, ResendNotificationSender};
