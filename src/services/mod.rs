//! Capabilities the timer core depends on: the wall clock and the alert
//! raised on expiry.

pub mod alert;
pub mod clock;

pub use alert::{AlertNotifier, BellAlertNotifier, CommandAlertNotifier};
pub use clock::ClockSource;
