//! Wall clock state

use chrono::{DateTime, Local};

/// Latest wall-clock reading, refreshed by the clock ticker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockState {
    pub now: DateTime<Local>,
}

impl ClockState {
    pub fn new(now: DateTime<Local>) -> Self {
        Self { now }
    }

    /// 12-hour display form, e.g. `03:07:09 PM`
    pub fn display(&self) -> String {
        self.now.format("%I:%M:%S %p").to_string()
    }
}

impl Default for ClockState {
    fn default() -> Self {
        Self::new(Local::now())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn display_uses_twelve_hour_clock() {
        let now = Local.with_ymd_and_hms(2024, 5, 1, 15, 7, 9).unwrap();
        assert_eq!(ClockState::new(now).display(), "03:07:09 PM");
    }
}
