//! Work window table and deadline resolution.
//!
//! The day is split into fixed two-hour spans in which a set of sessions may
//! run:
//!
//! ```text
//! 09-11  11-13  |lunch|  14-16  16-18  |dinner & free time|  22-24  00-02  |sleep|
//! ```
//!
//! Any hour outside these spans is unavailable. A set always ends at the
//! end hour of the span it was started in.

use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

/// A span of whole hours, `[start_hour, end_hour)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkWindow {
    pub start_hour: u32,
    /// Exclusive. `24` means midnight of the following day.
    pub end_hour: u32,
    pub crosses_midnight: bool,
}

impl WorkWindow {
    pub const fn new(start_hour: u32, end_hour: u32) -> Self {
        Self {
            start_hour,
            end_hour,
            crosses_midnight: end_hour >= 24,
        }
    }

    pub fn contains_hour(&self, hour: u32) -> bool {
        self.start_hour <= hour && hour < self.end_hour
    }

    /// Deadline of this window when it is entered on `date`.
    pub fn deadline_on(&self, date: NaiveDate) -> NaiveDateTime {
        date.and_time(NaiveTime::MIN) + Duration::hours(i64::from(self.end_hour))
    }
}

/// The fixed daily table. Disjoint and sorted by start hour within each day.
pub const WORK_WINDOWS: [WorkWindow; 6] = [
    WorkWindow::new(9, 11),
    WorkWindow::new(11, 13),
    WorkWindow::new(14, 16),
    WorkWindow::new(16, 18),
    WorkWindow::new(22, 24),
    WorkWindow::new(0, 2),
];

/// Result of looking up the current time in the window table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum WindowStatus {
    Open {
        window: WorkWindow,
        deadline: NaiveDateTime,
    },
    Unavailable,
}

impl WindowStatus {
    pub fn is_open(&self) -> bool {
        matches!(self, WindowStatus::Open { .. })
    }

    pub fn deadline(&self) -> Option<NaiveDateTime> {
        match self {
            WindowStatus::Open { deadline, .. } => Some(*deadline),
            WindowStatus::Unavailable => None,
        }
    }
}

/// Find the window covering `hour` (0-23).
pub fn find_window(hour: u32) -> Option<WorkWindow> {
    WORK_WINDOWS.iter().copied().find(|w| w.contains_hour(hour))
}

/// Resolve the end-of-window deadline for `now`.
pub fn resolve_deadline(now: NaiveDateTime) -> WindowStatus {
    match find_window(now.hour()) {
        Some(window) => WindowStatus::Open {
            window,
            deadline: window.deadline_on(now.date()),
        },
        None => WindowStatus::Unavailable,
    }
}

/// Whole seconds from `now` (truncated to the minute) until `deadline`.
///
/// Never negative: a deadline in the past yields zero.
pub fn available_seconds(now: NaiveDateTime, deadline: NaiveDateTime) -> u64 {
    let floor = now
        - Duration::seconds(i64::from(now.second()))
        - Duration::nanoseconds(i64::from(now.nanosecond()));
    let secs = (deadline - floor).num_seconds();
    u64::try_from(secs).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn table_is_disjoint() {
        for hour in 0..24 {
            let hits = WORK_WINDOWS.iter().filter(|w| w.contains_hour(hour)).count();
            assert!(hits <= 1, "hour {hour} matched {hits} windows");
        }
    }

    #[test]
    fn morning_window_ends_at_eleven() {
        let status = resolve_deadline(at(10, 0, 0));
        assert_eq!(status.deadline(), Some(at(11, 0, 0)));
        match status {
            WindowStatus::Open { window, .. } => assert_eq!(window, WorkWindow::new(9, 11)),
            WindowStatus::Unavailable => panic!("expected open window"),
        }
    }

    #[test]
    fn every_window_maps_to_its_end_hour() {
        let cases = [
            (9, 11),
            (10, 11),
            (11, 13),
            (12, 13),
            (14, 16),
            (15, 16),
            (16, 18),
            (17, 18),
            (0, 2),
            (1, 2),
        ];
        for (hour, end) in cases {
            assert_eq!(
                resolve_deadline(at(hour, 30, 0)).deadline(),
                Some(at(end, 0, 0)),
                "hour {hour}"
            );
        }
    }

    #[test]
    fn late_window_ends_at_next_midnight() {
        let status = resolve_deadline(at(22, 15, 0));
        let next_midnight = NaiveDate::from_ymd_opt(2024, 5, 7)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(status.deadline(), Some(next_midnight));
        match status {
            WindowStatus::Open { window, .. } => assert!(window.crosses_midnight),
            WindowStatus::Unavailable => panic!("expected open window"),
        }
    }

    #[test]
    fn gaps_are_unavailable() {
        for hour in [2, 3, 4, 5, 6, 7, 8, 13, 18, 19, 20, 21] {
            assert_eq!(resolve_deadline(at(hour, 0, 0)), WindowStatus::Unavailable, "hour {hour}");
        }
    }

    #[test]
    fn available_seconds_truncates_to_the_minute() {
        assert_eq!(available_seconds(at(10, 0, 0), at(11, 0, 0)), 3600);
        assert_eq!(available_seconds(at(10, 0, 59), at(11, 0, 0)), 3600);
        assert_eq!(available_seconds(at(10, 59, 30), at(11, 0, 0)), 60);
    }

    #[test]
    fn available_seconds_never_negative() {
        assert_eq!(available_seconds(at(12, 0, 0), at(11, 0, 0)), 0);
    }
}
