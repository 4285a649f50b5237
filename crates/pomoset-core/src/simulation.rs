//! Deterministic dry runs of the timer engine.
//!
//! A scenario starts the countdown at a fixed wall-clock time and ticks the
//! engine second by second, optionally resuming after each session end once
//! a fixed idle delay has passed. No real time passes.

use chrono::{Duration, NaiveDateTime};
use serde::Serialize;

use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::timer::{Snapshot, TimerEngine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scenario {
    pub start: NaiveDateTime,
    /// Number of one-second ticks after the initial toggle.
    pub ticks: u64,
    /// Seconds to stay stopped after a session ends before resuming.
    pub idle_between_sessions: u64,
    /// Resume automatically after each session end.
    pub auto_resume: bool,
}

impl Scenario {
    pub fn new(start: NaiveDateTime, ticks: u64) -> Self {
        Self {
            start,
            ticks,
            idle_between_sessions: 0,
            auto_resume: false,
        }
    }

    pub fn with_auto_resume(mut self, idle_between_sessions: u64) -> Self {
        self.auto_resume = true;
        self.idle_between_sessions = idle_between_sessions;
        self
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SimulationReport {
    pub events: Vec<Event>,
    pub sessions_completed: usize,
    pub sets_started: usize,
    /// Set when auto-resume hit the end of the working day.
    pub stopped_out_of_work_at: Option<NaiveDateTime>,
    pub snapshot: Snapshot,
}

/// Run `scenario` on a fresh engine.
///
/// # Errors
/// Fails with [`CoreError::OutOfWork`] if `scenario.start` is outside every
/// work window.
pub fn run(scenario: &Scenario) -> Result<SimulationReport> {
    let mut engine = TimerEngine::new();
    let mut events = engine.toggle(scenario.start)?;
    let mut idle_run = 0u64;
    let mut stopped_out_of_work_at = None;
    let mut now = scenario.start;

    for second in 1..=scenario.ticks {
        now = scenario.start + Duration::seconds(second as i64);
        events.extend(engine.tick(now)?);

        if !scenario.auto_resume || engine.is_ticking() {
            idle_run = 0;
            continue;
        }
        idle_run += 1;
        if idle_run > scenario.idle_between_sessions {
            idle_run = 0;
            match engine.toggle(now) {
                Ok(toggled) => events.extend(toggled),
                Err(CoreError::OutOfWork { at }) => {
                    stopped_out_of_work_at = Some(at);
                    break;
                }
                Err(e) => return Err(e),
            }
        }
    }

    let sessions_completed = events.iter().filter(|e| e.is_session_end()).count();
    let sets_started = events
        .iter()
        .filter(|e| matches!(e, Event::SetStarted { .. }))
        .count();

    Ok(SimulationReport {
        sessions_completed,
        sets_started,
        stopped_out_of_work_at,
        snapshot: engine.snapshot(now),
        events,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn single_session_without_resume() {
        let report = run(&Scenario::new(at(10, 0), 900)).unwrap();
        assert_eq!(report.sessions_completed, 1);
        assert_eq!(report.sets_started, 1);
        // The last 100 ticks are stopped time after session 1 ended.
        assert_eq!(report.snapshot.idle_delays, [100, 0, 0]);
        assert_eq!(report.snapshot.remaining_secs, 0);
    }

    #[test]
    fn start_outside_windows_fails() {
        assert!(matches!(
            run(&Scenario::new(at(7, 0), 10)),
            Err(CoreError::OutOfWork { .. })
        ));
    }
}
