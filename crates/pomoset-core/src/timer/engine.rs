//! Timer engine implementation.
//!
//! The timer engine is a tick-driven state machine. It does not use
//! internal threads - the caller is responsible for calling `tick()` once per
//! second and for passing the current local time.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --toggle--> Session 1 -> Session 2 -> Session 3 -> Session 4 --+
//!                      ^                                              |
//!                      +------------- next work window ---------------+
//! ```
//!
//! Each session is focus time followed by a pause; the pause phase is the
//! tail of the session's target. When a session's elapsed time reaches its
//! target the engine stops ticking and leaves the finished session loaded at
//! `00:00`. The next `toggle()` loads the following session; after session 4
//! it resolves a fresh set against the window open at that moment.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.toggle(now)?;
//! // Once per second:
//! let events = engine.tick(now)?;
//! ```

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, info, warn};

use super::orchestrator::{Orchestrator, ResolvedSet};
use super::plan::{Phase, Session, SessionPlan};
use super::runtime::{SecondSpent, SessionRuntime};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::window::{resolve_deadline, WorkWindow};

/// Shown when the current time is outside every work window.
pub const OUT_OF_WORK: &str = "【 Out of Work! 】";
/// Shown when no session is loaded.
pub const NO_ACTIVE_SESSION: &str = "【 --:-- (no active session) 】";

/// Serializable view of the engine at one instant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub session: Option<Session>,
    pub phase: Option<Phase>,
    pub ticking: bool,
    pub elapsed_secs: u64,
    pub target_secs: u64,
    pub remaining_secs: u64,
    pub idle_delays: [u64; 3],
    pub pause_unit: Option<f64>,
    pub rebalanced_pause_unit: Option<f64>,
    pub window: Option<WorkWindow>,
    pub deadline: Option<NaiveDateTime>,
    pub total_secs: Option<u64>,
    pub display: String,
    pub at: NaiveDateTime,
}

/// Core timer engine.
#[derive(Debug, Clone, Default)]
pub struct TimerEngine {
    runtime: SessionRuntime,
    orchestrator: Orchestrator,
}

impl TimerEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_plan(plan: SessionPlan) -> Self {
        Self {
            runtime: SessionRuntime::new(),
            orchestrator: Orchestrator::new(plan),
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn runtime(&self) -> &SessionRuntime {
        &self.runtime
    }

    pub fn session(&self) -> Option<Session> {
        self.runtime.session()
    }

    pub fn is_ticking(&self) -> bool {
        self.runtime.is_ticking()
    }

    pub fn current_set(&self) -> Option<&ResolvedSet> {
        self.orchestrator.current_set()
    }

    pub fn plan(&self) -> &SessionPlan {
        self.orchestrator.plan()
    }

    /// Human-readable remaining time, e.g. `【 12:05 (session 2 | short pause) 】`.
    ///
    /// Does not mutate anything, so repeated calls between ticks agree.
    pub fn remaining(&self, now: NaiveDateTime) -> String {
        if !resolve_deadline(now).is_open() {
            return OUT_OF_WORK.to_string();
        }
        let rt = &self.runtime;
        let Some(session) = rt.session() else {
            return NO_ACTIVE_SESSION.to_string();
        };
        if rt.target_secs() == 0 && rt.elapsed_secs() == 0 {
            return NO_ACTIVE_SESSION.to_string();
        }

        let (minutes, seconds) = (rt.remaining_secs() / 60, rt.remaining_secs() % 60);
        let mut phase = format!("session {session}");
        if rt.in_pause_phase() {
            phase.push_str(" | ");
            phase.push_str(session.pause_phase().label());
        }
        format!("【 {minutes:02}:{seconds:02} ({phase}) 】")
    }

    pub fn snapshot(&self, now: NaiveDateTime) -> Snapshot {
        let rt = &self.runtime;
        let set = self.current_set();
        Snapshot {
            session: rt.session(),
            phase: rt.phase(),
            ticking: rt.is_ticking(),
            elapsed_secs: rt.elapsed_secs(),
            target_secs: rt.target_secs(),
            remaining_secs: rt.remaining_secs(),
            idle_delays: *rt.idle_delays(),
            pause_unit: set.map(|s| s.pause_unit),
            rebalanced_pause_unit: self.orchestrator.rebalanced_pause_unit(rt),
            window: set.map(|s| s.window),
            deadline: set.map(|s| s.deadline),
            total_secs: set.map(|s| s.total_secs),
            display: self.remaining(now),
            at: now,
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or stop the countdown.
    ///
    /// Fails with [`CoreError::OutOfWork`] outside all work windows, leaving
    /// the state untouched. Starting with nothing left to count down loads
    /// the next session (or a new set) first.
    pub fn toggle(&mut self, now: NaiveDateTime) -> Result<Vec<Event>> {
        if !resolve_deadline(now).is_open() {
            warn!(%now, "toggle rejected outside work windows");
            return Err(CoreError::OutOfWork { at: now });
        }

        let mut events = Vec::new();
        let ticking = self.runtime.toggle_ticking();
        if ticking && (self.runtime.is_idle() || self.runtime.is_finished()) {
            events.extend(self.advance(now)?);
        }

        let session = self.runtime.session();
        info!(ticking, session = session.map(Session::number), "timer toggled");
        events.push(if ticking {
            Event::TickingStarted { session, at: now }
        } else {
            Event::TickingStopped { session, at: now }
        });
        Ok(events)
    }

    /// Advance one second.
    pub fn tick(&mut self, now: NaiveDateTime) -> Result<Vec<Event>> {
        let mut events = Vec::new();

        if self.runtime.is_idle() {
            if !self.runtime.is_ticking() {
                return Ok(events);
            }
            events.extend(self.advance(now)?);
            if self.runtime.is_idle() {
                return Ok(events);
            }
        } else if self.runtime.record_second() == SecondSpent::Elapsed
            && self.runtime.is_finished()
        {
            events.extend(self.finish_session(now));
        }

        if self.runtime.refresh_pause_phase(self.orchestrator.plan()) {
            if let (Some(session), Some(phase)) = (self.runtime.session(), self.runtime.phase()) {
                info!(session = session.number(), phase = phase.label(), "pause started");
                events.push(Event::PauseStarted { session, phase, at: now });
            }
        }

        Ok(events)
    }

    /// Abandon the current set and stop ticking.
    pub fn reset(&mut self) {
        self.runtime.clear();
        self.orchestrator = Orchestrator::new(*self.orchestrator.plan());
    }

    // ── Internal ─────────────────────────────────────────────────────

    /// Stop ticking and keep the finished session loaded until the next toggle.
    fn finish_session(&mut self, now: NaiveDateTime) -> Vec<Event> {
        let Some(session) = self.runtime.session() else {
            return Vec::new();
        };
        self.runtime.set_ticking(false);
        info!(
            session = session.number(),
            elapsed = self.runtime.elapsed_secs(),
            idle = self.runtime.idle_delay(session),
            "session ended"
        );
        vec![Event::SessionEnded {
            session,
            elapsed_secs: self.runtime.elapsed_secs(),
            idle_delay_secs: self.runtime.idle_delay(session),
            at: now,
        }]
    }

    fn advance(&mut self, now: NaiveDateTime) -> Result<Vec<Event>> {
        match self.orchestrator.advance(&mut self.runtime, now) {
            Ok(events) => {
                debug!(session = self.runtime.session().map(Session::number), "advanced");
                Ok(events)
            }
            Err(e) => {
                self.reset();
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};

    fn at(h: u32, m: u32, s: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(h, m, s)
            .unwrap()
    }

    #[test]
    fn idle_tick_without_toggle_is_noop() {
        let mut engine = TimerEngine::new();
        assert!(engine.tick(at(10, 0, 0)).unwrap().is_empty());
        assert!(engine.session().is_none());
        assert_eq!(engine.remaining(at(10, 0, 0)), NO_ACTIVE_SESSION);
    }

    #[test]
    fn toggle_starts_first_session() {
        let mut engine = TimerEngine::new();
        let events = engine.toggle(at(10, 0, 0)).unwrap();
        assert!(matches!(
            events.last(),
            Some(Event::TickingStarted { session: Some(Session::First), .. })
        ));
        assert_eq!(engine.session(), Some(Session::First));
        assert!(engine.is_ticking());
        assert_eq!(engine.remaining(at(10, 0, 0)), "【 13:20 (session 1) 】");
    }

    #[test]
    fn toggle_out_of_work_leaves_state_unchanged() {
        let mut engine = TimerEngine::new();
        let err = engine.toggle(at(20, 0, 0)).unwrap_err();
        assert!(matches!(err, CoreError::OutOfWork { .. }));
        assert!(!engine.is_ticking());
        assert!(engine.session().is_none());
        assert_eq!(engine.remaining(at(20, 0, 0)), OUT_OF_WORK);
    }

    #[test]
    fn toggle_twice_pauses() {
        let mut engine = TimerEngine::new();
        engine.toggle(at(10, 0, 0)).unwrap();
        let events = engine.toggle(at(10, 0, 5)).unwrap();
        assert!(matches!(events[..], [Event::TickingStopped { .. }]));
        assert_eq!(engine.session(), Some(Session::First));
    }

    #[test]
    fn remaining_shows_pause_annotation() {
        let mut engine = TimerEngine::new();
        let start = at(10, 0, 0);
        engine.toggle(start).unwrap();
        for i in 1..=667 {
            engine.tick(start + Duration::seconds(i)).unwrap();
        }
        assert_eq!(engine.remaining(at(10, 11, 7)), "【 02:13 (session 1 | short pause) 】");
    }

    #[test]
    fn remaining_is_idempotent() {
        let mut engine = TimerEngine::new();
        engine.toggle(at(10, 0, 0)).unwrap();
        engine.tick(at(10, 0, 1)).unwrap();
        let now = at(10, 0, 1);
        assert_eq!(engine.remaining(now), engine.remaining(now));
    }

    #[test]
    fn finished_session_waits_for_toggle() {
        let mut engine = TimerEngine::new();
        let start = at(10, 0, 0);
        engine.toggle(start).unwrap();

        let mut ended = 0;
        for i in 1..=800 {
            let events = engine.tick(start + Duration::seconds(i)).unwrap();
            ended += events.iter().filter(|e| e.is_session_end()).count();
        }
        assert_eq!(ended, 1);
        assert_eq!(engine.session(), Some(Session::First));
        assert!(!engine.is_ticking());
        assert!(engine.runtime().is_finished());
        assert_eq!(engine.remaining(at(10, 13, 20)), "【 00:00 (session 1) 】");

        // Stopped time after the end belongs to the finished session.
        for i in 801..=810 {
            assert!(engine.tick(start + Duration::seconds(i)).unwrap().is_empty());
        }
        assert_eq!(engine.runtime().idle_delay(Session::First), 10);

        let events = engine.toggle(at(10, 13, 30)).unwrap();
        assert!(matches!(
            events[..],
            [
                Event::SessionStarted { session: Session::Second, target_secs: 800, .. },
                Event::TickingStarted { session: Some(Session::Second), .. }
            ]
        ));
        assert!(engine.is_ticking());
        assert_eq!(engine.runtime().elapsed_secs(), 0);
        assert_eq!(engine.runtime().idle_delay(Session::First), 10);
    }

    #[test]
    fn reset_returns_to_idle() {
        let mut engine = TimerEngine::new();
        engine.toggle(at(10, 0, 0)).unwrap();
        engine.reset();
        assert!(engine.session().is_none());
        assert!(engine.current_set().is_none());
        assert!(!engine.is_ticking());
    }

    #[test]
    fn snapshot_reports_set_details() {
        let mut engine = TimerEngine::new();
        engine.toggle(at(10, 0, 0)).unwrap();
        let snap = engine.snapshot(at(10, 0, 0));
        assert_eq!(snap.total_secs, Some(3600));
        assert_eq!(snap.target_secs, 800);
        assert_eq!(snap.phase, Some(Phase::Focus));
        assert_eq!(snap.display, "【 13:20 (session 1) 】");
    }
}
