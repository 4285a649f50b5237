use serde::Serialize;

use super::plan::{Phase, Session, SessionPlan};

/// What a single second was spent on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SecondSpent {
    /// No session is loaded.
    Nothing,
    /// The timer was running.
    Elapsed,
    /// The timer was stopped; counted as idle delay of this session.
    Idle(Session),
    /// The timer was stopped in session 4, where idle time is not tracked.
    Untracked,
}

/// All mutable fields of the current set.
///
/// Durations are whole seconds and unsigned; every subtraction saturates.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SessionRuntime {
    session: Option<Session>,
    elapsed_secs: u64,
    target_secs: u64,
    /// Idle delay of sessions 1-3.
    idle_delays: [u64; 3],
    ticking: bool,
    in_pause_phase: bool,
    pause_unit: f64,
}

impl SessionRuntime {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn session(&self) -> Option<Session> {
        self.session
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn target_secs(&self) -> u64 {
        self.target_secs
    }

    pub fn remaining_secs(&self) -> u64 {
        self.target_secs.saturating_sub(self.elapsed_secs)
    }

    pub fn idle_delays(&self) -> &[u64; 3] {
        &self.idle_delays
    }

    pub fn idle_delay(&self, session: Session) -> u64 {
        self.idle_delays.get(session.index()).copied().unwrap_or(0)
    }

    pub fn total_idle_secs(&self) -> u64 {
        self.idle_delays.iter().sum()
    }

    pub fn is_ticking(&self) -> bool {
        self.ticking
    }

    pub fn in_pause_phase(&self) -> bool {
        self.in_pause_phase
    }

    pub fn pause_unit(&self) -> f64 {
        self.pause_unit
    }

    /// The loaded session has run its full target.
    pub fn is_finished(&self) -> bool {
        self.session.is_some() && self.elapsed_secs >= self.target_secs
    }

    pub fn phase(&self) -> Option<Phase> {
        let session = self.session?;
        Some(if self.in_pause_phase {
            session.pause_phase()
        } else {
            Phase::Focus
        })
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Load `session` with a fresh elapsed counter.
    pub fn load(&mut self, session: Session, target_secs: u64, pause_unit: f64) {
        self.session = Some(session);
        self.elapsed_secs = 0;
        self.target_secs = target_secs;
        self.pause_unit = pause_unit;
        self.in_pause_phase = false;
    }

    /// Forget the finished set. The ticking flag is left alone.
    pub fn reset_for_new_window(&mut self) {
        let ticking = self.ticking;
        *self = Self {
            ticking,
            ..Self::default()
        };
    }

    /// Drop everything, including the ticking flag.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn set_ticking(&mut self, ticking: bool) {
        self.ticking = ticking;
    }

    /// Flip the ticking flag and return the new value.
    pub fn toggle_ticking(&mut self) -> bool {
        self.ticking = !self.ticking;
        self.ticking
    }

    /// Account for one second of wall-clock time.
    pub fn record_second(&mut self) -> SecondSpent {
        let Some(session) = self.session else {
            return SecondSpent::Nothing;
        };
        if self.ticking {
            if self.elapsed_secs < self.target_secs {
                self.elapsed_secs += 1;
            }
            SecondSpent::Elapsed
        } else if session.tracks_idle_delay() {
            let delay = &mut self.idle_delays[session.index()];
            *delay = delay.saturating_add(1);
            SecondSpent::Idle(session)
        } else {
            SecondSpent::Untracked
        }
    }

    /// Recompute the pause-phase flag. Returns `true` on entering the pause.
    pub fn refresh_pause_phase(&mut self, plan: &SessionPlan) -> bool {
        let was = self.in_pause_phase;
        self.in_pause_phase = match self.session {
            Some(session) => {
                let remaining = self.remaining_secs();
                remaining > 0 && remaining <= plan.pause_threshold(session, self.pause_unit)
            }
            None => false,
        };
        !was && self.in_pause_phase
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn loaded(session: Session, target: u64, pause_unit: f64) -> SessionRuntime {
        let mut rt = SessionRuntime::new();
        rt.load(session, target, pause_unit);
        rt
    }

    #[test]
    fn idle_runtime_ignores_seconds() {
        let mut rt = SessionRuntime::new();
        rt.set_ticking(true);
        assert_eq!(rt.record_second(), SecondSpent::Nothing);
        assert_eq!(rt.elapsed_secs(), 0);
    }

    #[test]
    fn ticking_seconds_count_as_elapsed() {
        let mut rt = loaded(Session::First, 10, 1.0);
        rt.set_ticking(true);
        rt.record_second();
        rt.record_second();
        assert_eq!(rt.elapsed_secs(), 2);
        assert_eq!(rt.remaining_secs(), 8);
    }

    #[test]
    fn stopped_seconds_count_as_idle_delay() {
        let mut rt = loaded(Session::Second, 10, 1.0);
        assert_eq!(rt.record_second(), SecondSpent::Idle(Session::Second));
        assert_eq!(rt.idle_delay(Session::Second), 1);
        assert_eq!(rt.idle_delay(Session::First), 0);
        assert_eq!(rt.elapsed_secs(), 0);
    }

    #[test]
    fn fourth_session_does_not_track_idle_delay() {
        let mut rt = loaded(Session::Fourth, 10, 1.0);
        assert_eq!(rt.record_second(), SecondSpent::Untracked);
        assert_eq!(rt.total_idle_secs(), 0);
    }

    #[test]
    fn elapsed_never_exceeds_target() {
        let mut rt = loaded(Session::First, 2, 1.0);
        rt.set_ticking(true);
        for _ in 0..5 {
            rt.record_second();
        }
        assert_eq!(rt.elapsed_secs(), 2);
        assert!(rt.is_finished());
    }

    #[test]
    fn pause_phase_boundary_uses_truncated_pause() {
        let plan = SessionPlan::default();
        let x = 3600.0 / 27.0;
        let mut rt = loaded(Session::First, 800, x);
        rt.set_ticking(true);
        for _ in 0..666 {
            rt.record_second();
        }
        // 134s left, pause is 133.33s
        assert!(!rt.refresh_pause_phase(&plan));
        rt.record_second();
        assert!(rt.refresh_pause_phase(&plan));
        assert_eq!(rt.phase(), Some(Phase::ShortPause));
        // Already in pause: no second entry.
        rt.record_second();
        assert!(!rt.refresh_pause_phase(&plan));
        assert!(rt.in_pause_phase());
    }

    #[test]
    fn long_pause_uses_four_units() {
        let plan = SessionPlan::default();
        let x = 3600.0 / 27.0;
        let mut rt = loaded(Session::Fourth, 1200, x);
        rt.set_ticking(true);
        for _ in 0..667 {
            rt.record_second();
        }
        // 533s left, long pause is 533.33s
        assert!(rt.refresh_pause_phase(&plan));
        assert_eq!(rt.phase(), Some(Phase::LongPause));
    }

    #[test]
    fn no_pause_phase_at_zero_remaining() {
        let plan = SessionPlan::default();
        let mut rt = loaded(Session::First, 3, 1.0);
        rt.set_ticking(true);
        for _ in 0..3 {
            rt.record_second();
        }
        rt.refresh_pause_phase(&plan);
        assert!(!rt.in_pause_phase());
    }

    #[test]
    fn reset_for_new_window_keeps_ticking_only() {
        let mut rt = loaded(Session::Third, 10, 1.0);
        rt.record_second();
        rt.set_ticking(true);
        rt.reset_for_new_window();
        assert!(rt.is_idle());
        assert!(rt.is_ticking());
        assert_eq!(rt.total_idle_secs(), 0);
    }
}
