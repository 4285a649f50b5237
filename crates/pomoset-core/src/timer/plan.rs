use serde::{Deserialize, Serialize};
use std::fmt;

/// One of the four sessions of a set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Session {
    First,
    Second,
    Third,
    Fourth,
}

impl Session {
    pub const ALL: [Session; 4] = [
        Session::First,
        Session::Second,
        Session::Third,
        Session::Fourth,
    ];

    /// 1-based session number.
    pub fn number(self) -> u8 {
        self.index() as u8 + 1
    }

    /// 0-based position in the set.
    pub fn index(self) -> usize {
        match self {
            Session::First => 0,
            Session::Second => 1,
            Session::Third => 2,
            Session::Fourth => 3,
        }
    }

    pub fn next(self) -> Option<Session> {
        Self::ALL.get(self.index() + 1).copied()
    }

    /// Session 4 ends the set, so time spent stopped in it is not carried anywhere.
    pub fn tracks_idle_delay(self) -> bool {
        self != Session::Fourth
    }

    pub fn pause_phase(self) -> Phase {
        match self {
            Session::Fourth => Phase::LongPause,
            _ => Phase::ShortPause,
        }
    }
}

impl From<Session> for u8 {
    fn from(session: Session) -> Self {
        session.number()
    }
}

impl TryFrom<u8> for Session {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1..=4 => Ok(Self::ALL[usize::from(value) - 1]),
            other => Err(format!("session number must be 1-4, got {other}")),
        }
    }
}

impl fmt::Display for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.number())
    }
}

/// What the user is supposed to be doing right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    Focus,
    ShortPause,
    LongPause,
}

impl Phase {
    pub fn label(self) -> &'static str {
        match self {
            Phase::Focus => "focus",
            Phase::ShortPause => "short pause",
            Phase::LongPause => "long pause",
        }
    }

    pub fn is_pause(self) -> bool {
        self != Phase::Focus
    }
}

/// A session's duration as a multiple of the pause unit `x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSpec {
    pub focus_multiplier: u32,
    pub pause_multiplier: u32,
}

impl SessionSpec {
    pub const fn new(focus_multiplier: u32, pause_multiplier: u32) -> Self {
        Self {
            focus_multiplier,
            pause_multiplier,
        }
    }

    /// Coefficient of `x` in this session's duration.
    pub fn coefficient(&self) -> u32 {
        self.focus_multiplier + self.pause_multiplier
    }
}

/// The structure of a set: `5x+x`, `5x+x`, `5x+x`, `5x+4x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SessionPlan {
    specs: [SessionSpec; 4],
}

impl SessionPlan {
    pub const STANDARD: SessionPlan = SessionPlan {
        specs: [
            SessionSpec::new(5, 1),
            SessionSpec::new(5, 1),
            SessionSpec::new(5, 1),
            SessionSpec::new(5, 4),
        ],
    };

    pub fn spec(&self, session: Session) -> SessionSpec {
        self.specs[session.index()]
    }

    pub fn specs(&self) -> &[SessionSpec; 4] {
        &self.specs
    }

    /// Sum of every session's coefficient (27 for the standard plan).
    pub fn total_coefficient(&self) -> u32 {
        self.specs.iter().map(SessionSpec::coefficient).sum()
    }

    /// Whole-second targets for the four sessions.
    ///
    /// Each session boundary is rounded on the cumulative timeline, so the
    /// targets add up to `round(total_coefficient * pause_unit)` instead of
    /// drifting by up to one second per session.
    pub fn targets(&self, pause_unit: f64) -> [u64; 4] {
        let mut targets = [0u64; 4];
        let mut cumulative = 0u32;
        let mut previous_edge = 0u64;
        for (target, spec) in targets.iter_mut().zip(self.specs.iter()) {
            cumulative += spec.coefficient();
            let edge = whole_seconds(f64::from(cumulative) * pause_unit);
            *target = edge.saturating_sub(previous_edge);
            previous_edge = edge;
        }
        targets
    }

    /// Remaining seconds at or below which `session` is in its pause.
    ///
    /// The pause length is truncated toward zero, which is the same as asking
    /// whether an integer number of seconds is `<=` the real pause length.
    pub fn pause_threshold(&self, session: Session, pause_unit: f64) -> u64 {
        let pause = f64::from(self.spec(session).pause_multiplier) * pause_unit;
        if pause.is_finite() && pause > 0.0 {
            pause.floor() as u64
        } else {
            0
        }
    }
}

impl Default for SessionPlan {
    fn default() -> Self {
        Self::STANDARD
    }
}

fn whole_seconds(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_plan_coefficients() {
        let plan = SessionPlan::default();
        assert_eq!(plan.total_coefficient(), 27);
        assert_eq!(plan.spec(Session::First).coefficient(), 6);
        assert_eq!(plan.spec(Session::Fourth).coefficient(), 9);
    }

    #[test]
    fn session_numbering_and_order() {
        assert_eq!(Session::First.number(), 1);
        assert_eq!(Session::Third.next(), Some(Session::Fourth));
        assert_eq!(Session::Fourth.next(), None);
        assert_eq!(Session::try_from(2), Ok(Session::Second));
        assert!(Session::try_from(5).is_err());
        assert!(!Session::Fourth.tracks_idle_delay());
    }

    #[test]
    fn session_serializes_as_number() {
        assert_eq!(serde_json::to_string(&Session::Third).unwrap(), "3");
        let parsed: Session = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, Session::Fourth);
    }

    #[test]
    fn targets_for_a_two_hour_window() {
        let plan = SessionPlan::default();
        let x = 7200.0 / 27.0;
        assert_eq!(plan.targets(x), [1600, 1600, 1600, 2400]);
    }

    #[test]
    fn targets_sum_to_total_for_uneven_totals() {
        let plan = SessionPlan::default();
        for total in [60u64, 420, 3540, 3600, 5999, 7140] {
            let x = total as f64 / 27.0;
            let sum: u64 = plan.targets(x).iter().sum();
            assert_eq!(sum, total, "total {total}");
        }
    }

    #[test]
    fn pause_threshold_truncates() {
        let plan = SessionPlan::default();
        let x = 3600.0 / 27.0; // 133.33..
        assert_eq!(plan.pause_threshold(Session::First, x), 133);
        assert_eq!(plan.pause_threshold(Session::Fourth, x), 533);
        assert_eq!(plan.pause_threshold(Session::Second, 100.0), 100);
        assert_eq!(plan.pause_threshold(Session::Second, 0.0), 0);
    }
}
