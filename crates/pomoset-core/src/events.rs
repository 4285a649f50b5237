use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, Session};
use crate::window::WorkWindow;

/// Every state change in the timer produces an Event.
/// Notifiers subscribe to them; the CLI prints them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    /// A new window was resolved and its pause unit solved.
    SetStarted {
        window: WorkWindow,
        deadline: NaiveDateTime,
        total_secs: u64,
        pause_unit: f64,
        targets: [u64; 4],
        at: NaiveDateTime,
    },
    SessionStarted {
        session: Session,
        target_secs: u64,
        at: NaiveDateTime,
    },
    /// Focus time is over; the short (or long) pause begins.
    PauseStarted {
        session: Session,
        phase: Phase,
        at: NaiveDateTime,
    },
    SessionEnded {
        session: Session,
        elapsed_secs: u64,
        idle_delay_secs: u64,
        at: NaiveDateTime,
    },
    TickingStarted {
        session: Option<Session>,
        at: NaiveDateTime,
    },
    TickingStopped {
        session: Option<Session>,
        at: NaiveDateTime,
    },
    /// The set was dropped because its equation could not be solved.
    SetAborted {
        reason: String,
        at: NaiveDateTime,
    },
}

impl Event {
    pub fn is_session_end(&self) -> bool {
        matches!(self, Event::SessionEnded { .. })
    }
}
