//! Notifier hooks.
//!
//! Sound, desktop notifications and similar side effects live outside the
//! core. Anything that wants to react to the timer implements [`Notifier`];
//! every hook has a no-op default.

use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};

use crate::events::Event;
use crate::timer::{Phase, Session};

/// Every external notifier implements this trait.
pub trait Notifier: Send + Sync {
    /// Unique identifier (e.g. "log", "bell").
    fn name(&self) -> &str;

    /// Focus time is over and the short or long pause begins.
    fn on_pause_start(&self, _session: Session, _phase: Phase) {}

    /// A session ran its full target.
    fn on_session_end(&self, _session: Session) {}

    /// The countdown was started or stopped.
    fn on_ticking_changed(&self, _session: Option<Session>, _ticking: bool) {}

    /// The pause unit could not be solved and the set was dropped.
    fn on_set_aborted(&self, _reason: &str) {}
}

/// Route one event to the matching hook of every notifier.
pub fn dispatch(notifiers: &[Arc<dyn Notifier>], event: &Event) {
    for notifier in notifiers {
        match event {
            Event::PauseStarted { session, phase, .. } => notifier.on_pause_start(*session, *phase),
            Event::SessionEnded { session, .. } => notifier.on_session_end(*session),
            Event::TickingStarted { session, .. } => notifier.on_ticking_changed(*session, true),
            Event::TickingStopped { session, .. } => notifier.on_ticking_changed(*session, false),
            Event::SetAborted { reason, .. } => notifier.on_set_aborted(reason),
            Event::SetStarted { .. } | Event::SessionStarted { .. } => {}
        }
    }
}

/// Writes every hook as a log line.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn name(&self) -> &str {
        "log"
    }

    fn on_pause_start(&self, session: Session, phase: Phase) {
        info!(
            notifier = "log",
            session = session.number(),
            phase = phase.label(),
            "time for a pause"
        );
    }

    fn on_session_end(&self, session: Session) {
        info!(notifier = "log", session = session.number(), "session over");
    }

    fn on_ticking_changed(&self, session: Option<Session>, ticking: bool) {
        info!(
            notifier = "log",
            session = session.map(Session::number),
            ticking,
            "countdown {}",
            if ticking { "running" } else { "stopped" }
        );
    }

    fn on_set_aborted(&self, reason: &str) {
        warn!(notifier = "log", reason, "session set aborted");
    }
}

/// Rings the terminal bell on pause start and session end.
#[derive(Debug, Default, Clone, Copy)]
pub struct BellNotifier;

impl BellNotifier {
    fn ring(&self) {
        let mut stderr = std::io::stderr();
        let _ = stderr.write_all(b"\x07");
        let _ = stderr.flush();
    }
}

impl Notifier for BellNotifier {
    fn name(&self) -> &str {
        "bell"
    }

    fn on_pause_start(&self, _session: Session, _phase: Phase) {
        self.ring();
    }

    fn on_session_end(&self, _session: Session) {
        self.ring();
    }
}
