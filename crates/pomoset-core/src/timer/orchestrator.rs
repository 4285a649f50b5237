//! Session sequencing: 1 → 2 → 3 → 4 → new window.
//!
//! The pause unit is solved once, when a window is entered, and the four
//! targets derived from it stay fixed until the set is over.

use chrono::NaiveDateTime;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use super::plan::{Session, SessionPlan};
use super::runtime::SessionRuntime;
use super::solver::solve_pause_unit;
use crate::error::Result;
use crate::events::Event;
use crate::window::{available_seconds, resolve_deadline, WindowStatus, WorkWindow};

/// A set fitted into one work window.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResolvedSet {
    pub window: WorkWindow,
    pub deadline: NaiveDateTime,
    pub started_at: NaiveDateTime,
    pub total_secs: u64,
    pub pause_unit: f64,
    pub targets: [u64; 4],
}

impl ResolvedSet {
    /// Resolve the set that would start at `now`, or `None` outside all windows.
    pub fn resolve(plan: &SessionPlan, now: NaiveDateTime) -> Result<Option<Self>> {
        let WindowStatus::Open { window, deadline } = resolve_deadline(now) else {
            return Ok(None);
        };
        let total_secs = available_seconds(now, deadline);
        let pause_unit = solve_pause_unit(plan, total_secs as f64, &[0; 3], &[])?;
        Ok(Some(Self {
            window,
            deadline,
            started_at: now,
            total_secs,
            pause_unit,
            targets: plan.targets(pause_unit),
        }))
    }

    pub fn target(&self, session: Session) -> u64 {
        self.targets[session.index()]
    }

    /// Durations of the sessions before `session`.
    pub fn resolved_before(&self, session: Session) -> Vec<f64> {
        self.targets[..session.index()]
            .iter()
            .map(|&t| t as f64)
            .collect()
    }
}

/// Drives session boundaries on behalf of the timer engine.
#[derive(Debug, Clone, Default)]
pub struct Orchestrator {
    plan: SessionPlan,
    set: Option<ResolvedSet>,
}

impl Orchestrator {
    pub fn new(plan: SessionPlan) -> Self {
        Self { plan, set: None }
    }

    pub fn plan(&self) -> &SessionPlan {
        &self.plan
    }

    pub fn current_set(&self) -> Option<&ResolvedSet> {
        self.set.as_ref()
    }

    /// Enter the window containing `now` and load session 1.
    ///
    /// Outside all windows the runtime is left idle and no events are produced.
    /// A degenerate equation clears the runtime and is returned as an error.
    pub fn begin_set(
        &mut self,
        runtime: &mut SessionRuntime,
        now: NaiveDateTime,
    ) -> Result<Vec<Event>> {
        runtime.reset_for_new_window();
        self.set = None;

        let resolved = match ResolvedSet::resolve(&self.plan, now) {
            Ok(Some(set)) => set,
            Ok(None) => {
                debug!(%now, "no work window open, set not started");
                return Ok(Vec::new());
            }
            Err(e) => {
                error!(error = %e, kind = e.label(), "failed to solve pause unit, set aborted");
                runtime.clear();
                return Err(e);
            }
        };

        info!(
            deadline = %resolved.deadline,
            total_secs = resolved.total_secs,
            pause_unit = resolved.pause_unit,
            "session set started"
        );

        let first = resolved.target(Session::First);
        runtime.load(Session::First, first, resolved.pause_unit);
        let events = vec![
            Event::SetStarted {
                window: resolved.window,
                deadline: resolved.deadline,
                total_secs: resolved.total_secs,
                pause_unit: resolved.pause_unit,
                targets: resolved.targets,
                at: now,
            },
            Event::SessionStarted {
                session: Session::First,
                target_secs: first,
                at: now,
            },
        ];
        self.set = Some(resolved);
        Ok(events)
    }

    /// Move to the session after the current one, or into a new window.
    pub fn advance(
        &mut self,
        runtime: &mut SessionRuntime,
        now: NaiveDateTime,
    ) -> Result<Vec<Event>> {
        let (Some(current), Some(set)) = (runtime.session(), &self.set) else {
            return self.begin_set(runtime, now);
        };
        let Some(next) = current.next() else {
            return self.begin_set(runtime, now);
        };

        let target = set.target(next);
        runtime.load(next, target, set.pause_unit);
        debug!(session = next.number(), target, "session loaded");

        if let Some(rebalanced) = self.rebalanced_pause_unit(runtime) {
            debug!(
                session = next.number(),
                pause_unit = set.pause_unit,
                rebalanced,
                idle_secs = runtime.total_idle_secs(),
                "pause unit if idle delay were fed back"
            );
        }

        Ok(vec![Event::SessionStarted {
            session: next,
            target_secs: target,
            at: now,
        }])
    }

    /// The pause unit a re-solve would give for the current and later sessions,
    /// counting recorded idle delay. Reported only; targets never change.
    pub fn rebalanced_pause_unit(&self, runtime: &SessionRuntime) -> Option<f64> {
        let set = self.set.as_ref()?;
        let session = runtime.session()?;
        match solve_pause_unit(
            &self.plan,
            set.total_secs as f64,
            runtime.idle_delays(),
            &set.resolved_before(session),
        ) {
            Ok(x) => Some(x),
            Err(e) => {
                warn!(error = %e, "idle delay exceeds the remaining window");
                None
            }
        }
    }
}
