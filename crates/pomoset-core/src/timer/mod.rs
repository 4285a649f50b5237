mod engine;
mod orchestrator;
mod plan;
mod runtime;
pub mod solver;

pub use engine::{Snapshot, TimerEngine, NO_ACTIVE_SESSION, OUT_OF_WORK};
pub use orchestrator::{Orchestrator, ResolvedSet};
pub use plan::{Phase, Session, SessionPlan, SessionSpec};
pub use runtime::{SecondSpent, SessionRuntime};
pub use solver::{solve_pause_unit, LinearEquation, Term};
