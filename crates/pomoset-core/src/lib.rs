//! # pomoset Core Library
//!
//! This library fits a set of four pomodoro sessions exactly into the work
//! window that is open right now, and counts the sessions down one tick per
//! second. The `pomoset` CLI is a thin layer over the same library.
//!
//! ## Architecture
//!
//! - **Work windows**: a fixed table of two-hour spans that decides the
//!   deadline of the current set
//! - **Solver**: a closed-form solution of the single linear equation that
//!   ties the sessions, the idle delays and the window length together
//! - **Timer Engine**: a tick-driven state machine that requires the caller
//!   to invoke `tick()` once per second
//! - **Service**: a tokio ticker plus a mutex-guarded toggle/query surface
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core timer state machine
//! - [`TimerService`]: Background ticker
//! - [`Config`]: Application configuration management
//! - [`Notifier`]: Trait for external side effects

pub mod clock;
pub mod error;
pub mod events;
pub mod notify;
pub mod service;
pub mod simulation;
pub mod storage;
pub mod timer;
pub mod window;

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::{ConfigError, CoreError, EquationError};
pub use events::Event;
pub use notify::{BellNotifier, LogNotifier, Notifier};
pub use service::TimerService;
pub use storage::Config;
pub use timer::{Phase, ResolvedSet, Session, SessionPlan, Snapshot, TimerEngine};
pub use window::{resolve_deadline, WindowStatus, WorkWindow};
