//! Background ticker and the serialized request surface.
//!
//! One tokio task ticks the engine at a fixed cadence. Toggle and query
//! requests take the same lock, so a request never observes half a tick.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, error, info};

use crate::clock::Clock;
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::notify::{dispatch, Notifier};
use crate::timer::{Snapshot, TimerEngine};

pub const DEFAULT_TICK_INTERVAL: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct TimerService {
    engine: Arc<Mutex<TimerEngine>>,
    clock: Arc<dyn Clock>,
    notifiers: Arc<Vec<Arc<dyn Notifier>>>,
    ticker: Arc<Mutex<Option<JoinHandle<()>>>>,
    tick_interval: Duration,
}

impl TimerService {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            engine: Arc::new(Mutex::new(TimerEngine::new())),
            clock,
            notifiers: Arc::new(Vec::new()),
            ticker: Arc::new(Mutex::new(None)),
            tick_interval: DEFAULT_TICK_INTERVAL,
        }
    }

    pub fn with_tick_interval(mut self, tick_interval: Duration) -> Self {
        self.tick_interval = tick_interval;
        self
    }

    pub fn with_notifiers(mut self, notifiers: Vec<Arc<dyn Notifier>>) -> Self {
        self.notifiers = Arc::new(notifiers);
        self
    }

    pub fn tick_interval(&self) -> Duration {
        self.tick_interval
    }

    /// Run one tick against the current time.
    pub async fn tick(&self) -> Result<Vec<Event>> {
        let now = self.clock.now();
        let result = {
            let mut engine = self.engine.lock().await;
            engine.tick(now)
        };
        self.publish(result, now)
    }

    /// Start or stop the countdown.
    pub async fn toggle(&self) -> Result<Vec<Event>> {
        let now = self.clock.now();
        let result = {
            let mut engine = self.engine.lock().await;
            engine.toggle(now)
        };
        self.publish(result, now)
    }

    pub async fn remaining(&self) -> String {
        let now = self.clock.now();
        self.engine.lock().await.remaining(now)
    }

    pub async fn snapshot(&self) -> Snapshot {
        let now = self.clock.now();
        self.engine.lock().await.snapshot(now)
    }

    /// Spawn the ticker. A ticker that is already running is replaced.
    pub async fn start(&self) {
        let mut ticker_guard = self.ticker.lock().await;
        if let Some(handle) = ticker_guard.take() {
            handle.abort();
        }

        let service = self.clone();
        let tick_interval = self.tick_interval;
        let handle = tokio::spawn(async move {
            let mut interval = time::interval(tick_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            // The first tick completes immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if let Err(e) = service.tick().await {
                    error!(error = %e, kind = e.label(), "tick failed");
                }
            }
        });

        info!(interval_ms = tick_interval.as_millis() as u64, "ticker started");
        *ticker_guard = Some(handle);
    }

    /// Stop the ticker. State is kept.
    pub async fn shutdown(&self) {
        if let Some(handle) = self.ticker.lock().await.take() {
            handle.abort();
            info!("ticker stopped");
        }
    }

    pub async fn is_running(&self) -> bool {
        self.ticker
            .lock()
            .await
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    fn publish(
        &self,
        result: Result<Vec<Event>>,
        now: chrono::NaiveDateTime,
    ) -> Result<Vec<Event>> {
        match result {
            Ok(events) => {
                for event in &events {
                    debug!(?event, "timer event");
                    dispatch(&self.notifiers, event);
                }
                Ok(events)
            }
            Err(CoreError::DegenerateEquation(e)) => {
                error!(error = %e, "set aborted");
                let aborted = Event::SetAborted {
                    reason: e.to_string(),
                    at: now,
                };
                dispatch(&self.notifiers, &aborted);
                Err(CoreError::DegenerateEquation(e))
            }
            Err(e) => Err(e),
        }
    }
}
