//! Async driver for a long-lived timer.
//!
//! [`TimerDriver`] owns the [`App`] on its own task. Front ends talk to it
//! through a [`TimerHandle`]:
//!
//! - intents go in over an mpsc channel and are applied one at a time;
//! - the latest [`AppSnapshot`] is published on a watch channel;
//! - every [`Event`] is broadcast to subscribers.
//!
//! Broadcast receivers may lag and skip events. The driver also keeps every
//! event in order and returns them in [`DriverExit`], so persistence never
//! depends on a receiver keeping up.
//!
//! The one-second interval exists only while the engine is running. It is
//! created when the engine enters Running and dropped when it leaves, so a
//! paused or idle timer has nothing scheduled.

use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::{Instant, Interval, MissedTickBehavior};
use tracing::{debug, info};

use crate::app::{App, AppSnapshot};
use crate::error::{CoreError, Result};
use crate::events::Event;
use crate::timer::Clock;

const INTENT_CAPACITY: usize = 32;
const EVENT_CAPACITY: usize = 64;

/// Requests accepted by the driver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    Start,
    Pause,
    Resume,
    Reset,
    Stop,
    SetWorkMinutes(u32),
    SetBreakMinutes(u32),
    SetCurrentTask(Option<String>),
    ResetAnalytics,
    Shutdown,
}

/// What the driver hands back when it stops.
pub struct DriverExit {
    pub app: App,
    /// How many times the tick interval was created.
    pub intervals_armed: u32,
    /// Every event produced during the run, oldest first.
    pub events: Vec<Event>,
}

/// Clock on tokio's timeline, so paused-time tests and the interval agree.
#[derive(Debug, Clone, Copy)]
pub struct TokioClock {
    origin: Instant,
    origin_ms: u64,
}

impl TokioClock {
    pub fn new(origin_ms: u64) -> Self {
        Self {
            origin: Instant::now(),
            origin_ms,
        }
    }
}

impl Clock for TokioClock {
    fn now_ms(&self) -> u64 {
        self.origin_ms + self.origin.elapsed().as_millis() as u64
    }
}

/// Cloneable front-end side of a running driver.
#[derive(Clone)]
pub struct TimerHandle {
    intents: mpsc::Sender<Intent>,
    snapshots: watch::Receiver<AppSnapshot>,
    events: broadcast::Sender<Event>,
}

impl TimerHandle {
    pub async fn send(&self, intent: Intent) -> Result<()> {
        self.intents
            .send(intent)
            .await
            .map_err(|_| CoreError::Custom("timer driver has stopped".into()))
    }

    /// Latest published state.
    pub fn snapshot(&self) -> AppSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Wait until a newer snapshot is published.
    pub async fn changed(&mut self) -> Result<AppSnapshot> {
        self.snapshots
            .changed()
            .await
            .map_err(|_| CoreError::Custom("timer driver has stopped".into()))?;
        Ok(self.snapshots.borrow_and_update().clone())
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.events.subscribe()
    }
}

pub struct TimerDriver {
    app: App,
    intents: mpsc::Receiver<Intent>,
    snapshots: watch::Sender<AppSnapshot>,
    events: broadcast::Sender<Event>,
    log: Vec<Event>,
}

impl TimerDriver {
    pub fn new(app: App) -> (Self, TimerHandle) {
        let (intent_tx, intent_rx) = mpsc::channel(INTENT_CAPACITY);
        let (snapshot_tx, snapshot_rx) = watch::channel(app.snapshot());
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        let handle = TimerHandle {
            intents: intent_tx,
            snapshots: snapshot_rx,
            events: event_tx.clone(),
        };
        let driver = Self {
            app,
            intents: intent_rx,
            snapshots: snapshot_tx,
            events: event_tx,
            log: Vec::new(),
        };
        (driver, handle)
    }

    /// Spawn onto the current runtime.
    pub fn spawn(app: App) -> (TimerHandle, JoinHandle<DriverExit>) {
        let (driver, handle) = Self::new(app);
        (handle, tokio::spawn(driver.run()))
    }

    /// Run until `Shutdown` arrives or every handle is dropped.
    pub async fn run(mut self) -> DriverExit {
        let mut ticker: Option<Interval> = None;
        let mut intervals_armed = 0;
        info!("timer driver started");

        // Anything that expired while the state was at rest.
        let events = self.app.catch_up();
        self.publish(events);

        loop {
            match (self.app.engine().is_ticking(), ticker.is_some()) {
                (true, false) => {
                    ticker = Some(self.arm_interval());
                    intervals_armed += 1;
                }
                (false, true) => {
                    ticker = None;
                    debug!("tick interval dropped");
                }
                _ => {}
            }

            tokio::select! {
                intent = self.intents.recv() => match intent {
                    Some(Intent::Shutdown) | None => break,
                    Some(intent) => {
                        let events = self.apply(intent);
                        self.publish(events);
                    }
                },
                _ = next_tick(&mut ticker) => {
                    let events = self.app.catch_up();
                    self.publish(events);
                }
            }
        }

        info!("timer driver stopped");
        DriverExit {
            app: self.app,
            intervals_armed,
            events: self.log,
        }
    }

    fn arm_interval(&self) -> Interval {
        let first = self.app.until_next_tick_ms().unwrap_or(1000);
        let mut interval = tokio::time::interval_at(
            Instant::now() + Duration::from_millis(first),
            Duration::from_secs(1),
        );
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        debug!(first_ms = first, "tick interval armed");
        interval
    }

    fn apply(&mut self, intent: Intent) -> Vec<Event> {
        match intent {
            Intent::Start => self.app.start(),
            Intent::Pause => self.app.pause(),
            Intent::Resume => self.app.resume(),
            Intent::Reset => self.app.reset(),
            Intent::Stop => self.app.stop(),
            Intent::SetWorkMinutes(minutes) => self.app.set_work_minutes(minutes),
            Intent::SetBreakMinutes(minutes) => self.app.set_break_minutes(minutes),
            Intent::SetCurrentTask(id) => {
                if let Err(e) = self.app.set_current_task(id.as_deref()) {
                    tracing::warn!(error = %e, "current task not changed");
                }
                Vec::new()
            }
            Intent::ResetAnalytics => {
                self.app.reset_analytics();
                Vec::new()
            }
            Intent::Shutdown => Vec::new(),
        }
    }

    fn publish(&mut self, events: Vec<Event>) {
        for event in events {
            // No subscribers is fine.
            let _ = self.events.send(event.clone());
            self.log.push(event);
        }
        self.snapshots.send_replace(self.app.snapshot());
    }
}

async fn next_tick(ticker: &mut Option<Interval>) {
    match ticker {
        Some(interval) => {
            interval.tick().await;
        }
        None => std::future::pending().await,
    }
}
