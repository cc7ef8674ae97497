use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{Phase, TimerState};

/// Every state change in the timer produces an Event.
/// Front ends render them; the session log persists the terminal ones.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    TimerStarted {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerPaused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    TimerResumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Countdown reloaded for the current phase. `abandoned` is set when a
    /// running phase was cut short and counted as incomplete.
    TimerReset {
        phase: Phase,
        abandoned: bool,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    /// Like `TimerReset`, and the session count went back to zero.
    TimerStopped {
        phase: Phase,
        abandoned: bool,
        elapsed_secs: u64,
        at: DateTime<Utc>,
    },
    PhaseCompleted {
        completed: Phase,
        next: Phase,
        duration_secs: u64,
        session_count: u32,
        task_id: Option<String>,
        at: DateTime<Utc>,
    },
    /// Idle countdown picked up a settings change.
    DurationReloaded {
        phase: Phase,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        phase: Phase,
        remaining_secs: u64,
        total_secs: u64,
        /// 0.0 .. 1.0 of the current phase still to go.
        remaining_ratio: f64,
        display: String,
        session_count: u32,
        at: DateTime<Utc>,
    },
}

impl Event {
    /// Short name matching the serialized `type` tag.
    pub fn kind(&self) -> &'static str {
        match self {
            Event::TimerStarted { .. } => "timer_started",
            Event::TimerPaused { .. } => "timer_paused",
            Event::TimerResumed { .. } => "timer_resumed",
            Event::TimerReset { .. } => "timer_reset",
            Event::TimerStopped { .. } => "timer_stopped",
            Event::PhaseCompleted { .. } => "phase_completed",
            Event::DurationReloaded { .. } => "duration_reloaded",
            Event::StateSnapshot { .. } => "state_snapshot",
        }
    }
}
