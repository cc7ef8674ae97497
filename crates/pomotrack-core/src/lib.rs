//! # Pomotrack Core Library
//!
//! Core logic for the pomotrack Pomodoro timer: a countdown that alternates
//! work and break phases, counts what was done, and credits finished work
//! to a chosen task. The `pomotrack` CLI is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Timer Engine**: a caller-driven state machine. It has no thread of its
//!   own; someone calls `tick()`/`advance()` and it reports what happened
//! - **App**: the single writer that owns the engine and every store, folds
//!   in elapsed wall-clock time, and keeps the tick armed only while running
//! - **Runtime**: a tokio driver for long-lived front ends
//! - **Storage**: SQLite for state and the session log, TOML for preferences
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Phase state machine
//! - [`App`]: Command/selector surface over all state
//! - [`SettingsStore`], [`AnalyticsStore`], [`TaskStore`]: Collaborating stores
//! - [`NotificationGateway`]: Fire-and-forget phase alerts
//! - [`Database`], [`Config`]: Persistence

pub mod analytics;
pub mod app;
pub mod error;
pub mod events;
pub mod notify;
pub mod runtime;
pub mod settings;
pub mod storage;
pub mod task;
pub mod timer;

pub use analytics::{AnalyticsStore, AnalyticsSummary, ProductivityLevel};
pub use app::{App, AppSnapshot};
pub use error::{ConfigError, CoreError, DatabaseError, ValidationError};
pub use events::Event;
pub use notify::{
    AlertSink, NotificationGateway, NotificationPreferences, PhaseCompletion, PreferenceGateway,
    SilentGateway,
};
pub use runtime::{Intent, TimerDriver, TimerHandle};
pub use settings::{Settings, SettingsField, SettingsStore};
pub use storage::{Config, Database};
pub use task::{NewTask, Priority, Task, TaskFilter, TaskStore, TaskUpdate};
pub use timer::{Phase, TimerEngine, TimerState};
