//! Application store: the single writer over timer, settings, analytics
//! and tasks.
//!
//! Front ends call the mutation methods and read through the `&self`
//! selectors. Every mutation first folds in wall-clock time that is already
//! due, applies the intent, then re-synchronises the tick anchor so that it
//! is armed exactly while the engine is running.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::analytics::{AnalyticsStore, AnalyticsSummary};
use crate::error::{Result, ValidationError};
use crate::events::Event;
use crate::notify::NotificationGateway;
use crate::settings::{Settings, SettingsField, SettingsStore};
use crate::storage::{Config, Database};
use crate::task::{NewTask, Task, TaskStore, TaskUpdate};
use crate::timer::{Clock, Collaborators, TickAnchor, TimerEngine, TimerView};

const ENGINE_KEY: &str = "timer_engine";
const ANCHOR_KEY: &str = "tick_anchor";
const ANALYTICS_KEY: &str = "analytics";
const TASKS_KEY: &str = "tasks";

pub type BoxedGateway = Box<dyn NotificationGateway + Send>;

/// Everything a view needs to render, captured at one instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSnapshot {
    pub timer: TimerView,
    pub settings: Settings,
    pub analytics: AnalyticsSummary,
    pub current_task: Option<CurrentTask>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentTask {
    pub id: String,
    pub title: String,
    pub completed_pomodoros: u32,
    pub pomodoros: u32,
}

pub struct App {
    settings: SettingsStore,
    analytics: AnalyticsStore,
    tasks: TaskStore,
    engine: TimerEngine,
    anchor: TickAnchor,
    gateway: BoxedGateway,
    clock: Arc<dyn Clock>,
}

impl App {
    /// Fresh state: idle at the start of a work phase.
    pub fn new(settings: SettingsStore, gateway: BoxedGateway, clock: Arc<dyn Clock>) -> Self {
        let engine = TimerEngine::new(&settings.get());
        Self {
            settings,
            analytics: AnalyticsStore::new(),
            tasks: TaskStore::new(),
            engine,
            anchor: TickAnchor::default(),
            gateway,
            clock,
        }
    }

    /// Rehydrate from persisted state. Settings come from `config`; an idle
    /// engine picks up any duration edited since it was saved.
    pub fn load(db: &Database, config: &Config, gateway: BoxedGateway, clock: Arc<dyn Clock>) -> Result<Self> {
        let settings = config.settings();
        let engine = db
            .load_json::<TimerEngine>(ENGINE_KEY)?
            .unwrap_or_else(|| TimerEngine::new(&settings.get()));
        let mut app = Self {
            engine,
            anchor: db.load_json(ANCHOR_KEY)?.unwrap_or_default(),
            analytics: db.load_json(ANALYTICS_KEY)?.unwrap_or_default(),
            tasks: db.load_json(TASKS_KEY)?.unwrap_or_default(),
            settings,
            gateway,
            clock,
        };
        app.engine.apply_settings(&app.settings.get());
        app.sync_anchor();
        Ok(app)
    }

    pub fn save(&self, db: &Database) -> Result<()> {
        db.save_json(ENGINE_KEY, &self.engine)?;
        db.save_json(ANCHOR_KEY, &self.anchor)?;
        db.save_json(ANALYTICS_KEY, &self.analytics)?;
        db.save_json(TASKS_KEY, &self.tasks)?;
        Ok(())
    }

    // ── Selectors ────────────────────────────────────────────────────

    pub fn engine(&self) -> &TimerEngine {
        &self.engine
    }

    pub fn settings(&self) -> Settings {
        self.settings.get()
    }

    pub fn analytics(&self) -> &AnalyticsStore {
        &self.analytics
    }

    pub fn analytics_summary(&self) -> AnalyticsSummary {
        AnalyticsSummary::from_store(&self.analytics)
    }

    pub fn tasks(&self) -> &TaskStore {
        &self.tasks
    }

    pub fn anchor(&self) -> &TickAnchor {
        &self.anchor
    }

    /// Milliseconds until the next whole second is due, if running.
    pub fn until_next_tick_ms(&self) -> Option<u64> {
        self.anchor.until_next_ms(self.clock.now_ms())
    }

    pub fn snapshot(&self) -> AppSnapshot {
        AppSnapshot {
            timer: self.engine.view(),
            settings: self.settings.get(),
            analytics: self.analytics_summary(),
            current_task: self.tasks.current().map(|t| CurrentTask {
                id: t.id.clone(),
                title: t.title.clone(),
                completed_pomodoros: t.completed_pomodoros,
                pomodoros: t.pomodoros,
            }),
        }
    }

    // ── Timer intents ────────────────────────────────────────────────

    pub fn start(&mut self) -> Vec<Event> {
        self.command(|engine, _| engine.start())
    }

    pub fn pause(&mut self) -> Vec<Event> {
        self.command(|engine, _| engine.pause())
    }

    pub fn resume(&mut self) -> Vec<Event> {
        self.command(|engine, _| engine.resume())
    }

    pub fn reset(&mut self) -> Vec<Event> {
        self.command(|engine, ctx| engine.reset(ctx))
    }

    pub fn stop(&mut self) -> Vec<Event> {
        self.command(|engine, ctx| engine.stop(ctx))
    }

    /// Exactly one second, regardless of the clock. The anchor is moved
    /// forward too so the same second is not counted again by `catch_up`.
    pub fn tick(&mut self) -> Vec<Event> {
        self.anchor.consume(1);
        let event = self.with_collaborators(|engine, ctx| engine.tick(ctx));
        self.sync_anchor();
        event.into_iter().collect()
    }

    /// Hand every whole second elapsed on the clock to the engine. However
    /// long the host was suspended, this runs at most one phase transition.
    pub fn catch_up(&mut self) -> Vec<Event> {
        let due = self.anchor.due_secs(self.clock.now_ms());
        if due == 0 {
            return Vec::new();
        }
        if due > 1 {
            tracing::debug!(seconds = due, "folding elapsed seconds");
        }
        let event = self.with_collaborators(|engine, ctx| engine.advance(due, ctx));
        self.sync_anchor();
        event.into_iter().collect()
    }

    // ── Settings intents ─────────────────────────────────────────────

    pub fn set_work_minutes(&mut self, minutes: u32) -> Vec<Event> {
        self.set_setting(SettingsField::WorkMinutes, minutes)
    }

    pub fn set_break_minutes(&mut self, minutes: u32) -> Vec<Event> {
        self.set_setting(SettingsField::BreakMinutes, minutes)
    }

    pub fn set_setting(&mut self, field: SettingsField, minutes: u32) -> Vec<Event> {
        let mut events = self.catch_up();
        if self.settings.set(field, minutes) {
            events.extend(self.engine.apply_settings(&self.settings.get()));
        }
        events
    }

    /// Raw text from a settings form.
    pub fn set_setting_from_input(
        &mut self,
        field: SettingsField,
        input: &str,
    ) -> Result<Vec<Event>, ValidationError> {
        let mut events = self.catch_up();
        if self.settings.set_from_input(field, input)? {
            events.extend(self.engine.apply_settings(&self.settings.get()));
        }
        Ok(events)
    }

    // ── Analytics / tasks ────────────────────────────────────────────

    pub fn reset_analytics(&mut self) {
        self.analytics.reset();
    }

    pub fn add_task(&mut self, new: NewTask) -> Result<Task> {
        self.tasks.add(new).cloned()
    }

    pub fn update_task(&mut self, id: &str, update: TaskUpdate) -> Result<Task> {
        self.tasks.update(id, update).cloned()
    }

    pub fn delete_task(&mut self, id: &str) -> Result<Task> {
        self.tasks.delete(id)
    }

    pub fn set_current_task(&mut self, id: Option<&str>) -> Result<()> {
        self.tasks.set_current(id)
    }

    pub fn clear_completed_tasks(&mut self) -> usize {
        self.tasks.clear_completed()
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn command(
        &mut self,
        f: impl FnOnce(&mut TimerEngine, &mut Collaborators<'_>) -> Option<Event>,
    ) -> Vec<Event> {
        let mut events = self.catch_up();
        events.extend(self.with_collaborators(f));
        self.sync_anchor();
        events
    }

    fn with_collaborators<R>(
        &mut self,
        f: impl FnOnce(&mut TimerEngine, &mut Collaborators<'_>) -> R,
    ) -> R {
        let mut ctx = Collaborators {
            settings: self.settings.get(),
            analytics: &mut self.analytics,
            tasks: &mut self.tasks,
            notifier: &*self.gateway,
        };
        f(&mut self.engine, &mut ctx)
    }

    /// Armed iff the engine is running. Entering Running arms, leaving it
    /// disarms; repeated calls change nothing.
    fn sync_anchor(&mut self) {
        if self.engine.is_ticking() {
            if self.anchor.arm(self.clock.now_ms()) {
                tracing::debug!("tick armed");
            }
        } else if self.anchor.disarm() {
            tracing::debug!("tick disarmed");
        }
    }
}
