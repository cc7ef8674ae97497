//! Timer engine implementation.
//!
//! The engine is a second-granular state machine. It owns no thread and no
//! clock: the host calls `tick()` once per elapsed second while the timer
//! is running, or `advance(n)` to fold several missed seconds at once.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start--> Running --pause--> Paused --resume--> Running
//! Running --tick (expiry)--> Idle   (other phase loaded)
//! Running | Paused --reset | stop--> Idle
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new(&settings);
//! engine.start();
//! // Once per second:
//! engine.tick(&mut collaborators); // Some(PhaseCompleted) on expiry
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::phase::{format_clock, Phase};
use crate::analytics::AnalyticsStore;
use crate::events::Event;
use crate::notify::{NotificationGateway, PhaseCompletion};
use crate::settings::Settings;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimerState {
    Idle,
    Running,
    Paused,
}

/// Receives pomodoro credit when a work phase completes.
pub trait PomodoroCredit {
    /// Task designated for credit, if any.
    fn current_task_id(&self) -> Option<String>;
    /// Credit one pomodoro. The implementor decides whether that finishes the task.
    fn complete_one_pomodoro(&mut self, task_id: &str);
}

/// Everything a tick may read or write outside the engine.
///
/// `settings` is taken by value at call time, so a tick always sees the
/// durations in effect right now.
pub struct Collaborators<'a> {
    pub settings: Settings,
    pub analytics: &'a mut AnalyticsStore,
    pub tasks: &'a mut dyn PomodoroCredit,
    pub notifier: &'a dyn NotificationGateway,
}

/// Render-ready view of the countdown.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerView {
    pub state: TimerState,
    pub phase: Phase,
    pub remaining_secs: u64,
    pub total_secs: u64,
    /// 0.0 .. 1.0 of the current phase still to go.
    pub remaining_ratio: f64,
    pub display: String,
    pub session_count: u32,
}

/// Core timer engine.
///
/// Only the engine's own methods mutate these fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimerEngine {
    phase: Phase,
    remaining_secs: u64,
    /// Full length of the current phase as loaded.
    total_secs: u64,
    running: bool,
    /// Only meaningful while `running`.
    paused: bool,
    /// Completed work phases since the last stop.
    session_count: u32,
}

impl TimerEngine {
    /// Idle engine at the start of a work phase.
    pub fn new(settings: &Settings) -> Self {
        let total = settings.duration_secs(Phase::Work);
        Self {
            phase: Phase::Work,
            remaining_secs: total,
            total_secs: total,
            running: false,
            paused: false,
            session_count: 0,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        match (self.running, self.paused) {
            (false, _) => TimerState::Idle,
            (true, false) => TimerState::Running,
            (true, true) => TimerState::Paused,
        }
    }

    /// True when ticks have an effect.
    pub fn is_ticking(&self) -> bool {
        self.state() == TimerState::Running
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn remaining_secs(&self) -> u64 {
        self.remaining_secs
    }

    pub fn total_secs(&self) -> u64 {
        self.total_secs
    }

    /// Seconds already counted down in the current phase.
    pub fn elapsed_secs(&self) -> u64 {
        self.total_secs.saturating_sub(self.remaining_secs)
    }

    pub fn session_count(&self) -> u32 {
        self.session_count
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn remaining_ratio(&self) -> f64 {
        if self.total_secs == 0 {
            return 0.0;
        }
        self.remaining_secs as f64 / self.total_secs as f64
    }

    pub fn view(&self) -> TimerView {
        TimerView {
            state: self.state(),
            phase: self.phase,
            remaining_secs: self.remaining_secs,
            total_secs: self.total_secs,
            remaining_ratio: self.remaining_ratio(),
            display: format_clock(self.remaining_secs),
            session_count: self.session_count,
        }
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        let view = self.view();
        Event::StateSnapshot {
            state: view.state,
            phase: view.phase,
            remaining_secs: view.remaining_secs,
            total_secs: view.total_secs,
            remaining_ratio: view.remaining_ratio,
            display: view.display,
            session_count: view.session_count,
            at: Utc::now(),
        }
    }

    // ── Commands ─────────────────────────────────────────────────────

    pub fn start(&mut self) -> Option<Event> {
        match self.state() {
            TimerState::Idle => {
                self.running = true;
                self.paused = false;
                tracing::debug!(phase = %self.phase, remaining = self.remaining_secs, "timer started");
                Some(Event::TimerStarted {
                    phase: self.phase,
                    remaining_secs: self.remaining_secs,
                    at: Utc::now(),
                })
            }
            TimerState::Paused => self.resume(),
            TimerState::Running => None, // Already running.
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        if self.state() != TimerState::Running {
            return None;
        }
        self.paused = true;
        tracing::debug!(remaining = self.remaining_secs, "timer paused");
        Some(Event::TimerPaused {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    pub fn resume(&mut self) -> Option<Event> {
        if self.state() != TimerState::Paused {
            return None;
        }
        self.paused = false;
        tracing::debug!(remaining = self.remaining_secs, "timer resumed");
        Some(Event::TimerResumed {
            remaining_secs: self.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Reload the current phase. A phase that was running or paused is
    /// counted as an incomplete session.
    pub fn reset(&mut self, ctx: &mut Collaborators<'_>) -> Option<Event> {
        let (abandoned, elapsed_secs) = self.abandon(ctx);
        tracing::debug!(phase = %self.phase, abandoned, "timer reset");
        Some(Event::TimerReset {
            phase: self.phase,
            abandoned,
            elapsed_secs,
            at: Utc::now(),
        })
    }

    /// Reset and clear the session count.
    pub fn stop(&mut self, ctx: &mut Collaborators<'_>) -> Option<Event> {
        let (abandoned, elapsed_secs) = self.abandon(ctx);
        self.session_count = 0;
        tracing::debug!(phase = %self.phase, abandoned, "timer stopped");
        Some(Event::TimerStopped {
            phase: self.phase,
            abandoned,
            elapsed_secs,
            at: Utc::now(),
        })
    }

    /// One elapsed second. Returns `Some(Event::PhaseCompleted)` when the
    /// phase runs out.
    pub fn tick(&mut self, ctx: &mut Collaborators<'_>) -> Option<Event> {
        self.advance(1, ctx)
    }

    /// Fold `secs` elapsed seconds into the countdown.
    ///
    /// Seconds are attributed up to the end of the phase. Reaching zero
    /// runs exactly one phase transition, and since the engine is idle
    /// afterwards any surplus seconds are dropped.
    pub fn advance(&mut self, secs: u64, ctx: &mut Collaborators<'_>) -> Option<Event> {
        if !self.is_ticking() || secs == 0 {
            return None;
        }
        let counted = secs.min(self.remaining_secs);
        self.remaining_secs -= counted;
        ctx.analytics.attribute(self.phase, counted);

        if self.remaining_secs == 0 {
            if secs > counted {
                tracing::debug!(dropped = secs - counted, "seconds past expiry dropped");
            }
            return Some(self.complete_phase(ctx));
        }
        None
    }

    /// Pick up new durations. Only an idle countdown is reloaded; a phase
    /// in flight keeps its length until the next transition.
    pub fn apply_settings(&mut self, settings: &Settings) -> Option<Event> {
        if self.running {
            return None;
        }
        let total = settings.duration_secs(self.phase);
        if total == self.total_secs && self.remaining_secs == total {
            return None;
        }
        self.total_secs = total;
        self.remaining_secs = total;
        Some(Event::DurationReloaded {
            phase: self.phase,
            remaining_secs: total,
            at: Utc::now(),
        })
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn complete_phase(&mut self, ctx: &mut Collaborators<'_>) -> Event {
        let completed = self.phase;
        let next = completed.other();
        let duration_secs = self.total_secs;

        ctx.notifier.notify(&PhaseCompletion { completed, next });
        let mut task_id = None;
        if completed == Phase::Work {
            ctx.analytics.record_completed();
            if let Some(id) = ctx.tasks.current_task_id() {
                ctx.tasks.complete_one_pomodoro(&id);
                task_id = Some(id);
            }
        }

        self.phase = next;
        self.load_phase(&ctx.settings);
        if completed == Phase::Work {
            self.session_count = self.session_count.saturating_add(1);
        }
        self.running = false;
        self.paused = false;

        tracing::info!(%completed, %next, sessions = self.session_count, "phase completed");
        Event::PhaseCompleted {
            completed,
            next,
            duration_secs,
            session_count: self.session_count,
            task_id,
            at: Utc::now(),
        }
    }

    fn abandon(&mut self, ctx: &mut Collaborators<'_>) -> (bool, u64) {
        let abandoned = self.running;
        let elapsed = self.elapsed_secs();
        if abandoned {
            ctx.analytics.record_incomplete();
        }
        self.load_phase(&ctx.settings);
        self.running = false;
        self.paused = false;
        (abandoned, elapsed)
    }

    fn load_phase(&mut self, settings: &Settings) {
        self.total_secs = settings.duration_secs(self.phase);
        self.remaining_secs = self.total_secs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::SilentGateway;
    use proptest::prelude::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct RecordingNotifier {
        seen: RefCell<Vec<PhaseCompletion>>,
    }

    impl NotificationGateway for RecordingNotifier {
        fn notify(&self, completion: &PhaseCompletion) {
            self.seen.borrow_mut().push(*completion);
        }
    }

    #[derive(Default)]
    struct CreditLog {
        current: Option<String>,
        credited: Vec<String>,
    }

    impl PomodoroCredit for CreditLog {
        fn current_task_id(&self) -> Option<String> {
            self.current.clone()
        }
        fn complete_one_pomodoro(&mut self, task_id: &str) {
            self.credited.push(task_id.to_string());
        }
    }

    struct Harness {
        engine: TimerEngine,
        settings: Settings,
        analytics: AnalyticsStore,
        tasks: CreditLog,
        notifier: RecordingNotifier,
    }

    impl Harness {
        fn new(work_minutes: u32, break_minutes: u32) -> Self {
            let settings = Settings { work_minutes, break_minutes };
            Self {
                engine: TimerEngine::new(&settings),
                settings,
                analytics: AnalyticsStore::new(),
                tasks: CreditLog::default(),
                notifier: RecordingNotifier::default(),
            }
        }

        fn with<R>(&mut self, f: impl FnOnce(&mut TimerEngine, &mut Collaborators<'_>) -> R) -> R {
            let mut ctx = Collaborators {
                settings: self.settings,
                analytics: &mut self.analytics,
                tasks: &mut self.tasks,
                notifier: &self.notifier,
            };
            f(&mut self.engine, &mut ctx)
        }

        fn tick(&mut self) -> Option<Event> {
            self.with(|e, ctx| e.tick(ctx))
        }

        fn reset(&mut self) -> Option<Event> {
            self.with(|e, ctx| e.reset(ctx))
        }

        fn stop(&mut self) -> Option<Event> {
            self.with(|e, ctx| e.stop(ctx))
        }

        fn advance(&mut self, secs: u64) -> Option<Event> {
            self.with(|e, ctx| e.advance(secs, ctx))
        }

        fn run_down_to(&mut self, remaining: u64) {
            while self.engine.remaining_secs() > remaining {
                assert!(self.tick().is_none());
            }
        }
    }

    #[test]
    fn start_pause_resume() {
        let mut h = Harness::new(25, 5);
        assert_eq!(h.engine.state(), TimerState::Idle);

        assert!(h.engine.start().is_some());
        assert_eq!(h.engine.state(), TimerState::Running);

        assert!(h.engine.pause().is_some());
        assert_eq!(h.engine.state(), TimerState::Paused);

        assert!(h.engine.resume().is_some());
        assert_eq!(h.engine.state(), TimerState::Running);
    }

    #[test]
    fn start_while_running_is_noop_and_start_while_paused_resumes() {
        let mut h = Harness::new(25, 5);
        h.engine.start();
        assert!(h.engine.start().is_none());
        h.engine.pause();
        assert!(matches!(h.engine.start(), Some(Event::TimerResumed { .. })));
        assert_eq!(h.engine.state(), TimerState::Running);
    }

    #[test]
    fn tick_counts_down_by_one() {
        let mut h = Harness::new(25, 5);
        h.engine.start();
        assert!(h.tick().is_none());
        assert_eq!(h.engine.remaining_secs(), 1499);
        assert_eq!(h.analytics.focus_secs(), 1);
    }

    #[test]
    fn tick_while_idle_or_paused_is_noop() {
        let mut h = Harness::new(25, 5);
        assert!(h.tick().is_none());
        assert_eq!(h.engine.remaining_secs(), 1500);

        h.engine.start();
        h.engine.pause();
        let before = h.engine.clone();
        assert!(h.tick().is_none());
        assert_eq!(h.engine, before);
        assert_eq!(h.analytics.focus_secs(), 0);
    }

    #[test]
    fn last_second_flips_phase_once() {
        let mut h = Harness::new(2, 5);
        h.engine.start();
        h.run_down_to(1);

        let event = h.tick();
        assert!(matches!(
            event,
            Some(Event::PhaseCompleted { completed: Phase::Work, next: Phase::Break, session_count: 1, .. })
        ));
        assert_eq!(h.engine.phase(), Phase::Break);
        assert_eq!(h.engine.remaining_secs(), 300);
        assert_eq!(h.engine.state(), TimerState::Idle);
        assert_eq!(h.analytics.completed_sessions(), 1);
        assert_eq!(h.notifier.seen.borrow().len(), 1);

        // Engine waits for the user; further ticks do nothing.
        assert!(h.tick().is_none());
        assert_eq!(h.engine.remaining_secs(), 300);
    }

    #[test]
    fn break_completion_does_not_count_a_session() {
        let mut h = Harness::new(1, 1);
        h.engine.start();
        h.run_down_to(1);
        h.tick();
        h.engine.start();
        h.run_down_to(1);
        let event = h.tick();
        assert!(matches!(
            event,
            Some(Event::PhaseCompleted { completed: Phase::Break, next: Phase::Work, session_count: 1, .. })
        ));
        assert_eq!(h.analytics.completed_sessions(), 1);
        assert_eq!(h.analytics.break_secs(), 60);
        assert_eq!(h.engine.remaining_secs(), 60);
    }

    #[test]
    fn work_completion_credits_current_task() {
        let mut h = Harness::new(1, 1);
        h.tasks.current = Some("task-1".into());
        h.engine.start();
        h.run_down_to(1);
        match h.tick() {
            Some(Event::PhaseCompleted { task_id, .. }) => assert_eq!(task_id.as_deref(), Some("task-1")),
            other => panic!("expected PhaseCompleted, got {other:?}"),
        }
        assert_eq!(h.tasks.credited, vec!["task-1".to_string()]);

        // Break completion gives no credit.
        h.engine.start();
        h.run_down_to(1);
        h.tick();
        assert_eq!(h.tasks.credited.len(), 1);
    }

    #[test]
    fn transition_reloads_from_current_settings() {
        let mut h = Harness::new(1, 5);
        h.engine.start();
        h.run_down_to(30);
        h.settings.break_minutes = 10;
        h.run_down_to(1);
        h.tick();
        assert_eq!(h.engine.remaining_secs(), 600);
    }

    #[test]
    fn settings_change_mid_phase_leaves_countdown() {
        let mut h = Harness::new(25, 5);
        h.engine.start();
        h.run_down_to(500);
        h.settings.work_minutes = 40;
        assert!(h.engine.apply_settings(&h.settings).is_none());
        assert_eq!(h.engine.remaining_secs(), 500);

        h.engine.pause();
        assert!(h.engine.apply_settings(&h.settings).is_none());
        assert_eq!(h.engine.remaining_secs(), 500);
    }

    #[test]
    fn settings_change_while_idle_reloads() {
        let mut h = Harness::new(25, 5);
        h.settings.work_minutes = 40;
        assert!(matches!(
            h.engine.apply_settings(&h.settings),
            Some(Event::DurationReloaded { remaining_secs: 2400, .. })
        ));
        assert_eq!(h.engine.remaining_secs(), 2400);
        assert_eq!(h.engine.total_secs(), 2400);
        // Same values again: nothing to do.
        assert!(h.engine.apply_settings(&h.settings).is_none());
    }

    #[test]
    fn reset_while_running_records_incomplete() {
        let mut h = Harness::new(25, 5);
        h.engine.start();
        h.run_down_to(200);

        let event = h.reset();
        assert!(matches!(
            event,
            Some(Event::TimerReset { abandoned: true, elapsed_secs: 1300, .. })
        ));
        assert_eq!(h.analytics.incomplete_sessions(), 1);
        assert_eq!(h.engine.remaining_secs(), 1500);
        assert_eq!(h.engine.state(), TimerState::Idle);
    }

    #[test]
    fn reset_while_paused_records_incomplete_but_idle_does_not() {
        let mut h = Harness::new(25, 5);
        h.reset();
        assert_eq!(h.analytics.incomplete_sessions(), 0);

        h.engine.start();
        h.tick();
        h.engine.pause();
        h.reset();
        assert_eq!(h.analytics.incomplete_sessions(), 1);
        assert!(!h.engine.is_paused());
    }

    #[test]
    fn reset_keeps_session_count_stop_clears_it() {
        let mut h = Harness::new(1, 1);
        h.engine.start();
        h.run_down_to(1);
        h.tick();
        assert_eq!(h.engine.session_count(), 1);

        h.engine.start();
        h.reset();
        assert_eq!(h.engine.session_count(), 1);
        assert_eq!(h.engine.phase(), Phase::Break);

        h.engine.start();
        h.stop();
        assert_eq!(h.engine.session_count(), 0);
        assert_eq!(h.analytics.incomplete_sessions(), 2);
    }

    #[test]
    fn double_pause_matches_single_pause() {
        let mut h = Harness::new(25, 5);
        h.engine.start();
        h.tick();
        h.engine.pause();
        let once = h.engine.clone();
        assert!(h.engine.pause().is_none());
        assert_eq!(h.engine, once);
    }

    #[test]
    fn full_work_phase_end_to_end() {
        let mut h = Harness::new(25, 5);
        h.engine.start();

        let mut transitions = Vec::new();
        for n in 1..=1500u64 {
            if let Some(event) = h.tick() {
                transitions.push((n, event));
            } else {
                assert_eq!(h.engine.remaining_secs(), 1500 - n);
            }
        }
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].0, 1500);
        assert_eq!(h.analytics.completed_sessions(), 1);
        assert!((h.analytics.total_focus_minutes() - 25.0).abs() < f64::EPSILON);
        assert_eq!(h.engine.phase(), Phase::Break);
        assert_eq!(h.engine.remaining_secs(), 300);
        assert!(!h.engine.is_running());
    }

    #[test]
    fn advance_folds_missed_seconds_into_one_transition() {
        let mut h = Harness::new(1, 1);
        h.engine.start();
        h.tick();

        // An hour of suspension: one transition, surplus dropped.
        let event = h.advance(3600);
        assert!(matches!(event, Some(Event::PhaseCompleted { completed: Phase::Work, .. })));
        assert_eq!(h.analytics.focus_secs(), 60);
        assert_eq!(h.analytics.break_secs(), 0);
        assert_eq!(h.analytics.completed_sessions(), 1);
        assert_eq!(h.notifier.seen.borrow().len(), 1);
        assert_eq!(h.engine.phase(), Phase::Break);
        assert_eq!(h.engine.remaining_secs(), 60);
    }

    #[test]
    fn advance_short_of_expiry_just_counts_down() {
        let mut h = Harness::new(25, 5);
        h.engine.start();
        assert!(h.advance(90).is_none());
        assert_eq!(h.engine.remaining_secs(), 1410);
        assert!(h.advance(0).is_none());
        assert_eq!(h.engine.remaining_secs(), 1410);
    }

    #[test]
    fn view_reports_ratio_and_clock() {
        let mut h = Harness::new(1, 1);
        h.engine.start();
        h.advance(30);
        let view = h.engine.view();
        assert_eq!(view.display, "0:30");
        assert!((view.remaining_ratio - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = TimerEngine::new(&Settings::default());
        match engine.snapshot() {
            Event::StateSnapshot { state, phase, remaining_secs, display, .. } => {
                assert_eq!(state, TimerState::Idle);
                assert_eq!(phase, Phase::Work);
                assert_eq!(remaining_secs, 25 * 60);
                assert_eq!(display, "25:00");
            }
            other => panic!("Expected StateSnapshot, got {other:?}"),
        }
    }

    #[test]
    fn silent_gateway_is_enough_to_run() {
        let settings = Settings { work_minutes: 1, break_minutes: 1 };
        let mut engine = TimerEngine::new(&settings);
        let mut analytics = AnalyticsStore::new();
        let mut tasks = CreditLog::default();
        let mut ctx = Collaborators {
            settings,
            analytics: &mut analytics,
            tasks: &mut tasks,
            notifier: &SilentGateway,
        };
        engine.start();
        assert!(engine.advance(60, &mut ctx).is_some());
    }

    #[derive(Debug, Clone)]
    enum Op {
        Start,
        Pause,
        Resume,
        Tick,
        Advance(u64),
        Reset,
        Stop,
        Work(u32),
        Break(u32),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            2 => Just(Op::Start),
            1 => Just(Op::Pause),
            1 => Just(Op::Resume),
            8 => Just(Op::Tick),
            1 => (0u64..200).prop_map(Op::Advance),
            1 => Just(Op::Reset),
            1 => Just(Op::Stop),
            1 => (1u32..=3).prop_map(Op::Work),
            1 => (1u32..=3).prop_map(Op::Break),
        ]
    }

    proptest! {
        #[test]
        fn invariants_hold_for_any_sequence(ops in prop::collection::vec(op(), 0..400)) {
            let mut h = Harness::new(1, 1);
            let mut attributed = 0u64;
            let mut completions = 0u64;

            for op in ops {
                let before = h.engine.clone();
                match op {
                    Op::Start => { h.engine.start(); }
                    Op::Pause => { h.engine.pause(); }
                    Op::Resume => { h.engine.resume(); }
                    Op::Tick => {
                        if before.is_ticking() {
                            attributed += 1u64.min(before.remaining_secs());
                        }
                        if let Some(Event::PhaseCompleted { .. }) = h.tick() {
                            completions += 1;
                        }
                        if before.is_ticking() && before.remaining_secs() > 1 {
                            prop_assert_eq!(h.engine.remaining_secs(), before.remaining_secs() - 1);
                        }
                    }
                    Op::Advance(n) => {
                        if before.is_ticking() {
                            attributed += n.min(before.remaining_secs());
                        }
                        if let Some(Event::PhaseCompleted { .. }) = h.advance(n) {
                            completions += 1;
                        }
                    }
                    Op::Reset => { h.reset(); }
                    Op::Stop => { h.stop(); }
                    Op::Work(m) => {
                        h.settings.work_minutes = m;
                        h.engine.apply_settings(&h.settings);
                    }
                    Op::Break(m) => {
                        h.settings.break_minutes = m;
                        h.engine.apply_settings(&h.settings);
                    }
                }

                prop_assert!(!h.engine.is_paused() || h.engine.is_running());
                prop_assert!(h.engine.remaining_secs() <= h.engine.total_secs());
                if !h.engine.is_running() {
                    prop_assert!(h.engine.remaining_secs() > 0);
                }
            }

            prop_assert_eq!(h.analytics.focus_secs() + h.analytics.break_secs(), attributed);
            prop_assert_eq!(h.notifier.seen.borrow().len() as u64, completions);
        }
    }
}
