//! Integration tests for a full work/break cycle.
//!
//! These drive the public `App` surface the way a front end does: wall
//! clock moves, commands arrive, state is saved to disk and reopened.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use pomotrack_core::notify::AlertResult;
use pomotrack_core::storage::SessionOutcome;
use pomotrack_core::timer::ManualClock;
use pomotrack_core::{
    AlertSink, App, Config, Database, Event, NewTask, NotificationPreferences, Phase,
    PhaseCompletion, PreferenceGateway, Priority, TimerState,
};

#[derive(Clone, Default)]
struct Alerts(Arc<Mutex<Vec<(&'static str, Phase)>>>);

impl AlertSink for Alerts {
    fn sound(&self, c: &PhaseCompletion) -> AlertResult {
        self.0.lock().unwrap().push(("sound", c.completed));
        Ok(())
    }
    fn vibrate(&self, c: &PhaseCompletion) -> AlertResult {
        self.0.lock().unwrap().push(("vibrate", c.completed));
        Ok(())
    }
    fn desktop(&self, c: &PhaseCompletion) -> AlertResult {
        self.0.lock().unwrap().push(("desktop", c.completed));
        Ok(())
    }
}

fn open(db: &Database, config: &Config, clock: &ManualClock, alerts: &Alerts) -> App {
    let gateway = PreferenceGateway::new(config.notifications.clone(), alerts.clone());
    App::load(db, config, Box::new(gateway), Arc::new(clock.clone())).unwrap()
}

#[test]
fn test_default_cycle_second_by_second() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("state.db")).unwrap();
    let config = Config::default();
    let clock = ManualClock::new(0);
    let alerts = Alerts::default();
    let mut app = open(&db, &config, &clock, &alerts);

    app.start();
    let mut completions = Vec::new();
    for _ in 0..1500 {
        clock.advance(Duration::from_secs(1));
        completions.extend(app.catch_up());
    }
    assert_eq!(completions.len(), 1);
    assert_eq!(app.engine().phase(), Phase::Break);
    assert_eq!(app.engine().remaining_secs(), 300);
    assert_eq!(app.engine().state(), TimerState::Idle);
    assert_eq!(app.engine().session_count(), 1);
    assert_eq!(app.analytics().completed_sessions(), 1);
    assert_eq!(app.analytics().total_focus_minutes(), 25.0);

    app.start();
    clock.advance(Duration::from_secs(300));
    let events = app.catch_up();
    assert!(matches!(
        events[..],
        [Event::PhaseCompleted { completed: Phase::Break, next: Phase::Work, .. }]
    ));
    assert_eq!(app.engine().remaining_secs(), 1500);
    assert_eq!(app.analytics().total_break_minutes(), 5.0);
    // Breaks do not count as sessions.
    assert_eq!(app.engine().session_count(), 1);
    assert_eq!(app.analytics().completed_sessions(), 1);

    // Every channel fired for each completion.
    let alerts = alerts.0.lock().unwrap();
    assert_eq!(alerts.len(), 6);
    assert_eq!(alerts.iter().filter(|(_, p)| *p == Phase::Work).count(), 3);
}

#[test]
fn test_state_survives_restart_and_history_is_logged() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("state.db")).unwrap();
    let mut config = Config::default();
    config.set("timer.work_minutes", "1").unwrap();
    let clock = ManualClock::new(1_700_000_000_000);
    let alerts = Alerts::default();

    let mut app = open(&db, &config, &clock, &alerts);
    let task = app
        .add_task(NewTask {
            title: "Read chapter".into(),
            description: None,
            pomodoros: 2,
            priority: Priority::Medium,
        })
        .unwrap();
    app.set_current_task(Some(&task.id)).unwrap();
    let events = app.start();
    db.record_events(&events).unwrap();
    app.save(&db).unwrap();
    drop(app);

    // Process is gone for an hour; the next invocation folds it in.
    clock.advance(Duration::from_secs(3600));
    let mut app = open(&db, &config, &clock, &alerts);
    let events = app.catch_up();
    assert_eq!(events.len(), 1);
    db.record_events(&events).unwrap();

    assert_eq!(app.engine().phase(), Phase::Break);
    assert_eq!(app.analytics().focus_secs(), 60);
    let stored = app.tasks().get(&task.id).unwrap();
    assert_eq!(stored.completed_pomodoros, 1);
    assert!(!stored.completed);

    // Abandon the break.
    app.start();
    clock.advance(Duration::from_secs(30));
    let events = app.reset();
    db.record_events(&events).unwrap();
    app.save(&db).unwrap();

    let history = db.history(10).unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0].phase, Phase::Break);
    assert_eq!(history[0].outcome, SessionOutcome::Incomplete);
    assert_eq!(history[0].elapsed_secs, 30);
    assert_eq!(history[1].outcome, SessionOutcome::Completed);
    assert_eq!(history[1].task_id.as_deref(), Some(task.id.as_str()));

    let app = open(&db, &config, &clock, &alerts);
    assert_eq!(app.analytics().incomplete_sessions(), 1);
    assert_eq!(app.engine().state(), TimerState::Idle);
}

#[test]
fn test_muted_preferences_silence_every_channel() {
    let dir = tempfile::tempdir().unwrap();
    let db = Database::open_at(&dir.path().join("state.db")).unwrap();
    let config = Config {
        notifications: NotificationPreferences {
            work_complete: false,
            ..NotificationPreferences::default()
        },
        ..Config::default()
    };
    let clock = ManualClock::new(0);
    let alerts = Alerts::default();
    let mut app = open(&db, &config, &clock, &alerts);

    app.start();
    clock.advance(Duration::from_secs(1500));
    assert_eq!(app.catch_up().len(), 1);
    assert!(alerts.0.lock().unwrap().is_empty());
    // Bookkeeping does not depend on alerts.
    assert_eq!(app.analytics().completed_sessions(), 1);
}
