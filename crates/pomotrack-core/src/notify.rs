//! Completion alerts.
//!
//! The engine hands a [`PhaseCompletion`] to a [`NotificationGateway`] and
//! moves on. Nothing a gateway does can reach back into timer state: the
//! trait returns nothing, and delivery errors are logged and dropped here.

use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// A phase ran out and the engine switched to the next one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseCompletion {
    pub completed: Phase,
    pub next: Phase,
}

impl PhaseCompletion {
    pub fn title(&self) -> &'static str {
        match self.completed {
            Phase::Work => "Work Session Complete!",
            Phase::Break => "Break Time!",
        }
    }

    pub fn message(&self) -> &'static str {
        match self.completed {
            Phase::Work => "Work session complete! Time for a break!",
            Phase::Break => "Break time is over! Back to work!",
        }
    }
}

/// Fire-and-forget alert delivery.
pub trait NotificationGateway {
    fn notify(&self, completion: &PhaseCompletion);
}

/// Drops every alert.
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentGateway;

impl NotificationGateway for SilentGateway {
    fn notify(&self, _completion: &PhaseCompletion) {}
}

/// User-facing notification switches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationPreferences {
    #[serde(default = "default_true")]
    pub enabled: bool,
    #[serde(default = "default_true")]
    pub sound: bool,
    #[serde(default = "default_true")]
    pub vibration: bool,
    #[serde(default = "default_true")]
    pub desktop: bool,
    #[serde(default = "default_true")]
    pub work_complete: bool,
    #[serde(default = "default_true")]
    pub break_complete: bool,
    #[serde(default)]
    pub session_start: bool,
}

fn default_true() -> bool {
    true
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            enabled: true,
            sound: true,
            vibration: true,
            desktop: true,
            work_complete: true,
            break_complete: true,
            session_start: false,
        }
    }
}

impl NotificationPreferences {
    /// Whether any alert should be raised for this completion.
    pub fn wants(&self, completion: &PhaseCompletion) -> bool {
        self.enabled
            && match completion.completed {
                Phase::Work => self.work_complete,
                Phase::Break => self.break_complete,
            }
    }
}

pub type AlertResult = Result<(), String>;

/// Output channels a front end can provide. Each may fail independently.
pub trait AlertSink {
    fn sound(&self, completion: &PhaseCompletion) -> AlertResult;
    fn vibrate(&self, completion: &PhaseCompletion) -> AlertResult;
    fn desktop(&self, completion: &PhaseCompletion) -> AlertResult;
}

/// Routes alerts to an [`AlertSink`] according to [`NotificationPreferences`].
pub struct PreferenceGateway<S> {
    prefs: NotificationPreferences,
    sink: S,
}

impl<S: AlertSink> PreferenceGateway<S> {
    pub fn new(prefs: NotificationPreferences, sink: S) -> Self {
        Self { prefs, sink }
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }
}

impl<S: AlertSink> NotificationGateway for PreferenceGateway<S> {
    fn notify(&self, completion: &PhaseCompletion) {
        if !self.prefs.wants(completion) {
            tracing::debug!(phase = %completion.completed, "alert suppressed by preferences");
            return;
        }
        let channels: [(&str, bool, fn(&S, &PhaseCompletion) -> AlertResult); 3] = [
            ("sound", self.prefs.sound, S::sound),
            ("vibration", self.prefs.vibration, S::vibrate),
            ("desktop", self.prefs.desktop, S::desktop),
        ];
        for (channel, on, deliver) in channels {
            if !on {
                continue;
            }
            if let Err(e) = deliver(&self.sink, completion) {
                tracing::warn!(channel, error = %e, "notification delivery failed");
            }
        }
    }
}

impl<G: NotificationGateway + ?Sized> NotificationGateway for Box<G> {
    fn notify(&self, completion: &PhaseCompletion) {
        (**self).notify(completion)
    }
}
