//! Usage counters fed by the timer engine.
//!
//! The store is a plain accumulator. Rates and scores are derived on read
//! through [`AnalyticsSummary`] and are never stored.

use serde::{Deserialize, Serialize};

use crate::timer::Phase;

/// Accumulated counters.
///
/// Time is kept as whole attributed seconds so that focus plus break time
/// always equals the number of ticks that were counted, with no float drift.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalyticsStore {
    completed_sessions: u64,
    incomplete_sessions: u64,
    focus_secs: u64,
    break_secs: u64,
}

impl AnalyticsStore {
    pub fn new() -> Self {
        Self::default()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn completed_sessions(&self) -> u64 {
        self.completed_sessions
    }

    pub fn incomplete_sessions(&self) -> u64 {
        self.incomplete_sessions
    }

    pub fn focus_secs(&self) -> u64 {
        self.focus_secs
    }

    pub fn break_secs(&self) -> u64 {
        self.break_secs
    }

    pub fn total_focus_minutes(&self) -> f64 {
        self.focus_secs as f64 / 60.0
    }

    pub fn total_break_minutes(&self) -> f64 {
        self.break_secs as f64 / 60.0
    }

    // ── Mutations ────────────────────────────────────────────────────

    /// Credit `secs` elapsed seconds to the bucket for `phase`.
    pub fn attribute(&mut self, phase: Phase, secs: u64) {
        let bucket = match phase {
            Phase::Work => &mut self.focus_secs,
            Phase::Break => &mut self.break_secs,
        };
        *bucket = bucket.saturating_add(secs);
    }

    pub fn record_completed(&mut self) {
        self.completed_sessions = self.completed_sessions.saturating_add(1);
    }

    pub fn record_incomplete(&mut self) {
        self.incomplete_sessions = self.incomplete_sessions.saturating_add(1);
    }

    /// Zero every counter.
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProductivityLevel {
    Excellent,
    Good,
    Fair,
    NeedsImprovement,
}

impl ProductivityLevel {
    fn from_score(score: u32) -> Self {
        match score {
            s if s >= 80 => ProductivityLevel::Excellent,
            s if s >= 60 => ProductivityLevel::Good,
            s if s >= 40 => ProductivityLevel::Fair,
            _ => ProductivityLevel::NeedsImprovement,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ProductivityLevel::Excellent => "Excellent",
            ProductivityLevel::Good => "Good",
            ProductivityLevel::Fair => "Fair",
            ProductivityLevel::NeedsImprovement => "Needs improvement",
        }
    }
}

/// Read-time view over an [`AnalyticsStore`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalyticsSummary {
    pub completed_sessions: u64,
    pub incomplete_sessions: u64,
    pub total_sessions: u64,
    pub total_focus_minutes: f64,
    pub total_break_minutes: f64,
    pub total_minutes: f64,
    /// 0..=100, rounded.
    pub completion_rate_pct: u32,
    pub average_session_minutes: f64,
    pub productivity_score: u32,
    pub productivity_level: ProductivityLevel,
}

impl AnalyticsSummary {
    pub fn from_store(store: &AnalyticsStore) -> Self {
        let total_sessions = store.completed_sessions + store.incomplete_sessions;
        let completion_rate_pct = if total_sessions == 0 {
            0
        } else {
            (store.completed_sessions as f64 / total_sessions as f64 * 100.0).round() as u32
        };
        let focus = store.total_focus_minutes();
        let breaks = store.total_break_minutes();
        let average_session_minutes = if store.completed_sessions > 0 {
            focus / store.completed_sessions as f64
        } else {
            0.0
        };
        let productivity_score =
            ((f64::from(completion_rate_pct) + (focus / 60.0) * 2.0) / 3.0).round() as u32;

        Self {
            completed_sessions: store.completed_sessions,
            incomplete_sessions: store.incomplete_sessions,
            total_sessions,
            total_focus_minutes: focus,
            total_break_minutes: breaks,
            total_minutes: focus + breaks,
            completion_rate_pct,
            average_session_minutes,
            productivity_score,
            productivity_level: ProductivityLevel::from_score(productivity_score),
        }
    }
}

/// Render minutes as `1h 5m` or `42m`.
pub fn format_minutes(minutes: f64) -> String {
    let total = minutes.max(0.0).round() as u64;
    let hours = total / 60;
    let mins = total % 60;
    if hours > 0 {
        format!("{hours}h {mins}m")
    } else {
        format!("{mins}m")
    }
}
