//! Work/break duration preferences.
//!
//! Bounds are enforced when a value is written, never when it is read, so
//! the timer engine can take a [`Settings`] at face value.

use std::ops::RangeInclusive;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::timer::Phase;

pub const WORK_MINUTES_RANGE: RangeInclusive<u32> = 1..=60;
pub const BREAK_MINUTES_RANGE: RangeInclusive<u32> = 1..=30;

pub const DEFAULT_WORK_MINUTES: u32 = 25;
pub const DEFAULT_BREAK_MINUTES: u32 = 5;

/// Durations in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub work_minutes: u32,
    pub break_minutes: u32,
}

impl Settings {
    /// Configured duration of `phase` in seconds.
    pub fn duration_secs(&self, phase: Phase) -> u64 {
        let minutes = match phase {
            Phase::Work => self.work_minutes,
            Phase::Break => self.break_minutes,
        };
        u64::from(minutes) * 60
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            work_minutes: DEFAULT_WORK_MINUTES,
            break_minutes: DEFAULT_BREAK_MINUTES,
        }
    }
}

/// Which duration a write targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SettingsField {
    WorkMinutes,
    BreakMinutes,
}

impl SettingsField {
    pub fn key(self) -> &'static str {
        match self {
            SettingsField::WorkMinutes => "work_minutes",
            SettingsField::BreakMinutes => "break_minutes",
        }
    }

    fn range(self) -> RangeInclusive<u32> {
        match self {
            SettingsField::WorkMinutes => WORK_MINUTES_RANGE,
            SettingsField::BreakMinutes => BREAK_MINUTES_RANGE,
        }
    }
}

/// Owner of [`Settings`]. Every write clamps.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsStore {
    settings: Settings,
}

impl SettingsStore {
    /// Seed the store, clamping both values.
    pub fn new(work_minutes: u32, break_minutes: u32) -> Self {
        let mut store = Self::default();
        store.set(SettingsField::WorkMinutes, work_minutes);
        store.set(SettingsField::BreakMinutes, break_minutes);
        store
    }

    pub fn get(&self) -> Settings {
        self.settings
    }

    pub fn work_minutes(&self) -> u32 {
        self.settings.work_minutes
    }

    pub fn break_minutes(&self) -> u32 {
        self.settings.break_minutes
    }

    /// Write a clamped value. Returns `true` when the stored value changed.
    pub fn set(&mut self, field: SettingsField, minutes: u32) -> bool {
        let range = field.range();
        let clamped = minutes.clamp(*range.start(), *range.end());
        let slot = match field {
            SettingsField::WorkMinutes => &mut self.settings.work_minutes,
            SettingsField::BreakMinutes => &mut self.settings.break_minutes,
        };
        if *slot == clamped {
            return false;
        }
        tracing::debug!(field = field.key(), from = *slot, to = clamped, "settings changed");
        *slot = clamped;
        true
    }

    /// Parse raw user input and write it.
    ///
    /// Numeric text (including negative or oversized numbers) is clamped.
    /// Anything else is rejected and the store is left untouched.
    pub fn set_from_input(
        &mut self,
        field: SettingsField,
        input: &str,
    ) -> Result<bool, ValidationError> {
        let minutes = parse_minutes(field, input)?;
        Ok(self.set(field, minutes))
    }
}

fn parse_minutes(field: SettingsField, input: &str) -> Result<u32, ValidationError> {
    let trimmed = input.trim();
    let value: i64 = trimmed.parse().map_err(|_| {
        tracing::warn!(field = field.key(), input = trimmed, "rejected non-numeric settings input");
        ValidationError::InvalidValue {
            field: field.key().to_string(),
            message: format!("'{trimmed}' is not a whole number of minutes"),
        }
    })?;
    Ok(value.clamp(0, i64::from(u32::MAX)) as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_25_and_5() {
        let store = SettingsStore::default();
        assert_eq!(store.work_minutes(), 25);
        assert_eq!(store.break_minutes(), 5);
    }

    #[test]
    fn writes_clamp_to_bounds() {
        let mut store = SettingsStore::default();
        store.set(SettingsField::WorkMinutes, 0);
        assert_eq!(store.work_minutes(), 1);
        store.set(SettingsField::WorkMinutes, 90);
        assert_eq!(store.work_minutes(), 60);
        store.set(SettingsField::BreakMinutes, 45);
        assert_eq!(store.break_minutes(), 30);
    }

    #[test]
    fn new_clamps_seed_values() {
        let store = SettingsStore::new(500, 0);
        assert_eq!(store.get(), Settings { work_minutes: 60, break_minutes: 1 });
    }

    #[test]
    fn repeated_write_reports_no_change() {
        let mut store = SettingsStore::default();
        assert!(store.set(SettingsField::WorkMinutes, 30));
        assert!(!store.set(SettingsField::WorkMinutes, 30));
        // Clamped to the value already stored.
        store.set(SettingsField::BreakMinutes, 30);
        assert!(!store.set(SettingsField::BreakMinutes, 99));
    }

    #[test]
    fn numeric_input_is_clamped() {
        let mut store = SettingsStore::default();
        assert!(store.set_from_input(SettingsField::WorkMinutes, " -4 ").unwrap());
        assert_eq!(store.work_minutes(), 1);
        store.set_from_input(SettingsField::BreakMinutes, "1000000000000").unwrap();
        assert_eq!(store.break_minutes(), 30);
    }

    #[test]
    fn non_numeric_input_is_rejected_without_mutation() {
        let mut store = SettingsStore::default();
        let err = store
            .set_from_input(SettingsField::WorkMinutes, "ten")
            .unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "work_minutes"));
        assert_eq!(store.work_minutes(), 25);
    }

    #[test]
    fn duration_secs_per_phase() {
        let s = Settings { work_minutes: 25, break_minutes: 5 };
        assert_eq!(s.duration_secs(Phase::Work), 1500);
        assert_eq!(s.duration_secs(Phase::Break), 300);
    }
}
