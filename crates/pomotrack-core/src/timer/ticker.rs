//! Arm/disarm bookkeeping for the one-second tick.
//!
//! The anchor remembers the wall-clock instant up to which elapsed time has
//! been handed to the engine. It is armed only while the engine is running,
//! and `due_secs` turns the time since then into whole seconds, keeping
//! the sub-second remainder for the next call.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickAnchor {
    /// Wall-clock ms up to which seconds have been consumed.
    counted_until_ms: Option<u64>,
}

impl TickAnchor {
    pub fn is_armed(&self) -> bool {
        self.counted_until_ms.is_some()
    }

    /// Start counting from `now_ms`. Returns `false` if already armed, in
    /// which case the existing anchor is kept.
    pub fn arm(&mut self, now_ms: u64) -> bool {
        if self.is_armed() {
            return false;
        }
        self.counted_until_ms = Some(now_ms);
        true
    }

    /// Stop counting. Returns `false` if it was not armed.
    pub fn disarm(&mut self) -> bool {
        self.counted_until_ms.take().is_some()
    }

    /// Whole seconds elapsed since the anchor, consuming them.
    pub fn due_secs(&mut self, now_ms: u64) -> u64 {
        let Some(since) = self.counted_until_ms else {
            return 0;
        };
        let secs = now_ms.saturating_sub(since) / 1000;
        self.counted_until_ms = Some(since + secs * 1000);
        secs
    }

    /// Mark `secs` seconds as consumed by an explicit tick.
    pub fn consume(&mut self, secs: u64) {
        if let Some(since) = self.counted_until_ms.as_mut() {
            *since = since.saturating_add(secs.saturating_mul(1000));
        }
    }

    /// Milliseconds until the next whole second is due.
    pub fn until_next_ms(&self, now_ms: u64) -> Option<u64> {
        let since = self.counted_until_ms?;
        let into = now_ms.saturating_sub(since) % 1000;
        Some(1000 - into)
    }
}
