//! Lifecycle timers
//!
//! Scheduled callbacks keyed by (entry id, timer kind). Scheduling a timer
//! aborts any previous timer of the same kind for that entry, and each timer
//! carries a token so a callback that already woke up can tell it was superseded.

use super::types::DialogId;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Transition and banner timings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DialogTimings {
    /// Delay before an entering dialog becomes visible
    pub enter_delay_ms: u64,
    /// Delay between settlement and removal from the stack
    pub exit_delay_ms: u64,
    /// How long a submission error stays on screen
    pub error_clear_ms: u64,
}

impl Default for DialogTimings {
    fn default() -> Self {
        Self {
            enter_delay_ms: 10,
            exit_delay_ms: 200,
            error_clear_ms: 3000,
        }
    }
}

impl DialogTimings {
    pub fn enter_delay(&self) -> Duration {
        Duration::from_millis(self.enter_delay_ms)
    }

    pub fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.exit_delay_ms)
    }

    pub fn error_clear(&self) -> Duration {
        Duration::from_millis(self.error_clear_ms)
    }

    pub(crate) fn delay_for(&self, kind: TimerKind) -> Duration {
        match kind {
            TimerKind::Enter => self.enter_delay(),
            TimerKind::Close => self.exit_delay(),
            TimerKind::ErrorClear => self.error_clear(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimerKind {
    Enter,
    Close,
    ErrorClear,
}

/// What a timer does when it fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum TimerAction {
    /// Flip `Entering` to `Visible`
    Enter,
    /// Remove the entry from the stack
    Close,
    /// Clear the error banner if it still shows this message
    ClearError(String),
}

impl TimerAction {
    pub fn kind(&self) -> TimerKind {
        match self {
            TimerAction::Enter => TimerKind::Enter,
            TimerAction::Close => TimerKind::Close,
            TimerAction::ClearError(_) => TimerKind::ErrorClear,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct TimerToken(u64);

struct ScheduledTimer {
    token: TimerToken,
    handle: JoinHandle<()>,
}

/// Table of live timers, at most one per (entry, kind)
#[derive(Default)]
pub(crate) struct TimerTable {
    timers: HashMap<(DialogId, TimerKind), ScheduledTimer>,
    next_token: u64,
}

impl TimerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_token(&mut self) -> TimerToken {
        self.next_token += 1;
        TimerToken(self.next_token)
    }

    /// Register a spawned timer, aborting the one it replaces.
    /// Returns `true` if a previous timer was replaced.
    pub fn insert(
        &mut self,
        id: DialogId,
        kind: TimerKind,
        token: TimerToken,
        handle: JoinHandle<()>,
    ) -> bool {
        match self.timers.insert((id, kind), ScheduledTimer { token, handle }) {
            Some(previous) => {
                previous.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel(&mut self, id: DialogId, kind: TimerKind) -> bool {
        match self.timers.remove(&(id, kind)) {
            Some(timer) => {
                timer.handle.abort();
                true
            }
            None => false,
        }
    }

    pub fn cancel_all(&mut self, id: DialogId) {
        for kind in [TimerKind::Enter, TimerKind::Close, TimerKind::ErrorClear] {
            self.cancel(id, kind);
        }
    }

    /// Called by a firing timer. Returns `true` only if `token` is still the
    /// live timer for this slot, and clears the slot.
    pub fn complete(&mut self, id: DialogId, kind: TimerKind, token: TimerToken) -> bool {
        match self.timers.get(&(id, kind)) {
            Some(timer) if timer.token == token => {
                self.timers.remove(&(id, kind));
                true
            }
            _ => false,
        }
    }

    pub fn is_scheduled(&self, id: DialogId, kind: TimerKind) -> bool {
        self.timers.contains_key(&(id, kind))
    }

    pub fn len(&self) -> usize {
        self.timers.len()
    }
}

impl Drop for TimerTable {
    fn drop(&mut self) {
        for (_, timer) in self.timers.drain() {
            timer.handle.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn idle() -> JoinHandle<()> {
        tokio::spawn(std::future::pending::<()>())
    }

    #[tokio::test]
    async fn test_insert_replaces_and_aborts_previous() {
        let mut table = TimerTable::new();
        let id = DialogId(1);

        let first = table.next_token();
        assert!(!table.insert(id, TimerKind::ErrorClear, first, idle()));

        let second = table.next_token();
        assert!(table.insert(id, TimerKind::ErrorClear, second, idle()));
        assert_eq!(table.len(), 1);

        // The superseded timer can no longer complete its slot
        assert!(!table.complete(id, TimerKind::ErrorClear, first));
        assert!(table.complete(id, TimerKind::ErrorClear, second));
        assert!(!table.is_scheduled(id, TimerKind::ErrorClear));
    }

    #[tokio::test]
    async fn test_kinds_are_independent() {
        let mut table = TimerTable::new();
        let id = DialogId(7);
        let enter = table.next_token();
        table.insert(id, TimerKind::Enter, enter, idle());
        let close = table.next_token();
        table.insert(id, TimerKind::Close, close, idle());
        assert_eq!(table.len(), 2);

        assert!(table.cancel(id, TimerKind::Enter));
        assert!(table.is_scheduled(id, TimerKind::Close));

        table.cancel_all(id);
        assert_eq!(table.len(), 0);
    }

    #[test]
    fn test_default_timings() {
        let timings = DialogTimings::default();
        assert_eq!(timings.delay_for(TimerKind::Enter), Duration::from_millis(10));
        assert_eq!(timings.delay_for(TimerKind::Close), Duration::from_millis(200));
        assert_eq!(timings.delay_for(TimerKind::ErrorClear), Duration::from_millis(3000));
    }
}
