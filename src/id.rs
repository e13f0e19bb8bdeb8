// Task id generation

use crate::task::TaskId;

/// Source of fresh task ids, injected into the store
pub trait IdGenerator {
    /// Produce the next id. Successive calls must not repeat.
    fn next_id(&mut self) -> TaskId;
}

/// Monotonic counter starting at 1
#[derive(Debug, Clone)]
pub struct SequentialIds {
    next: u64,
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(first: u64) -> Self {
        Self { next: first }
    }
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> TaskId {
        let id = TaskId(self.next);
        self.next += 1;
        id
    }
}

/// Wall-clock ids (milliseconds since the Unix epoch)
///
/// Two ids requested within the same millisecond would collide, so each id is
/// at least one greater than the previous one.
#[derive(Debug, Clone, Default)]
pub struct TimestampIds {
    last: u64,
}

impl TimestampIds {
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdGenerator for TimestampIds {
    fn next_id(&mut self) -> TaskId {
        let now = now_ms();
        self.last = now.max(self.last + 1);
        TaskId(self.last)
    }
}

/// Current time in milliseconds since the Unix epoch (0 if the clock is before it)
pub fn now_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
