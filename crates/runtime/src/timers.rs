//! Deterministic virtual-time timer queue.
//!
//! Key properties:
//! - Total ordering on `(due, id)`: timers due at the same instant fire in
//!   the order they were scheduled.
//! - Cancellation does not perturb the order of remaining timers.
//! - Time only moves when the host calls [`TimerQueue::advance_to`], so tests
//!   can step virtual time instead of sleeping.
//!
//! Vec-backed; pending sets are bounded by user actions per flight window.

use foundation::Millis;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(pub u64);

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Key {
    due: Millis,
    id: TimerId,
}

impl Ord for Key {
    fn cmp(&self, other: &Self) -> core::cmp::Ordering {
        self.due.cmp(&other.due).then_with(|| self.id.cmp(&other.id))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<core::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[derive(Debug)]
struct Entry<T> {
    key: Key,
    payload: T,
}

/// A timer that fired during [`TimerQueue::advance_to`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fired<T> {
    pub id: TimerId,
    pub due: Millis,
    pub payload: T,
}

#[derive(Debug)]
pub struct TimerQueue<T> {
    next_id: u64,
    now: Millis,
    entries: Vec<Entry<T>>,
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            now: Millis::ZERO,
            entries: Vec::new(),
        }
    }
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// The latest instant passed to `advance_to`.
    pub fn now(&self) -> Millis {
        self.now
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.entries.iter().any(|e| e.key.id == id)
    }

    /// Schedules `payload` to fire at `due`.
    ///
    /// A `due` already in the past fires on the next `advance_to`.
    pub fn schedule_at(&mut self, due: Millis, payload: T) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id = self.next_id.wrapping_add(1);
        self.entries.push(Entry {
            key: Key { due, id },
            payload,
        });
        id
    }

    pub fn schedule_after(&mut self, from: Millis, delay_ms: u64, payload: T) -> TimerId {
        self.schedule_at(from.offset(delay_ms), payload)
    }

    /// Removes a pending timer. Returns `false` if it already fired or was
    /// canceled.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|e| e.key.id != id);
        self.entries.len() != before
    }

    /// Drops every pending timer, returning how many were discarded.
    pub fn clear(&mut self) -> usize {
        let n = self.entries.len();
        self.entries.clear();
        n
    }

    pub fn next_due(&self) -> Option<Millis> {
        self.entries.iter().map(|e| e.key).min().map(|k| k.due)
    }

    /// Moves virtual time forward to `now` and returns every timer with
    /// `due <= now`, in `(due, id)` order.
    ///
    /// Time never moves backwards; an earlier `now` fires nothing new.
    pub fn advance_to(&mut self, now: Millis) -> Vec<Fired<T>> {
        if now > self.now {
            self.now = now;
        }
        let now = self.now;

        let mut fired = Vec::new();
        while let Some(entry) = self.pop_due(now) {
            fired.push(Fired {
                id: entry.key.id,
                due: entry.key.due,
                payload: entry.payload,
            });
        }
        if !fired.is_empty() {
            tracing::trace!(count = fired.len(), %now, "timers fired");
        }
        fired
    }

    fn pop_due(&mut self, now: Millis) -> Option<Entry<T>> {
        let mut best_idx: Option<usize> = None;
        for (idx, entry) in self.entries.iter().enumerate() {
            if entry.key.due > now {
                continue;
            }
            match best_idx {
                None => best_idx = Some(idx),
                Some(best) => {
                    if entry.key < self.entries[best].key {
                        best_idx = Some(idx);
                    }
                }
            }
        }

        let idx = best_idx?;
        Some(self.entries.swap_remove(idx))
    }
}
