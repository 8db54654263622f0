//! Timer queue
//!
//! `setTimeout` on a virtual clock. The host advances time explicitly,
//! so cosmetic delays (debounce, shake reset) stay deterministic.

/// Timer identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimerId(u64);

#[derive(Debug)]
struct Pending<T> {
    id: TimerId,
    due: u64,
    task: T,
}

/// Pending tasks keyed by due time
#[derive(Debug)]
pub struct TimerQueue<T> {
    now: u64,
    next_id: u64,
    pending: Vec<Pending<T>>,
}

impl<T> TimerQueue<T> {
    pub fn new() -> Self {
        Self {
            now: 0,
            next_id: 0,
            pending: Vec::new(),
        }
    }

    /// Schedule `task` to fire `delay_ms` from now
    pub fn set_timeout(&mut self, delay_ms: u64, task: T) -> TimerId {
        self.next_id += 1;
        let id = TimerId(self.next_id);
        self.pending.push(Pending {
            id,
            due: self.now + delay_ms,
            task,
        });
        id
    }

    /// Cancel a pending timer
    pub fn clear_timeout(&mut self, id: TimerId) -> bool {
        let before = self.pending.len();
        self.pending.retain(|p| p.id != id);
        self.pending.len() != before
    }

    pub fn is_pending(&self, id: TimerId) -> bool {
        self.pending.iter().any(|p| p.id == id)
    }

    /// Move the clock forward and return the tasks that came due,
    /// ordered by due time then scheduling order
    pub fn advance(&mut self, ms: u64) -> Vec<T> {
        self.now += ms;
        let now = self.now;

        let (mut due, rest): (Vec<_>, Vec<_>) =
            std::mem::take(&mut self.pending).into_iter().partition(|p| p.due <= now);
        self.pending = rest;

        due.sort_by_key(|p| (p.due, p.id.0));
        due.into_iter().map(|p| p.task).collect()
    }

    /// Current virtual time in milliseconds
    pub fn now(&self) -> u64 {
        self.now
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}

impl<T> Default for TimerQueue<T> {
    fn default() -> Self {
        Self::new()
    }
}
