//! Virtual clock, debounce and throttle.
//!
//! All timers live in one [`Scheduler`] owned by the page context. A
//! [`Debouncer`] or [`Throttle`] belongs to the call site that uses it, so
//! rapid calls only cancel and reschedule their own timer.

use std::collections::BTreeMap;
use std::time::Duration;

use crate::event::Task;

/// Handle to a scheduled task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerId(u64);

/// Timer queue ordered by deadline, then by scheduling order.
#[derive(Debug, Default)]
pub struct Scheduler {
    now: Duration,
    next_id: u64,
    timers: BTreeMap<(Duration, TimerId), Task>,
}

impl Scheduler {
    /// Time elapsed since the page was created.
    #[must_use]
    pub const fn now(&self) -> Duration {
        self.now
    }

    /// `setTimeout(task, delay)`.
    pub fn schedule(&mut self, delay: Duration, task: Task) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.insert((self.now + delay, id), task);
        id
    }

    /// `clearTimeout(id)`. Returns whether the timer was still pending.
    pub fn cancel(&mut self, id: TimerId) -> bool {
        let key = self.timers.keys().find(|(_, t)| *t == id).copied();
        key.is_some_and(|k| self.timers.remove(&k).is_some())
    }

    #[must_use]
    pub fn is_pending(&self, id: TimerId) -> bool {
        self.timers.keys().any(|(_, t)| *t == id)
    }

    #[must_use]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    #[must_use]
    pub fn next_deadline(&self) -> Option<Duration> {
        self.timers.keys().next().map(|(deadline, _)| *deadline)
    }

    /// Remove the earliest timer due at or before `until`, moving the clock
    /// to its deadline.
    pub fn pop_due(&mut self, until: Duration) -> Option<(TimerId, Task)> {
        let (&(deadline, id), _) = self.timers.first_key_value()?;
        if deadline > until {
            return None;
        }
        let task = self.timers.remove(&(deadline, id))?;
        self.now = self.now.max(deadline);
        Some((id, task))
    }

    /// Move the clock forward without firing anything. Never moves backwards.
    pub fn advance_to(&mut self, time: Duration) {
        self.now = self.now.max(time);
    }
}

/// Trailing-edge debounce: the task runs once `delay` has passed since the
/// last call.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<TimerId>,
}

impl Debouncer {
    #[must_use]
    pub const fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Cancel the pending run (if any) and schedule `task` after the quiet period.
    pub fn call(&mut self, scheduler: &mut Scheduler, task: Task) -> TimerId {
        if let Some(previous) = self.pending.take() {
            scheduler.cancel(previous);
        }
        let id = scheduler.schedule(self.delay, task);
        self.pending = Some(id);
        id
    }

    /// Drop the pending run. Returns whether one was pending.
    pub fn cancel(&mut self, scheduler: &mut Scheduler) -> bool {
        self.pending
            .take()
            .is_some_and(|id| scheduler.cancel(id))
    }

    /// Forget the pending timer after it fired.
    pub const fn settle(&mut self) {
        self.pending = None;
    }

    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

/// Leading-edge throttle: at most one run per `interval`.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Option<Duration>,
}

impl Throttle {
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: None,
        }
    }

    /// Returns `true` (and starts a new interval) when the caller may run now.
    pub fn try_acquire(&mut self, now: Duration) -> bool {
        match self.last {
            Some(last) if now < last + self.interval => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ms(value: u64) -> Duration {
        Duration::from_millis(value)
    }

    #[test]
    fn test_pop_due_orders_by_deadline_then_fifo() {
        let mut sched = Scheduler::default();
        sched.schedule(ms(200), Task::NavResizeSettled);
        let first = sched.schedule(ms(100), Task::NavResizeSettled);
        let second = sched.schedule(ms(100), Task::NavResizeSettled);

        assert_eq!(sched.pop_due(ms(50)), None);
        assert_eq!(sched.pop_due(ms(150)).map(|(id, _)| id), Some(first));
        assert_eq!(sched.pop_due(ms(150)).map(|(id, _)| id), Some(second));
        assert_eq!(sched.now(), ms(100));
        assert_eq!(sched.pop_due(ms(150)), None);
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn test_cancel_removes_timer() {
        let mut sched = Scheduler::default();
        let id = sched.schedule(ms(10), Task::NavResizeSettled);
        assert!(sched.is_pending(id));
        assert!(sched.cancel(id));
        assert!(!sched.cancel(id));
        assert_eq!(sched.next_deadline(), None);
    }

    #[test]
    fn test_debouncer_reschedules_on_rapid_calls() {
        let mut sched = Scheduler::default();
        let mut debounce = Debouncer::new(ms(300));
        let first = debounce.call(&mut sched, Task::NavResizeSettled);
        sched.advance_to(ms(200));
        let second = debounce.call(&mut sched, Task::NavResizeSettled);

        assert!(!sched.is_pending(first));
        assert!(sched.is_pending(second));
        assert_eq!(sched.next_deadline(), Some(ms(500)));
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn test_independent_debouncers_do_not_interfere() {
        let mut sched = Scheduler::default();
        let mut a = Debouncer::new(ms(300));
        let mut b = Debouncer::new(ms(300));
        a.call(&mut sched, Task::NavResizeSettled);
        b.call(&mut sched, Task::NavResizeSettled);
        a.call(&mut sched, Task::NavResizeSettled);
        assert_eq!(sched.pending(), 2);
        assert!(b.cancel(&mut sched));
        assert_eq!(sched.pending(), 1);
    }

    #[test]
    fn test_throttle_allows_once_per_interval() {
        let mut throttle = Throttle::new(ms(100));
        assert!(throttle.try_acquire(ms(0)));
        assert!(!throttle.try_acquire(ms(50)));
        assert!(!throttle.try_acquire(ms(99)));
        assert!(throttle.try_acquire(ms(100)));
        assert!(!throttle.try_acquire(ms(150)));
    }
}
