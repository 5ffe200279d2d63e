//! Delayed and repeating timers.
//!
//! Timers carry a data payload instead of a closure. The engine drains due
//! timers at frame boundaries, one at a time, so a handler that cancels a
//! later timer stops it even when both fall in the same frame.

/// Cancellable reference to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TimerHandle(u64);

/// Scheduling facility used by timed capabilities.
pub trait Scheduler<E> {
    /// Fire `event` once, `delay_ms` from now.
    fn schedule_once(&mut self, delay_ms: f64, event: E) -> TimerHandle;

    /// Fire `event` `repeat_count` times, every `interval_ms`, first one
    /// `interval_ms` from now.
    fn schedule_repeating(&mut self, interval_ms: f64, repeat_count: u32, event: E) -> TimerHandle;

    /// Stop a timer without firing it. Returns whether anything was pending.
    /// Cancelling a fired or already-cancelled timer is a no-op.
    fn cancel(&mut self, handle: TimerHandle) -> bool;

    fn is_pending(&self, handle: TimerHandle) -> bool;
}

#[derive(Debug, Clone)]
struct Timer<E> {
    handle: TimerHandle,
    due_ms: f64,
    interval_ms: f64,
    /// Fires left, including the next one.
    remaining: u32,
    event: E,
}

/// A timer that came due.
#[derive(Debug, Clone, PartialEq)]
pub struct FiredTimer<E> {
    pub handle: TimerHandle,
    pub event: E,
    /// When it was due, which may be earlier than the frame that fired it.
    pub due_ms: f64,
    /// Fires still to come from the same handle.
    pub remaining: u32,
}

/// Timer queue driven by simulation time.
#[derive(Debug, Clone)]
pub struct TimerQueue<E> {
    now_ms: f64,
    next_id: u64,
    timers: Vec<Timer<E>>,
}

impl<E> Default for TimerQueue<E> {
    fn default() -> Self {
        Self {
            now_ms: 0.0,
            next_id: 0,
            timers: Vec::new(),
        }
    }
}

impl<E> TimerQueue<E> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn now_ms(&self) -> f64 {
        self.now_ms
    }

    /// Move the clock forward. Time never runs backwards.
    pub fn advance_to(&mut self, now_ms: f64) {
        if now_ms > self.now_ms {
            self.now_ms = now_ms;
        }
    }

    pub fn pending_count(&self) -> usize {
        self.timers.len()
    }

    /// When a pending timer next fires.
    pub fn due_at(&self, handle: TimerHandle) -> Option<f64> {
        self.timers
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.due_ms)
    }

    /// Drop every pending timer.
    pub fn clear(&mut self) {
        self.timers.clear();
    }

    fn allocate(&mut self) -> TimerHandle {
        self.next_id += 1;
        TimerHandle(self.next_id)
    }

    /// Index of the earliest due timer, ties broken by schedule order.
    fn earliest_due(&self) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .filter(|(_, t)| t.due_ms <= self.now_ms)
            .min_by(|(_, a), (_, b)| {
                a.due_ms
                    .total_cmp(&b.due_ms)
                    .then_with(|| a.handle.cmp(&b.handle))
            })
            .map(|(idx, _)| idx)
    }
}

impl<E: Clone> TimerQueue<E> {
    /// Take the next timer that is due at the current time.
    pub fn pop_due(&mut self) -> Option<FiredTimer<E>> {
        let idx = self.earliest_due()?;

        let timer = &mut self.timers[idx];
        if timer.remaining > 1 {
            timer.remaining -= 1;
            let fired = FiredTimer {
                handle: timer.handle,
                event: timer.event.clone(),
                due_ms: timer.due_ms,
                remaining: timer.remaining,
            };
            timer.due_ms += timer.interval_ms;
            return Some(fired);
        }

        let timer = self.timers.swap_remove(idx);
        Some(FiredTimer {
            handle: timer.handle,
            event: timer.event,
            due_ms: timer.due_ms,
            remaining: 0,
        })
    }
}

impl<E> Scheduler<E> for TimerQueue<E> {
    fn schedule_once(&mut self, delay_ms: f64, event: E) -> TimerHandle {
        self.schedule_repeating(delay_ms, 1, event)
    }

    fn schedule_repeating(&mut self, interval_ms: f64, repeat_count: u32, event: E) -> TimerHandle {
        let handle = self.allocate();
        if repeat_count == 0 {
            return handle;
        }
        let interval_ms = interval_ms.max(0.0);
        self.timers.push(Timer {
            handle,
            due_ms: self.now_ms + interval_ms,
            interval_ms,
            remaining: repeat_count,
            event,
        });
        handle
    }

    fn cancel(&mut self, handle: TimerHandle) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.handle != handle);
        self.timers.len() != before
    }

    fn is_pending(&self, handle: TimerHandle) -> bool {
        self.timers.iter().any(|t| t.handle == handle)
    }
}
