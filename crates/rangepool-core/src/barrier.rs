//! Completion barrier - the fan-in half of a dispatch call
//!
//! One barrier per dispatch call. The dispatcher initializes the countdown
//! to the number of tasks it submits; every worker decrements exactly once
//! after running its task; the caller blocks on the condvar until the count
//! reaches zero. The count only ever decreases and never goes negative.
//!
//! The first non-zero kernel status is recorded under the same mutex, so
//! the caller learns about a failing partition without any extra
//! synchronization (first error wins, later statuses are dropped).

use std::sync::{Condvar, Mutex, MutexGuard};

struct BarrierState {
    remaining: usize,
    first_failure: Option<i32>,
}

/// Countdown barrier shared by all tasks of one dispatch call.
pub struct CompletionBarrier {
    state: Mutex<BarrierState>,
    cond: Condvar,
}

/// A panicking kernel must still reach the decrement, so a poisoned mutex
/// is recovered rather than propagated - the state is a plain counter and
/// stays consistent either way. Leaving the count non-zero would deadlock
/// the caller forever.
fn lock_recover<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl CompletionBarrier {
    /// Create a barrier expecting `count` completions.
    pub fn new(count: usize) -> Self {
        Self {
            state: Mutex::new(BarrierState {
                remaining: count,
                first_failure: None,
            }),
            cond: Condvar::new(),
        }
    }

    /// Signal one task's completion with its kernel status.
    ///
    /// Decrements the countdown by exactly one and wakes the waiting caller
    /// once it reaches zero. Must be called exactly once per task.
    pub fn complete(&self, status: i32) {
        let mut state = lock_recover(&self.state);
        debug_assert!(state.remaining > 0, "barrier signalled more than its count");
        state.remaining -= 1;
        if status != 0 && state.first_failure.is_none() {
            state.first_failure = Some(status);
        }
        if state.remaining == 0 {
            self.cond.notify_all();
        }
    }

    /// Block until every task has signalled, then return the first recorded
    /// non-zero kernel status, if any.
    ///
    /// Cooperative suspension on the condvar - no busy-spin. Returns
    /// immediately when the barrier was created with `count == 0`.
    pub fn wait(&self) -> Option<i32> {
        let mut state = lock_recover(&self.state);
        while state.remaining != 0 {
            state = self
                .cond
                .wait(state)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
        state.first_failure
    }

    /// Current countdown value, read under the mutex (tests only need this).
    pub fn remaining(&self) -> usize {
        lock_recover(&self.state).remaining
    }
}
