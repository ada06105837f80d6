//! Blocking job queue with a permanent closed state
//!
//! FIFO between the dispatcher (push) and the workers (pop). `pop` blocks on
//! a condvar while the queue is empty and open; once `close` is called,
//! every pending and future `pop` returns `None`, which is the workers'
//! signal to exit their loop. Items already queued at close time are still
//! drained first, so no submitted task is ever dropped.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex};

/// Error returned when pushing to a closed queue; carries the item back.
pub struct PushError<T>(pub T);

impl<T> fmt::Debug for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PushError(queue closed)")
    }
}

impl<T> fmt::Display for PushError<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "queue closed")
    }
}

struct Inner<T> {
    items: VecDeque<T>,
    closed: bool,
}

/// Thread-safe blocking FIFO handing items from one pusher to many poppers.
pub struct JobQueue<T> {
    inner: Mutex<Inner<T>>,
    cond: Condvar,
    len: AtomicUsize,
}

impl<T> JobQueue<T> {
    pub fn new(capacity: usize) -> Self {
        Self {
            inner: Mutex::new(Inner {
                items: VecDeque::with_capacity(capacity),
                closed: false,
            }),
            cond: Condvar::new(),
            len: AtomicUsize::new(0),
        }
    }

    /// Enqueue one item and wake one blocked popper.
    ///
    /// Fails once the queue is closed, returning the item to the caller.
    pub fn push(&self, item: T) -> Result<(), PushError<T>> {
        {
            let mut inner = self.inner.lock().unwrap();
            if inner.closed {
                return Err(PushError(item));
            }
            inner.items.push_back(item);
            self.len.store(inner.items.len(), Ordering::Release);
        }
        self.cond.notify_one();
        Ok(())
    }

    /// Dequeue one item, blocking while the queue is empty and open.
    ///
    /// Returns `None` only after `close()` and once the backlog is drained -
    /// the permanent no-more-work signal.
    pub fn pop(&self) -> Option<T> {
        let mut inner = self.inner.lock().unwrap();
        loop {
            if let Some(item) = inner.items.pop_front() {
                self.len.store(inner.items.len(), Ordering::Release);
                return Some(item);
            }
            if inner.closed {
                return None;
            }
            inner = self.cond.wait(inner).unwrap();
        }
    }

    /// Close the queue permanently and wake every blocked popper.
    pub fn close(&self) {
        {
            let mut inner = self.inner.lock().unwrap();
            inner.closed = true;
        }
        self.cond.notify_all();
    }

    /// Whether `close()` has been called.
    pub fn is_closed(&self) -> bool {
        self.inner.lock().unwrap().closed
    }

    /// Approximate number of queued items.
    pub fn len(&self) -> usize {
        self.len.load(Ordering::Acquire)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::thread;

    #[test]
    fn test_fifo_order() {
        let q = JobQueue::new(8);
        q.push(1).unwrap();
        q.push(2).unwrap();
        q.push(3).unwrap();
        assert_eq!(q.len(), 3);
        assert_eq!(q.pop(), Some(1));
        assert_eq!(q.pop(), Some(2));
        assert_eq!(q.pop(), Some(3));
        assert!(q.is_empty());
    }

    #[test]
    fn test_close_drains_backlog_first() {
        let q = JobQueue::new(8);
        q.push(10).unwrap();
        q.push(20).unwrap();
        q.close();
        assert_eq!(q.pop(), Some(10));
        assert_eq!(q.pop(), Some(20));
        assert_eq!(q.pop(), None);
    }

    #[test]
    fn test_push_after_close_fails() {
        let q = JobQueue::new(8);
        q.close();
        assert!(q.is_closed());
        let err = q.push(1).unwrap_err();
        assert_eq!(err.0, 1);
    }

    #[test]
    fn test_pop_blocks_until_push() {
        let q = Arc::new(JobQueue::new(8));
        let popper = {
            let q = Arc::clone(&q);
            thread::spawn(move || q.pop())
        };
        thread::sleep(std::time::Duration::from_millis(20));
        q.push(7).unwrap();
        assert_eq!(popper.join().unwrap(), Some(7));
    }

    #[test]
    fn test_close_wakes_blocked_poppers() {
        let q: Arc<JobQueue<u32>> = Arc::new(JobQueue::new(8));
        let mut handles = Vec::new();
        for _ in 0..3 {
            let q = Arc::clone(&q);
            handles.push(thread::spawn(move || q.pop()));
        }
        thread::sleep(std::time::Duration::from_millis(20));
        q.close();
        for h in handles {
            assert_eq!(h.join().unwrap(), None);
        }
    }
}
