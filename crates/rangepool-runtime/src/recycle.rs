//! Task-slot recycling
//!
//! Every dispatch call submits one boxed descriptor per worker. Instead of
//! allocating a fresh box per task, emptied slots are returned to a
//! lock-free free list and reused by later dispatch calls, so steady-state
//! dispatch does not hit the allocator at all.

use crossbeam_queue::ArrayQueue;
use rangepool_core::Task;

/// A reusable box carrying one task descriptor through the job queue.
pub struct TaskSlot {
    pub task: Option<Task>,
}

/// Lock-free free list of emptied task slots, shared by the dispatcher
/// (acquire) and the workers (release).
pub struct SlotPool {
    free: ArrayQueue<Box<TaskSlot>>,
}

impl SlotPool {
    /// `capacity` bounds the free list, not the number of live slots; when
    /// the list is full a released slot is simply dropped.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: ArrayQueue::new(capacity),
        }
    }

    /// Take a recycled slot (or allocate one) and fill it with `task`.
    pub fn acquire(&self, task: Task) -> Box<TaskSlot> {
        match self.free.pop() {
            Some(mut slot) => {
                slot.task = Some(task);
                slot
            }
            None => Box::new(TaskSlot { task: Some(task) }),
        }
    }

    /// Return an emptied slot to the free list.
    pub fn release(&self, mut slot: Box<TaskSlot>) {
        slot.task = None;
        let _ = self.free.push(slot);
    }

    /// Number of slots currently on the free list.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangepool_core::{CompletionBarrier, Kernel, SubRange};
    use std::sync::Arc;

    fn dummy_task() -> Task {
        let kernel: Arc<dyn Kernel> = Arc::new(|_s: i64, _e: i64| 0);
        Task::new(
            kernel,
            SubRange { start: 0, end: 0 },
            Arc::new(CompletionBarrier::new(1)),
        )
    }

    #[test]
    fn test_acquire_release_reuses_slot() {
        let pool = SlotPool::new(4);
        assert_eq!(pool.free_count(), 0);

        let mut slot = pool.acquire(dummy_task());
        let task = slot.task.take().unwrap();
        task.complete(0);
        pool.release(slot);
        assert_eq!(pool.free_count(), 1);

        let slot = pool.acquire(dummy_task());
        assert_eq!(pool.free_count(), 0);
        assert!(slot.task.is_some());
    }

    #[test]
    fn test_full_free_list_drops_slot() {
        let pool = SlotPool::new(1);
        let mut a = pool.acquire(dummy_task());
        let mut b = pool.acquire(dummy_task());
        a.task.take().unwrap().complete(0);
        b.task.take().unwrap().complete(0);
        pool.release(a);
        pool.release(b);
        assert_eq!(pool.free_count(), 1);
    }
}
