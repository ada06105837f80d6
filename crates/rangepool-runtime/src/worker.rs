//! Worker thread management
//!
//! Workers are persistent OS threads spawned once per execution context.
//! Each runs an identical loop: pop a task slot from the job queue, run the
//! kernel over the task's sub-range, signal the task's completion barrier,
//! repeat. A `None` pop means the queue closed permanently and the worker
//! exits. Workers only ever block on the queue, never on each other.

use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use rangepool_core::{rp_debug, rp_warn};
use rangepool_core::{DispatchError, DispatchResult, JobQueue};

use crate::recycle::{SlotPool, TaskSlot};

/// Status reported for a kernel that panicked instead of returning.
/// The barrier is signalled regardless, so the caller never deadlocks.
const PANICKED_STATUS: i32 = i32::MIN;

/// Fixed pool of worker threads draining one job queue.
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
    num_workers: usize,
}

impl WorkerPool {
    /// Spawn `num_workers` named threads draining `queue`.
    ///
    /// On spawn failure the queue is closed and already-spawned workers are
    /// joined before the error is returned - no partial pool survives.
    pub fn start(
        queue: Arc<JobQueue<Box<TaskSlot>>>,
        slots: Arc<SlotPool>,
        num_workers: usize,
    ) -> DispatchResult<Self> {
        let mut handles = Vec::with_capacity(num_workers);
        for worker_id in 0..num_workers {
            let queue_ref = Arc::clone(&queue);
            let slots_ref = Arc::clone(&slots);
            let spawned = thread::Builder::new()
                .name(format!("rangepool-worker-{}", worker_id))
                .spawn(move || worker_loop(queue_ref, slots_ref, worker_id));
            match spawned {
                Ok(handle) => handles.push(handle),
                Err(_) => {
                    queue.close();
                    for handle in handles {
                        let _ = handle.join();
                    }
                    return Err(DispatchError::SpawnFailed);
                }
            }
        }
        Ok(Self {
            handles,
            num_workers,
        })
    }

    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Wait for all workers to exit. Call after closing the queue.
    pub fn join(self) {
        for handle in self.handles {
            let _ = handle.join();
        }
    }
}

/// Worker thread main loop.
fn worker_loop(queue: Arc<JobQueue<Box<TaskSlot>>>, slots: Arc<SlotPool>, worker_id: usize) {
    rp_debug!("worker {} started", worker_id);
    while let Some(mut slot) = queue.pop() {
        let Some(task) = slot.task.take() else {
            debug_assert!(false, "empty task slot in queue");
            continue;
        };
        slots.release(slot);

        // A panicking kernel must not cross the worker boundary; it is
        // converted to a failure status and the barrier is still signalled.
        let status = match panic::catch_unwind(AssertUnwindSafe(|| task.run())) {
            Ok(status) => status,
            Err(_) => {
                rp_warn!("worker {}: kernel panicked, reporting failure", worker_id);
                PANICKED_STATUS
            }
        };
        task.complete(status);
    }
    rp_debug!("worker {} exiting, queue closed", worker_id);
}

#[cfg(test)]
mod tests {
    use super::*;
    use rangepool_core::{CompletionBarrier, Kernel, SubRange, Task};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn pool_fixture(num_workers: usize) -> (Arc<JobQueue<Box<TaskSlot>>>, Arc<SlotPool>, WorkerPool) {
        let queue = Arc::new(JobQueue::new(64));
        let slots = Arc::new(SlotPool::new(64));
        let pool = WorkerPool::start(Arc::clone(&queue), Arc::clone(&slots), num_workers).unwrap();
        (queue, slots, pool)
    }

    #[test]
    fn test_workers_drain_and_signal() {
        let (queue, slots, pool) = pool_fixture(2);
        let executed = Arc::new(AtomicUsize::new(0));

        let barrier = Arc::new(CompletionBarrier::new(4));
        for range in rangepool_core::partition(8, 4) {
            let executed = Arc::clone(&executed);
            let kernel: Arc<dyn Kernel> = Arc::new(move |_s: i64, _e: i64| {
                executed.fetch_add(1, Ordering::Relaxed);
                0
            });
            let task = Task::new(kernel, range, Arc::clone(&barrier));
            queue.push(slots.acquire(task)).unwrap();
        }

        assert_eq!(barrier.wait(), None);
        assert_eq!(executed.load(Ordering::Relaxed), 4);

        queue.close();
        pool.join();
    }

    #[test]
    fn test_workers_exit_on_close() {
        let (queue, _slots, pool) = pool_fixture(3);
        queue.close();
        pool.join();
    }

    #[test]
    fn test_panicking_kernel_still_signals() {
        let (queue, slots, pool) = pool_fixture(1);

        let barrier = Arc::new(CompletionBarrier::new(1));
        let kernel: Arc<dyn Kernel> = Arc::new(|_s: i64, _e: i64| -> i32 { panic!("boom") });
        let task = Task::new(kernel, SubRange { start: 0, end: 1 }, Arc::clone(&barrier));
        queue.push(slots.acquire(task)).unwrap();

        assert_eq!(barrier.wait(), Some(PANICKED_STATUS));

        queue.close();
        pool.join();
    }
}
