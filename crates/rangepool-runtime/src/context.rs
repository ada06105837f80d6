//! Execution context and the dispatch entry point
//!
//! The context owns the job queue and the fixed worker pool and outlives
//! every dispatch call. [`ExecutionContext::schedule`] is the entry point
//! sequential kernel code calls to parallelize one iteration range: it
//! partitions `[0, iterations)` into one chunk per worker, enqueues the
//! descriptors, and blocks on the completion barrier until all of them have
//! finished.

use std::sync::Arc;

use rangepool_core::rplog::{self, LogLevel};
use rangepool_core::{partition, rp_debug, rp_trace};
use rangepool_core::{CompletionBarrier, DispatchError, DispatchResult, JobQueue, Kernel, Task};

use crate::config::PoolConfig;
use crate::recycle::{SlotPool, TaskSlot};
use crate::worker::WorkerPool;

/// Owns one job queue and one fixed pool of `P` persistent workers.
///
/// Dispatch calls are synchronous: `schedule` returns only after every
/// partition has been processed, so a kernel borrowing via `Arc` is never
/// still running when the caller moves on.
pub struct ExecutionContext {
    queue: Arc<JobQueue<Box<TaskSlot>>>,
    slots: Arc<SlotPool>,
    pool: Option<WorkerPool>,
    num_workers: usize,
}

impl std::fmt::Debug for ExecutionContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ExecutionContext")
            .field("num_workers", &self.num_workers)
            .finish_non_exhaustive()
    }
}

impl ExecutionContext {
    /// Validate `config` and spawn the worker pool.
    ///
    /// Any setup failure (bad config, thread spawn) is reported before a
    /// single task can be submitted.
    pub fn new(config: PoolConfig) -> DispatchResult<Self> {
        config.validate()?;
        rplog::init();
        if config.debug_logging {
            rplog::set_log_level(LogLevel::Debug);
        }

        let queue = Arc::new(JobQueue::new(config.queue_capacity));
        let slots = Arc::new(SlotPool::new(config.queue_capacity));
        let pool = WorkerPool::start(Arc::clone(&queue), Arc::clone(&slots), config.num_workers)?;

        rp_debug!("execution context up with {} workers", config.num_workers);
        Ok(Self {
            queue,
            slots,
            pool: Some(pool),
            num_workers: config.num_workers,
        })
    }

    /// Context with env-derived configuration.
    pub fn from_env() -> DispatchResult<Self> {
        Self::new(PoolConfig::from_env())
    }

    /// The fixed parallelism degree `P`.
    #[inline]
    pub fn num_workers(&self) -> usize {
        self.num_workers
    }

    /// Parallelize `kernel` over `[0, iterations)` and block until done.
    ///
    /// Convenience wrapper that wraps the kernel in an `Arc`; use
    /// [`schedule_arc`](Self::schedule_arc) to reuse one kernel across calls
    /// without re-wrapping.
    pub fn schedule<K>(&self, kernel: K, iterations: i64) -> DispatchResult<()>
    where
        K: Kernel + 'static,
    {
        self.schedule_arc(Arc::new(kernel), iterations)
    }

    /// Parallelize `kernel` over `[0, iterations)` and block until done.
    ///
    /// The range is split into one chunk per worker (last chunk absorbs the
    /// remainder); every chunk runs exactly once on some worker, chunks of
    /// one call never overlap, and the call returns only after all of them
    /// signalled the barrier. `iterations == 0` is a no-op that succeeds
    /// without touching the queue.
    ///
    /// A non-zero kernel status does not stop sibling chunks; the first one
    /// observed is returned as [`DispatchError::KernelFailure`] after the
    /// whole range has been processed.
    pub fn schedule_arc(&self, kernel: Arc<dyn Kernel>, iterations: i64) -> DispatchResult<()> {
        if iterations < 0 {
            return Err(DispatchError::NegativeIterations(iterations));
        }
        if iterations == 0 {
            return Ok(());
        }
        if self.queue.is_closed() {
            return Err(DispatchError::QueueClosed);
        }

        // One task per worker, all sharing this call's barrier. Empty ranges
        // are submitted too: the countdown starts at the full worker count.
        let barrier = Arc::new(CompletionBarrier::new(self.num_workers));
        let ranges = partition(iterations, self.num_workers);
        rp_trace!(
            "dispatch: {} iterations over {} tasks",
            iterations,
            ranges.len()
        );

        for range in ranges {
            let task = Task::new(Arc::clone(&kernel), range, Arc::clone(&barrier));
            if self.queue.push(self.slots.acquire(task)).is_err() {
                // Shutdown raced the dispatch. Already-queued siblings are
                // drained before the queue reports closed, so they still
                // signal the barrier; nobody is left waiting on it.
                return Err(DispatchError::QueueClosed);
            }
        }

        match barrier.wait() {
            None => Ok(()),
            Some(code) => Err(DispatchError::KernelFailure(code)),
        }
    }

    /// Close the queue and join all workers. Queued tasks are drained first.
    pub fn shutdown(&mut self) {
        self.queue.close();
        if let Some(pool) = self.pool.take() {
            pool.join();
            rp_debug!("execution context shut down");
        }
    }
}

impl Drop for ExecutionContext {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicI32, AtomicUsize, Ordering};
    use std::thread;

    fn context(workers: usize) -> ExecutionContext {
        ExecutionContext::new(PoolConfig::new().num_workers(workers)).unwrap()
    }

    /// Per-element visit counters: coverage means every counter is exactly 1.
    fn visit_counters(n: usize) -> Arc<Vec<AtomicUsize>> {
        Arc::new((0..n).map(|_| AtomicUsize::new(0)).collect())
    }

    fn counting_kernel(counters: &Arc<Vec<AtomicUsize>>) -> Arc<dyn Kernel> {
        let counters = Arc::clone(counters);
        Arc::new(move |start: i64, end: i64| -> i32 {
            for i in start..end {
                counters[i as usize].fetch_add(1, Ordering::Relaxed);
            }
            0
        })
    }

    fn assert_each_visited_once(counters: &[AtomicUsize]) {
        for (i, c) in counters.iter().enumerate() {
            assert_eq!(c.load(Ordering::Relaxed), 1, "element {} visit count", i);
        }
    }

    #[test]
    fn test_full_coverage_multi_worker() {
        let ctx = context(4);
        let counters = visit_counters(10);
        ctx.schedule_arc(counting_kernel(&counters), 10).unwrap();
        assert_each_visited_once(&counters);
    }

    #[test]
    fn test_single_worker_serializes() {
        let ctx = context(1);
        let counters = visit_counters(100);
        ctx.schedule_arc(counting_kernel(&counters), 100).unwrap();
        assert_each_visited_once(&counters);
    }

    #[test]
    fn test_zero_iterations_is_noop() {
        let ctx = context(4);
        let called = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&called);
        ctx.schedule(
            move |_s: i64, _e: i64| -> i32 {
                c.fetch_add(1, Ordering::Relaxed);
                0
            },
            0,
        )
        .unwrap();
        assert_eq!(called.load(Ordering::Relaxed), 0);
        assert!(ctx.queue.is_empty());
    }

    #[test]
    fn test_fewer_iterations_than_workers() {
        // 3 iterations on 4 workers: empty ranges still signal the barrier
        let ctx = context(4);
        let counters = visit_counters(3);
        ctx.schedule_arc(counting_kernel(&counters), 3).unwrap();
        assert_each_visited_once(&counters);
    }

    #[test]
    fn test_negative_iterations_rejected() {
        let ctx = context(2);
        let err = ctx.schedule(|_s: i64, _e: i64| 0, -1).unwrap_err();
        assert_eq!(err, DispatchError::NegativeIterations(-1));
    }

    #[test]
    fn test_repeated_dispatch_no_state_leak() {
        let ctx = context(4);
        // Same context, many calls; each call's barrier is fresh
        for _ in 0..50 {
            let counters = visit_counters(17);
            ctx.schedule_arc(counting_kernel(&counters), 17).unwrap();
            assert_each_visited_once(&counters);
        }
    }

    #[test]
    fn test_kernel_failure_surfaces() {
        let ctx = context(4);
        let err = ctx
            .schedule(|start: i64, end: i64| if start == end { 0 } else { 13 }, 8)
            .unwrap_err();
        assert_eq!(err, DispatchError::KernelFailure(13));
    }

    #[test]
    fn test_failure_does_not_halt_siblings() {
        let ctx = context(4);
        let counters = visit_counters(12);
        let inner = counting_kernel(&counters);
        let kernel: Arc<dyn Kernel> = Arc::new(move |start: i64, end: i64| -> i32 {
            inner.run(start, end);
            if start == 0 {
                7
            } else {
                0
            }
        });
        let err = ctx.schedule_arc(kernel, 12).unwrap_err();
        assert_eq!(err, DispatchError::KernelFailure(7));
        // Every element was still processed despite the failing chunk
        assert_each_visited_once(&counters);
    }

    #[test]
    fn test_concurrent_callers_isolated_barriers() {
        // Many caller threads against one pool: call N's barrier must never
        // be signalled by call M's tasks. Coverage per call proves it.
        let ctx = Arc::new(context(4));
        let mut handles = Vec::new();
        for t in 0..8 {
            let ctx = Arc::clone(&ctx);
            handles.push(thread::spawn(move || {
                for _ in 0..20 {
                    let n = 5 + t * 3;
                    let counters = visit_counters(n);
                    ctx.schedule_arc(counting_kernel(&counters), n as i64)
                        .unwrap();
                    assert_each_visited_once(&counters);
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }
    }

    #[test]
    fn test_schedule_after_shutdown_refused() {
        let mut ctx = context(2);
        ctx.shutdown();
        let err = ctx.schedule(|_s: i64, _e: i64| 0, 4).unwrap_err();
        assert_eq!(err, DispatchError::QueueClosed);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = ExecutionContext::new(PoolConfig::new().num_workers(0)).unwrap_err();
        assert!(matches!(err, DispatchError::InvalidConfig(_)));
    }

    #[test]
    fn test_disjoint_writes_through_shared_block() {
        // The classic segmented map: each worker writes only its own range
        // of a shared output block.
        let ctx = context(4);
        let out: Arc<Vec<AtomicI32>> = Arc::new((0..100).map(|_| AtomicI32::new(0)).collect());
        let out_ref = Arc::clone(&out);
        ctx.schedule(
            move |start: i64, end: i64| -> i32 {
                for i in start..end {
                    out_ref[i as usize].store(i as i32 * 2, Ordering::Relaxed);
                }
                0
            },
            100,
        )
        .unwrap();
        for (i, v) in out.iter().enumerate() {
            assert_eq!(v.load(Ordering::Relaxed), i as i32 * 2);
        }
    }
}
