//! Task descriptor - one queued unit of work
//!
//! Immutable after construction: a kernel, a half-open sub-range, and the
//! dispatch call's shared completion barrier. The dispatcher owns the
//! descriptor until it is pushed; the popping worker becomes sole owner,
//! runs the kernel, signals the barrier exactly once, and drops it.

use std::sync::Arc;

use crate::barrier::CompletionBarrier;
use crate::kernel::Kernel;
use crate::partition::SubRange;

pub struct Task {
    kernel: Arc<dyn Kernel>,
    range: SubRange,
    barrier: Arc<CompletionBarrier>,
}

impl Task {
    pub fn new(kernel: Arc<dyn Kernel>, range: SubRange, barrier: Arc<CompletionBarrier>) -> Self {
        Self {
            kernel,
            range,
            barrier,
        }
    }

    #[inline]
    pub fn range(&self) -> SubRange {
        self.range
    }

    /// Invoke the kernel over this task's sub-range.
    #[inline]
    pub fn run(&self) -> i32 {
        self.kernel.run(self.range.start, self.range.end)
    }

    /// Signal the dispatch call's barrier with the kernel status, consuming
    /// the descriptor. Exactly one call per task.
    pub fn complete(self, status: i32) {
        self.barrier.complete(status);
    }
}
