//! The work callable executed over each sub-range
//!
//! The dispatcher hands every worker a kernel plus a half-open index range.
//! Kernels are pure with respect to this layer: the dispatcher guarantees
//! that distinct workers receive disjoint ranges, and nothing more. If the
//! kernel writes into a shared argument block, keeping those accesses
//! disjoint is the kernel author's responsibility.

/// Status code convention: zero is success, anything else is a failure the
/// dispatcher aggregates (first error wins).
pub const KERNEL_OK: i32 = 0;

/// A numeric kernel invoked as `run(start, end)` over `[start, end)`.
///
/// Implemented by any `Fn(i64, i64) -> i32 + Send + Sync` closure, so the
/// caller's argument block is simply captured state - the type system
/// enforces the signature contract a raw function pointer cannot.
pub trait Kernel: Send + Sync {
    fn run(&self, start: i64, end: i64) -> i32;
}

impl<F> Kernel for F
where
    F: Fn(i64, i64) -> i32 + Send + Sync,
{
    #[inline]
    fn run(&self, start: i64, end: i64) -> i32 {
        self(start, end)
    }
}
