//! # rangepool - fixed worker-pool range dispatcher
//!
//! Parallelizes one flat data-parallel operation (a segmented map over an
//! integer range) across a fixed pool of persistent worker threads. The
//! iteration range `[0, iterations)` is split into one chunk per worker,
//! each chunk travels through a shared job queue as an owned task
//! descriptor, and the calling thread blocks on a completion barrier until
//! every chunk has run.
//!
//! ## Quick Start
//!
//! ```ignore
//! use rangepool::{ExecutionContext, PoolConfig};
//! use std::sync::atomic::{AtomicI64, Ordering};
//! use std::sync::Arc;
//!
//! fn main() {
//!     let ctx = ExecutionContext::new(PoolConfig::from_env()).unwrap();
//!
//!     let sum = Arc::new(AtomicI64::new(0));
//!     let s = Arc::clone(&sum);
//!     ctx.schedule(
//!         move |start: i64, end: i64| -> i32 {
//!             let mut local = 0;
//!             for i in start..end {
//!                 local += i;
//!             }
//!             s.fetch_add(local, Ordering::Relaxed);
//!             0
//!         },
//!         1_000_000,
//!     )
//!     .unwrap();
//!
//!     println!("sum = {}", sum.load(Ordering::Relaxed));
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//!  caller ──schedule──► partition ──► Job Queue ──► Worker ─┐
//!     ▲                 (P chunks)        │    ╲─► Worker ─┤
//!     │                                   │    ╲─► Worker ─┤
//!     └───────── Completion Barrier ◄─────┴──────── ... ───┘
//!                 (countdown = P)
//! ```
//!
//! Chunks of one call are independent: no ordering between them, up to `P`
//! in true parallelism. The barrier's mutex/condvar pair gives the caller a
//! strict happens-before on all completions. Work-stealing, re-partitioning
//! and priorities are out of scope - one flat fan-out/fan-in per call.

// Re-export core types
pub use rangepool_core::{
    partition, CompletionBarrier, DispatchError, DispatchResult, JobQueue, Kernel, SubRange, Task,
    KERNEL_OK,
};

// Re-export logging macros and controls
pub use rangepool_core::{rp_debug, rp_error, rp_info, rp_trace, rp_warn};
pub use rangepool_core::rplog::{init as init_logging, set_flush_enabled, set_log_level, LogLevel};

// Re-export env utilities
pub use rangepool_core::{env_get, env_get_bool, env_get_opt};

// Re-export runtime types
pub use rangepool_runtime::{ConfigError, ExecutionContext, PoolConfig};
