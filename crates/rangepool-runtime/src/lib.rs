//! # rangepool-runtime
//!
//! The execution context for the rangepool dispatcher: configuration, the
//! fixed worker pool, task-slot recycling, and the blocking `schedule`
//! entry point. Core types (task descriptor, barrier, queue, partitioning)
//! live in `rangepool-core`.

pub mod config;
pub mod context;
pub mod recycle;
pub mod worker;

pub use config::{ConfigError, PoolConfig};
pub use context::ExecutionContext;
pub use recycle::{SlotPool, TaskSlot};
pub use worker::WorkerPool;
