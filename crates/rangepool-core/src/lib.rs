//! # rangepool-core
//!
//! Core types for the rangepool dispatcher. Platform-agnostic; the worker
//! pool and the dispatch entry point live in `rangepool-runtime`.
//!
//! ## Modules
//!
//! - `partition` - splitting `[0, iterations)` into per-worker sub-ranges
//! - `kernel` - the work callable trait
//! - `task` - task descriptor handed from dispatcher to worker
//! - `barrier` - per-dispatch completion barrier (countdown + condvar)
//! - `queue` - blocking job queue with a closed state
//! - `error` - error types
//! - `rplog` - leveled stderr logging macros
//! - `env` - environment variable utilities

pub mod barrier;
pub mod env;
pub mod error;
pub mod kernel;
pub mod partition;
pub mod queue;
pub mod rplog;
pub mod task;

// Re-exports for convenience
pub use barrier::CompletionBarrier;
pub use error::{DispatchError, DispatchResult};
pub use kernel::{Kernel, KERNEL_OK};
pub use partition::{partition, SubRange};
pub use queue::{JobQueue, PushError};
pub use task::Task;

pub use env::{env_get, env_get_bool, env_get_opt};
