//! Error types for dispatch operations

use core::fmt;

/// Result type for dispatch operations
pub type DispatchResult<T> = Result<T, DispatchError>;

/// Errors that can occur while setting up or running a dispatch call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchError {
    /// Iteration count was negative
    NegativeIterations(i64),

    /// Job queue is closed - the execution context was shut down
    QueueClosed,

    /// Failed to spawn a worker thread
    SpawnFailed,

    /// Configuration rejected by validation
    InvalidConfig(&'static str),

    /// A kernel invocation returned a non-zero status (first error wins)
    KernelFailure(i32),
}

impl fmt::Display for DispatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DispatchError::NegativeIterations(n) => {
                write!(f, "negative iteration count: {}", n)
            }
            DispatchError::QueueClosed => write!(f, "job queue closed"),
            DispatchError::SpawnFailed => write!(f, "failed to spawn worker thread"),
            DispatchError::InvalidConfig(msg) => write!(f, "invalid config: {}", msg),
            DispatchError::KernelFailure(code) => {
                write!(f, "kernel reported failure status {}", code)
            }
        }
    }
}

impl std::error::Error for DispatchError {}
