//! Pool configuration
//!
//! Compile-time defaults with runtime environment overrides, highest wins:
//!
//! 1. Builder methods (programmatic)
//! 2. Environment variables
//! 3. Library defaults
//!
//! The worker count is an explicit runtime value threaded through
//! [`ExecutionContext::new`](crate::ExecutionContext::new), never a
//! compile-time constant - tests run single-worker (fully serialized,
//! deterministic) and multi-worker pools without rebuilding.
//!
//! ```rust,ignore
//! use rangepool_runtime::PoolConfig;
//!
//! let config = PoolConfig::from_env().num_workers(8);
//! ```

use rangepool_core::env::{env_get, env_get_bool};

/// Library defaults, overridable via environment
pub mod defaults {
    /// Worker threads per execution context
    pub const NUM_WORKERS: usize = 4;
    /// Job queue backing capacity (pre-allocated, not a hard limit)
    pub const QUEUE_CAPACITY: usize = 256;
    /// Debug logging off by default
    pub const DEBUG_LOGGING: bool = false;
}

/// Execution context configuration with builder pattern.
#[derive(Debug, Clone)]
pub struct PoolConfig {
    /// Number of persistent worker threads (the parallelism degree P)
    pub num_workers: usize,
    /// Job queue backing capacity
    pub queue_capacity: usize,
    /// Force debug-level logging on context startup
    pub debug_logging: bool,
}

impl Default for PoolConfig {
    fn default() -> Self {
        Self::from_env()
    }
}

impl PoolConfig {
    /// Create config from library defaults with environment overrides.
    ///
    /// Environment variables (all optional):
    /// - `RP_NUM_WORKERS` - worker thread count
    /// - `RP_QUEUE_CAPACITY` - job queue backing capacity
    /// - `RP_DEBUG` - debug logging (0/1)
    pub fn from_env() -> Self {
        Self {
            num_workers: env_get("RP_NUM_WORKERS", defaults::NUM_WORKERS),
            queue_capacity: env_get("RP_QUEUE_CAPACITY", defaults::QUEUE_CAPACITY),
            debug_logging: env_get_bool("RP_DEBUG", defaults::DEBUG_LOGGING),
        }
    }

    /// Create config with library defaults only (no env override).
    /// Useful for testing or when you want full control.
    pub fn new() -> Self {
        Self {
            num_workers: defaults::NUM_WORKERS,
            queue_capacity: defaults::QUEUE_CAPACITY,
            debug_logging: defaults::DEBUG_LOGGING,
        }
    }

    // Builder methods

    pub fn num_workers(mut self, n: usize) -> Self {
        self.num_workers = n;
        self
    }

    pub fn queue_capacity(mut self, cap: usize) -> Self {
        self.queue_capacity = cap;
        self
    }

    pub fn debug_logging(mut self, enable: bool) -> Self {
        self.debug_logging = enable;
        self
    }

    /// Validate configuration and return errors if invalid.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.num_workers == 0 {
            return Err(ConfigError::InvalidValue("num_workers must be > 0"));
        }
        if self.num_workers > 256 {
            return Err(ConfigError::InvalidValue("num_workers must be <= 256"));
        }
        if self.queue_capacity < self.num_workers {
            return Err(ConfigError::InvalidValue(
                "queue_capacity must be >= num_workers",
            ));
        }
        Ok(())
    }
}

/// Configuration error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    InvalidValue(&'static str),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::InvalidValue(msg) => write!(f, "Invalid config: {}", msg),
        }
    }
}

impl std::error::Error for ConfigError {}

impl From<ConfigError> for rangepool_core::DispatchError {
    fn from(e: ConfigError) -> Self {
        match e {
            ConfigError::InvalidValue(msg) => rangepool_core::DispatchError::InvalidConfig(msg),
        }
    }
}
