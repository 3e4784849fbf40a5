//! Error types for backend operations

/// Result type for backend operations
pub type Result<T> = std::result::Result<T, BackendError>;

/// Errors that can occur during backend execution
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// Invalid buffer handle
    #[error("invalid buffer handle: {0}")]
    InvalidBufferHandle(u64),

    /// Buffer access out of bounds
    #[error("buffer access out of bounds: offset {offset} + size {size} > buffer size {buffer_size}")]
    BufferOutOfBounds {
        offset: usize,
        size: usize,
        buffer_size: usize,
    },

    /// Invalid launch configuration
    #[error("invalid launch configuration: {0}")]
    InvalidLaunchConfig(String),

    /// Shared memory allocation failed
    #[error("shared memory allocation failed: requested {requested} bytes, available {available} bytes")]
    SharedMemoryAllocationFailed { requested: usize, available: usize },

    /// Execution error raised by a kernel
    #[error("execution error in kernel `{kernel}`: {message}")]
    ExecutionError { kernel: String, message: String },
}

impl BackendError {
    /// Create an invalid launch configuration error
    pub fn invalid_launch(msg: impl Into<String>) -> Self {
        Self::InvalidLaunchConfig(msg.into())
    }

    /// Create an execution error attributed to `kernel`
    pub fn execution(kernel: impl Into<String>, msg: impl Into<String>) -> Self {
        Self::ExecutionError {
            kernel: kernel.into(),
            message: msg.into(),
        }
    }
}
