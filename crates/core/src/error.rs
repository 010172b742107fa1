//! Error types reported by the backend adapters

use psl1ght_native::NativeError;

/// Error type for backend operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// Native thread creation failed
    #[error("Not enough resources to create thread")]
    ResourceExhausted,

    /// A backend descriptor could not be allocated
    #[error("Out of memory")]
    OutOfMemory,

    /// The operation is not supported by this backend
    #[error("That operation is not supported")]
    Unsupported,

    /// The operation exists but has no implementation on this backend
    #[error("{0} not implemented yet")]
    NotImplemented(&'static str),

    /// Video subsystem already initialized
    #[error("Video subsystem already initialized")]
    AlreadyInitialized,

    /// Video subsystem used before initialization
    #[error("Video subsystem not initialized")]
    NotInitialized,

    /// Requested video driver is not compiled in
    #[error("{0} not available")]
    UnknownDriver(String),

    /// No compiled-in video driver reported itself available
    #[error("No available video device")]
    NoDriverAvailable,

    /// A native call failed
    #[error("Native call failed: {0}")]
    Native(#[from] NativeError),
}

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;
