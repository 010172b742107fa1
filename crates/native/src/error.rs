//! Error types for native platform calls

/// Error type for native platform operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum NativeError {
    /// Native call returned a nonzero status
    #[error("{op} failed with status {code:#x}")]
    Status { op: &'static str, code: i32 },

    /// Operation is not available on this platform
    #[error("{0} is not supported on this platform")]
    Unsupported(&'static str),
}

impl NativeError {
    /// Build a status error from a native return code
    pub fn status(op: &'static str, code: i32) -> Self {
        Self::Status { op, code }
    }

    /// Native status code, if this error carries one
    pub fn code(&self) -> Option<i32> {
        match self {
            Self::Status { code, .. } => Some(*code),
            Self::Unsupported(_) => None,
        }
    }
}
