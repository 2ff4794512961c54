//! View errors

use thiserror::Error;

/// Errors raised by view operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ViewError {
    /// The operation is not allowed in the view's current state
    #[error("Invalid state: {0}")]
    InvalidState(String),

    /// A detached view can't be attached to a container again
    #[error("View is detached and can't be added to {0}")]
    Detached(String),
}

/// Result alias for view operations
pub type ViewResult<T> = Result<T, ViewError>;
