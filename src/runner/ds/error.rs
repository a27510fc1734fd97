use thiserror::Error;

/// Errors surfaced to the script engine's exception mechanism.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum JErrorType {
    #[error("Uncaught reference error: {0}.")]
    ReferenceError(String),
    #[error("Uncaught type error: {0}.")]
    TypeError(String),
    #[error("Uncaught range error: {0}.")]
    RangeError(String),
    /// A heap charge exceeded the configured budget.
    #[error("Out of memory")]
    OutOfMemory,
    /// A broken binding invariant, usually a malformed definition table.
    #[error("Internal error: {0}")]
    InternalError(String),
    /// The instance factory was handed a null or empty prototype.
    #[error("Invalid prototype handle")]
    InvalidPrototype,
}
