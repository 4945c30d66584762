use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("invalid device id {value:?}: {reason}")]
    InvalidDeviceId { value: String, reason: &'static str },
}
