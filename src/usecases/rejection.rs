//! Coded failures.
//!
//! Fallible reducers need a structured error that survives the trip through
//! the drivers unchanged. [`RejectedError`] carries a numeric code, a
//! message, and an optional serializable payload; [`on_reject`] taps a
//! result without consuming it.

use serde::Serialize;
use thiserror::Error;

/// Default rejection code used by [`reject_msg`].
pub const REJECTION_CODE: i32 = 500;

/// A coded failure with an optional payload.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize)]
#[error("[{code}] {msg}")]
pub struct RejectedError<D = serde_json::Value> {
    /// Numeric rejection code.
    pub code: i32,
    /// Human-readable message.
    pub msg: String,
    /// Structured payload, if any.
    pub data: Option<D>,
}

impl<D: Serialize> RejectedError<D> {
    /// JSON rendition of the whole error, payload included.
    pub fn content(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| format!("[{}] {}", self.code, self.msg))
    }
}

/// Builds a rejection with a payload.
pub fn reject<D>(code: i32, msg: impl Into<String>, data: D) -> RejectedError<D> {
    RejectedError {
        code,
        msg: msg.into(),
        data: Some(data),
    }
}

/// Builds a payload-free rejection from a code.
pub fn reject_code(code: i32) -> RejectedError {
    RejectedError {
        code,
        msg: String::new(),
        data: None,
    }
}

/// Builds a message-free rejection from a payload, with
/// [`REJECTION_CODE`].
pub fn reject_data<D>(data: D) -> RejectedError<D> {
    RejectedError {
        code: REJECTION_CODE,
        msg: String::new(),
        data: Some(data),
    }
}

/// Builds a payload-free rejection from a message, with
/// [`REJECTION_CODE`].
pub fn reject_msg(msg: impl Into<String>) -> RejectedError {
    RejectedError {
        code: REJECTION_CODE,
        msg: msg.into(),
        data: None,
    }
}

/// Taps a rejected result without consuming it.
pub fn on_reject<T, D>(
    result: Result<T, RejectedError<D>>,
    handler: impl FnOnce(&RejectedError<D>),
) -> Result<T, RejectedError<D>> {
    if let Err(error) = &result {
        handler(error);
    }
    result
}
