use crate::Payload;
use thiserror::Error;

/// Represents the ways a recorded dispatch sequence can diverge from the
/// expected one.
///
/// Every mismatch is raised at the offending dispatch call and fails the
/// surrounding test; none of them is recovered or retried.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SequenceError {
    /// The dispatch call's name differs from the next expected event's name.
    #[error("dispatch #{index}: expected `{expected}`, got `{actual}`")]
    OrderMismatch {
        index: usize,
        expected: String,
        actual: String,
    },

    /// The dispatch call supplied a payload that does not structurally equal
    /// the expected event's payload.
    #[error("dispatch #{index} (`{name}`): payload mismatch, expected {expected:?}, got {actual:?}")]
    PayloadMismatch {
        index: usize,
        name: String,
        expected: Option<Payload>,
        actual: Payload,
    },

    /// A dispatch call arrived after every expected event had already been
    /// observed.
    #[error("unexpected dispatch #{index} (`{name}`): only {expected_len} dispatch(es) were expected")]
    UnexpectedExtraDispatch {
        index: usize,
        name: String,
        expected_len: usize,
    },
}

impl SequenceError {
    /// Returns true if this error is a name-order mismatch.
    pub fn is_order_mismatch(&self) -> bool {
        matches!(self, SequenceError::OrderMismatch { .. })
    }

    /// Returns true if this error is a payload mismatch.
    pub fn is_payload_mismatch(&self) -> bool {
        matches!(self, SequenceError::PayloadMismatch { .. })
    }

    /// Returns true if this error reports a dispatch beyond the expected count.
    pub fn is_unexpected_extra(&self) -> bool {
        matches!(self, SequenceError::UnexpectedExtraDispatch { .. })
    }
}
