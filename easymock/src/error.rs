// vim: tw=80
//! Errors raised by the interception engine.

use thiserror::Error;

use crate::record::RecordId;

/// Shared `Result` alias for the crate.
pub type Result<T> = std::result::Result<T, MockError>;

/// Everything that can go wrong while configuring, dispatching to, or
/// verifying a mock.
///
/// Only [`MockError::VerificationFailed`] is an expected test failure.  The
/// other variants indicate a mistake in the test or in the code that
/// synthesized the mock object.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum MockError {
    /// A call count argument was out of range.
    #[error("invalid argument `{name}`: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A range matcher or range call count can't contain any value.
    #[error("invalid range: {reason}")]
    InvalidRange { reason: String },

    /// The signature was never declared to the interceptor.
    #[error("unknown operation {signature}")]
    UnknownOperation { signature: String },

    #[error("unknown call record {0}")]
    UnknownRecord(RecordId),

    /// The operation can't be intercepted, so it can be neither set up nor
    /// verified.
    #[error("operation {signature} is not overridable and cannot be set up or verified")]
    NonOverridableOperation { signature: String },

    /// The observed call count didn't satisfy the expected `Times`.
    #[error("{message}")]
    VerificationFailed { message: String },

    /// A strict mock was called with arguments that no setup accepts.
    #[error("{context}: no setup matches {call}{details}")]
    NoSetup {
        context: String,
        call: String,
        details: String,
    },

    #[error("{signature} takes {expected} argument(s) but {actual} matcher(s) were supplied")]
    ArityMismatch {
        signature: String,
        expected: usize,
        actual: usize,
    },

    #[error("matcher #{index} of {signature} applies to `{matcher}` but the parameter is `{parameter}`")]
    MatcherTypeMismatch {
        signature: String,
        index: usize,
        matcher: &'static str,
        parameter: &'static str,
    },
}

impl MockError {
    /// Was this error raised while constructing a `Times` or a matcher?
    pub fn is_configuration_error(&self) -> bool {
        matches!(self, MockError::InvalidArgument { .. }
                     | MockError::InvalidRange { .. })
    }

    /// Is this the ordinary "expected N calls but saw M" test failure?
    pub fn is_verification_failure(&self) -> bool {
        matches!(self, MockError::VerificationFailed { .. })
    }
}
