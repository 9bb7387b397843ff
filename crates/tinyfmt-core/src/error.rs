//! Abort reasons for the format interpreter.
//!
//! The public [`format`](crate::format) entry point never surfaces these:
//! malformed input just stops output where it is. [`try_format`](crate::try_format)
//! hands the reason back for callers (tests, the harness) that want it.

use thiserror::Error;

/// Why formatting stopped before the end of the format string.
///
/// `offset` is the byte index of the `%` that opened the failing directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum FormatError {
    #[error("format string ended inside the directive at byte {offset}")]
    UnexpectedEnd { offset: usize },
    #[error("unknown conversion {conversion:?} in the directive at byte {offset}")]
    UnknownConversion { conversion: char, offset: usize },
    #[error("no argument left for the directive at byte {offset}")]
    MissingArgument { offset: usize },
    #[error("the directive at byte {offset} expected {expected} argument")]
    ArgumentMismatch {
        expected: &'static str,
        offset: usize,
    },
}

impl FormatError {
    /// Byte offset of the directive that aborted.
    #[must_use]
    pub const fn offset(&self) -> usize {
        match *self {
            Self::UnexpectedEnd { offset }
            | Self::UnknownConversion { offset, .. }
            | Self::MissingArgument { offset }
            | Self::ArgumentMismatch { offset, .. } => offset,
        }
    }

    /// Re-anchor the error at the directive starting at `offset`.
    #[must_use]
    pub(crate) const fn at(self, offset: usize) -> Self {
        match self {
            Self::UnexpectedEnd { .. } => Self::UnexpectedEnd { offset },
            Self::UnknownConversion { conversion, .. } => Self::UnknownConversion { conversion, offset },
            Self::MissingArgument { .. } => Self::MissingArgument { offset },
            Self::ArgumentMismatch { expected, .. } => Self::ArgumentMismatch { expected, offset },
        }
    }
}
