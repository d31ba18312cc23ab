//! Error types shared by every codec flavor in this crate.

use smartstring::{LazyCompact, SmartString};
use thiserror::Error;

pub(crate) type FieldName = SmartString<LazyCompact>;

/// Result type alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// The six error kinds the codec surface can raise.
///
/// Every variant carries the offending field's name, the relevant size or
/// value, and the buffer offset at which the failure was detected, per the
/// error surface contract: errors are not rolled back, and the caller decides
/// whether to retry or discard the buffer.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    /// The buffer did not have enough bytes to complete a read or write.
    #[error("overflow on field {field}: needed {needed} bytes, {available} available at offset {offset}")]
    Overflow {
        /// Field that triggered the overflow.
        field: FieldName,
        /// Bytes required to complete the operation.
        needed: usize,
        /// Bytes actually available.
        available: usize,
        /// Buffer offset at the time of failure.
        offset: usize,
    },

    /// A decoded or assigned value did not satisfy a constraint.
    #[error("invalid value for field {field} at offset {offset}: {reason}")]
    InvalidValue {
        /// Field whose value was rejected.
        field: FieldName,
        /// Human-readable reason.
        reason: FieldName,
        /// Buffer offset at the time of failure.
        offset: usize,
    },

    /// A decoded tag did not match any known alternative or case.
    #[error("unknown tag {tag:#x} for field {field} at offset {offset}")]
    UnknownTag {
        /// Name of the container that performed the dispatch.
        field: FieldName,
        /// The tag value that failed to match.
        tag: u64,
        /// Buffer offset at the time of failure.
        offset: usize,
    },

    /// A mandatory field was absent at encode time, or a multi-field's count
    /// fell below its declared minimum at decode time.
    #[error("missing mandatory field {field} (have {have}, need at least {min})")]
    MissingIe {
        /// Field that is missing or under-populated.
        field: FieldName,
        /// Elements actually present.
        have: usize,
        /// Minimum arity required.
        min: usize,
    },

    /// A multi-field's count exceeded its declared maximum, or a
    /// single-instance set field appeared twice on the wire.
    #[error("extra instance of field {field} (have {have}, max {max})")]
    ExtraIe {
        /// Field that received too many instances.
        field: FieldName,
        /// Elements present after the rejected append.
        have: usize,
        /// Maximum arity allowed.
        max: usize,
    },

    /// The allocator could not satisfy a multi-field overflow request.
    #[error("out of memory growing field {field}: requested {size} bytes")]
    OutOfMemory {
        /// Field whose overflow push failed.
        field: FieldName,
        /// Size in bytes of the element that could not be allocated.
        size: usize,
    },
}

impl Error {
    /// Returns the buffer offset recorded in this error, if any.
    ///
    /// `MissingIe`/`ExtraIe`/`OutOfMemory` are arity/allocator failures that
    /// are not pinned to a single buffer offset.
    pub fn offset(&self) -> Option<usize> {
        match self {
            Error::Overflow { offset, .. }
            | Error::InvalidValue { offset, .. }
            | Error::UnknownTag { offset, .. } => Some(*offset),
            Error::MissingIe { .. } | Error::ExtraIe { .. } | Error::OutOfMemory { .. } => None,
        }
    }
}

/// Extension trait for attaching the enclosing field's identity to an error
/// bubbling up from a nested decode or encode call.
pub trait ErrorContext<T> {
    /// Rewrites the field name carried by the error to `name`, leaving the
    /// error kind and other fields untouched. Used by container engines so a
    /// nested IE's failure is reported under the name the schema gave it.
    fn field_context(self, name: impl Into<FieldName>) -> Result<T>;
}

impl<T> ErrorContext<T> for Result<T> {
    fn field_context(self, name: impl Into<FieldName>) -> Result<T> {
        self.map_err(|err| {
            let name = name.into();
            match err {
                Error::Overflow { needed, available, offset, .. } => {
                    Error::Overflow { field: name, needed, available, offset }
                }
                Error::InvalidValue { reason, offset, .. } => {
                    Error::InvalidValue { field: name, reason, offset }
                }
                Error::UnknownTag { tag, offset, .. } => {
                    Error::UnknownTag { field: name, tag, offset }
                }
                Error::MissingIe { have, min, .. } => Error::MissingIe { field: name, have, min },
                Error::ExtraIe { have, max, .. } => Error::ExtraIe { field: name, have, max },
                Error::OutOfMemory { size, .. } => Error::OutOfMemory { field: name, size },
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overflow_display() {
        let err = Error::Overflow {
            field: "tag".into(),
            needed: 4,
            available: 1,
            offset: 10,
        };
        assert_eq!(
            err.to_string(),
            "overflow on field tag: needed 4 bytes, 1 available at offset 10"
        );
        assert_eq!(err.offset(), Some(10));
    }

    #[test]
    fn field_context_rewrites_name_only() {
        let err: Result<()> = Err(Error::MissingIe {
            field: "".into(),
            have: 1,
            min: 2,
        });
        let err = err.field_context("count").unwrap_err();
        assert_eq!(
            err,
            Error::MissingIe {
                field: "count".into(),
                have: 1,
                min: 2
            }
        );
    }
}
