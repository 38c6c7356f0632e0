//! Cross-context error classification.
//!
//! Every service error in the crate maps onto one of four kinds so callers
//! (and the excluded HTTP layer) can tell user-actionable outcomes apart from
//! operational failures without matching on each context's enum.

use std::fmt;

/// Classification shared by all service-level errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or missing input. Never reaches the store.
    Validation,
    /// A referenced task, offer, chat, or profile does not exist.
    NotFound,
    /// A business rule rejected the operation.
    Conflict,
    /// The underlying store failed.
    Store,
}

impl ErrorKind {
    /// Returns a stable lower-case label for logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::Store => "store",
        }
    }

    /// Returns `true` for outcomes caused by the caller rather than the
    /// system.
    #[must_use]
    pub const fn is_expected(self) -> bool {
        !matches!(self, Self::Store)
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can be classified into an [`ErrorKind`].
pub trait Classify {
    /// Returns the classification of this error.
    fn kind(&self) -> ErrorKind;
}

/// Records a failed operation at a level matching its kind.
pub(crate) fn trace_failure<E>(operation: &'static str, err: &E)
where
    E: Classify + fmt::Display,
{
    let kind = err.kind();
    if kind.is_expected() {
        tracing::debug!(operation, kind = %kind, error = %err, "operation rejected");
    } else {
        tracing::error!(operation, kind = %kind, error = %err, "operation failed");
    }
}

#[cfg(test)]
mod tests {
    use super::ErrorKind;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorKind::Validation, true)]
    #[case(ErrorKind::NotFound, true)]
    #[case(ErrorKind::Conflict, true)]
    #[case(ErrorKind::Store, false)]
    fn only_store_failures_are_unexpected(#[case] kind: ErrorKind, #[case] expected: bool) {
        assert_eq!(kind.is_expected(), expected);
    }

    #[test]
    fn display_uses_storage_label() {
        assert_eq!(ErrorKind::NotFound.to_string(), "not_found");
    }
}
