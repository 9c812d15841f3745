//! Common error infrastructure for attribute-core.
//!
//! Most attribute operations never fail: a missing ledger or an unresolved
//! registry id is an expected absence and degrades to a no-op. The errors here
//! cover the few fallible surfaces (strict ledger lookups, state decoding).
//!
//! # Design Principles
//!
//! - **Type Safety**: Each surface has its own error enum with specific variants
//! - **Severity Classification**: Errors are categorized for handling strategies
//! - **Stable Codes**: Every variant exposes a static code for logs and tests

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Validation error - invalid input, should not retry without changes.
    ///
    /// Examples: strict lookup of an attribute the ledger does not hold
    Validation,

    /// Internal error - unexpected state inconsistency.
    ///
    /// Examples: a replication payload that fails to decode
    Internal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Internal => "internal",
        }
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal)
    }
}

/// Common trait for all attribute-core errors.
///
/// # Implementation Guidelines
///
/// - All error enums should implement this trait
/// - Use `#[derive(thiserror::Error)]` for Display/Error impl
/// - Classify severity based on recoverability, not impact
pub trait AttributeError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Errors raised by strict ledger access.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LedgerError {
    /// The ledger has no entry for the requested attribute.
    #[error("attribute '{0}' not present in ledger")]
    KeyNotFound(String),
}

impl AttributeError for LedgerError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::KeyNotFound(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::KeyNotFound(_) => "LEDGER_KEY_NOT_FOUND",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ledger_error_classification() {
        let err = LedgerError::KeyNotFound("Strength".into());
        assert_eq!(err.severity(), ErrorSeverity::Validation);
        assert_eq!(err.error_code(), "LEDGER_KEY_NOT_FOUND");
        assert_eq!(err.to_string(), "attribute 'Strength' not present in ledger");
        assert!(!err.severity().is_internal());
    }
}
