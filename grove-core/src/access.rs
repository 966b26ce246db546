//! Accessor outcomes.
//!
//! Every node, list, and named-list accessor returns an [`AccessResult`].
//! Success is `Ok(value)`; the three non-values are the variants of
//! [`Access`]. Because these are ordinary `Result`s, accessors compose
//! with `?`: a chain of navigations stops at the first null, not-in-class
//! or timeout and reports it unchanged.

use thiserror::Error;

/// Why an accessor produced no value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum Access {
    /// The property exists for this class but has no value on this node.
    #[error("property has no value")]
    Null,
    /// The property is not part of this node's class.
    #[error("property is not defined for this class")]
    NotInClass,
    /// The value may exist once the grove grows further.
    #[error("grove is still growing")]
    Timeout,
}

/// Result of a grove accessor.
pub type AccessResult<T> = Result<T, Access>;

/// Treat an absent value as [`Access::Null`].
#[inline]
pub(crate) fn or_null<T>(value: Option<T>) -> AccessResult<T> {
    value.ok_or(Access::Null)
}
