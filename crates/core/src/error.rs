//! Domain error model.

use thiserror::Error;

/// Result type used across the domain layer.
pub type DomainResult<T> = Result<T, DomainError>;

/// Domain-level error.
///
/// Every variant is a per-request failure: the store is left untouched and the
/// HTTP layer maps the variant to a status code.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A value failed validation (empty cart, blank name, bad quantity...).
    #[error("validation failed: {0}")]
    Validation(String),

    /// An order line asks for more units than are on the shelf.
    #[error("insufficient stock for {item} (requested {requested}, available {available})")]
    InsufficientStock {
        item: String,
        requested: u64,
        available: u64,
    },

    /// An identifier was invalid (e.g. parse failure).
    #[error("invalid identifier: {0}")]
    InvalidId(String),

    /// A requested record does not exist.
    #[error("{0} not found")]
    NotFound(String),

    /// A derived quantity or amount no longer fits its numeric type.
    #[error("{0} overflows")]
    Overflow(String),
}

impl DomainError {
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn insufficient_stock(item: impl Into<String>, requested: u64, available: u64) -> Self {
        Self::InsufficientStock {
            item: item.into(),
            requested,
            available,
        }
    }

    pub fn invalid_id(msg: impl Into<String>) -> Self {
        Self::InvalidId(msg.into())
    }

    pub fn not_found(what: impl Into<String>) -> Self {
        Self::NotFound(what.into())
    }

    pub fn overflow(what: impl Into<String>) -> Self {
        Self::Overflow(what.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn insufficient_stock_message_names_the_item() {
        let err = DomainError::insufficient_stock("Paracetamol", 12, 3);
        assert_eq!(
            err.to_string(),
            "insufficient stock for Paracetamol (requested 12, available 3)"
        );
    }

    #[test]
    fn not_found_message_includes_subject() {
        assert_eq!(DomainError::not_found("sale 4").to_string(), "sale 4 not found");
    }

    #[test]
    fn overflow_message_names_the_total() {
        assert_eq!(DomainError::overflow("total stock").to_string(), "total stock overflows");
    }
}
