//! # Error Types
//!
//! Domain-specific error types for caixa-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  caixa-core errors (this file)                                         │
//! │  ├── CoreError        - Business rule violations                       │
//! │  ├── ValidationError  - Value constraints (quantity, ...)              │
//! │  └── InputError       - Operator typed something unparsable            │
//! │                                                                         │
//! │  caixa-db errors (separate crate)                                      │
//! │  └── DbError          - Database and transaction failures              │
//! │                                                                         │
//! │  caixa-cli errors (app)                                                │
//! │  └── AppError         - Startup / terminal failures                    │
//! │                                                                         │
//! │  Every core error is recoverable: the session re-prompts.              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use thiserror::Error;

use crate::money::Money;
use crate::types::ProductId;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Product id is not in the catalog.
    #[error("Product not found: {0}")]
    ProductNotFound(ProductId),

    /// Insufficient stock to complete sale.
    ///
    /// ## User Workflow
    /// ```text
    /// Quantidade: 12
    ///      │
    ///      ▼
    /// Check stock: available=10
    ///      │
    ///      ▼
    /// InsufficientStock { product_id: 5, available: 10, requested: 12 }
    ///      │
    ///      ▼
    /// Operator is asked for the quantity again
    /// ```
    #[error("Insufficient stock for product {product_id}: available {available}, requested {requested}")]
    InsufficientStock {
        product_id: ProductId,
        available: i64,
        requested: i64,
    },

    /// Card installment count outside {0} ∪ [1, 7].
    #[error("Invalid installment count {count}: use 0 for upfront payment or 1 to {max}")]
    InvalidInstallmentCount { count: i64, max: i64 },

    /// The sale total does not fit the ledger's DECIMAL(10,2) columns.
    #[error("Sale total exceeds the maximum of {max}")]
    AmountTooLarge { max: Money },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Unparsable operator input (wraps InputError).
    #[error("Invalid input: {0}")]
    Input(#[from] InputError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Value constraint violations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },
}

// =============================================================================
// Input Error
// =============================================================================

/// Operator input that could not be turned into a value.
///
/// Produced by the pure parsers in [`crate::input`]; never fatal.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum InputError {
    /// Nothing was typed.
    #[error("{field} is required")]
    Empty { field: &'static str },

    /// Non-integer where an integer was expected.
    #[error("{field} must be a whole number, got '{value}'")]
    NotAnInteger { field: &'static str, value: String },

    /// Negative number where only zero or positive values make sense.
    #[error("{field} cannot be negative, got {value}")]
    NegativeValue { field: &'static str, value: i64 },

    /// Payment menu choice outside 1..=max.
    #[error("Choose a payment method between 1 and {max}")]
    InvalidMethodChoice { max: usize },

    /// Confirmation other than S/N.
    #[error("Answer S or N, got '{value}'")]
    InvalidConfirmation { value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
