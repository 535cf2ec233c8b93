//! # Validation Module
//!
//! Business rule checks that run before a sale intent is formed.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Prompt parsing (input.rs)                                    │
//! │  └── Is it a number at all?                                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Quantity is positive                                              │
//! │  └── Quantity fits the stock seen at lookup                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (quantidade >= 0) on produtos                               │
//! │  ├── Guarded decrement inside the sale transaction                     │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::types::Product;
use crate::MAX_CARD_INSTALLMENTS;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
///
/// ```rust
/// use caixa_core::validation::validate_quantity;
///
/// assert!(validate_quantity(3).is_ok());
/// assert!(validate_quantity(0).is_err());
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    Ok(())
}

/// Checks a requested quantity against the stock observed at lookup time.
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  Produto 5: estoque 10                                                  │
/// │                                                                         │
/// │  Quantidade: 12                                                         │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_stock(product, 12) ← THIS FUNCTION                           │
/// │       │                                                                 │
/// │       ├── 12 > 10? → InsufficientStock, re-prompt                      │
/// │       │                                                                 │
/// │       └── OK → choose payment method                                   │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_stock(product: &Product, requested: i64) -> CoreResult<()> {
    if requested > product.quantity_on_hand {
        return Err(CoreError::InsufficientStock {
            product_id: product.id,
            available: product.quantity_on_hand,
            requested,
        });
    }

    Ok(())
}

/// Validates a card installment count.
///
/// ## Rules
/// - `0` means a single upfront payment
/// - `1..=7` are installment plans
/// - anything else is rejected
pub fn validate_installments(count: i64) -> CoreResult<()> {
    if !(0..=MAX_CARD_INSTALLMENTS).contains(&count) {
        return Err(CoreError::InvalidInstallmentCount {
            count,
            max: MAX_CARD_INSTALLMENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductId;

    fn product(stock: i64) -> Product {
        Product {
            id: ProductId(1),
            name: "Lápis".to_string(),
            quantity_on_hand: stock,
            unit_price_cents: 150,
        }
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
    }

    #[test]
    fn test_validate_stock() {
        assert!(validate_stock(&product(10), 10).is_ok());
        assert!(validate_stock(&product(10), 1).is_ok());
        assert!(validate_stock(&product(10), 11).is_err());
        assert!(validate_stock(&product(0), 1).is_err());
    }

    #[test]
    fn test_validate_installments() {
        for n in 0..=7 {
            assert!(validate_installments(n).is_ok(), "{n} should be accepted");
        }
        assert!(validate_installments(-1).is_err());
        assert!(validate_installments(8).is_err());
        assert!(validate_installments(100).is_err());
    }
}
