//! # Prompt Parsers
//!
//! One pure function per operator prompt. Each takes the raw line and
//! returns a typed value or an [`InputError`]; none of them read the
//! terminal, so the session loop stays a thin driver and every rule here
//! is testable without simulating stdin.
//!
//! ```text
//! "Digite o ID do produto"   ──► parse_product_id     ──► ProductSelection
//! "Quantidade"               ──► parse_quantity       ──► QuantityEntry
//! "Escolha o método"         ──► parse_method_choice  ──► PaymentMethod
//! "Quantas vezes ..."        ──► parse_installments   ──► i64
//! "Confirmar compra? (S/N)"  ──► parse_confirmation   ──► Confirmation
//! ```

use crate::error::InputError;
use crate::types::{PaymentMethod, ProductId};
use crate::EXIT_PRODUCT_ID;

/// What the operator asked for at the product prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductSelection {
    /// The exit sentinel (`0`).
    Exit,
    /// A product id to look up.
    Product(ProductId),
}

/// What the operator typed at the quantity prompt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityEntry {
    /// `0`: give up on this product.
    Abandon,
    /// A positive number of units.
    Units(i64),
}

/// Answer to the purchase confirmation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Confirmation {
    Yes,
    No,
}

fn parse_integer(raw: &str, field: &'static str) -> Result<i64, InputError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InputError::Empty { field });
    }

    trimmed.parse::<i64>().map_err(|_| InputError::NotAnInteger {
        field,
        value: trimmed.to_string(),
    })
}

/// Parses the product prompt.
///
/// Any integer other than the exit sentinel, negative ones included, is
/// left for the catalog to accept or reject.
///
/// ```rust
/// use caixa_core::input::{parse_product_id, ProductSelection};
/// use caixa_core::ProductId;
///
/// assert_eq!(parse_product_id(" 5 "), Ok(ProductSelection::Product(ProductId(5))));
/// assert_eq!(parse_product_id("0"), Ok(ProductSelection::Exit));
/// assert!(parse_product_id("cinco").is_err());
/// ```
pub fn parse_product_id(raw: &str) -> Result<ProductSelection, InputError> {
    match parse_integer(raw, "product id")? {
        EXIT_PRODUCT_ID => Ok(ProductSelection::Exit),
        id => Ok(ProductSelection::Product(ProductId(id))),
    }
}

/// Parses the quantity prompt. `0` abandons the current product.
pub fn parse_quantity(raw: &str) -> Result<QuantityEntry, InputError> {
    let quantity = parse_integer(raw, "quantity")?;

    match quantity {
        0 => Ok(QuantityEntry::Abandon),
        q if q < 0 => Err(InputError::NegativeValue {
            field: "quantity",
            value: q,
        }),
        q => Ok(QuantityEntry::Units(q)),
    }
}

/// Parses a 1-based choice from the payment method menu.
///
/// Anything that is not a listed position, numeric or not, is an
/// [`InputError::InvalidMethodChoice`].
pub fn parse_method_choice(raw: &str, methods: &[PaymentMethod]) -> Result<PaymentMethod, InputError> {
    let invalid = InputError::InvalidMethodChoice { max: methods.len() };

    let choice: usize = raw.trim().parse().map_err(|_| invalid.clone())?;

    choice
        .checked_sub(1)
        .and_then(|index| methods.get(index))
        .copied()
        .ok_or(invalid)
}

/// Parses the card installment prompt.
///
/// Only checks that a whole number was typed; the allowed range belongs to
/// the payment calculator.
pub fn parse_installments(raw: &str) -> Result<i64, InputError> {
    parse_integer(raw, "installments")
}

/// Parses the S/N confirmation, case-insensitively.
pub fn parse_confirmation(raw: &str) -> Result<Confirmation, InputError> {
    match raw.trim().to_uppercase().as_str() {
        "S" => Ok(Confirmation::Yes),
        "N" => Ok(Confirmation::No),
        other => Err(InputError::InvalidConfirmation {
            value: other.to_string(),
        }),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_product_id() {
        assert_eq!(parse_product_id("5"), Ok(ProductSelection::Product(ProductId(5))));
        assert_eq!(parse_product_id("  42\n"), Ok(ProductSelection::Product(ProductId(42))));
        assert_eq!(parse_product_id("0"), Ok(ProductSelection::Exit));
        assert_eq!(parse_product_id(""), Err(InputError::Empty { field: "product id" }));
        assert!(matches!(parse_product_id("5.5"), Err(InputError::NotAnInteger { .. })));
        assert_eq!(parse_product_id("-3"), Ok(ProductSelection::Product(ProductId(-3))));
    }

    #[test]
    fn test_parse_quantity() {
        assert_eq!(parse_quantity("3"), Ok(QuantityEntry::Units(3)));
        assert_eq!(parse_quantity("0"), Ok(QuantityEntry::Abandon));
        assert!(matches!(parse_quantity("-1"), Err(InputError::NegativeValue { .. })));
        assert!(matches!(parse_quantity("três"), Err(InputError::NotAnInteger { .. })));
    }

    #[test]
    fn test_parse_method_choice() {
        let methods = PaymentMethod::ALL;
        assert_eq!(parse_method_choice("1", &methods), Ok(PaymentMethod::Cash));
        assert_eq!(parse_method_choice("2", &methods), Ok(PaymentMethod::Card));
        assert_eq!(parse_method_choice(" 3 ", &methods), Ok(PaymentMethod::InstantTransfer));

        for bad in ["0", "4", "-1", "pix", ""] {
            assert_eq!(
                parse_method_choice(bad, &methods),
                Err(InputError::InvalidMethodChoice { max: 3 }),
                "input {bad:?}"
            );
        }
    }

    #[test]
    fn test_parse_installments() {
        assert_eq!(parse_installments("0"), Ok(0));
        assert_eq!(parse_installments("12"), Ok(12));
        assert_eq!(parse_installments("-2"), Ok(-2));
        assert!(matches!(parse_installments("duas"), Err(InputError::NotAnInteger { .. })));
    }

    #[test]
    fn test_parse_confirmation() {
        assert_eq!(parse_confirmation("S"), Ok(Confirmation::Yes));
        assert_eq!(parse_confirmation(" s \n"), Ok(Confirmation::Yes));
        assert_eq!(parse_confirmation("n"), Ok(Confirmation::No));
        assert!(parse_confirmation("sim").is_err());
        assert!(parse_confirmation("y").is_err());
        assert!(parse_confirmation("").is_err());
    }
}
