//! # Domain Types
//!
//! Core domain types used throughout the Caixa terminal.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │      Sale       │   │  SaleLineItem   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  sale_id (FK)   │       │
//! │  │  name           │   │  method         │   │  product_id(FK) │       │
//! │  │  quantity       │   │  total          │   │  quantity       │       │
//! │  │  unit_price     │   │  recorded_at    │   │  unit_price     │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐                             │
//! │  │   SaleIntent    │   │ PaymentMethod   │                             │
//! │  │  ─────────────  │   │  ─────────────  │                             │
//! │  │  validated,     │   │  Cash           │                             │
//! │  │  not yet stored │   │  Card           │                             │
//! │  └─────────────────┘   │  InstantTransfer│                             │
//! │                        └─────────────────┘                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::validation::{validate_quantity, validate_stock};

// =============================================================================
// Identifiers
// =============================================================================

/// Catalog identifier of a product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct ProductId(pub i64);

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Identifier assigned by the database when a sale is inserted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(transparent))]
#[serde(transparent)]
pub struct SaleId(pub i64);

impl fmt::Display for SaleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product as the catalog reports it right now.
///
/// The catalog owns products; this crate only reads them. Stock is
/// mutated solely by a committed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct Product {
    pub id: ProductId,

    /// Display name shown in the stock table.
    pub name: String,

    /// Units currently on hand (never negative).
    pub quantity_on_hand: i64,

    /// Price of one unit in centavos.
    pub unit_price_cents: i64,
}

impl Product {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }
}

// =============================================================================
// Payment Method
// =============================================================================

/// How the customer pays.
///
/// A closed set: the calculator and the storage edge match on it
/// exhaustively. [`label`](Self::label) is both the menu text and the
/// text stored in `vendas.metodo_pagamento`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    /// Physical cash.
    Cash,
    /// Credit card, optionally split in installments.
    Card,
    /// Instant bank transfer (Pix).
    InstantTransfer,
}

impl PaymentMethod {
    /// Every method, in the order the operator menu lists them.
    pub const ALL: [PaymentMethod; 3] = [
        PaymentMethod::Cash,
        PaymentMethod::Card,
        PaymentMethod::InstantTransfer,
    ];

    /// Label shown in the operator menu and stored with each sale.
    pub fn label(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "Dinheiro",
            PaymentMethod::Card => "Cartão",
            PaymentMethod::InstantTransfer => "Pix",
        }
    }

    /// Inverse of [`label`](Self::label).
    pub fn from_label(label: &str) -> Option<PaymentMethod> {
        PaymentMethod::ALL
            .into_iter()
            .find(|method| method.label() == label)
    }

    /// Whether this method asks the operator for an installment count.
    pub fn takes_installments(&self) -> bool {
        matches!(self, PaymentMethod::Card)
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

// =============================================================================
// Sale Intent
// =============================================================================

/// A purchase the operator has put together but not yet recorded.
///
/// Constructing one validates the quantity against the stock observed at
/// lookup time, so an oversized request never reaches the database.
///
/// ## Example
/// ```rust
/// use caixa_core::{PaymentMethod, Product, ProductId, SaleIntent};
///
/// let product = Product {
///     id: ProductId(5),
///     name: "Caderno".to_string(),
///     quantity_on_hand: 10,
///     unit_price_cents: 1990,
/// };
///
/// let intent = SaleIntent::new(&product, 3, PaymentMethod::Cash).unwrap();
/// assert_eq!(intent.total().cents(), 5970);
///
/// assert!(SaleIntent::new(&product, 11, PaymentMethod::Cash).is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaleIntent {
    pub product_id: ProductId,
    pub quantity: i64,
    pub method: PaymentMethod,
    /// Unit price snapshot taken at lookup time.
    pub unit_price: Money,
}

impl SaleIntent {
    /// Validates a purchase of `quantity` units of `product`.
    ///
    /// ## Errors
    /// - `CoreError::Validation` - quantity is not positive
    /// - `CoreError::InsufficientStock` - quantity exceeds stock on hand
    /// - `CoreError::AmountTooLarge` - the total does not fit the ledger
    pub fn new(product: &Product, quantity: i64, method: PaymentMethod) -> CoreResult<Self> {
        validate_quantity(quantity)?;
        validate_stock(product, quantity)?;

        let unit_price = product.unit_price();
        unit_price
            .checked_multiply_quantity(quantity)
            .filter(|total| total.cents() <= crate::MAX_STORED_CENTS)
            .ok_or(CoreError::AmountTooLarge {
                max: Money::from_cents(crate::MAX_STORED_CENTS),
            })?;

        Ok(SaleIntent {
            product_id: product.id,
            quantity,
            method,
            unit_price,
        })
    }

    /// Gross total: unit price × quantity, before any payment adjustment.
    #[inline]
    pub fn total(&self) -> Money {
        self.unit_price.multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Sale
// =============================================================================

/// A recorded sale (one row of `vendas`). Immutable once written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sale {
    pub id: SaleId,
    pub method: PaymentMethod,
    /// Gross total in centavos.
    pub total_cents: i64,
    /// Assigned by the database at insert time.
    pub recorded_at: NaiveDateTime,
}

impl Sale {
    /// Returns the total as Money.
    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }
}

// =============================================================================
// Sale Line Item
// =============================================================================

/// One product line of a sale (one row of `itens_venda`).
/// Uses snapshot pattern to freeze the unit price at time of sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct SaleLineItem {
    pub sale_id: SaleId,
    pub product_id: ProductId,
    pub quantity: i64,
    /// Unit price in centavos at time of sale (frozen).
    pub unit_price_cents: i64,
}

impl SaleLineItem {
    /// Returns the unit price as Money.
    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    /// Returns the line total (unit price × quantity).
    #[inline]
    pub fn line_total(&self) -> Money {
        self.unit_price().multiply_quantity(self.quantity)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
