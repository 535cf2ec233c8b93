//! # caixa-core: Pure Business Logic for the Caixa terminal
//!
//! Everything the point-of-sale session decides without touching the
//! database or the terminal lives here.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Caixa Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 caixa-cli (interactive session)                 │   │
//! │  │   Browsing ──► Quantity ──► Method ──► Confirm ──► Commit       │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ caixa-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │  payment  │  │   input   │  │   │
//! │  │   │  Product  │  │   Money   │  │ compute_  │  │  prompt   │  │   │
//! │  │   │   Sale    │  │  (cents)  │  │    due    │  │  parsers  │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO TERMINAL • PURE FUNCTIONS          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    caixa-db (Database Layer)                    │   │
//! │  │          SQLite schema, catalog lookup, sale transaction        │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Product, Sale, SaleLineItem, SaleIntent)
//! - [`money`] - Money type with integer arithmetic (no floating point!)
//! - [`payment`] - Amount due per payment method (discount / installments)
//! - [`input`] - Pure parsers for every operator prompt
//! - [`validation`] - Stock and quantity rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use caixa_core::money::Money;
//! use caixa_core::payment::compute_due;
//! use caixa_core::PaymentMethod;
//!
//! let total = Money::from_cents(5970); // R$59.70
//! let quote = compute_due(total, PaymentMethod::Card, Some(0)).unwrap();
//!
//! // Paying by card in a single upfront payment earns 20% off
//! assert_eq!(quote.due().cents(), 4776);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod input;
pub mod money;
pub mod payment;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, InputError};
pub use money::Money;
pub use payment::{compute_due, PaymentQuote};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Product id the operator types to leave the session.
pub const EXIT_PRODUCT_ID: i64 = 0;

/// Largest installment count a card purchase may be split into.
pub const MAX_CARD_INSTALLMENTS: i64 = 7;

/// Largest amount a DECIMAL(10,2) column can hold, in centavos.
pub const MAX_STORED_CENTS: i64 = 9_999_999_999;
