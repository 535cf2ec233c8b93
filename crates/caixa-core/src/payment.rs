//! # Payment Calculator
//!
//! Turns the gross total of a purchase into the amount the customer owes
//! for the chosen payment method.
//!
//! ## Card Schedule
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Installments │ Adjustment        │ Amount due                          │
//! │  ─────────────┼───────────────────┼──────────────────────────────────── │
//! │  0            │ 20% discount      │ total × 0.8                         │
//! │  1 ..= 3      │ 20% interest      │ total × 1.2, shown as n × due/n     │
//! │  4 ..= 7      │ 40% interest      │ total × 1.4, shown as n × due/n     │
//! │  other        │ rejected          │ InvalidInstallmentCount             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Cash and Pix always pay the total as is.
//!
//! Nothing here is persisted; the quote is only shown to the operator.

use std::num::NonZeroU32;

use crate::error::{CoreResult, InputError};
use crate::money::Money;
use crate::types::PaymentMethod;
use crate::validation::validate_installments;

/// Discount for paying by card in one upfront payment (20%).
pub const CARD_UPFRONT_DISCOUNT_BPS: u32 = 2_000;

/// Interest for card plans of up to [`SHORT_PLAN_MAX_INSTALLMENTS`] (20%).
pub const SHORT_PLAN_SURCHARGE_BPS: u32 = 2_000;

/// Interest for longer card plans (40%).
pub const LONG_PLAN_SURCHARGE_BPS: u32 = 4_000;

/// Largest installment count charged the short-plan interest.
pub const SHORT_PLAN_MAX_INSTALLMENTS: u32 = 3;

// =============================================================================
// Payment Quote
// =============================================================================

/// What the customer owes, and how it was derived.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentQuote {
    /// Cash or instant transfer: the total, unchanged.
    Full { method: PaymentMethod, due: Money },

    /// Card in a single upfront payment, discounted.
    CardUpfront {
        total: Money,
        discount_bps: u32,
        due: Money,
    },

    /// Card split into installments, with interest.
    CardInstallments {
        total: Money,
        surcharge_bps: u32,
        due: Money,
        installments: NonZeroU32,
        per_installment: Money,
    },
}

impl PaymentQuote {
    /// The amount owed after discount or interest.
    pub fn due(&self) -> Money {
        match self {
            PaymentQuote::Full { due, .. }
            | PaymentQuote::CardUpfront { due, .. }
            | PaymentQuote::CardInstallments { due, .. } => *due,
        }
    }

    /// The payment method this quote was computed for.
    pub fn method(&self) -> PaymentMethod {
        match self {
            PaymentQuote::Full { method, .. } => *method,
            PaymentQuote::CardUpfront { .. } | PaymentQuote::CardInstallments { .. } => {
                PaymentMethod::Card
            }
        }
    }
}

// =============================================================================
// Calculator
// =============================================================================

/// Computes the amount due for `total` paid with `method`.
///
/// `installments` is only read for [`PaymentMethod::Card`], where it is
/// required.
///
/// ## Errors
/// - `CoreError::InvalidInstallmentCount` - card count outside {0} ∪ [1, 7]
/// - `CoreError::Input(InputError::Empty)` - card without an installment count
///
/// ## Example
/// ```rust
/// use caixa_core::money::Money;
/// use caixa_core::payment::compute_due;
/// use caixa_core::PaymentMethod;
///
/// let total = Money::from_cents(5970);
///
/// let cash = compute_due(total, PaymentMethod::Cash, None).unwrap();
/// assert_eq!(cash.due(), total);
///
/// let card = compute_due(total, PaymentMethod::Card, Some(3)).unwrap();
/// assert_eq!(card.due().cents(), 7164);
/// ```
pub fn compute_due(
    total: Money,
    method: PaymentMethod,
    installments: Option<i64>,
) -> CoreResult<PaymentQuote> {
    match method {
        PaymentMethod::Cash | PaymentMethod::InstantTransfer => Ok(PaymentQuote::Full {
            method,
            due: total,
        }),
        PaymentMethod::Card => {
            let count = installments.ok_or(InputError::Empty {
                field: "installments",
            })?;
            card_quote(total, count)
        }
    }
}

/// Applies the card schedule for `count` installments.
pub fn card_quote(total: Money, count: i64) -> CoreResult<PaymentQuote> {
    validate_installments(count)?;

    // validate_installments bounds count to 0..=7
    let Some(installments) = NonZeroU32::new(count as u32) else {
        return Ok(PaymentQuote::CardUpfront {
            total,
            discount_bps: CARD_UPFRONT_DISCOUNT_BPS,
            due: total.apply_percentage_discount(CARD_UPFRONT_DISCOUNT_BPS),
        });
    };

    let surcharge_bps = if installments.get() <= SHORT_PLAN_MAX_INSTALLMENTS {
        SHORT_PLAN_SURCHARGE_BPS
    } else {
        LONG_PLAN_SURCHARGE_BPS
    };
    let due = total.apply_percentage_surcharge(surcharge_bps);

    Ok(PaymentQuote::CardInstallments {
        total,
        surcharge_bps,
        due,
        installments,
        per_installment: due.per_installment(installments),
    })
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CoreError;

    const SAMPLE_TOTALS: [i64; 7] = [1, 99, 1990, 5970, 10_000, 123_457, 9_999_999_999];

    #[test]
    fn test_cash_and_pix_pass_through() {
        for cents in SAMPLE_TOTALS {
            let total = Money::from_cents(cents);
            for method in [PaymentMethod::Cash, PaymentMethod::InstantTransfer] {
                let quote = compute_due(total, method, None).unwrap();
                assert_eq!(quote.due(), total);
                assert_eq!(quote.method(), method);
            }
        }
    }

    #[test]
    fn test_cash_ignores_installments() {
        let total = Money::from_cents(5970);
        let quote = compute_due(total, PaymentMethod::Cash, Some(99)).unwrap();
        assert_eq!(quote.due(), total);
    }

    #[test]
    fn test_card_upfront_is_twenty_percent_off() {
        for cents in SAMPLE_TOTALS {
            let total = Money::from_cents(cents);
            let quote = compute_due(total, PaymentMethod::Card, Some(0)).unwrap();
            assert_eq!(quote.due(), total.scale_bps(8_000));
            assert!(matches!(quote, PaymentQuote::CardUpfront { .. }));
        }
    }

    #[test]
    fn test_short_plans_charge_twenty_percent() {
        for cents in SAMPLE_TOTALS {
            let total = Money::from_cents(cents);
            for n in 1..=3 {
                let quote = compute_due(total, PaymentMethod::Card, Some(n)).unwrap();
                let due = total.scale_bps(12_000);
                assert_eq!(quote.due(), due);

                let PaymentQuote::CardInstallments {
                    per_installment,
                    installments,
                    surcharge_bps,
                    ..
                } = quote
                else {
                    panic!("expected an installment plan for n = {n}");
                };
                assert_eq!(surcharge_bps, SHORT_PLAN_SURCHARGE_BPS);
                assert_eq!(installments.get() as i64, n);
                // Within half a centavo of the exact split
                let diff = (per_installment.cents() * n - due.cents()).abs();
                assert!(diff * 2 <= n, "n = {n}, due = {due}, each = {per_installment}");
            }
        }
    }

    #[test]
    fn test_long_plans_charge_forty_percent() {
        for cents in SAMPLE_TOTALS {
            let total = Money::from_cents(cents);
            for n in 4..=7 {
                let quote = compute_due(total, PaymentMethod::Card, Some(n)).unwrap();
                let due = total.scale_bps(14_000);
                assert_eq!(quote.due(), due);

                let PaymentQuote::CardInstallments {
                    per_installment,
                    surcharge_bps,
                    ..
                } = quote
                else {
                    panic!("expected an installment plan for n = {n}");
                };
                assert_eq!(surcharge_bps, LONG_PLAN_SURCHARGE_BPS);
                let diff = (per_installment.cents() * n - due.cents()).abs();
                assert!(diff * 2 <= n);
            }
        }
    }

    #[test]
    fn test_out_of_range_installments_rejected() {
        let total = Money::from_cents(5970);
        for n in [-5, -1, 8, 12, i64::MAX, i64::MIN] {
            assert_eq!(
                compute_due(total, PaymentMethod::Card, Some(n)),
                Err(CoreError::InvalidInstallmentCount { count: n, max: 7 })
            );
        }
    }

    #[test]
    fn test_card_requires_installment_count() {
        let result = compute_due(Money::from_cents(100), PaymentMethod::Card, None);
        assert!(matches!(result, Err(CoreError::Input(InputError::Empty { .. }))));
    }

    #[test]
    fn test_scenario_notebook_purchase() {
        // 3 × R$19.90
        let total = Money::from_cents(5970);

        let upfront = card_quote(total, 0).unwrap();
        assert_eq!(upfront.due().to_string(), "R$47.76");

        let three = card_quote(total, 3).unwrap();
        assert_eq!(three.due().to_string(), "R$71.64");
        if let PaymentQuote::CardInstallments { per_installment, .. } = three {
            assert_eq!(per_installment.to_string(), "R$23.88");
        }

        let seven = card_quote(total, 7).unwrap();
        assert_eq!(seven.due().to_string(), "R$83.58");
        if let PaymentQuote::CardInstallments { per_installment, .. } = seven {
            assert_eq!(per_installment.to_string(), "R$11.94");
        }
    }
}
