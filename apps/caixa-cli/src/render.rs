//! # Operator Text
//!
//! Everything the session prints, as plain strings. The session writes
//! them; nothing here touches the terminal.

use std::fmt::Write;

use caixa_core::payment::PaymentQuote;
use caixa_core::{CoreError, InputError, PaymentMethod, Product, SaleId};
use caixa_db::DbError;

const BANNER_RULE: &str = "=-";
const QUOTE_RULE: &str = "-=";

pub const PRODUCT_PROMPT: &str = "Digite o ID do produto (0 para sair): ";
pub const QUANTITY_PROMPT: &str = "Quantidade (0 para cancelar): ";
pub const METHOD_PROMPT: &str = "Escolha o método: ";
pub const INSTALLMENTS_PROMPT: &str = "Quantas vezes deseja parcelar a compra? (0 = à vista) ";
pub const CONFIRM_PROMPT: &str = "Confirmar compra? (S/N): ";

/// Welcome banner with the store name centered.
pub fn banner(store_name: &str) -> String {
    let rule = BANNER_RULE.repeat(30);
    format!("{rule}\n{:^55}\n{rule}\n", format!("Bem vindo a {store_name}!"))
}

/// Stock table shown at the top of every browsing cycle.
pub fn stock_table(products: &[Product]) -> String {
    let mut out = String::from("\nEstoque disponível:\n");

    if products.is_empty() {
        out.push_str("  (nenhum produto cadastrado)\n\n");
        return out;
    }

    let _ = writeln!(out, "{:>4}  {:<28} {:>6}  {:>12}", "ID", "Produto", "Qtd", "Preço");
    for product in products {
        let _ = writeln!(
            out,
            "{:>4}  {:<28} {:>6}  {:>12}",
            product.id.0,
            product.name,
            product.quantity_on_hand,
            product.unit_price().to_string()
        );
    }
    out.push('\n');
    out
}

/// Numbered payment method menu.
pub fn payment_menu(methods: &[PaymentMethod]) -> String {
    let mut out = String::from("\nMétodos de pagamento disponíveis:\n");
    for (position, method) in methods.iter().enumerate() {
        let _ = writeln!(out, "{} - {}", position + 1, method.label());
    }
    out
}

/// Amount due, as shown before the confirmation prompt.
pub fn quote(quote: &PaymentQuote, pix_key: Option<&str>) -> String {
    match quote {
        PaymentQuote::Full {
            method: PaymentMethod::InstantTransfer,
            due,
        } => format!(
            "\nChave pix: {}\nValor a pagar {due}\n\n",
            pix_key.unwrap_or("[ não configurada ]")
        ),
        PaymentQuote::Full { due, .. } => format!("\nValor a pagar {due}\n\n"),
        PaymentQuote::CardUpfront {
            discount_bps, due, ..
        } => card_box(&format!(
            "Valor a pagar com desconto de {}% {due}",
            percent(*discount_bps)
        )),
        PaymentQuote::CardInstallments {
            surcharge_bps,
            due,
            installments,
            per_installment,
            ..
        } => card_box(&format!(
            "Valor total com juros de {}%: {due}\nParcelado em {installments}x de {per_installment}",
            percent(*surcharge_bps)
        )),
    }
}

fn card_box(body: &str) -> String {
    let rule = QUOTE_RULE.repeat(20);
    format!("\n{rule}\n{body}\n{rule}\n\n")
}

fn percent(bps: u32) -> u32 {
    bps / 100
}

/// Message for an error the operator can fix by typing again.
pub fn core_error(err: &CoreError) -> String {
    match err {
        CoreError::ProductNotFound(_) => "ID inválido!".to_string(),
        CoreError::InsufficientStock { available, .. } => {
            format!("Quantidade indisponível! Em estoque: {available}")
        }
        CoreError::InvalidInstallmentCount { max, .. } => {
            format!("Valor inválido! Digite 0 para pagar à vista ou de 1 a {max} parcelas")
        }
        CoreError::AmountTooLarge { max } => {
            format!("Valor da compra acima do máximo permitido ({max})")
        }
        CoreError::Validation(_) => "Quantidade inválida!".to_string(),
        CoreError::Input(input) => input_error(input),
    }
}

/// Message for unparsable operator input.
pub fn input_error(err: &InputError) -> String {
    match err {
        InputError::Empty { .. }
        | InputError::NotAnInteger { .. }
        | InputError::NegativeValue { .. } => "Erro: Digite números válidos".to_string(),
        InputError::InvalidMethodChoice { max } => {
            format!("Opção inválida! Digite um número entre 1 e {max}")
        }
        InputError::InvalidConfirmation { .. } => "Opção inválida!".to_string(),
    }
}

/// Message for a storage failure outside the sale transaction.
pub fn lookup_error(err: &DbError) -> String {
    format!("❌ Erro ao consultar o estoque: {err}")
}

/// Outcome of the sale transaction.
pub fn sale_outcome(outcome: &Result<SaleId, DbError>) -> String {
    match outcome {
        Ok(sale_id) => format!("✅ Venda registrada com sucesso! (venda nº {sale_id})\n"),
        Err(err) => format!("❌ Erro na transação: {err}\n"),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
