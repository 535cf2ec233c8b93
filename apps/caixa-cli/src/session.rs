//! # Interactive Session Loop
//!
//! Drives one operator through as many purchases as they like.
//!
//! ## State Machine
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │   ┌──────────┐  id found   ┌─────────────────┐  qty ≤ stock  ┌────────┐ │
//! │ ┌►│ Browsing ├────────────►│ ProductSelected ├──────────────►│ Qty    │ │
//! │ │ └────┬─────┘             └───┬─────────────┘               │Entered │ │
//! │ │      │ 0 / EOF               │ qty 0                       └───┬────┘ │
//! │ │      ▼                       │ (abandon)          method 1..=3 │      │
//! │ │   [exit]         ◄───────────┘                                 ▼      │
//! │ │                                                       ┌─────────────┐ │
//! │ │                                                       │ MethodChosen│ │
//! │ │                                                       └──────┬──────┘ │
//! │ │                                         quote shown          │        │
//! │ │  ┌────────────┐    S    ┌────────────┐ ◄─────────────────────┘        │
//! │ └──┤ Committing │◄────────┤ Confirming │                                │
//! │ │  └────────────┘         └─────┬──────┘                                │
//! │ │   success or failure          │ N                                     │
//! │ └───────────────────────────────┘                                       │
//! │                                                                         │
//! │  Invalid input never leaves the current state: the prompt is repeated. │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Input and output are generic so tests can script a whole session with
//! byte buffers.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use caixa_core::input::{
    parse_confirmation, parse_installments, parse_method_choice, parse_product_id, parse_quantity,
    Confirmation, ProductSelection, QuantityEntry,
};
use caixa_core::validation::validate_stock;
use caixa_core::{compute_due, CoreError, PaymentMethod, Product, ProductId, SaleId, SaleIntent};
use caixa_db::Database;

use crate::config::StoreConfig;
use crate::error::AppResult;
use crate::render;

/// Where the operator is in the purchase flow.
#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Browsing,
    ProductSelected { product: Product },
    QuantityEntered { product: Product, quantity: i64 },
    MethodChosen { intent: SaleIntent },
    Confirming { intent: SaleIntent },
    Committing { intent: SaleIntent },
    Finished,
}

/// What happened during a session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SessionSummary {
    /// Sales committed, in order.
    pub committed: Vec<SaleId>,
    /// Confirmed purchases whose transaction rolled back.
    pub failed: usize,
    /// Purchases the operator declined at the confirmation.
    pub cancelled: usize,
}

/// One operator session over a database.
pub struct Session<R, W> {
    db: Database,
    store: StoreConfig,
    methods: Vec<PaymentMethod>,
    input: R,
    output: W,
    summary: SessionSummary,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    pub fn new(db: Database, store: StoreConfig, input: R, output: W) -> Self {
        Session {
            db,
            store,
            methods: PaymentMethod::ALL.to_vec(),
            input,
            output,
            summary: SessionSummary::default(),
        }
    }

    /// Runs until the operator enters `0` or input ends.
    ///
    /// Only terminal I/O failures are returned; every other error is shown
    /// to the operator and the loop goes on.
    pub async fn run(mut self) -> AppResult<SessionSummary> {
        info!(store = %self.store.name, "Session started");

        let mut state = State::Browsing;
        while state != State::Finished {
            state = self.step(state).await?;
        }

        info!(
            committed = self.summary.committed.len(),
            failed = self.summary.failed,
            cancelled = self.summary.cancelled,
            "Session ended"
        );
        Ok(self.summary)
    }

    async fn step(&mut self, state: State) -> AppResult<State> {
        match state {
            State::Browsing => self.browse().await,
            State::ProductSelected { product } => self.enter_quantity(product).await,
            State::QuantityEntered { product, quantity } => {
                self.choose_method(product, quantity).await
            }
            State::MethodChosen { intent } => self.show_quote(intent).await,
            State::Confirming { intent } => self.confirm(intent).await,
            State::Committing { intent } => self.commit(intent).await,
            State::Finished => Ok(State::Finished),
        }
    }

    // =========================================================================
    // States
    // =========================================================================

    async fn browse(&mut self) -> AppResult<State> {
        match self.db.products().list_products().await {
            Ok(products) => self.write(&render::stock_table(&products)).await?,
            Err(err) => {
                warn!(error = %err, "Could not list products");
                self.say(&render::lookup_error(&err)).await?;
            }
        }

        let Some(line) = self.prompt(render::PRODUCT_PROMPT).await? else {
            return Ok(State::Finished);
        };

        let id = match parse_product_id(&line) {
            Ok(ProductSelection::Exit) => return Ok(State::Finished),
            Ok(ProductSelection::Product(id)) => id,
            Err(err) => {
                self.say(&render::input_error(&err)).await?;
                return Ok(State::Browsing);
            }
        };

        self.lookup(id).await
    }

    async fn lookup(&mut self, id: ProductId) -> AppResult<State> {
        match self.db.products().get_product(id).await {
            Ok(Some(product)) => {
                debug!(product_id = %id, stock = product.quantity_on_hand, "Product selected");
                Ok(State::ProductSelected { product })
            }
            Ok(None) => {
                self.say(&render::core_error(&CoreError::ProductNotFound(id)))
                    .await?;
                Ok(State::Browsing)
            }
            Err(err) => {
                warn!(product_id = %id, error = %err, "Product lookup failed");
                self.say(&render::lookup_error(&err)).await?;
                Ok(State::Browsing)
            }
        }
    }

    async fn enter_quantity(&mut self, product: Product) -> AppResult<State> {
        let Some(line) = self.prompt(render::QUANTITY_PROMPT).await? else {
            return Ok(State::Finished);
        };

        let quantity = match parse_quantity(&line) {
            Ok(QuantityEntry::Abandon) => return Ok(State::Browsing),
            Ok(QuantityEntry::Units(quantity)) => quantity,
            Err(err) => {
                self.say(&render::input_error(&err)).await?;
                return Ok(State::ProductSelected { product });
            }
        };

        if let Err(err) = validate_stock(&product, quantity) {
            self.say(&render::core_error(&err)).await?;
            return Ok(State::ProductSelected { product });
        }

        Ok(State::QuantityEntered { product, quantity })
    }

    async fn choose_method(&mut self, product: Product, quantity: i64) -> AppResult<State> {
        let menu = render::payment_menu(&self.methods);
        self.write(&menu).await?;

        let Some(line) = self.prompt(render::METHOD_PROMPT).await? else {
            return Ok(State::Finished);
        };

        let method = match parse_method_choice(&line, &self.methods) {
            Ok(method) => method,
            Err(err) => {
                self.say(&render::input_error(&err)).await?;
                return Ok(State::QuantityEntered { product, quantity });
            }
        };

        match SaleIntent::new(&product, quantity, method) {
            Ok(intent) => Ok(State::MethodChosen { intent }),
            Err(err) => {
                self.say(&render::core_error(&err)).await?;
                Ok(State::Browsing)
            }
        }
    }

    async fn show_quote(&mut self, intent: SaleIntent) -> AppResult<State> {
        let installments = if intent.method.takes_installments() {
            let Some(line) = self.prompt(render::INSTALLMENTS_PROMPT).await? else {
                return Ok(State::Finished);
            };
            match parse_installments(&line) {
                Ok(count) => Some(count),
                Err(err) => {
                    self.say(&render::input_error(&err)).await?;
                    return Ok(State::MethodChosen { intent });
                }
            }
        } else {
            None
        };

        match compute_due(intent.total(), intent.method, installments) {
            Ok(quote) => {
                let text = render::quote(&quote, self.store.pix_key.as_deref());
                self.write(&text).await?;
                Ok(State::Confirming { intent })
            }
            Err(err) => {
                self.say(&render::core_error(&err)).await?;
                Ok(State::MethodChosen { intent })
            }
        }
    }

    async fn confirm(&mut self, intent: SaleIntent) -> AppResult<State> {
        let Some(line) = self.prompt(render::CONFIRM_PROMPT).await? else {
            return Ok(State::Finished);
        };

        match parse_confirmation(&line) {
            Ok(Confirmation::Yes) => Ok(State::Committing { intent }),
            Ok(Confirmation::No) => {
                self.summary.cancelled += 1;
                self.say("Compra cancelada.").await?;
                Ok(State::Browsing)
            }
            Err(err) => {
                self.say(&render::input_error(&err)).await?;
                Ok(State::Confirming { intent })
            }
        }
    }

    async fn commit(&mut self, intent: SaleIntent) -> AppResult<State> {
        let outcome = self.db.sales().record_sale(&intent).await;

        match &outcome {
            Ok(sale_id) => self.summary.committed.push(*sale_id),
            Err(_) => self.summary.failed += 1,
        }

        self.write(&render::sale_outcome(&outcome)).await?;
        Ok(State::Browsing)
    }

    // =========================================================================
    // Terminal I/O
    // =========================================================================

    /// Prints `prompt` and reads one line. `None` when input has ended.
    async fn prompt(&mut self, prompt: &str) -> AppResult<Option<String>> {
        self.write(prompt).await?;

        let mut line = String::new();
        if self.input.read_line(&mut line).await? == 0 {
            debug!("Input closed");
            self.write("\n").await?;
            return Ok(None);
        }

        Ok(Some(line))
    }

    async fn say(&mut self, message: &str) -> AppResult<()> {
        self.write(message).await?;
        self.write("\n").await
    }

    async fn write(&mut self, text: &str) -> AppResult<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use caixa_db::DbConfig;

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let products = db.products();
        products
            .insert(&Product {
                id: ProductId(5),
                name: "Caderno".to_string(),
                quantity_on_hand: 10,
                unit_price_cents: 1990,
            })
            .await
            .unwrap();
        products
            .insert(&Product {
                id: ProductId(7),
                name: "Borracha".to_string(),
                quantity_on_hand: 2,
                unit_price_cents: 250,
            })
            .await
            .unwrap();
        db
    }

    fn store() -> StoreConfig {
        StoreConfig {
            name: "Loja Python".to_string(),
            pix_key: Some("loja@example.com".to_string()),
        }
    }

    /// Runs a scripted session; returns the summary and everything printed.
    async fn run_script(db: &Database, script: &str) -> (SessionSummary, String) {
        let mut output = Vec::new();
        let summary = Session::new(db.clone(), store(), script.as_bytes(), &mut output)
            .run()
            .await
            .unwrap();
        (summary, String::from_utf8(output).unwrap())
    }

    async fn stock_of(db: &Database, id: i64) -> i64 {
        db.products()
            .find_product(ProductId(id))
            .await
            .unwrap()
            .quantity_on_hand
    }

    #[tokio::test]
    async fn test_cash_purchase() {
        let db = seeded().await;

        let (summary, out) = run_script(&db, "5\n3\n1\nS\n0\n").await;

        assert_eq!(summary.committed.len(), 1);
        assert!(out.contains("Valor a pagar R$59.70"));
        assert!(out.contains("Venda registrada com sucesso"));
        assert_eq!(stock_of(&db, 5).await, 7);

        let sale = db.sales().get_sale(summary.committed[0]).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 5970);
        assert_eq!(sale.method, PaymentMethod::Cash);
    }

    #[tokio::test]
    async fn test_declined_purchase_changes_nothing() {
        let db = seeded().await;

        let (summary, out) = run_script(&db, "5\n3\n3\nn\n0\n").await;

        assert!(summary.committed.is_empty());
        assert_eq!(summary.cancelled, 1);
        assert!(out.contains("Chave pix: loja@example.com"));
        assert!(out.contains("Compra cancelada."));
        assert_eq!(stock_of(&db, 5).await, 10);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_card_reprompts_until_valid_installments() {
        let db = seeded().await;

        let (summary, out) = run_script(&db, "5\n3\n2\nduas\n9\n3\nS\n0\n").await;

        assert_eq!(summary.committed.len(), 1);
        assert!(out.contains("Erro: Digite números válidos"));
        assert!(out.contains("Valor inválido!"));
        assert!(out.contains("Valor total com juros de 20%: R$71.64"));
        assert!(out.contains("Parcelado em 3x de R$23.88"));

        // The ledger keeps the gross total
        let sale = db.sales().get_sale(summary.committed[0]).await.unwrap().unwrap();
        assert_eq!(sale.total_cents, 5970);
        assert_eq!(sale.method, PaymentMethod::Card);
    }

    #[tokio::test]
    async fn test_invalid_inputs_are_recovered() {
        let db = seeded().await;

        // bad id, unknown id, oversell, bad method, bad confirmation
        let script = "abc\n99\n7\n3\n2\n4\n1\ntalvez\nS\n0\n";
        let (summary, out) = run_script(&db, script).await;

        assert_eq!(summary.committed.len(), 1);
        assert!(out.contains("ID inválido!"));
        assert!(out.contains("Quantidade indisponível! Em estoque: 2"));
        assert!(out.contains("Opção inválida! Digite um número entre 1 e 3"));
        assert!(out.contains("Opção inválida!\n"));
        assert_eq!(stock_of(&db, 7).await, 0);
    }

    #[tokio::test]
    async fn test_negative_product_id_is_an_invalid_id() {
        let db = seeded().await;

        let (summary, out) = run_script(&db, "-5\n0\n").await;

        assert_eq!(summary, SessionSummary::default());
        assert!(out.contains("ID inválido!"));
        assert!(!out.contains("Digite números válidos"));
        assert_eq!(out.matches(render::PRODUCT_PROMPT).count(), 2);
    }

    #[tokio::test]
    async fn test_zero_quantity_abandons_item() {
        let db = seeded().await;

        let (summary, out) = run_script(&db, "5\n0\n0\n").await;

        assert_eq!(summary, SessionSummary::default());
        assert_eq!(out.matches(render::PRODUCT_PROMPT).count(), 2);
        assert_eq!(stock_of(&db, 5).await, 10);
    }

    #[tokio::test]
    async fn test_end_of_input_ends_session() {
        let db = seeded().await;

        let (summary, _) = run_script(&db, "5\n3\n").await;

        assert_eq!(summary, SessionSummary::default());
        assert_eq!(stock_of(&db, 5).await, 10);
    }

    #[tokio::test]
    async fn test_failed_transaction_keeps_session_alive() {
        let db = seeded().await;
        fail_stock_updates(&db).await;

        let (summary, out) = run_script(&db, "5\n3\n1\nS\n0\n").await;

        assert_eq!(summary.failed, 1);
        assert!(summary.committed.is_empty());
        assert!(out.contains("Erro na transação"));
        // Back at the product prompt after the failure
        assert_eq!(out.matches(render::PRODUCT_PROMPT).count(), 2);
        assert_eq!(stock_of(&db, 5).await, 10);
        assert_eq!(db.sales().count().await.unwrap(), 0);
    }

    async fn fail_stock_updates(db: &Database) {
        sqlx::query(
            "CREATE TRIGGER fail_stock_update BEFORE UPDATE ON produtos \
             BEGIN SELECT RAISE(ABORT, 'forced failure'); END",
        )
        .execute(db.pool())
        .await
        .unwrap();
    }
}
