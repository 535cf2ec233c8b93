//! # Sale Repository
//!
//! Records confirmed purchases and reads them back.
//!
//! ## The Sale Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                  record_sale(intent)                                    │
//! │                                                                         │
//! │  BEGIN                                                                  │
//! │    │                                                                    │
//! │    ├── 1. INSERT INTO vendas (metodo_pagamento, total)   → venda_id    │
//! │    │                                                                    │
//! │    ├── 2. INSERT INTO itens_venda (venda_id, produto_id,               │
//! │    │                               quantidade, preco_unitario)         │
//! │    │                                                                    │
//! │    ├── 3. UPDATE produtos SET quantidade = quantidade - q              │
//! │    │        WHERE id = ? AND quantidade >= q                            │
//! │    │        (0 rows → InsufficientStock)                               │
//! │    │                                                                    │
//! │    ├── all ok ─────► COMMIT ─────► SaleId                              │
//! │    │                                                                    │
//! │    └── any error ──► ROLLBACK ───► DbError, no trace left              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The transaction object never leaves this module: callers hand over a
//! [`SaleIntent`] and get back a [`SaleId`] or the cause of the rollback.
//! Nothing is retried.

use chrono::NaiveDateTime;
use sqlx::{Sqlite, SqlitePool, Transaction};
use tracing::{debug, info, warn};

use crate::error::{DbError, DbResult, TransactionStage};
use caixa_core::{PaymentMethod, ProductId, Sale, SaleId, SaleIntent, SaleLineItem};

// =============================================================================
// Payment Method Storage Mapping
// =============================================================================

/// Text stored in `vendas.metodo_pagamento`: the method's menu label.
pub fn encode_method(method: PaymentMethod) -> &'static str {
    method.label()
}

/// Inverse of [`encode_method`].
pub fn decode_method(stored: &str) -> DbResult<PaymentMethod> {
    PaymentMethod::from_label(stored)
        .ok_or_else(|| DbError::Internal(format!("Unknown payment method stored: '{stored}'")))
}

// =============================================================================
// Sale Transaction
// =============================================================================

/// One open write transaction for a single sale.
///
/// Dropping it without [`commit`](Self::commit) rolls everything back.
struct SaleTransaction {
    tx: Transaction<'static, Sqlite>,
}

impl SaleTransaction {
    async fn begin(pool: &SqlitePool) -> DbResult<Self> {
        let tx = pool
            .begin()
            .await
            .map_err(|e| DbError::transaction(TransactionStage::Begin, e))?;

        Ok(SaleTransaction { tx })
    }

    /// Runs the three writes. On error the caller rolls back.
    async fn apply(&mut self, intent: &SaleIntent) -> DbResult<SaleId> {
        let sale_id = self.insert_sale(intent).await?;
        self.insert_line_item(sale_id, intent).await?;
        self.decrement_stock(intent.product_id, intent.quantity).await?;
        Ok(sale_id)
    }

    async fn insert_sale(&mut self, intent: &SaleIntent) -> DbResult<SaleId> {
        let result = sqlx::query("INSERT INTO vendas (metodo_pagamento, total) VALUES (?1, ?2)")
            .bind(encode_method(intent.method))
            .bind(intent.total().cents())
            .execute(&mut *self.tx)
            .await
            .map_err(|e| DbError::transaction(TransactionStage::InsertSale, e))?;

        let sale_id = SaleId(result.last_insert_rowid());
        debug!(sale_id = %sale_id, "Sale row inserted");
        Ok(sale_id)
    }

    async fn insert_line_item(&mut self, sale_id: SaleId, intent: &SaleIntent) -> DbResult<()> {
        sqlx::query(
            "INSERT INTO itens_venda (venda_id, produto_id, quantidade, preco_unitario) \
             VALUES (?1, ?2, ?3, ?4)",
        )
        .bind(sale_id)
        .bind(intent.product_id)
        .bind(intent.quantity)
        .bind(intent.unit_price.cents())
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DbError::transaction(TransactionStage::InsertLineItem, e))?;

        Ok(())
    }

    async fn decrement_stock(&mut self, product_id: ProductId, quantity: i64) -> DbResult<()> {
        let result = sqlx::query(
            "UPDATE produtos SET quantidade = quantidade - ?1 WHERE id = ?2 AND quantidade >= ?1",
        )
        .bind(quantity)
        .bind(product_id)
        .execute(&mut *self.tx)
        .await
        .map_err(|e| DbError::transaction(TransactionStage::DecrementStock, e))?;

        if result.rows_affected() == 0 {
            return Err(DbError::InsufficientStock {
                product_id,
                requested: quantity,
            });
        }

        Ok(())
    }

    async fn commit(self) -> DbResult<()> {
        self.tx
            .commit()
            .await
            .map_err(|e| DbError::transaction(TransactionStage::Commit, e))
    }

    async fn rollback(self) {
        if let Err(e) = self.tx.rollback().await {
            // SQLite discards the transaction when the connection goes away
            warn!(error = %e, "Explicit rollback failed");
        }
    }
}

// =============================================================================
// Repository
// =============================================================================

#[derive(sqlx::FromRow)]
struct SaleRow {
    id: i64,
    metodo_pagamento: String,
    total: i64,
    data_venda: NaiveDateTime,
}

impl TryFrom<SaleRow> for Sale {
    type Error = DbError;

    fn try_from(row: SaleRow) -> DbResult<Self> {
        Ok(Sale {
            id: SaleId(row.id),
            method: decode_method(&row.metodo_pagamento)?,
            total_cents: row.total,
            recorded_at: row.data_venda,
        })
    }
}

/// Repository for sale database operations.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Records a confirmed purchase atomically.
    ///
    /// The stored `total` is the gross total (unit price × quantity), not
    /// the amount due after a card discount or interest.
    ///
    /// ## Errors
    /// - `DbError::TransactionFailed` - a step failed; nothing was written
    /// - `DbError::InsufficientStock` - stock dropped below the quantity
    ///   since the operator's lookup; nothing was written
    pub async fn record_sale(&self, intent: &SaleIntent) -> DbResult<SaleId> {
        debug!(
            product_id = %intent.product_id,
            quantity = intent.quantity,
            method = %intent.method,
            "Recording sale"
        );

        let mut tx = SaleTransaction::begin(&self.pool).await?;

        let outcome = match tx.apply(intent).await {
            Ok(sale_id) => tx.commit().await.map(|()| sale_id),
            Err(err) => {
                tx.rollback().await;
                Err(err)
            }
        };

        match &outcome {
            Ok(sale_id) => info!(
                sale_id = %sale_id,
                product_id = %intent.product_id,
                quantity = intent.quantity,
                method = %intent.method,
                total = %intent.total(),
                "Sale committed"
            ),
            Err(err) => warn!(
                product_id = %intent.product_id,
                quantity = intent.quantity,
                error = %err,
                "Sale rolled back"
            ),
        }

        outcome
    }

    /// Gets a sale by ID.
    pub async fn get_sale(&self, id: SaleId) -> DbResult<Option<Sale>> {
        let row = sqlx::query_as::<_, SaleRow>(
            "SELECT id, metodo_pagamento, total, data_venda FROM vendas WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Sale::try_from).transpose()
    }

    /// Gets the line items of a sale.
    pub async fn get_line_items(&self, sale_id: SaleId) -> DbResult<Vec<SaleLineItem>> {
        let items = sqlx::query_as::<_, SaleLineItem>(
            "SELECT venda_id AS sale_id, produto_id AS product_id, quantidade AS quantity, \
             preco_unitario AS unit_price_cents \
             FROM itens_venda WHERE venda_id = ?1 ORDER BY rowid",
        )
        .bind(sale_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(items)
    }

    /// Counts recorded sales.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM vendas")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
