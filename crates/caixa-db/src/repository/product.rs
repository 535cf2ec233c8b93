//! # Product Repository
//!
//! Catalog lookup over the `produtos` table.
//!
//! The catalog belongs to the stock application: this repository only
//! reads it (plus `insert`, for seeding and tests). Stock is decremented
//! exclusively by the sale transaction in [`super::sale`].
//!
//! Every lookup goes to the database. Nothing is cached between the
//! operator's selection and the confirmation.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use caixa_core::{Product, ProductId};

/// Column list mapping the Portuguese schema onto [`Product`] fields.
const PRODUCT_COLUMNS: &str =
    "id, nome AS name, quantidade AS quantity_on_hand, preco AS unit_price_cents";

/// Repository for catalog reads.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// // Stock table
/// let all = repo.list_products().await?;
///
/// // Lookup by id
/// let product = repo.get_product(ProductId(5)).await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Lists every product, ordered by id, for the stock table.
    pub async fn list_products(&self) -> DbResult<Vec<Product>> {
        let products = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM produtos ORDER BY id"
        ))
        .fetch_all(&self.pool)
        .await?;

        debug!(count = products.len(), "Listed products");
        Ok(products)
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found, with stock as of now
    /// * `Ok(None)` - Product not found
    pub async fn get_product(&self, id: ProductId) -> DbResult<Option<Product>> {
        debug!(id = %id, "Looking up product");

        let product = sqlx::query_as::<_, Product>(&format!(
            "SELECT {PRODUCT_COLUMNS} FROM produtos WHERE id = ?1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(product)
    }

    /// Like [`get_product`](Self::get_product), but a missing product is an error.
    pub async fn find_product(&self, id: ProductId) -> DbResult<Product> {
        self.get_product(id)
            .await?
            .ok_or_else(|| DbError::not_found("Product", id))
    }

    /// Inserts a product, keeping its id.
    pub async fn insert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, name = %product.name, "Inserting product");

        sqlx::query("INSERT INTO produtos (id, nome, quantidade, preco) VALUES (?1, ?2, ?3, ?4)")
            .bind(product.id)
            .bind(&product.name)
            .bind(product.quantity_on_hand)
            .bind(product.unit_price_cents)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Counts catalog entries.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM produtos")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn product(id: i64, name: &str, stock: i64, price_cents: i64) -> Product {
        Product {
            id: ProductId(id),
            name: name.to_string(),
            quantity_on_hand: stock,
            unit_price_cents: price_cents,
        }
    }

    async fn seeded() -> Database {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.products();
        repo.insert(&product(5, "Caderno", 10, 1990)).await.unwrap();
        repo.insert(&product(2, "Caneta", 0, 350)).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_get_product() {
        let db = seeded().await;

        let found = db.products().get_product(ProductId(5)).await.unwrap();
        assert_eq!(found, Some(product(5, "Caderno", 10, 1990)));

        let missing = db.products().get_product(ProductId(99)).await.unwrap();
        assert_eq!(missing, None);
    }

    #[tokio::test]
    async fn test_find_product_reports_not_found() {
        let db = seeded().await;

        let err = db.products().find_product(ProductId(99)).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { ref id, .. } if id == "99"));
    }

    #[tokio::test]
    async fn test_list_products_ordered_by_id() {
        let db = seeded().await;

        let ids: Vec<i64> = db
            .products()
            .list_products()
            .await
            .unwrap()
            .iter()
            .map(|p| p.id.0)
            .collect();
        assert_eq!(ids, vec![2, 5]);
        assert_eq!(db.products().count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_negative_stock_rejected_by_schema() {
        let db = seeded().await;

        let err = db
            .products()
            .insert(&product(7, "Régua", -1, 500))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::CheckViolation { .. }));
    }
}
