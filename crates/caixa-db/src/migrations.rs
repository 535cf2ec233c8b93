//! # Database Migrations
//!
//! Embedded SQL migrations for the Caixa ledger.
//!
//! ## How Migrations Work
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Migration Process                                  │
//! │                                                                         │
//! │  Startup                                                               │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Check _sqlx_migrations table (create if missing)                      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Compare embedded migrations vs applied                                │
//! │       │                                                                 │
//! │       └── 001_initial_schema.sql  produtos · vendas · itens_venda      │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Run pending migrations in order, record in _sqlx_migrations           │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/sqlite/` with the next sequence number
//! 2. Write idempotent SQL (`IF NOT EXISTS`), because `produtos` may
//!    predate this application
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::SqlitePool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the `migrations/sqlite` directory.
static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/sqlite");

/// Runs all pending database migrations.
///
/// Safe to run any number of times.
pub async fn run_migrations(pool: &SqlitePool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)`.
pub async fn migration_status(pool: &SqlitePool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    async fn table_count(pool: &SqlitePool, name: &str) -> i64 {
        sqlx::query_scalar("SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?1")
            .bind(name)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn test_schema_setup_is_idempotent() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Second and third runs must not fail with "already exists"
        run_migrations(db.pool()).await.unwrap();
        db.run_migrations().await.unwrap();

        for table in ["produtos", "vendas", "itens_venda"] {
            assert_eq!(table_count(db.pool(), table).await, 1, "table {table}");
        }

        let (total, applied) = migration_status(db.pool()).await.unwrap();
        assert_eq!(total, applied);
    }

    #[tokio::test]
    async fn test_migrations_over_existing_catalog() {
        let db = Database::new(DbConfig::in_memory().run_migrations(false))
            .await
            .unwrap();

        // A catalog created by the stock application before the first run
        sqlx::query(
            "CREATE TABLE produtos (id INTEGER PRIMARY KEY, nome TEXT NOT NULL DEFAULT '', \
             quantidade INTEGER NOT NULL DEFAULT 0, preco INTEGER NOT NULL DEFAULT 0)",
        )
        .execute(db.pool())
        .await
        .unwrap();
        sqlx::query("INSERT INTO produtos (id, nome, quantidade, preco) VALUES (1, 'Borracha', 4, 250)")
            .execute(db.pool())
            .await
            .unwrap();

        db.run_migrations().await.unwrap();

        assert_eq!(table_count(db.pool(), "vendas").await, 1);
        let kept: i64 = sqlx::query_scalar("SELECT quantidade FROM produtos WHERE id = 1")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(kept, 4);
    }
}
