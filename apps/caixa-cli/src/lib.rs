//! # caixa-cli: The Caixa point-of-sale terminal
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  1. init_tracing()        logs to stderr, RUST_LOG or the default      │
//! │           │                                                             │
//! │  2. AppConfig::load()     caixa.toml + CAIXA_* environment             │
//! │           │                                                             │
//! │  3. resolve_database_key  credential store, once                       │
//! │           │                                                             │
//! │  4. banner                printed before anything can fail to open     │
//! │           │                                                             │
//! │  5. Database::new()       pool + idempotent schema                     │
//! │           │                                                             │
//! │  6. Session::run()        stdin/stdout until "0" or EOF                │
//! │           │                                                             │
//! │  7. Database::close()     on success and on failure                    │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Anything that escapes as an [`AppError`] is printed by `main` as
//! `Erro geral: ...`.

pub mod config;
pub mod credentials;
pub mod error;
pub mod render;
pub mod session;

use secrecy::SecretString;
use tokio::io::{AsyncBufRead, AsyncWrite, AsyncWriteExt};
use tracing::info;
use tracing_subscriber::EnvFilter;

use caixa_db::Database;

pub use config::AppConfig;
pub use credentials::{CredentialStore, EnvCredentialStore, MemoryCredentialStore};
pub use error::{AppError, AppResult};
pub use session::{Session, SessionSummary};

/// Default log filter when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "warn,caixa=info,sqlx=warn";

/// Initializes the tracing subscriber for structured logging.
///
/// Events go to stderr so stdout carries only the operator dialogue.
///
/// ## Log Levels
/// - `RUST_LOG=debug` - Every prompt transition and query
/// - `RUST_LOG=caixa_db=debug` - Only the database layer
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads configuration and credentials from the environment, then runs
/// a session over `input` and `output`.
pub async fn run<R, W>(input: R, output: W) -> AppResult<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let config = AppConfig::load(None)?;
    let key = credentials::resolve_database_key(&EnvCredentialStore::new(), &config.credentials)?;

    start(&config, key, input, output).await
}

/// Greets the operator, opens the database and runs one session. The
/// pool is closed on every exit path.
pub async fn start<R, W>(
    config: &AppConfig,
    key: Option<SecretString>,
    input: R,
    mut output: W,
) -> AppResult<SessionSummary>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    output
        .write_all(render::banner(&config.store.name).as_bytes())
        .await?;
    output.flush().await?;

    let mut db_config = config.db_config()?;
    if let Some(key) = key {
        db_config = db_config.encryption_key(key);
    }

    let db = Database::new(db_config).await?;
    info!(path = %config.database_path().display(), "Database ready");

    let result = Session::new(db.clone(), config.store.clone(), input, output)
        .run()
        .await;

    db.close().await;
    result
}

// =============================================================================
// Unit Tests
// =============================================================================
