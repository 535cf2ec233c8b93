//! # Application Error Type
//!
//! Failures that end the terminal session.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Where errors stop                                                      │
//! │                                                                         │
//! │  InputError / CoreError ─────► printed, same prompt again              │
//! │  DbError during a lookup ────► printed, back to the stock table        │
//! │  DbError from record_sale ───► printed, back to the stock table        │
//! │                                                                         │
//! │  AppError (this module) ─────► "Erro geral: ..." and exit status 1     │
//! │    ├── Config      bad or unreadable caixa.toml                        │
//! │    ├── Credential  required database password missing                  │
//! │    ├── Database    cannot open the database at startup                 │
//! │    └── Io          the terminal itself failed                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use caixa_db::DbError;
use thiserror::Error;

use crate::credentials::CredentialError;

/// Fatal application errors.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded or is invalid.
    #[error("Configuração inválida: {0}")]
    Config(String),

    /// The database password could not be resolved.
    #[error("Credencial: {0}")]
    Credential(#[from] CredentialError),

    /// The database could not be opened or migrated.
    #[error("Banco de dados: {0}")]
    Database(#[from] DbError),

    /// Reading the operator's input or writing the dialogue failed.
    #[error("Terminal: {0}")]
    Io(#[from] std::io::Error),
}

impl From<toml::de::Error> for AppError {
    fn from(err: toml::de::Error) -> Self {
        AppError::Config(err.to_string())
    }
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
