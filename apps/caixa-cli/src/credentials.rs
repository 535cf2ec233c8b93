//! # Credential Store
//!
//! Resolves the database password once, at startup.
//!
//! The password only ever travels as a [`SecretString`]: it is never a
//! field of a tracing event and its `Debug` output is redacted.

use std::collections::HashMap;

use secrecy::SecretString;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::CredentialSettings;
use crate::error::{AppError, AppResult};

/// Credential lookup errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CredentialError {
    #[error("no password stored for {account}@{service}")]
    NotFound { service: String, account: String },

    #[error("credential store unavailable: {0}")]
    Unavailable(String),
}

/// A source of passwords keyed by service and account.
pub trait CredentialStore {
    fn get_password(&self, service: &str, account: &str) -> Result<SecretString, CredentialError>;
}

// =============================================================================
// Environment
// =============================================================================

/// Reads passwords from `CAIXA_<SERVICE>_<ACCOUNT>_PASSWORD`.
#[derive(Debug, Clone, Default)]
pub struct EnvCredentialStore;

impl EnvCredentialStore {
    pub fn new() -> Self {
        EnvCredentialStore
    }

    /// Variable holding the password for `account` of `service`.
    ///
    /// ```rust
    /// use caixa_cli::credentials::EnvCredentialStore;
    ///
    /// assert_eq!(
    ///     EnvCredentialStore::variable_name("estoque_db", "root"),
    ///     "CAIXA_ESTOQUE_DB_ROOT_PASSWORD"
    /// );
    /// ```
    pub fn variable_name(service: &str, account: &str) -> String {
        let normalize = |part: &str| -> String {
            part.chars()
                .map(|c| {
                    if c.is_ascii_alphanumeric() {
                        c.to_ascii_uppercase()
                    } else {
                        '_'
                    }
                })
                .collect()
        };

        format!("CAIXA_{}_{}_PASSWORD", normalize(service), normalize(account))
    }
}

impl CredentialStore for EnvCredentialStore {
    fn get_password(&self, service: &str, account: &str) -> Result<SecretString, CredentialError> {
        let name = Self::variable_name(service, account);

        match std::env::var(&name) {
            Ok(value) => Ok(SecretString::new(value)),
            Err(std::env::VarError::NotPresent) => Err(CredentialError::NotFound {
                service: service.to_string(),
                account: account.to_string(),
            }),
            Err(std::env::VarError::NotUnicode(_)) => Err(CredentialError::Unavailable(format!(
                "{name} is not valid UTF-8"
            ))),
        }
    }
}

// =============================================================================
// In-memory
// =============================================================================

/// Fixed set of passwords, for tests and embedding.
#[derive(Debug, Clone, Default)]
pub struct MemoryCredentialStore {
    passwords: HashMap<(String, String), SecretString>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_password(mut self, service: &str, account: &str, password: &str) -> Self {
        self.passwords.insert(
            (service.to_string(), account.to_string()),
            SecretString::new(password.to_string()),
        );
        self
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get_password(&self, service: &str, account: &str) -> Result<SecretString, CredentialError> {
        self.passwords
            .get(&(service.to_string(), account.to_string()))
            .cloned()
            .ok_or_else(|| CredentialError::NotFound {
                service: service.to_string(),
                account: account.to_string(),
            })
    }
}

// =============================================================================
// Startup resolution
// =============================================================================

/// Looks up the database key for the configured service and account.
///
/// A missing password is fatal only when `settings.required` is set;
/// otherwise the database is opened without a key.
pub fn resolve_database_key(
    store: &dyn CredentialStore,
    settings: &CredentialSettings,
) -> AppResult<Option<SecretString>> {
    match store.get_password(&settings.service, &settings.account) {
        Ok(secret) => {
            debug!(service = %settings.service, account = %settings.account, "Database password resolved");
            Ok(Some(secret))
        }
        Err(err) if settings.required => Err(AppError::Credential(err)),
        Err(err) => {
            warn!(error = %err, "Opening the database without a password");
            Ok(None)
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn settings(required: bool) -> CredentialSettings {
        CredentialSettings {
            service: "estoque_db".to_string(),
            account: "root".to_string(),
            required,
        }
    }

    #[test]
    fn test_variable_name_normalization() {
        assert_eq!(
            EnvCredentialStore::variable_name("estoque-db", "caixa.01"),
            "CAIXA_ESTOQUE_DB_CAIXA_01_PASSWORD"
        );
    }

    #[test]
    fn test_env_store_reads_variable() {
        let store = EnvCredentialStore::new();
        // Unique to this test
        std::env::set_var("CAIXA_ENV_STORE_TEST_OPERADOR_PASSWORD", "s3nha");

        let secret = store.get_password("env_store_test", "operador").unwrap();
        assert_eq!(secret.expose_secret(), "s3nha");

        let missing = store.get_password("env_store_test", "ninguem");
        assert!(matches!(missing, Err(CredentialError::NotFound { .. })));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryCredentialStore::new().with_password("estoque_db", "root", "abc");

        assert_eq!(
            store.get_password("estoque_db", "root").unwrap().expose_secret(),
            "abc"
        );
        assert!(store.get_password("estoque_db", "admin").is_err());
    }

    #[test]
    fn test_missing_optional_password_is_not_fatal() {
        let store = MemoryCredentialStore::new();
        assert!(resolve_database_key(&store, &settings(false)).unwrap().is_none());
    }

    #[test]
    fn test_missing_required_password_is_fatal() {
        let store = MemoryCredentialStore::new();
        let err = resolve_database_key(&store, &settings(true)).unwrap_err();
        assert!(matches!(err, AppError::Credential(CredentialError::NotFound { .. })));
    }

    #[test]
    fn test_resolved_password_is_redacted() {
        let store = MemoryCredentialStore::new().with_password("estoque_db", "root", "hunter2");
        let secret = resolve_database_key(&store, &settings(true)).unwrap();
        assert!(!format!("{secret:?}").contains("hunter2"));
    }
}
