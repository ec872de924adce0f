use keyring::Entry;
use std::sync::{Arc, RwLock};

use super::error::ApiError;

const SERVICE_NAME: &str = "mindful-trade";
const TOKEN_ACCOUNT: &str = "session-token";

/// Where the bearer token lives between requests.
///
/// The HTTP client reads it before every call and clears it on a 401.
pub trait TokenStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, token: &str) -> Result<(), ApiError>;
    fn clear(&self);
}

/// Process-local token store.
#[derive(Default)]
pub struct MemoryTokenStore {
    token: RwLock<Option<String>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_token(token: &str) -> Self {
        Self {
            token: RwLock::new(Some(token.to_string())),
        }
    }
}

impl TokenStore for MemoryTokenStore {
    fn get(&self) -> Option<String> {
        self.token.read().ok().and_then(|t| t.clone())
    }

    fn set(&self, token: &str) -> Result<(), ApiError> {
        let mut guard = self
            .token
            .write()
            .map_err(|e| ApiError::StorageError(e.to_string()))?;
        *guard = Some(token.to_string());
        Ok(())
    }

    fn clear(&self) {
        if let Ok(mut guard) = self.token.write() {
            *guard = None;
        }
    }
}

/// Token store backed by the system keychain.
///
/// Uses platform-specific secure storage:
/// - macOS: Keychain
/// - Windows: Credential Manager
/// - Linux: Secret Service
pub struct KeyringTokenStore {
    account: String,
}

impl KeyringTokenStore {
    pub fn new() -> Self {
        Self::for_account(TOKEN_ACCOUNT)
    }

    /// Separate keychain slot, e.g. one per backend environment.
    pub fn for_account(account: &str) -> Self {
        Self {
            account: account.to_string(),
        }
    }

    fn entry(&self) -> Result<Entry, ApiError> {
        Entry::new(SERVICE_NAME, &self.account).map_err(|e| {
            ApiError::StorageError(format!("Failed to create keyring entry: {}", e))
        })
    }
}

impl Default for KeyringTokenStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TokenStore for KeyringTokenStore {
    fn get(&self) -> Option<String> {
        let entry = match self.entry() {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("{}", e);
                return None;
            }
        };

        match entry.get_password() {
            Ok(token) => Some(token),
            Err(keyring::Error::NoEntry) => None,
            Err(e) => {
                log::warn!("Failed to read session token from keychain: {}", e);
                None
            }
        }
    }

    fn set(&self, token: &str) -> Result<(), ApiError> {
        self.entry()?
            .set_password(token)
            .map_err(|e| ApiError::StorageError(format!("Failed to store session token: {}", e)))
    }

    fn clear(&self) {
        if let Ok(entry) = self.entry() {
            let _ = entry.delete_credential(); // Ignore error if doesn't exist
        }
    }
}

/// Thin auth view over a token store. Issuing tokens happens server-side.
#[derive(Clone)]
pub struct Session {
    tokens: Arc<dyn TokenStore>,
}

impl Session {
    pub fn new(tokens: Arc<dyn TokenStore>) -> Self {
        Self { tokens }
    }

    pub fn is_authenticated(&self) -> bool {
        self.tokens.get().is_some_and(|t| !t.is_empty())
    }

    pub fn sign_in_with_token(&self, token: &str) -> Result<(), ApiError> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ApiError::InvalidInput("Token cannot be empty".to_string()));
        }
        self.tokens.set(token)?;
        log::info!("Session token stored");
        Ok(())
    }

    pub fn sign_out(&self) {
        self.tokens.clear();
        log::info!("Session token cleared");
    }

    pub fn token_store(&self) -> Arc<dyn TokenStore> {
        Arc::clone(&self.tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store_set_get_clear() {
        let store = MemoryTokenStore::new();
        assert_eq!(store.get(), None);

        store.set("abc.def.ghi").unwrap();
        assert_eq!(store.get().as_deref(), Some("abc.def.ghi"));

        store.clear();
        assert_eq!(store.get(), None);
    }

    #[test]
    fn test_session_sign_in_and_out() {
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        assert!(!session.is_authenticated());

        session.sign_in_with_token("  token-123 ").unwrap();
        assert!(session.is_authenticated());
        assert_eq!(session.token_store().get().as_deref(), Some("token-123"));

        session.sign_out();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_session_rejects_blank_token() {
        let session = Session::new(Arc::new(MemoryTokenStore::new()));
        let result = session.sign_in_with_token("   ");
        assert!(matches!(result, Err(ApiError::InvalidInput(_))));
        assert!(!session.is_authenticated());
    }
}
