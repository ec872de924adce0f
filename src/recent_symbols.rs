use chrono::Utc;
use rusqlite::params;
use std::sync::Arc;

use crate::api::ApiError;
use crate::db::Database;

pub const MAX_RECENT_SYMBOLS: usize = 10;

/// Most-recent-first symbol list for the trade entry picker.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecentSymbols {
    symbols: Vec<String>,
}

impl RecentSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds from a stored list, dropping blanks and duplicates.
    pub fn from_symbols<I, S>(symbols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut recent = Self::new();
        let mut stored: Vec<String> = symbols.into_iter().map(|s| s.as_ref().to_string()).collect();
        stored.reverse();
        for symbol in stored {
            recent.add(&symbol);
        }
        recent
    }

    /// Uppercases, moves an existing entry to the front, and keeps at most
    /// `MAX_RECENT_SYMBOLS`. Returns false for a blank symbol.
    pub fn add(&mut self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        if symbol.is_empty() {
            return false;
        }
        self.symbols.retain(|s| *s != symbol);
        self.symbols.insert(0, symbol);
        self.symbols.truncate(MAX_RECENT_SYMBOLS);
        true
    }

    pub fn remove(&mut self, symbol: &str) -> bool {
        let symbol = symbol.trim().to_uppercase();
        let before = self.symbols.len();
        self.symbols.retain(|s| *s != symbol);
        self.symbols.len() != before
    }

    pub fn as_slice(&self) -> &[String] {
        &self.symbols
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

/// Recent symbols persisted in local storage.
pub struct RecentSymbolStore {
    db: Arc<Database>,
}

impl RecentSymbolStore {
    pub fn new(db: Arc<Database>) -> Self {
        Self { db }
    }

    pub fn load(&self) -> Result<RecentSymbols, ApiError> {
        let conn = self.db.conn.lock().map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let mut stmt = conn.prepare("SELECT symbol FROM recent_symbols ORDER BY position ASC")?;
        let symbols = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RecentSymbols::from_symbols(symbols))
    }

    /// Record a use of `symbol` and return the updated list.
    pub fn record(&self, symbol: &str) -> Result<RecentSymbols, ApiError> {
        let mut recent = self.load()?;
        if !recent.add(symbol) {
            return Err(ApiError::InvalidInput("Symbol is required".to_string()));
        }
        self.save(&recent)?;
        Ok(recent)
    }

    pub fn clear(&self) -> Result<(), ApiError> {
        let conn = self.db.conn.lock().map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        conn.execute("DELETE FROM recent_symbols", [])?;
        Ok(())
    }

    fn save(&self, recent: &RecentSymbols) -> Result<(), ApiError> {
        let mut conn = self.db.conn.lock().map_err(|e| ApiError::DatabaseError(e.to_string()))?;
        let tx = conn.transaction()?;
        let now = Utc::now().timestamp();

        tx.execute("DELETE FROM recent_symbols", [])?;
        for (position, symbol) in recent.as_slice().iter().enumerate() {
            tx.execute(
                "INSERT INTO recent_symbols (symbol, position, used_at) VALUES (?1, ?2, ?3)",
                params![symbol, position as i64, now],
            )?;
        }
        tx.commit()?;

        log::debug!("Saved {} recent symbols", recent.len());
        Ok(())
    }
}
