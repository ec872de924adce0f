use rusqlite::{Connection, Result};
use std::path::Path;
use std::sync::Mutex;

use crate::db::migration_runner::MigrationRunner;

/// Local storage for client-only state (filter presets, recent symbols).
pub struct Database {
    pub conn: Mutex<Connection>,
}

impl Database {
    pub fn open(db_path: &Path) -> Result<Self> {
        if let Some(parent) = db_path.parent() {
            if let Err(e) = std::fs::create_dir_all(parent) {
                log::warn!("Failed to create data directory {:?}: {}", parent, e);
            }
        }

        let conn = Connection::open(db_path)?;
        conn.pragma_update(None, "journal_mode", "WAL")?;
        log::info!("Local storage at {:?}", db_path);

        Self::init(conn)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::init(Connection::open_in_memory()?)
    }

    fn init(conn: Connection) -> Result<Self> {
        let runner = MigrationRunner::new();

        let applied = runner.run_pending_migrations(&conn)?;
        if applied > 0 {
            log::info!("Applied {} local storage migrations", applied);
        } else {
            log::debug!("Local storage schema is up to date");
        }

        runner.verify_migrations(&conn)?;

        Ok(Database {
            conn: Mutex::new(conn),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_on_disk_twice() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("mindful_trade.db");

        {
            let db = Database::open(&path).unwrap();
            let conn = db.conn.lock().unwrap();
            conn.execute(
                "INSERT INTO recent_symbols (symbol, position, used_at) VALUES ('AAPL', 0, 0)",
                [],
            )
            .unwrap();
        }

        let db = Database::open(&path).unwrap();
        let conn = db.conn.lock().unwrap();
        let count: i32 = conn
            .query_row("SELECT COUNT(*) FROM recent_symbols", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }
}
