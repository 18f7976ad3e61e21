use rusqlite::{Connection, Result};
use tracing::debug;

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &str) -> Result<Self> {
        let conn = Connection::open(path)?;
        let db = Database { conn };
        db.configure_pragmas()?;
        db.ensure_schema()?;
        debug!("Opened share database at {}", path);
        Ok(db)
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        let db = Database { conn };
        db.configure_pragmas()?;
        db.ensure_schema()?;
        Ok(db)
    }

    fn configure_pragmas(&self) -> Result<()> {
        // journal_mode returns a row, so it cannot go through execute_batch
        let mode: String = self
            .conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))?;
        self.conn.execute_batch(
            "PRAGMA synchronous = NORMAL;
             PRAGMA foreign_keys = ON;
             PRAGMA busy_timeout = 5000;",
        )?;
        debug!("SQLite pragmas configured (journal_mode={}, busy_timeout=5000ms)", mode);
        Ok(())
    }

    /// Create the tables this tool reads and writes if they are missing.
    /// Existing tables are left untouched.
    fn ensure_schema(&self) -> Result<()> {
        self.conn.execute_batch(include_str!("schema.sql"))?;
        debug!("SQLite schema ensured");
        Ok(())
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}
