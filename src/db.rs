//! SQLite access layer for the reference corpus (corpus.db)

use crate::models::{CorpusStats, Document};
use rusqlite::{params, Connection, OptionalExtension, Result};
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DbError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

const CREATE_TABLE_SQL: &str = "
CREATE TABLE IF NOT EXISTS documents (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    filename TEXT NOT NULL UNIQUE,
    text_content TEXT NOT NULL,
    upload_date TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
);";

/// Reference documents keyed by unique filename.
pub struct CorpusStore {
    conn: Connection,
}

impl CorpusStore {
    /// Open (creating if needed) the corpus database at `db_path`.
    pub fn open(db_path: &Path) -> Result<Self, DbError> {
        if let Some(parent) = db_path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        let conn = Connection::open(db_path)?;
        Self::init(conn)
    }

    /// Open a throwaway in-memory corpus.
    pub fn open_in_memory() -> Result<Self, DbError> {
        let conn = Connection::open_in_memory()?;
        Self::init(conn)
    }

    fn init(conn: Connection) -> Result<Self, DbError> {
        conn.execute_batch(CREATE_TABLE_SQL)?;
        Ok(Self { conn })
    }

    /// All documents in insertion order.
    pub fn list(&self) -> Result<Vec<Document>, DbError> {
        let mut stmt = self.conn.prepare(
            "SELECT filename, text_content, upload_date
             FROM documents
             ORDER BY id",
        )?;

        let mut documents = Vec::new();
        let mut rows = stmt.query([])?;

        while let Some(row) = rows.next()? {
            documents.push(Document {
                filename: row.get(0)?,
                text: row.get(1)?,
                uploaded_at: row.get(2)?,
            });
        }

        Ok(documents)
    }

    /// Filenames in insertion order, without loading text.
    pub fn filenames(&self) -> Result<Vec<String>, DbError> {
        let mut stmt = self
            .conn
            .prepare("SELECT filename FROM documents ORDER BY id")?;
        let names = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>>>()?;
        Ok(names)
    }

    /// Insert a document. Returns false if the filename was already stored.
    pub fn insert(&self, filename: &str, text: &str) -> Result<bool, DbError> {
        let changed = self.conn.execute(
            "INSERT OR IGNORE INTO documents (filename, text_content) VALUES (?1, ?2)",
            params![filename, text],
        )?;
        Ok(changed > 0)
    }

    pub fn get(&self, filename: &str) -> Result<Option<Document>, DbError> {
        let document = self
            .conn
            .query_row(
                "SELECT filename, text_content, upload_date FROM documents WHERE filename = ?1",
                [filename],
                |row| {
                    Ok(Document {
                        filename: row.get(0)?,
                        text: row.get(1)?,
                        uploaded_at: row.get(2)?,
                    })
                },
            )
            .optional()?;
        Ok(document)
    }

    /// Delete a document. Returns false if nothing was stored under `filename`.
    pub fn delete(&self, filename: &str) -> Result<bool, DbError> {
        let changed = self
            .conn
            .execute("DELETE FROM documents WHERE filename = ?1", [filename])?;
        Ok(changed > 0)
    }

    pub fn contains(&self, filename: &str) -> Result<bool, DbError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM documents WHERE filename = ?1",
                [filename],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    pub fn len(&self) -> Result<usize, DbError> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM documents", [], |row| row.get(0))?;
        Ok(count as usize)
    }

    pub fn is_empty(&self) -> Result<bool, DbError> {
        Ok(self.len()? == 0)
    }

    /// Load corpus statistics
    pub fn stats(&self) -> Result<CorpusStats, DbError> {
        let stats = self.conn.query_row(
            "SELECT COUNT(*), COALESCE(SUM(LENGTH(text_content)), 0),
                    MIN(upload_date), MAX(upload_date)
             FROM documents",
            [],
            |row| {
                Ok(CorpusStats {
                    document_count: row.get::<_, i64>(0)? as u64,
                    total_characters: row.get::<_, i64>(1)? as u64,
                    oldest_upload: row.get(2)?,
                    newest_upload: row.get(3)?,
                })
            },
        )?;
        Ok(stats)
    }
}
