use std::path::Path;

use anyhow::{Context, Result};
use rusqlite::Connection;

pub fn open_connection(db_path: &Path) -> Result<Connection> {
    let conn = Connection::open(db_path)
        .with_context(|| format!("failed to open db: {}", db_path.display()))?;
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign key enforcement")?;
    Ok(conn)
}

pub fn init_db(db_path: &Path) -> Result<()> {
    if let Some(parent) = db_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create parent dir: {}", parent.display()))?;
    }

    let conn = open_connection(db_path)?;

    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS collection (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            kind         TEXT NOT NULL,
            name         TEXT NOT NULL,
            source_path  TEXT NOT NULL,
            record_count INTEGER NOT NULL,
            deleted_at   TEXT,
            imported_at  TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        );

        CREATE TABLE IF NOT EXISTS column_name (
            collection_id INTEGER NOT NULL,
            col_idx       INTEGER NOT NULL,
            name          TEXT NOT NULL,
            PRIMARY KEY (collection_id, col_idx),
            FOREIGN KEY (collection_id) REFERENCES collection(id)
        );

        CREATE TABLE IF NOT EXISTS field (
            collection_id INTEGER NOT NULL,
            record_idx    INTEGER NOT NULL,
            name          TEXT NOT NULL,
            value_type    TEXT NOT NULL,
            value         TEXT NOT NULL,
            PRIMARY KEY (collection_id, record_idx, name),
            FOREIGN KEY (collection_id) REFERENCES collection(id)
        );

        CREATE INDEX IF NOT EXISTS idx_field_collection_record
            ON field(collection_id, record_idx);
        ",
    )
    .context("failed to initialize schema")?;

    Ok(())
}
