//! Equipment register persistence.
//!
//! A single `equipment` table holds every piece of equipment extracted
//! from a drawing, keyed by the source image, so runs across a drawing
//! set accumulate into one reviewable register.

use std::path::Path;

use rusqlite::{params, Connection};
use thiserror::Error;

use crate::models::PidDocument;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
}

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS equipment (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        source_image TEXT NOT NULL,
        tag TEXT,
        type TEXT,
        iso_class TEXT,
        iso_subclass TEXT,
        description TEXT,
        connections TEXT,
        status TEXT DEFAULT 'pending_review'
    )
";

/// Open the register at the given path, creating the schema if needed.
pub fn open_database(path: &Path) -> Result<Connection, DatabaseError> {
    let conn = Connection::open(path)?;
    setup(&conn)?;
    Ok(conn)
}

/// In-memory register for tests.
pub fn open_memory_database() -> Result<Connection, DatabaseError> {
    let conn = Connection::open_in_memory()?;
    setup(&conn)?;
    Ok(conn)
}

fn setup(conn: &Connection) -> Result<(), DatabaseError> {
    conn.execute_batch("PRAGMA foreign_keys=ON;")?;
    conn.execute(SCHEMA, [])?;
    Ok(())
}

/// Insert the document's equipment rows for one source image. New rows
/// start in `pending_review`. Returns the number inserted.
pub fn save_equipment(
    conn: &Connection,
    document: &PidDocument,
    source_image: &str,
) -> Result<usize, DatabaseError> {
    let mut stmt = conn.prepare(
        "INSERT INTO equipment
            (source_image, tag, type, iso_class, iso_subclass, description, connections)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
    )?;

    for item in &document.equipment {
        let iso_subclass = item.base.extra.get("iso_subclass").and_then(|v| v.as_str());
        let connections = item.base.extra.get("connections").and_then(|v| v.as_str());
        stmt.execute(params![
            source_image,
            item.tag,
            item.equipment_type,
            item.iso15926_class,
            iso_subclass,
            item.description,
            connections,
        ])?;
    }

    let count = document.equipment.len();
    tracing::info!(count, source_image, "Equipment saved to register");
    Ok(count)
}
