//! Catalog schema
//!
//! The three relations are shared with existing catalog files, so column
//! names and constraints must stay as they are.

use crate::{DbError, DbPool, Result};
use rusqlite::{Connection, ErrorCode, OpenFlags};
use std::path::Path;

/// Columns every catalog relation must carry
const RELATIONS: [(&str, &[&str]); 3] = [
    ("files", &["id", "name", "path"]),
    ("tags", &["id", "name"]),
    ("filetags", &["id", "fileid", "tagid"]),
];

/// Create any missing catalog relations
pub fn create_schema(pool: &DbPool) -> Result<()> {
    let conn = pool.get()?;

    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS tags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR
        );

        CREATE TABLE IF NOT EXISTS files (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name VARCHAR,
            path VARCHAR,
            UNIQUE (path)
        );

        CREATE TABLE IF NOT EXISTS filetags (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            fileid INTEGER REFERENCES files(id),
            tagid INTEGER REFERENCES tags(id)
        );

        CREATE INDEX IF NOT EXISTS idx_filetags_file ON filetags(fileid);
        CREATE INDEX IF NOT EXISTS idx_filetags_tag ON filetags(tagid);
        CREATE INDEX IF NOT EXISTS idx_tags_name ON tags(name);
        "#,
    )?;

    tracing::info!("Catalog schema ready");
    Ok(())
}

/// Inspect the file at `path` with a single read-only connection.
///
/// Files that are not SQLite databases, or that lack the catalog relations,
/// are rejected as a bad locator without going through the pool.
pub(crate) fn inspect_catalog(path: &Path) -> Result<()> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| locator_error(path, e))?;
    read_header(&conn).map_err(|e| locator_error(path, e))?;
    check_relations(&conn)
}

/// Reject an existing file that is not a SQLite database
pub(crate) fn inspect_database(path: &Path) -> Result<()> {
    let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
        .map_err(|e| locator_error(path, e))?;
    read_header(&conn).map_err(|e| locator_error(path, e))
}

fn read_header(conn: &Connection) -> rusqlite::Result<()> {
    conn.query_row("PRAGMA schema_version", [], |row| row.get::<_, i64>(0))?;
    Ok(())
}

fn locator_error(path: &Path, e: rusqlite::Error) -> DbError {
    match e.sqlite_error_code() {
        Some(ErrorCode::NotADatabase) => {
            DbError::Locator(format!("{} is not a SQLite database", path.display()))
        }
        Some(ErrorCode::CannotOpen) => DbError::Locator(format!("{} cannot be opened", path.display())),
        _ => DbError::Sqlite(e),
    }
}

/// Check that all catalog relations exist with their columns
fn check_relations(conn: &Connection) -> Result<()> {
    let mut stmt = conn.prepare("SELECT name FROM pragma_table_info(?1)")?;

    for (table, required) in RELATIONS {
        let columns = stmt
            .query_map([table], |row| row.get::<_, String>(0))?
            .collect::<rusqlite::Result<Vec<String>>>()?;

        if columns.is_empty() {
            return Err(DbError::Schema(format!("missing relation '{}'", table)));
        }
        if let Some(missing) = required.iter().find(|c| !columns.iter().any(|have| have == *c)) {
            return Err(DbError::Schema(format!("relation '{}' has no column '{}'", table, missing)));
        }
    }

    Ok(())
}
